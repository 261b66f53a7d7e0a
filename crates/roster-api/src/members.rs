use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use roster_core::{require_field, validate_email};
use roster_db::Database;
use roster_types::Member;
use roster_types::api::{CreateMemberRequest, CreateMemberResponse, PasswordResetResponse, SetActiveRequest};
use tracing::info;
use uuid::Uuid;

use crate::credentials::{generate_password, hash_password};
use crate::error::ApiError;
use crate::middleware::CurrentMember;
use crate::{AppState, run_db};

/// Active roster, sorted by nickname.
pub async fn list_roster(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let members = run_db(&state, |db| {
        db.list_members()?
            .into_iter()
            .filter(|row| row.is_active)
            .map(|row| row.into_member())
            .collect::<anyhow::Result<Vec<_>>>()
    })
    .await?;
    Ok(Json(members))
}

/// Every member, including deactivated ones.
pub async fn list_all(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let members = run_db(&state, |db| {
        db.list_members()?
            .into_iter()
            .map(|row| row.into_member())
            .collect::<anyhow::Result<Vec<_>>>()
    })
    .await?;
    Ok(Json(members))
}

pub async fn create_member(
    State(state): State<AppState>,
    Json(req): Json<CreateMemberRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let nickname = require_field("nickname", &req.nickname)?.to_string();
    let email = validate_email(&req.email)?;

    let password = generate_password();
    let hash = hash_password(&password)?;
    let id = Uuid::new_v4();

    let member = run_db(&state, move |db| insert_member(db, id, &nickname, &email, &hash, req.is_admin))
        .await?
        .ok_or_else(|| ApiError::Conflict("email is already registered".into()))?;

    info!("Created member {} (admin: {})", member.id, member.is_admin);
    Ok((
        StatusCode::CREATED,
        Json(CreateMemberResponse { member, password }),
    ))
}

pub async fn set_active(
    State(state): State<AppState>,
    Extension(CurrentMember(actor)): Extension<CurrentMember>,
    Path(member_id): Path<Uuid>,
    Json(req): Json<SetActiveRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if member_id == actor.id && !req.is_active {
        return Err(ApiError::BadRequest("you cannot deactivate your own account".into()));
    }

    let id = member_id.to_string();
    let member = run_db(&state, move |db| {
        if !db.set_member_active(&id, req.is_active)? {
            return Ok(None);
        }
        db.get_member_by_id(&id)?.map(|row| row.into_member()).transpose()
    })
    .await?
    .ok_or(ApiError::NotFound("member"))?;

    info!("Member {} is now {}", member.id, if member.is_active { "active" } else { "inactive" });
    Ok(Json(member))
}

/// Issue a new temporary password; the member must change it at next login.
pub async fn reset_password(
    State(state): State<AppState>,
    Path(member_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let password = generate_password();
    let hash = hash_password(&password)?;

    let id = member_id.to_string();
    let found = run_db(&state, move |db| db.update_member_password(&id, &hash, true)).await?;
    if !found {
        return Err(ApiError::NotFound("member"));
    }

    info!("Password reset for member {}", member_id);
    Ok(Json(PasswordResetResponse { member_id, password }))
}

/// `None` when the email is already registered.
fn insert_member(
    db: &Database,
    id: Uuid,
    nickname: &str,
    email: &str,
    hash: &str,
    is_admin: bool,
) -> anyhow::Result<Option<Member>> {
    let id = id.to_string();
    if !db.create_member(&id, nickname, email, hash, is_admin)? {
        return Ok(None);
    }
    db.get_member_by_id(&id)?
        .ok_or_else(|| anyhow::anyhow!("member {} vanished after insert", id))?
        .into_member()
        .map(Some)
}

/// Create the first admin when the member table is empty.
/// Returns the generated temporary password when an admin was created.
pub fn bootstrap_admin(db: &Database, email: &str, nickname: &str) -> anyhow::Result<Option<String>> {
    if db.count_members()? > 0 {
        return Ok(None);
    }
    let email = validate_email(email)?;
    let nickname = require_field("nickname", nickname)?;

    let password = generate_password();
    let hash = hash_password(&password)?;
    let Some(admin) = insert_member(db, Uuid::new_v4(), nickname, &email, &hash, true)? else {
        return Ok(None);
    };

    info!("Bootstrapped admin {} <{}>", admin.id, admin.email);
    Ok(Some(password))
}
