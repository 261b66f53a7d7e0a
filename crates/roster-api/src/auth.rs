use axum::{Extension, Json, extract::State, http::StatusCode, response::IntoResponse};
use jsonwebtoken::{EncodingKey, Header, encode};
use roster_core::validate_new_password;
use roster_types::Member;
use roster_types::api::{ChangePasswordRequest, Claims, LoginRequest, LoginResponse};
use tracing::info;

use crate::credentials::{hash_password, verify_password};
use crate::error::ApiError;
use crate::middleware::CurrentMember;
use crate::{AppState, run_db};

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let email = req.email.trim().to_lowercase();

    let row = run_db(&state, move |db| db.get_member_by_email(&email))
        .await?
        .ok_or(ApiError::InvalidCredentials)?;

    if !verify_password(&req.password, &row.password_hash) {
        return Err(ApiError::InvalidCredentials);
    }

    let member = row.into_member()?;
    let token = create_token(&state.jwt_secret, &member, state.token_days)?;

    info!("Member {} logged in", member.id);
    Ok(Json(LoginResponse {
        token,
        must_change_password: member.must_change_password,
        member,
    }))
}

/// Sets a member-chosen password and clears the forced-reset flag.
pub async fn change_password(
    State(state): State<AppState>,
    Extension(CurrentMember(member)): Extension<CurrentMember>,
    Json(req): Json<ChangePasswordRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_new_password(&req.new_password, &req.confirm_password)?;

    let hash = hash_password(&req.new_password)?;
    let id = member.id.to_string();
    run_db(&state, move |db| db.update_member_password(&id, &hash, false)).await?;

    info!("Member {} changed their password", member.id);
    Ok(StatusCode::NO_CONTENT)
}

pub async fn me(Extension(CurrentMember(member)): Extension<CurrentMember>) -> Json<Member> {
    Json(member)
}

/// Upper bound for the configured token lifetime.
pub const MAX_TOKEN_DAYS: i64 = 3650;

pub fn create_token(secret: &str, member: &Member, days: i64) -> anyhow::Result<String> {
    let expires = chrono::Duration::try_days(days)
        .and_then(|lifetime| chrono::Utc::now().checked_add_signed(lifetime))
        .ok_or_else(|| anyhow::anyhow!("token lifetime of {} days is out of range", days))?;

    let claims = Claims {
        sub: member.id,
        email: member.email.clone(),
        is_admin: member.is_admin,
        exp: usize::try_from(expires.timestamp())?,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    Ok(token)
}
