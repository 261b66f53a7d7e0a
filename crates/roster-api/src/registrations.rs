use axum::{
    Extension, Json,
    extract::{Path, State},
    response::IntoResponse,
};
use roster_types::api::UpsertRegistrationRequest;
use roster_types::{Event, Member, Registration};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::ApiError;
use crate::middleware::CurrentMember;
use crate::{AppState, local_now, run_db};

pub async fn list_registrations(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let registrations = run_db(&state, |db| {
        db.list_registrations()?
            .into_iter()
            .map(|row| row.into_registration())
            .collect::<anyhow::Result<Vec<_>>>()
    })
    .await?;
    Ok(Json(registrations))
}

/// Self-service: the caller's own registration for an event.
pub async fn upsert_own(
    State(state): State<AppState>,
    Extension(CurrentMember(member)): Extension<CurrentMember>,
    Path(event_id): Path<Uuid>,
    Json(req): Json<UpsertRegistrationRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let event = load_event(&state, event_id).await?;
    let registration = save(&state, &member, &member, &event, req).await?;
    Ok(Json(registration))
}

/// Admin edit on behalf of another member.
pub async fn upsert_for_member(
    State(state): State<AppState>,
    Extension(CurrentMember(admin)): Extension<CurrentMember>,
    Path((event_id, member_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<UpsertRegistrationRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let event = load_event(&state, event_id).await?;

    let id = member_id.to_string();
    let member = run_db(&state, move |db| {
        db.get_member_by_id(&id)?.map(|row| row.into_member()).transpose()
    })
    .await?
    .ok_or(ApiError::NotFound("member"))?;

    let registration = save(&state, &admin, &member, &event, req).await?;
    info!("Admin {} updated registration of {} for event {}", admin.id, member.id, event.id);
    Ok(Json(registration))
}

async fn load_event(state: &AppState, event_id: Uuid) -> Result<Event, ApiError> {
    let id = event_id.to_string();
    run_db(state, move |db| db.get_event(&id)?.map(|row| row.into_event()).transpose())
        .await?
        .ok_or(ApiError::NotFound("event"))
}

/// Checks that both the acting and the target member are active, then the
/// lock, then upserts the single (member, event) row.
async fn save(
    state: &AppState,
    actor: &Member,
    member: &Member,
    event: &Event,
    req: UpsertRegistrationRequest,
) -> Result<Registration, ApiError> {
    if !actor.is_active || !member.is_active {
        return Err(ApiError::Inactive);
    }
    if state.lock_policy.blocks(event, local_now(), actor.is_admin) {
        return Err(ApiError::EventLocked);
    }

    let comment = req
        .comment
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty());

    let reg_id = Uuid::new_v4().to_string();
    let member_id = member.id.to_string();
    let event_id = event.id.to_string();
    let registration = run_db(state, move |db| {
        db.upsert_registration(
            &reg_id,
            &member_id,
            &event_id,
            req.status,
            comment.as_deref(),
            req.guests,
            &req.items,
        )?
        .into_registration()
    })
    .await?;

    debug!(
        "Registration {} -> {} (+{})",
        registration.member_id, registration.status, registration.guests
    );
    Ok(registration)
}
