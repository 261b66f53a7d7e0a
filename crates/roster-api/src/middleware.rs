use axum::{
    Extension,
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{DecodingKey, Validation, decode};
use roster_types::Member;
use roster_types::api::Claims;

use crate::error::ApiError;
use crate::{AppState, run_db};

/// The authenticated member, reloaded from the store on every request so
/// deactivation and role changes apply immediately.
#[derive(Debug, Clone)]
pub struct CurrentMember(pub Member);

pub fn decode_token(secret: &str, token: &str) -> Result<Claims, ApiError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| ApiError::Unauthorized)
}

/// Extract and validate JWT from Authorization header.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or(ApiError::Unauthorized)?;

    let claims = decode_token(&state.jwt_secret, token)?;

    let member_id = claims.sub.to_string();
    let member = run_db(&state, move |db| db.get_member_by_id(&member_id))
        .await?
        .ok_or(ApiError::Unauthorized)?
        .into_member()?;

    req.extensions_mut().insert(CurrentMember(member));
    Ok(next.run(req).await)
}

/// Members still on a temporary password may only change it.
pub async fn require_password_current(
    Extension(CurrentMember(member)): Extension<CurrentMember>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if member.must_change_password {
        return Err(ApiError::PasswordChangeRequired);
    }
    Ok(next.run(req).await)
}

pub async fn require_admin(
    Extension(CurrentMember(member)): Extension<CurrentMember>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if !member.is_admin {
        return Err(ApiError::AdminOnly);
    }
    Ok(next.run(req).await)
}
