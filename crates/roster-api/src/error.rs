use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use roster_core::ValidationError;
use roster_types::api::ErrorBody;
use tracing::error;

/// Every failure a handler can report. The body is always `{"error": ...}`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{0}")]
    BadRequest(String),

    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("missing or invalid token")]
    Unauthorized,

    #[error("admin rights required")]
    AdminOnly,

    #[error("password change required")]
    PasswordChangeRequired,

    #[error("account is inactive")]
    Inactive,

    #[error("event is locked for changes")]
    EventLocked,

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    Conflict(String),

    /// Store failures stay opaque to the caller.
    #[error("internal server error")]
    Store(#[from] anyhow::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::InvalidCredentials | Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::AdminOnly | Self::PasswordChangeRequired | Self::Inactive | Self::EventLocked => {
                StatusCode::FORBIDDEN
            }
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let Self::Store(e) = &self {
            error!("Store error: {:#}", e);
        }
        let body = ErrorBody {
            error: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}
