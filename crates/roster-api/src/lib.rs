pub mod auth;
pub mod credentials;
pub mod error;
pub mod events;
pub mod grid;
pub mod members;
pub mod middleware;
pub mod registrations;
pub mod routes;
pub mod season;

use std::sync::Arc;

use roster_core::LockPolicy;
use roster_db::Database;
use tracing::error;

use crate::error::ApiError;

pub use routes::router;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    pub jwt_secret: String,
    pub token_days: i64,
    pub lock_policy: LockPolicy,
}

/// Run a blocking store call off the async runtime.
pub(crate) async fn run_db<F, T>(state: &AppState, f: F) -> Result<T, ApiError>
where
    F: FnOnce(&Database) -> anyhow::Result<T> + Send + 'static,
    T: Send + 'static,
{
    let state = state.clone();
    tokio::task::spawn_blocking(move || f(&state.db))
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            ApiError::Store(anyhow::anyhow!("blocking task failed"))
        })?
        .map_err(ApiError::from)
}

/// Local wall-clock time, used for every lock decision.
pub(crate) fn local_now() -> chrono::NaiveDateTime {
    chrono::Local::now().naive_local()
}
