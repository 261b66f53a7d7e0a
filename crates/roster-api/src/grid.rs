use axum::{Json, extract::State, response::IntoResponse};
use roster_core::{GridInput, build_grid};

use crate::error::ApiError;
use crate::events::load_events;
use crate::{AppState, local_now, run_db};

/// The attendance grid for all upcoming events.
pub async fn get_grid(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let now = local_now();
    let today = now.date();

    // Three independent reads; the aggregator tolerates drift between them.
    let (members, events, registrations, season) = run_db(&state, move |db| {
        let members = db
            .list_members()?
            .into_iter()
            .map(|row| row.into_member())
            .collect::<anyhow::Result<Vec<_>>>()?;
        let events = load_events(db, true, today)?;
        let registrations = db
            .list_registrations()?
            .into_iter()
            .map(|row| row.into_registration())
            .collect::<anyhow::Result<Vec<_>>>()?;
        Ok((members, events, registrations, db.get_season()))
    })
    .await?;

    let grid = build_grid(&GridInput {
        members: &members,
        events: &events,
        registrations: &registrations,
        season,
        now,
    });
    Ok(Json(grid))
}
