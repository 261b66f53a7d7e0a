use axum::{Json, extract::State, response::IntoResponse};
use roster_core::settings;
use roster_types::Season;
use roster_types::api::{SeasonResponse, SetSeasonRequest};

use crate::error::ApiError;
use crate::{AppState, run_db};

pub fn season_response(season: Season) -> SeasonResponse {
    let config = settings(season);
    SeasonResponse {
        season,
        items: config.keyed_items(),
        min_players: config.min_players,
    }
}

pub async fn get_season(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let season = run_db(&state, |db| Ok(db.get_season())).await?;
    Ok(Json(season_response(season)))
}

pub async fn set_season(
    State(state): State<AppState>,
    Json(req): Json<SetSeasonRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let season = req.season;
    run_db(&state, move |db| db.set_season(season)).await?;
    Ok(Json(season_response(season)))
}
