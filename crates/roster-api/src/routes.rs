use axum::{
    Json, Router, middleware,
    routing::{delete, get, post, put},
};
use serde_json::{Value, json};

use crate::middleware::{require_admin, require_auth, require_password_current};
use crate::{AppState, auth, events, grid, members, registrations, season};

/// Full HTTP surface. The binary adds CORS and tracing on top.
pub fn router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(health))
        .route("/auth/login", post(auth::login));

    // Reachable while a temporary password is still set
    let account_routes = Router::new()
        .route("/auth/password", post(auth::change_password))
        .route("/me", get(auth::me))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    let member_routes = Router::new()
        .route("/members", get(members::list_roster))
        .route("/events", get(events::list_events))
        .route("/events/{event_id}", get(events::event_summary))
        .route("/events/{event_id}/registration", put(registrations::upsert_own))
        .route("/registrations", get(registrations::list_registrations))
        .route("/season", get(season::get_season))
        .route("/grid", get(grid::get_grid))
        .route_layer(middleware::from_fn(require_password_current))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    let admin_routes = Router::new()
        .route("/admin/members", get(members::list_all).post(members::create_member))
        .route("/admin/members/{member_id}/active", put(members::set_active))
        .route("/admin/members/{member_id}/reset-password", post(members::reset_password))
        .route("/admin/events", post(events::create_event))
        .route("/admin/events/recurring", post(events::create_recurring))
        .route("/admin/events/{event_id}", delete(events::delete_event))
        .route(
            "/admin/events/{event_id}/registrations/{member_id}",
            put(registrations::upsert_for_member),
        )
        .route("/admin/season", put(season::set_season))
        .route_layer(middleware::from_fn(require_admin))
        .route_layer(middleware::from_fn(require_password_current))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .merge(public_routes)
        .merge(account_routes)
        .merge(member_routes)
        .merge(admin_routes)
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
