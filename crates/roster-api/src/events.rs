use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use roster_core::{GridInput, NewEvent, RecurrenceRequest, build_grid, generate_events};
use roster_db::Database;
use roster_db::queries::EventInsert;
use roster_types::Event;
use roster_types::api::{CreateEventRequest, RecurringEventsRequest};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::error::ApiError;
use crate::{AppState, local_now, run_db};

#[derive(Debug, Deserialize)]
pub struct EventsQuery {
    #[serde(default)]
    pub only_future: bool,
}

pub async fn list_events(
    State(state): State<AppState>,
    Query(query): Query<EventsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let today = local_now().date();
    let events = run_db(&state, move |db| load_events(db, query.only_future, today)).await?;
    Ok(Json(events))
}

/// One column of the grid: lock state, headcount and bringers.
pub async fn event_summary(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let id = event_id.to_string();
    let snapshot = run_db(&state, move |db| {
        let Some(event) = db.get_event(&id)? else {
            return Ok(None);
        };
        let event = event.into_event()?;
        let members = db
            .list_members()?
            .into_iter()
            .map(|row| row.into_member())
            .collect::<anyhow::Result<Vec<_>>>()?;
        let registrations = db
            .list_registrations_for_event(&id)?
            .into_iter()
            .map(|row| row.into_registration())
            .collect::<anyhow::Result<Vec<_>>>()?;
        Ok(Some((event, members, registrations, db.get_season())))
    })
    .await?;

    let (event, members, registrations, season) = snapshot.ok_or(ApiError::NotFound("event"))?;
    let events = [event];
    let grid = build_grid(&GridInput {
        members: &members,
        events: &events,
        registrations: &registrations,
        season,
        now: local_now(),
    });

    let summary = grid
        .events
        .into_iter()
        .next()
        .ok_or(ApiError::NotFound("event"))?;
    Ok(Json(summary))
}

pub async fn create_event(
    State(state): State<AppState>,
    Json(req): Json<CreateEventRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let new_event = NewEvent::new(
        req.date,
        req.time_from,
        req.time_to,
        &req.location,
        req.name.as_deref(),
    )?;

    let mut stored = run_db(&state, move |db| store_events(db, vec![new_event])).await?;
    let event = stored
        .pop()
        .ok_or_else(|| ApiError::Store(anyhow::anyhow!("event was not stored")))?;

    info!("Created event {} on {}", event.id, event.date);
    Ok((StatusCode::CREATED, Json(event)))
}

/// Batch-create events from a weekday recurrence. Nothing is stored when
/// validation fails.
pub async fn create_recurring(
    State(state): State<AppState>,
    Json(req): Json<RecurringEventsRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let new_events = generate_events(&RecurrenceRequest {
        date_from: req.date_from,
        date_to: req.date_to,
        weekdays: req.weekdays,
        time_from: req.time_from,
        time_to: req.time_to,
        location: req.location,
        name: req.name,
    })?;

    let events = run_db(&state, move |db| store_events(db, new_events)).await?;

    info!("Created {} recurring events", events.len());
    Ok((StatusCode::CREATED, Json(events)))
}

/// Removes the event and every registration for it.
pub async fn delete_event(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let id = event_id.to_string();
    let deleted = run_db(&state, move |db| db.delete_event(&id)).await?;
    if !deleted {
        return Err(ApiError::NotFound("event"));
    }

    info!("Deleted event {}", event_id);
    Ok(StatusCode::NO_CONTENT)
}

pub(crate) fn load_events(db: &Database, only_future: bool, today: chrono::NaiveDate) -> anyhow::Result<Vec<Event>> {
    db.list_events(only_future, today)?
        .into_iter()
        .map(|row| row.into_event())
        .collect()
}

fn store_events(db: &Database, new_events: Vec<NewEvent>) -> anyhow::Result<Vec<Event>> {
    let events: Vec<Event> = new_events
        .into_iter()
        .map(|e| Event {
            id: Uuid::new_v4(),
            date: e.date,
            time_from: e.time_from,
            time_to: e.time_to,
            location: e.location,
            name: e.name,
        })
        .collect();

    let ids: Vec<String> = events.iter().map(|e| e.id.to_string()).collect();
    let inserts: Vec<EventInsert<'_>> = events
        .iter()
        .zip(&ids)
        .map(|(e, id)| EventInsert {
            id,
            date: e.date,
            time_from: e.time_from,
            time_to: e.time_to,
            location: &e.location,
            name: e.name.as_deref(),
        })
        .collect();

    db.create_events(&inserts)?;
    Ok(events)
}
