use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::NaiveDateTime;
use roster_types::api::SeasonItem;
use roster_types::{Event, Member, Registration, Season, Status};
use serde::Serialize;
use uuid::Uuid;

use crate::attendance::{Attendance, count_attendance};
use crate::items::bringers_of;
use crate::lock::is_locked;
use crate::season::settings;

/// Point-in-time snapshots the grid is assembled from.
pub struct GridInput<'a> {
    pub members: &'a [Member],
    pub events: &'a [Event],
    pub registrations: &'a [Registration],
    pub season: Season,
    /// Local wall-clock time used for lock decisions.
    pub now: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize)]
pub struct ItemBringers {
    pub label: String,
    pub key: String,
    pub bringers: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EventSummary {
    pub event: Event,
    pub locked: bool,
    pub attendance: Attendance,
    pub meets_minimum: bool,
    pub items: Vec<ItemBringers>,
}

/// One member's state for one event. `registered` is false when no row
/// exists, in which case the cell reads as pending.
#[derive(Debug, Clone, Serialize)]
pub struct Cell {
    pub member_id: Uuid,
    pub event_id: Uuid,
    pub registered: bool,
    pub status: Status,
    pub comment: Option<String>,
    pub guests: u32,
    pub items: BTreeMap<String, bool>,
    pub locked: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct Grid {
    pub season: Season,
    pub min_players: u32,
    pub items: Vec<SeasonItem>,
    /// Active roster, sorted by nickname.
    pub members: Vec<Member>,
    /// Columns, sorted by date then start time.
    pub events: Vec<EventSummary>,
    /// Row-major: every event for the first member, then the next member.
    pub cells: Vec<Cell>,
}

impl Grid {
    pub fn cell(&self, member_id: Uuid, event_id: Uuid) -> Option<&Cell> {
        self.cells
            .iter()
            .find(|c| c.member_id == member_id && c.event_id == event_id)
    }

    pub fn summary(&self, event_id: Uuid) -> Option<&EventSummary> {
        self.events.iter().find(|s| s.event.id == event_id)
    }
}

/// Assemble the members × events matrix with per-event summaries.
///
/// Registrations that point at a member or event missing from the snapshot
/// are dropped before anything is counted. Bringers are named from the
/// active roster only.
pub fn build_grid(input: &GridInput<'_>) -> Grid {
    let season = settings(input.season);
    let season_items = season.keyed_items();

    let known_members: HashSet<Uuid> = input.members.iter().map(|m| m.id).collect();
    let known_events: HashSet<Uuid> = input.events.iter().map(|e| e.id).collect();
    let registrations: Vec<&Registration> = input
        .registrations
        .iter()
        .filter(|r| known_members.contains(&r.member_id) && known_events.contains(&r.event_id))
        .collect();

    let lookup: HashMap<(Uuid, Uuid), &Registration> = registrations
        .iter()
        .map(|r| ((r.member_id, r.event_id), *r))
        .collect();

    let mut events: Vec<&Event> = input.events.iter().collect();
    events.sort_by_key(|e| (e.date, e.time_from));

    let mut roster: Vec<Member> = input
        .members
        .iter()
        .filter(|m| m.is_active)
        .cloned()
        .collect();
    roster.sort_by(|a, b| {
        a.nickname
            .to_lowercase()
            .cmp(&b.nickname.to_lowercase())
            .then_with(|| a.nickname.cmp(&b.nickname))
    });

    let summaries: Vec<EventSummary> = events
        .iter()
        .map(|event| {
            let attendance = count_attendance(registrations.iter().copied(), event.id);
            let items = season_items
                .iter()
                .map(|item| ItemBringers {
                    label: item.label.clone(),
                    key: item.key.clone(),
                    bringers: bringers_of(
                        registrations.iter().copied(),
                        &roster,
                        event.id,
                        &item.key,
                    ),
                })
                .collect();
            EventSummary {
                event: (*event).clone(),
                locked: is_locked(event, input.now),
                attendance,
                meets_minimum: attendance.meets_minimum(season.min_players),
                items,
            }
        })
        .collect();

    let lookup = &lookup;
    let cells = roster
        .iter()
        .flat_map(|member| {
            summaries.iter().map(move |summary| {
                let event_id = summary.event.id;
                match lookup.get(&(member.id, event_id)) {
                    Some(reg) => Cell {
                        member_id: member.id,
                        event_id,
                        registered: true,
                        status: reg.status,
                        comment: reg.comment.clone(),
                        guests: reg.guests,
                        items: reg.items.clone(),
                        locked: summary.locked,
                    },
                    None => Cell {
                        member_id: member.id,
                        event_id,
                        registered: false,
                        status: Status::Pending,
                        comment: None,
                        guests: 0,
                        items: BTreeMap::new(),
                        locked: summary.locked,
                    },
                }
            })
        })
        .collect();

    Grid {
        season: input.season,
        min_players: season.min_players,
        items: season_items,
        members: roster,
        events: summaries,
        cells,
    }
}
