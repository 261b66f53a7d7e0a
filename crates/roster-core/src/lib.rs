//! Roster Core: the attendance and commitment aggregation rules.
//!
//! Everything here is pure. Callers hand in point-in-time snapshots of
//! members, events and registrations (plus the active season and a reference
//! timestamp) and get back lock decisions, headcounts and bringer lists.
//! Persistence and credentials live in roster-db and roster-api.

pub mod attendance;
pub mod error;
pub mod grid;
pub mod items;
pub mod lock;
pub mod recurrence;
pub mod season;

// Re-export key types for convenience.
pub use attendance::{Attendance, count_attendance};
pub use error::{ValidationError, validate_email, validate_new_password, require_field};
pub use grid::{Cell, EventSummary, Grid, GridInput, ItemBringers, build_grid};
pub use items::{bringers_of, item_key};
pub use lock::{LOCK_WINDOW_MINUTES, LockPolicy, event_start, is_locked};
pub use recurrence::{MAX_RECURRENCE_DAYS, NewEvent, RecurrenceRequest, generate_events};
pub use season::{SeasonSettings, items_for_season, season_for_month, settings};
