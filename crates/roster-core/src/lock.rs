use chrono::{Duration, NaiveDateTime};
use roster_types::Event;

/// Registrations freeze this many minutes before an event starts.
pub const LOCK_WINDOW_MINUTES: i64 = 60;

/// Start of the event as a local wall-clock timestamp.
///
/// Date and time are combined field-wise; no time zone is attached, so the
/// comparison in [`is_locked`] happens entirely in local time.
pub fn event_start(event: &Event) -> NaiveDateTime {
    event.date.and_time(event.time_from)
}

/// An event is locked from one hour before its start onwards (inclusive).
/// Past events are always locked. The end time plays no part.
pub fn is_locked(event: &Event, now: NaiveDateTime) -> bool {
    now >= event_start(event) - Duration::minutes(LOCK_WINDOW_MINUTES)
}

/// Whether the lock also applies to admins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LockPolicy {
    /// Nobody may edit a locked event.
    #[default]
    Strict,
    /// Admins may still edit locked events.
    AdminExempt,
}

impl LockPolicy {
    pub fn from_admin_exempt(exempt: bool) -> Self {
        if exempt { Self::AdminExempt } else { Self::Strict }
    }

    /// True when a write by this actor must be rejected.
    pub fn blocks(&self, event: &Event, now: NaiveDateTime, is_admin: bool) -> bool {
        if is_admin && *self == Self::AdminExempt {
            return false;
        }
        is_locked(event, now)
    }
}
