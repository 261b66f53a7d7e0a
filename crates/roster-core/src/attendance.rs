use roster_types::{Registration, Status};
use serde::Serialize;
use uuid::Uuid;

/// Headcount for one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Attendance {
    pub members: u32,
    pub guests: u32,
    pub total: u32,
}

impl Attendance {
    pub fn meets_minimum(&self, min_players: u32) -> bool {
        self.total >= min_players
    }
}

/// Count confirmed members and their guests for `event_id`.
///
/// Only `yes` rows contribute. Guests stored on `no` or `pending` rows are
/// never counted.
pub fn count_attendance<'a, I>(registrations: I, event_id: Uuid) -> Attendance
where
    I: IntoIterator<Item = &'a Registration>,
{
    let (members, guests) = registrations
        .into_iter()
        .filter(|r| r.event_id == event_id && r.status == Status::Yes)
        .fold((0u32, 0u32), |(members, guests), r| {
            (members + 1, guests.saturating_add(r.guests))
        });

    Attendance {
        members,
        guests,
        total: members.saturating_add(guests),
    }
}
