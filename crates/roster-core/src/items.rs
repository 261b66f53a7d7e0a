use std::collections::HashMap;

use roster_types::{Member, Registration, Status};
use uuid::Uuid;

/// Persisted key for an item label: lower-cased, umlauts spelled out.
///
/// This is the join key between the label shown in the checklist and the
/// flag stored in a registration's item map, so it must never change.
pub fn item_key(label: &str) -> String {
    let mut key = String::with_capacity(label.len() + 2);
    for ch in label.chars().flat_map(char::to_lowercase) {
        match ch {
            'ü' => key.push_str("ue"),
            'ä' => key.push_str("ae"),
            'ö' => key.push_str("oe"),
            'ß' => key.push_str("ss"),
            other => key.push(other),
        }
    }
    key
}

/// Nicknames of confirmed members bringing `item_key` to `event_id`,
/// sorted by nickname. Registrations whose member is missing from
/// `members` are skipped.
pub fn bringers_of<'a, I>(
    registrations: I,
    members: &[Member],
    event_id: Uuid,
    item_key: &str,
) -> Vec<String>
where
    I: IntoIterator<Item = &'a Registration>,
{
    let nicknames: HashMap<Uuid, &str> = members
        .iter()
        .map(|m| (m.id, m.nickname.as_str()))
        .collect();

    let mut bringers: Vec<String> = registrations
        .into_iter()
        .filter(|r| r.event_id == event_id && r.status == Status::Yes && r.brings(item_key))
        .filter_map(|r| nicknames.get(&r.member_id).map(|n| n.to_string()))
        .collect();

    sort_by_nickname(&mut bringers);
    bringers
}

/// Case-insensitive nickname order, ties broken by the exact string.
pub(crate) fn sort_by_nickname(names: &mut [String]) {
    names.sort_by(|a, b| {
        a.to_lowercase()
            .cmp(&b.to_lowercase())
            .then_with(|| a.cmp(b))
    });
}
