use roster_types::Season;
use roster_types::api::SeasonItem;

use crate::items::item_key;

/// Equipment checklist and player threshold for one season.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeasonSettings {
    /// Item labels in display order.
    pub items: &'static [&'static str],
    pub min_players: u32,
}

const SUMMER: SeasonSettings = SeasonSettings {
    items: &["Schlüssel", "Ball", "Pumpe", "Überzieher", "Handschuhe"],
    min_players: 12,
};

const WINTER: SeasonSettings = SeasonSettings {
    items: &["Hallenball", "Pumpe", "Überzieher"],
    min_players: 8,
};

pub fn settings(season: Season) -> SeasonSettings {
    match season {
        Season::Summer => SUMMER,
        Season::Winter => WINTER,
    }
}

pub fn items_for_season(season: Season) -> &'static [&'static str] {
    settings(season).items
}

/// Calendar heuristic: April through September is summer.
/// Only used to seed the persisted setting on a fresh database.
pub fn season_for_month(month: u32) -> Season {
    if (4..=9).contains(&month) {
        Season::Summer
    } else {
        Season::Winter
    }
}

impl SeasonSettings {
    /// Labels paired with their persisted keys, in display order.
    pub fn keyed_items(&self) -> Vec<SeasonItem> {
        self.items
            .iter()
            .map(|label| SeasonItem {
                label: label.to_string(),
                key: item_key(label),
            })
            .collect()
    }
}
