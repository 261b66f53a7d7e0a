use anyhow::Result;
use chrono::Utc;
use roster_types::Season;
use tracing::{info, warn};

use crate::Database;
use crate::queries::OptionalExt;

pub const SEASON_KEY: &str = "current_season";

impl Database {
    pub fn get_setting(&self, key: &str) -> Result<Option<String>> {
        self.with_conn(|conn| {
            conn.query_row("SELECT value FROM settings WHERE key = ?1", [key], |row| row.get(0))
                .optional()
        })
    }

    pub fn set_setting(&self, key: &str, value: &str) -> Result<()> {
        let now = Utc::now().to_rfc3339();
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO settings (key, value, updated_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
                (key, value, now),
            )?;
            Ok(())
        })
    }

    /// The persisted season. Falls back to summer when the key is missing,
    /// holds an unknown value, or cannot be read.
    pub fn get_season(&self) -> Season {
        match self.get_setting(SEASON_KEY) {
            Ok(Some(raw)) => raw.parse::<Season>().unwrap_or_else(|e| {
                warn!("Ignoring stored season: {}", e);
                Season::Summer
            }),
            Ok(None) => Season::Summer,
            Err(e) => {
                warn!("Failed to read season setting: {}", e);
                Season::Summer
            }
        }
    }

    pub fn set_season(&self, season: Season) -> Result<()> {
        self.set_setting(SEASON_KEY, season.as_str())?;
        info!("Season set to {}", season);
        Ok(())
    }

    /// Store `season` only if no season has been stored yet.
    /// Returns true when the seed was written.
    pub fn seed_season(&self, season: Season) -> Result<bool> {
        self.with_conn(|conn| {
            let inserted = conn.execute(
                "INSERT OR IGNORE INTO settings (key, value) VALUES (?1, ?2)",
                (SEASON_KEY, season.as_str()),
            )?;
            Ok(inserted > 0)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn season_defaults_to_summer() {
        let db = Database::open_in_memory().unwrap();
        assert_eq!(db.get_season(), Season::Summer);
    }

    #[test]
    fn set_season_persists() {
        let db = Database::open_in_memory().unwrap();
        db.set_season(Season::Winter).unwrap();
        assert_eq!(db.get_season(), Season::Winter);
        db.set_season(Season::Summer).unwrap();
        assert_eq!(db.get_season(), Season::Summer);
        assert_eq!(db.get_setting(SEASON_KEY).unwrap().as_deref(), Some("summer"));
    }

    #[test]
    fn seed_does_not_override_admin_choice() {
        let db = Database::open_in_memory().unwrap();
        assert!(db.seed_season(Season::Winter).unwrap());
        assert_eq!(db.get_season(), Season::Winter);
        db.set_season(Season::Summer).unwrap();
        assert!(!db.seed_season(Season::Winter).unwrap());
        assert_eq!(db.get_season(), Season::Summer);
    }

    #[test]
    fn unknown_stored_value_reads_as_summer() {
        let db = Database::open_in_memory().unwrap();
        db.set_setting(SEASON_KEY, "spring").unwrap();
        assert_eq!(db.get_season(), Season::Summer);
    }
}
