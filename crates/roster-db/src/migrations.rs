use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

/// Ordered schema steps. Each runs once, tracked in `schema_version`.
const MIGRATIONS: &[(i64, &str, &str)] = &[
    (
        1,
        "initial schema",
        "
        CREATE TABLE members (
            id                    TEXT PRIMARY KEY,
            nickname              TEXT NOT NULL,
            email                 TEXT NOT NULL UNIQUE,
            password_hash         TEXT NOT NULL,
            is_active             INTEGER NOT NULL DEFAULT 1,
            is_admin              INTEGER NOT NULL DEFAULT 0,
            must_change_password  INTEGER NOT NULL DEFAULT 1,
            created_at            TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at            TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE events (
            id          TEXT PRIMARY KEY,
            date        TEXT NOT NULL,
            time_from   TEXT NOT NULL,
            time_to     TEXT NOT NULL,
            location    TEXT NOT NULL,
            name        TEXT,
            created_at  TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE registrations (
            id          TEXT PRIMARY KEY,
            member_id   TEXT NOT NULL REFERENCES members(id) ON DELETE CASCADE,
            event_id    TEXT NOT NULL REFERENCES events(id) ON DELETE CASCADE,
            status      TEXT NOT NULL DEFAULT 'pending'
                        CHECK (status IN ('yes', 'no', 'pending')),
            comment     TEXT,
            guests      INTEGER NOT NULL DEFAULT 0 CHECK (guests >= 0),
            items       TEXT NOT NULL DEFAULT '{}',
            created_at  TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at  TEXT NOT NULL DEFAULT (datetime('now')),
            UNIQUE(member_id, event_id)
        );

        CREATE INDEX idx_members_active ON members(is_active);
        CREATE INDEX idx_events_date ON events(date, time_from);
        CREATE INDEX idx_registrations_event ON registrations(event_id);
        ",
    ),
    (
        2,
        "settings store",
        "
        CREATE TABLE settings (
            key         TEXT PRIMARY KEY,
            value       TEXT NOT NULL,
            updated_at  TEXT NOT NULL DEFAULT (datetime('now'))
        );
        ",
    ),
];

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch("CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL);")?;

    let version: i64 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |r| r.get(0),
    )?;

    for (step, name, sql) in MIGRATIONS.iter().filter(|(step, _, _)| *step > version) {
        info!("Running migration v{} ({})", step, name);
        conn.execute_batch(sql)?;
        conn.execute("INSERT INTO schema_version (version) VALUES (?1)", [step])?;
    }

    info!("Database migrations complete");
    Ok(())
}

/// Highest applied migration.
pub fn current_version(conn: &Connection) -> Result<i64> {
    Ok(conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |r| r.get(0),
    )?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migrations_are_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        run(&conn).unwrap();
        run(&conn).unwrap();
        assert_eq!(current_version(&conn).unwrap(), 2);
        let applied: i64 = conn
            .query_row("SELECT COUNT(*) FROM schema_version", [], |r| r.get(0))
            .unwrap();
        assert_eq!(applied, 2);
    }
}
