use std::collections::BTreeMap;

use anyhow::Result;
use chrono::{NaiveDate, NaiveTime, Utc};
use roster_types::Status;
use roster_types::models::hhmm;
use rusqlite::{Connection, ErrorCode, Row};
use tracing::debug;

use crate::Database;
use crate::models::{DATE_FORMAT, EventRow, MemberRow, RegistrationRow};

const MEMBER_COLUMNS: &str =
    "id, nickname, email, password_hash, is_active, is_admin, must_change_password, created_at";

const EVENT_COLUMNS: &str = "id, date, time_from, time_to, location, name";

const REGISTRATION_COLUMNS: &str =
    "id, member_id, event_id, status, comment, guests, items, updated_at";

/// Fields for one event insert.
pub struct EventInsert<'a> {
    pub id: &'a str,
    pub date: NaiveDate,
    pub time_from: NaiveTime,
    pub time_to: NaiveTime,
    pub location: &'a str,
    pub name: Option<&'a str>,
}

impl Database {
    // -- Members --

    /// Returns false when the email is already registered. The UNIQUE
    /// constraint decides, so concurrent inserts cannot both succeed.
    pub fn create_member(
        &self,
        id: &str,
        nickname: &str,
        email: &str,
        password_hash: &str,
        is_admin: bool,
    ) -> Result<bool> {
        let now = Utc::now().to_rfc3339();
        self.with_conn(|conn| {
            let inserted = conn.execute(
                "INSERT INTO members (id, nickname, email, password_hash, is_admin, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
                rusqlite::params![id, nickname, email, password_hash, is_admin, now],
            );
            match inserted {
                Ok(_) => Ok(true),
                Err(e) if is_unique_violation(&e) => {
                    debug!("Email {} already registered", email);
                    Ok(false)
                }
                Err(e) => Err(e.into()),
            }
        })
    }

    pub fn get_member_by_id(&self, id: &str) -> Result<Option<MemberRow>> {
        self.with_conn(|conn| query_member(conn, "id", id))
    }

    pub fn get_member_by_email(&self, email: &str) -> Result<Option<MemberRow>> {
        self.with_conn(|conn| query_member(conn, "email", email))
    }

    /// Every member, active or not, ordered by nickname.
    pub fn list_members(&self) -> Result<Vec<MemberRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {MEMBER_COLUMNS} FROM members ORDER BY nickname COLLATE NOCASE, nickname"
            ))?;
            let rows = stmt
                .query_map([], member_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn count_members(&self) -> Result<i64> {
        self.with_conn(|conn| {
            Ok(conn.query_row("SELECT COUNT(*) FROM members", [], |row| row.get(0))?)
        })
    }

    /// Returns false when no such member exists.
    pub fn set_member_active(&self, id: &str, is_active: bool) -> Result<bool> {
        let now = Utc::now().to_rfc3339();
        self.with_conn(|conn| {
            let changed = conn.execute(
                "UPDATE members SET is_active = ?2, updated_at = ?3 WHERE id = ?1",
                rusqlite::params![id, is_active, now],
            )?;
            Ok(changed > 0)
        })
    }

    /// Replace the credential hash. `must_change` is true for admin resets
    /// and false once the member picks their own password.
    pub fn update_member_password(&self, id: &str, password_hash: &str, must_change: bool) -> Result<bool> {
        let now = Utc::now().to_rfc3339();
        self.with_conn(|conn| {
            let changed = conn.execute(
                "UPDATE members SET password_hash = ?2, must_change_password = ?3, updated_at = ?4
                 WHERE id = ?1",
                rusqlite::params![id, password_hash, must_change, now],
            )?;
            Ok(changed > 0)
        })
    }

    // -- Events --

    pub fn create_event(&self, event: &EventInsert<'_>) -> Result<()> {
        self.with_conn(|conn| insert_event(conn, event))
    }

    /// Insert a batch atomically: either every event is stored or none is.
    pub fn create_events(&self, events: &[EventInsert<'_>]) -> Result<()> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            for event in events {
                insert_event(&tx, event)?;
            }
            tx.commit()?;
            debug!("Inserted {} events", events.len());
            Ok(())
        })
    }

    pub fn get_event(&self, id: &str) -> Result<Option<EventRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!("SELECT {EVENT_COLUMNS} FROM events WHERE id = ?1"))?;
            let row = stmt.query_row([id], event_from_row).optional()?;
            Ok(row)
        })
    }

    /// Events ordered by date and start time. With `only_future`, events
    /// dated before `today` are left out.
    pub fn list_events(&self, only_future: bool, today: NaiveDate) -> Result<Vec<EventRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {EVENT_COLUMNS} FROM events
                 WHERE ?1 = 0 OR date >= ?2
                 ORDER BY date, time_from"
            ))?;
            let rows = stmt
                .query_map(
                    rusqlite::params![only_future, today.format(DATE_FORMAT).to_string()],
                    event_from_row,
                )?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    /// Deletes the event and, through the foreign key, its registrations.
    /// Returns false when no such event exists.
    pub fn delete_event(&self, id: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let changed = conn.execute("DELETE FROM events WHERE id = ?1", [id])?;
            Ok(changed > 0)
        })
    }

    // -- Registrations --

    /// Create or fully overwrite the single row for (member, event).
    #[allow(clippy::too_many_arguments)]
    pub fn upsert_registration(
        &self,
        id: &str,
        member_id: &str,
        event_id: &str,
        status: Status,
        comment: Option<&str>,
        guests: u32,
        items: &BTreeMap<String, bool>,
    ) -> Result<RegistrationRow> {
        let items_json = serde_json::to_string(items)?;
        let now = Utc::now().to_rfc3339();
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "INSERT INTO registrations (id, member_id, event_id, status, comment, guests, items, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)
                 ON CONFLICT(member_id, event_id) DO UPDATE SET
                     status = excluded.status,
                     comment = excluded.comment,
                     guests = excluded.guests,
                     items = excluded.items,
                     updated_at = excluded.updated_at
                 RETURNING {REGISTRATION_COLUMNS}"
            ))?;
            let row = stmt.query_row(
                rusqlite::params![id, member_id, event_id, status.as_str(), comment, guests, items_json, now],
                registration_from_row,
            )?;
            Ok(row)
        })
    }

    pub fn list_registrations(&self) -> Result<Vec<RegistrationRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!("SELECT {REGISTRATION_COLUMNS} FROM registrations"))?;
            let rows = stmt
                .query_map([], registration_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn list_registrations_for_event(&self, event_id: &str) -> Result<Vec<RegistrationRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {REGISTRATION_COLUMNS} FROM registrations WHERE event_id = ?1"
            ))?;
            let rows = stmt
                .query_map([event_id], registration_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }
}

fn insert_event(conn: &Connection, event: &EventInsert<'_>) -> Result<()> {
    conn.execute(
        "INSERT INTO events (id, date, time_from, time_to, location, name) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        rusqlite::params![
            event.id,
            event.date.format(DATE_FORMAT).to_string(),
            hhmm::format(&event.time_from),
            hhmm::format(&event.time_to),
            event.location,
            event.name,
        ],
    )?;
    Ok(())
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.code == ErrorCode::ConstraintViolation
                && e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

fn query_member(conn: &Connection, column: &str, value: &str) -> Result<Option<MemberRow>> {
    let mut stmt = conn.prepare(&format!("SELECT {MEMBER_COLUMNS} FROM members WHERE {column} = ?1"))?;
    let row = stmt.query_row([value], member_from_row).optional()?;
    Ok(row)
}

fn member_from_row(row: &Row<'_>) -> rusqlite::Result<MemberRow> {
    Ok(MemberRow {
        id: row.get(0)?,
        nickname: row.get(1)?,
        email: row.get(2)?,
        password_hash: row.get(3)?,
        is_active: row.get(4)?,
        is_admin: row.get(5)?,
        must_change_password: row.get(6)?,
        created_at: row.get(7)?,
    })
}

fn event_from_row(row: &Row<'_>) -> rusqlite::Result<EventRow> {
    Ok(EventRow {
        id: row.get(0)?,
        date: row.get(1)?,
        time_from: row.get(2)?,
        time_to: row.get(3)?,
        location: row.get(4)?,
        name: row.get(5)?,
    })
}

fn registration_from_row(row: &Row<'_>) -> rusqlite::Result<RegistrationRow> {
    Ok(RegistrationRow {
        id: row.get(0)?,
        member_id: row.get(1)?,
        event_id: row.get(2)?,
        status: row.get(3)?,
        comment: row.get(4)?,
        guests: row.get(5)?,
        items: row.get(6)?,
        updated_at: row.get(7)?,
    })
}

/// Extension trait for optional query results
pub(crate) trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
