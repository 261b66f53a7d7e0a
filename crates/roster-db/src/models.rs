//! Database row types, mapped directly from SQLite rows.
//! Conversion into roster-types models validates every column.
use std::collections::BTreeMap;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use roster_types::models::hhmm;
use roster_types::{Event, Member, Registration};
use uuid::Uuid;

pub struct MemberRow {
    pub id: String,
    pub nickname: String,
    pub email: String,
    pub password_hash: String,
    pub is_active: bool,
    pub is_admin: bool,
    pub must_change_password: bool,
    pub created_at: String,
}

pub struct EventRow {
    pub id: String,
    pub date: String,
    pub time_from: String,
    pub time_to: String,
    pub location: String,
    pub name: Option<String>,
}

pub struct RegistrationRow {
    pub id: String,
    pub member_id: String,
    pub event_id: String,
    pub status: String,
    pub comment: Option<String>,
    pub guests: i64,
    pub items: String,
    pub updated_at: String,
}

pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";

/// SQLite's `datetime('now')` has no zone; rows we write ourselves are RFC 3339.
pub(crate) fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    raw.parse::<DateTime<Utc>>()
        .or_else(|_| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc())
        })
        .with_context(|| format!("bad timestamp '{}'", raw))
}

fn parse_id(raw: &str, what: &str) -> Result<Uuid> {
    raw.parse::<Uuid>()
        .with_context(|| format!("bad {} '{}'", what, raw))
}

impl MemberRow {
    pub fn into_member(self) -> Result<Member> {
        Ok(Member {
            id: parse_id(&self.id, "member id")?,
            nickname: self.nickname,
            email: self.email,
            is_active: self.is_active,
            is_admin: self.is_admin,
            must_change_password: self.must_change_password,
            created_at: parse_timestamp(&self.created_at)?,
        })
    }
}

impl EventRow {
    pub fn into_event(self) -> Result<Event> {
        Ok(Event {
            id: parse_id(&self.id, "event id")?,
            date: NaiveDate::parse_from_str(&self.date, DATE_FORMAT)
                .with_context(|| format!("bad date '{}' on event '{}'", self.date, self.id))?,
            time_from: hhmm::parse(&self.time_from)
                .with_context(|| format!("bad time_from '{}' on event '{}'", self.time_from, self.id))?,
            time_to: hhmm::parse(&self.time_to)
                .with_context(|| format!("bad time_to '{}' on event '{}'", self.time_to, self.id))?,
            location: self.location,
            name: self.name,
        })
    }
}

impl RegistrationRow {
    pub fn into_registration(self) -> Result<Registration> {
        let items: BTreeMap<String, bool> = serde_json::from_str(&self.items)
            .with_context(|| format!("bad items on registration '{}'", self.id))?;
        Ok(Registration {
            id: parse_id(&self.id, "registration id")?,
            member_id: parse_id(&self.member_id, "member id")?,
            event_id: parse_id(&self.event_id, "event id")?,
            status: self.status.parse()?,
            comment: self.comment,
            guests: u32::try_from(self.guests)
                .with_context(|| format!("bad guest count {} on '{}'", self.guests, self.id))?,
            items,
            updated_at: parse_timestamp(&self.updated_at)?,
        })
    }
}
