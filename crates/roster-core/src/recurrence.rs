use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate, NaiveTime};

use crate::error::{ValidationError, require_field};

/// An event that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEvent {
    pub date: NaiveDate,
    pub time_from: NaiveTime,
    pub time_to: NaiveTime,
    pub location: String,
    pub name: Option<String>,
}

impl NewEvent {
    /// Single event with trimmed location and an optional, non-blank name.
    pub fn new(
        date: NaiveDate,
        time_from: NaiveTime,
        time_to: NaiveTime,
        location: &str,
        name: Option<&str>,
    ) -> Result<Self, ValidationError> {
        let location = require_field("location", location)?.to_string();
        let name = name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string);
        Ok(Self {
            date,
            time_from,
            time_to,
            location,
            name,
        })
    }
}

/// Longest inclusive range a single recurrence may cover (three years).
pub const MAX_RECURRENCE_DAYS: i64 = 3 * 366;

/// Weekday-filtered recurrence over an inclusive date range.
/// Weekdays use 0 = Sunday .. 6 = Saturday.
#[derive(Debug, Clone)]
pub struct RecurrenceRequest {
    pub date_from: NaiveDate,
    pub date_to: NaiveDate,
    pub weekdays: Vec<u8>,
    pub time_from: NaiveTime,
    pub time_to: NaiveTime,
    pub location: String,
    pub name: Option<String>,
}

/// Expand a recurrence into one event per matching day, ascending by date.
///
/// All validation happens before the first event is produced. Existing
/// events at the same slot are not considered; duplicates are accepted.
pub fn generate_events(req: &RecurrenceRequest) -> Result<Vec<NewEvent>, ValidationError> {
    if req.weekdays.is_empty() {
        return Err(ValidationError::EmptyWeekdays);
    }
    if let Some(&bad) = req.weekdays.iter().find(|&&d| d > 6) {
        return Err(ValidationError::InvalidWeekday(bad));
    }
    if req.date_from > req.date_to {
        return Err(ValidationError::InvalidDateRange {
            from: req.date_from,
            to: req.date_to,
        });
    }
    let days = (req.date_to - req.date_from).num_days() + 1;
    if days > MAX_RECURRENCE_DAYS {
        return Err(ValidationError::DateRangeTooLong {
            days,
            max: MAX_RECURRENCE_DAYS,
        });
    }
    let template = NewEvent::new(
        req.date_from,
        req.time_from,
        req.time_to,
        &req.location,
        req.name.as_deref(),
    )?;

    let weekdays: BTreeSet<u32> = req.weekdays.iter().map(|&d| u32::from(d)).collect();

    let events = req
        .date_from
        .iter_days()
        .take_while(|day| *day <= req.date_to)
        .filter(|day| weekdays.contains(&day.weekday().num_days_from_sunday()))
        .map(|date| NewEvent {
            date,
            ..template.clone()
        })
        .collect();

    Ok(events)
}
