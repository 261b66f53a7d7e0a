use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{Member, Season, Status, hhmm};

// -- JWT Claims --

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub is_admin: bool,
    pub exp: usize,
}

// -- Auth --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub must_change_password: bool,
    pub member: Member,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChangePasswordRequest {
    pub new_password: String,
    pub confirm_password: String,
}

// -- Members --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateMemberRequest {
    pub nickname: String,
    pub email: String,
    #[serde(default)]
    pub is_admin: bool,
}

/// The temporary password is only ever returned here, once.
#[derive(Debug, Serialize)]
pub struct CreateMemberResponse {
    pub member: Member,
    pub password: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SetActiveRequest {
    pub is_active: bool,
}

#[derive(Debug, Serialize)]
pub struct PasswordResetResponse {
    pub member_id: Uuid,
    pub password: String,
}

// -- Events --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateEventRequest {
    pub date: NaiveDate,
    #[serde(with = "hhmm")]
    pub time_from: NaiveTime,
    #[serde(with = "hhmm")]
    pub time_to: NaiveTime,
    pub location: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// Weekdays use 0 = Sunday .. 6 = Saturday.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RecurringEventsRequest {
    pub date_from: NaiveDate,
    pub date_to: NaiveDate,
    pub weekdays: Vec<u8>,
    #[serde(with = "hhmm")]
    pub time_from: NaiveTime,
    #[serde(with = "hhmm")]
    pub time_to: NaiveTime,
    pub location: String,
    #[serde(default)]
    pub name: Option<String>,
}

// -- Registrations --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpsertRegistrationRequest {
    pub status: Status,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub guests: u32,
    #[serde(default)]
    pub items: BTreeMap<String, bool>,
}

// -- Season --

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SeasonItem {
    pub label: String,
    pub key: String,
}

#[derive(Debug, Serialize)]
pub struct SeasonResponse {
    pub season: Season,
    pub items: Vec<SeasonItem>,
    pub min_players: u32,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SetSeasonRequest {
    pub season: Season,
}

// -- Errors --

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
