use crate::error::Error;
use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier assigned to an event by the store on creation
pub type EventId = u64;

/// Identifier of the user owning an event
pub type OwnerId = uuid::Uuid;

/// Recurrence pattern of a template event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecurrenceKind {
    Daily,
    Weekly,
    Monthly,
}

impl RecurrenceKind {
    /// Fixed step between generated instances.
    ///
    /// Monthly is a plain 30 days, not calendar-month arithmetic; existing
    /// data relies on this approximation.
    pub fn step(&self) -> Duration {
        match self {
            RecurrenceKind::Daily => Duration::days(1),
            RecurrenceKind::Weekly => Duration::days(7),
            RecurrenceKind::Monthly => Duration::days(30),
        }
    }
}

impl FromStr for RecurrenceKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "daily" => Ok(RecurrenceKind::Daily),
            "weekly" => Ok(RecurrenceKind::Weekly),
            "monthly" => Ok(RecurrenceKind::Monthly),
            other => Err(Error::UnsupportedRecurrence(other.to_string())),
        }
    }
}

impl fmt::Display for RecurrenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RecurrenceKind::Daily => "daily",
            RecurrenceKind::Weekly => "weekly",
            RecurrenceKind::Monthly => "monthly",
        };
        f.write_str(name)
    }
}

/// A stored calendar event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub owner: OwnerId,
    pub title: String,
    pub description: Option<String>,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub is_recurring: bool,
    pub recurrence_type: Option<RecurrenceKind>,
    pub recurrence_end: Option<NaiveDateTime>,
    pub reminder_sent: bool,
    pub created_at: NaiveDateTime,
}

/// A validated event ready to be persisted; the store assigns the id and
/// the creation timestamp
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewEvent {
    pub owner: OwnerId,
    pub title: String,
    pub description: Option<String>,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub is_recurring: bool,
    pub recurrence_type: Option<RecurrenceKind>,
    pub recurrence_end: Option<NaiveDateTime>,
}
