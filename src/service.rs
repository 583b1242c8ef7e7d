use crate::components::event_store::{
    Event, EventId, EventStoreHandle, NewEvent, OwnerId, RecurrenceKind,
};
use crate::config::Config;
use crate::error::{validation_error, AppResult, Error};
use crate::scheduling::{expand_until, expansion_horizon, is_slot_available};
use crate::utils::time::parse_timestamp;
use chrono::Local;
use serde::Deserialize;
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Raw event fields as submitted by the routing layer.
///
/// Timestamps arrive as text, either the local form format
/// (YYYY-MM-DDTHH:MM) or full ISO-8601; the recurrence end may be a bare
/// date.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventDraft {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub start_time: String,
    pub end_time: String,
    #[serde(default)]
    pub is_recurring: bool,
    #[serde(default)]
    pub recurrence_type: Option<String>,
    #[serde(default)]
    pub recurrence_end: Option<String>,
}

/// Caller-facing surface of the scheduling core: validated create, edit,
/// delete and query operations over the event store
#[derive(Clone)]
pub struct EventService {
    config: Arc<RwLock<Config>>,
    store: EventStoreHandle,
}

impl EventService {
    /// Create a new event service backed by the given store
    pub fn new(config: Arc<RwLock<Config>>, store: EventStoreHandle) -> Self {
        Self { config, store }
    }

    /// Create an event after validating it and checking the time slot.
    ///
    /// A recurring event is materialized into additional independent rows up
    /// to its horizon. Generated instances are persisted without conflict
    /// checks, matching the behavior existing data was created under.
    pub async fn create_event(&self, owner: OwnerId, draft: EventDraft) -> AppResult<Event> {
        let new_event = validate_draft(owner, &draft)?;

        let available = is_slot_available(
            &self.store,
            owner,
            new_event.start_time,
            new_event.end_time,
            None,
        )
        .await?;
        if !available {
            return Err(Error::Conflict(format!(
                "{} - {} overlaps an existing event",
                new_event.start_time, new_event.end_time
            )));
        }

        let event = self.store.create(new_event).await?;

        if event.is_recurring {
            let horizon_days = {
                let config_read = self.config.read().await;
                config_read.expansion_horizon_days
            };
            let horizon = expansion_horizon(&event, Local::now().naive_local(), horizon_days);
            for instance in expand_until(&event, horizon)? {
                self.store.create(instance).await?;
            }
        }

        Ok(event)
    }

    /// Edit an existing event, conflict-checking the new time range against
    /// every event except the edited one
    pub async fn update_event(
        &self,
        owner: OwnerId,
        id: EventId,
        draft: EventDraft,
    ) -> AppResult<Event> {
        // Surface a not-found before validation errors for missing events
        let existing = self.store.get(id, owner).await?;

        let fields = validate_draft(owner, &draft)?;

        let available = is_slot_available(
            &self.store,
            owner,
            fields.start_time,
            fields.end_time,
            Some(id),
        )
        .await?;
        if !available {
            return Err(Error::Conflict(format!(
                "{} - {} overlaps an existing event",
                fields.start_time, fields.end_time
            )));
        }

        let updated = Event {
            id: existing.id,
            owner: existing.owner,
            title: fields.title,
            description: fields.description,
            start_time: fields.start_time,
            end_time: fields.end_time,
            is_recurring: fields.is_recurring,
            recurrence_type: fields.recurrence_type,
            recurrence_end: fields.recurrence_end,
            reminder_sent: existing.reminder_sent,
            created_at: existing.created_at,
        };

        self.store.update(updated).await
    }

    /// Delete an event
    pub async fn delete_event(&self, owner: OwnerId, id: EventId) -> AppResult<()> {
        self.store.delete(id, owner).await
    }

    /// Get a single event
    pub async fn get_event(&self, owner: OwnerId, id: EventId) -> AppResult<Event> {
        self.store.get(id, owner).await
    }

    /// List the owner's events ordered by start time
    pub async fn list_events(&self, owner: OwnerId) -> AppResult<Vec<Event>> {
        self.store.list(owner).await
    }

    /// Search the owner's events by title or description
    pub async fn search_events(&self, owner: OwnerId, query: &str) -> AppResult<Vec<Event>> {
        self.store.search(owner, query).await
    }

    /// Remove a user: deleting an owner cascades to all owned events
    pub async fn remove_owner(&self, owner: OwnerId) -> AppResult<usize> {
        self.store.delete_owner(owner).await
    }
}

/// Validate a draft into a persistable event
fn validate_draft(owner: OwnerId, draft: &EventDraft) -> AppResult<NewEvent> {
    if draft.title.trim().is_empty() {
        return Err(validation_error("Title must not be empty"));
    }

    let start_time = parse_timestamp(&draft.start_time)?;
    let end_time = parse_timestamp(&draft.end_time)?;
    if start_time >= end_time {
        return Err(validation_error("Start time must be before end time"));
    }

    // Recurrence fields are only meaningful on recurring events
    let (recurrence_type, recurrence_end) = if draft.is_recurring {
        let kind = match draft.recurrence_type.as_deref() {
            Some(value) => Some(RecurrenceKind::from_str(value)?),
            None => None,
        };
        let end = match draft.recurrence_end.as_deref() {
            Some(value) => Some(parse_timestamp(value)?),
            None => None,
        };
        (kind, end)
    } else {
        (None, None)
    };

    Ok(NewEvent {
        owner,
        title: draft.title.trim().to_string(),
        description: draft.description.clone(),
        start_time,
        end_time,
        is_recurring: draft.is_recurring,
        recurrence_type,
        recurrence_end,
    })
}
