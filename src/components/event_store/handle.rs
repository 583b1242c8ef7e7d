use super::actor::{EventStoreActor, EventStoreActorHandle};
use super::models::{Event, EventId, NewEvent, OwnerId};
use crate::error::AppResult;
use chrono::{Duration, NaiveDateTime};
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Handle for interacting with the event store actor
#[derive(Clone)]
pub struct EventStoreHandle {
    actor_handle: EventStoreActorHandle,
    _actor_task: Option<Arc<JoinHandle<()>>>,
}

impl EventStoreHandle {
    /// Create a new EventStoreHandle and spawn the actor
    pub fn new() -> Self {
        // Create the actor and get its handle
        let (mut actor, handle) = EventStoreActor::new();

        // Spawn a task to run the actor
        let actor_task = tokio::spawn(async move {
            actor.run().await;
        });

        Self {
            actor_handle: handle,
            _actor_task: Some(Arc::new(actor_task)),
        }
    }

    /// Create a disconnected handle for initialization purposes; every
    /// operation on it fails with a store error
    pub fn empty() -> Self {
        Self {
            actor_handle: EventStoreActorHandle::empty(),
            _actor_task: None,
        }
    }

    /// Create an event
    pub async fn create(&self, new_event: NewEvent) -> AppResult<Event> {
        self.actor_handle.create(new_event).await
    }

    /// Get an event by id, scoped to its owner
    pub async fn get(&self, id: EventId, owner: OwnerId) -> AppResult<Event> {
        self.actor_handle.get(id, owner).await
    }

    /// Update an existing event
    pub async fn update(&self, event: Event) -> AppResult<Event> {
        self.actor_handle.update(event).await
    }

    /// Delete an event by id, scoped to its owner
    pub async fn delete(&self, id: EventId, owner: OwnerId) -> AppResult<()> {
        self.actor_handle.delete(id, owner).await
    }

    /// Delete every event belonging to an owner
    pub async fn delete_owner(&self, owner: OwnerId) -> AppResult<usize> {
        self.actor_handle.delete_owner(owner).await
    }

    /// List an owner's events ordered by start time
    pub async fn list(&self, owner: OwnerId) -> AppResult<Vec<Event>> {
        self.actor_handle.list(owner).await
    }

    /// Search an owner's events by title or description substring
    pub async fn search(&self, owner: OwnerId, query: &str) -> AppResult<Vec<Event>> {
        self.actor_handle.search(owner, query.to_string()).await
    }

    /// Query an owner's events overlapping the half-open range [start, end)
    pub async fn query_range(
        &self,
        owner: OwnerId,
        start: NaiveDateTime,
        end: NaiveDateTime,
        exclude: Option<EventId>,
    ) -> AppResult<Vec<Event>> {
        self.actor_handle.query_range(owner, start, end, exclude).await
    }

    /// Query not-yet-notified events starting within [now, now + window]
    pub async fn query_due_reminders(
        &self,
        now: NaiveDateTime,
        window: Duration,
    ) -> AppResult<Vec<Event>> {
        self.actor_handle.query_due_reminders(now, window).await
    }

    /// Flag an event as notified
    pub async fn mark_reminder_sent(&self, id: EventId) -> AppResult<()> {
        self.actor_handle.mark_reminder_sent(id).await
    }

    /// Shutdown the actor
    pub async fn shutdown(&self) -> AppResult<()> {
        self.actor_handle.shutdown().await
    }
}

impl Default for EventStoreHandle {
    fn default() -> Self {
        Self::new()
    }
}
