use super::models::{Event, EventId, NewEvent, OwnerId};
use crate::error::{not_found_error, store_error, AppResult};
use chrono::{Duration, Local, NaiveDateTime};
use std::collections::BTreeMap;
use tokio::sync::mpsc;
use tracing::info;

/// The event store actor that processes commands
///
/// Commands are handled one at a time, so every mutation is applied
/// atomically and partial writes are never observed by concurrent callers.
pub struct EventStoreActor {
    events: BTreeMap<EventId, Event>,
    next_id: EventId,
    command_rx: mpsc::Receiver<EventStoreCommand>,
}

/// Commands that can be sent to the event store actor
pub enum EventStoreCommand {
    Create(NewEvent, mpsc::Sender<AppResult<Event>>),
    Get(EventId, OwnerId, mpsc::Sender<AppResult<Event>>),
    Update(Event, mpsc::Sender<AppResult<Event>>),
    Delete(EventId, OwnerId, mpsc::Sender<AppResult<()>>),
    DeleteOwner(OwnerId, mpsc::Sender<AppResult<usize>>),
    List(OwnerId, mpsc::Sender<AppResult<Vec<Event>>>),
    Search(OwnerId, String, mpsc::Sender<AppResult<Vec<Event>>>),
    QueryRange {
        owner: OwnerId,
        start: NaiveDateTime,
        end: NaiveDateTime,
        exclude: Option<EventId>,
        reply: mpsc::Sender<AppResult<Vec<Event>>>,
    },
    QueryDueReminders {
        now: NaiveDateTime,
        window: Duration,
        reply: mpsc::Sender<AppResult<Vec<Event>>>,
    },
    MarkReminderSent(EventId, mpsc::Sender<AppResult<()>>),
    Shutdown,
}

/// Handle for communicating with the event store actor
#[derive(Clone)]
pub struct EventStoreActorHandle {
    command_tx: mpsc::Sender<EventStoreCommand>,
}

impl EventStoreActorHandle {
    /// Create a new empty handle for initialization purposes
    pub fn empty() -> Self {
        let (command_tx, _) = mpsc::channel(32);
        Self { command_tx }
    }

    /// Create an event; the store assigns the id and creation timestamp
    pub async fn create(&self, new_event: NewEvent) -> AppResult<Event> {
        let (response_tx, mut response_rx) = mpsc::channel(1);
        self.command_tx
            .send(EventStoreCommand::Create(new_event, response_tx))
            .await
            .map_err(|e| store_error(&format!("Actor mailbox error: {}", e)))?;

        response_rx
            .recv()
            .await
            .ok_or_else(|| store_error("Response channel closed"))?
    }

    /// Get an event by id, scoped to its owner
    pub async fn get(&self, id: EventId, owner: OwnerId) -> AppResult<Event> {
        let (response_tx, mut response_rx) = mpsc::channel(1);
        self.command_tx
            .send(EventStoreCommand::Get(id, owner, response_tx))
            .await
            .map_err(|e| store_error(&format!("Actor mailbox error: {}", e)))?;

        response_rx
            .recv()
            .await
            .ok_or_else(|| store_error("Response channel closed"))?
    }

    /// Update an existing event
    pub async fn update(&self, event: Event) -> AppResult<Event> {
        let (response_tx, mut response_rx) = mpsc::channel(1);
        self.command_tx
            .send(EventStoreCommand::Update(event, response_tx))
            .await
            .map_err(|e| store_error(&format!("Actor mailbox error: {}", e)))?;

        response_rx
            .recv()
            .await
            .ok_or_else(|| store_error("Response channel closed"))?
    }

    /// Delete an event by id, scoped to its owner
    pub async fn delete(&self, id: EventId, owner: OwnerId) -> AppResult<()> {
        let (response_tx, mut response_rx) = mpsc::channel(1);
        self.command_tx
            .send(EventStoreCommand::Delete(id, owner, response_tx))
            .await
            .map_err(|e| store_error(&format!("Actor mailbox error: {}", e)))?;

        response_rx
            .recv()
            .await
            .ok_or_else(|| store_error("Response channel closed"))?
    }

    /// Delete every event belonging to an owner, returning the removed count
    pub async fn delete_owner(&self, owner: OwnerId) -> AppResult<usize> {
        let (response_tx, mut response_rx) = mpsc::channel(1);
        self.command_tx
            .send(EventStoreCommand::DeleteOwner(owner, response_tx))
            .await
            .map_err(|e| store_error(&format!("Actor mailbox error: {}", e)))?;

        response_rx
            .recv()
            .await
            .ok_or_else(|| store_error("Response channel closed"))?
    }

    /// List an owner's events ordered by start time
    pub async fn list(&self, owner: OwnerId) -> AppResult<Vec<Event>> {
        let (response_tx, mut response_rx) = mpsc::channel(1);
        self.command_tx
            .send(EventStoreCommand::List(owner, response_tx))
            .await
            .map_err(|e| store_error(&format!("Actor mailbox error: {}", e)))?;

        response_rx
            .recv()
            .await
            .ok_or_else(|| store_error("Response channel closed"))?
    }

    /// Search an owner's events by title or description substring
    pub async fn search(&self, owner: OwnerId, query: String) -> AppResult<Vec<Event>> {
        let (response_tx, mut response_rx) = mpsc::channel(1);
        self.command_tx
            .send(EventStoreCommand::Search(owner, query, response_tx))
            .await
            .map_err(|e| store_error(&format!("Actor mailbox error: {}", e)))?;

        response_rx
            .recv()
            .await
            .ok_or_else(|| store_error("Response channel closed"))?
    }

    /// Query an owner's events overlapping the half-open range [start, end)
    pub async fn query_range(
        &self,
        owner: OwnerId,
        start: NaiveDateTime,
        end: NaiveDateTime,
        exclude: Option<EventId>,
    ) -> AppResult<Vec<Event>> {
        let (response_tx, mut response_rx) = mpsc::channel(1);
        self.command_tx
            .send(EventStoreCommand::QueryRange {
                owner,
                start,
                end,
                exclude,
                reply: response_tx,
            })
            .await
            .map_err(|e| store_error(&format!("Actor mailbox error: {}", e)))?;

        response_rx
            .recv()
            .await
            .ok_or_else(|| store_error("Response channel closed"))?
    }

    /// Query events starting within [now, now + window] that have not been
    /// notified yet, across all owners
    pub async fn query_due_reminders(
        &self,
        now: NaiveDateTime,
        window: Duration,
    ) -> AppResult<Vec<Event>> {
        let (response_tx, mut response_rx) = mpsc::channel(1);
        self.command_tx
            .send(EventStoreCommand::QueryDueReminders {
                now,
                window,
                reply: response_tx,
            })
            .await
            .map_err(|e| store_error(&format!("Actor mailbox error: {}", e)))?;

        response_rx
            .recv()
            .await
            .ok_or_else(|| store_error("Response channel closed"))?
    }

    /// Flag an event as notified; committed on its own, one event at a time
    pub async fn mark_reminder_sent(&self, id: EventId) -> AppResult<()> {
        let (response_tx, mut response_rx) = mpsc::channel(1);
        self.command_tx
            .send(EventStoreCommand::MarkReminderSent(id, response_tx))
            .await
            .map_err(|e| store_error(&format!("Actor mailbox error: {}", e)))?;

        response_rx
            .recv()
            .await
            .ok_or_else(|| store_error("Response channel closed"))?
    }

    /// Shutdown the actor
    pub async fn shutdown(&self) -> AppResult<()> {
        let _ = self.command_tx.send(EventStoreCommand::Shutdown).await;
        Ok(())
    }
}

impl EventStoreActor {
    /// Create a new actor and return its handle
    pub fn new() -> (Self, EventStoreActorHandle) {
        let (command_tx, command_rx) = mpsc::channel(32);

        let actor = Self {
            events: BTreeMap::new(),
            next_id: 1,
            command_rx,
        };

        let handle = EventStoreActorHandle { command_tx };

        (actor, handle)
    }

    /// Start the actor's processing loop
    pub async fn run(&mut self) {
        info!("Event store actor started");

        // Process commands
        while let Some(cmd) = self.command_rx.recv().await {
            match cmd {
                EventStoreCommand::Create(new_event, response_tx) => {
                    let result = self.create_event(new_event);
                    let _ = response_tx.send(result).await;
                }
                EventStoreCommand::Get(id, owner, response_tx) => {
                    let result = self.get_event(id, owner);
                    let _ = response_tx.send(result).await;
                }
                EventStoreCommand::Update(event, response_tx) => {
                    let result = self.update_event(event);
                    let _ = response_tx.send(result).await;
                }
                EventStoreCommand::Delete(id, owner, response_tx) => {
                    let result = self.delete_event(id, owner);
                    let _ = response_tx.send(result).await;
                }
                EventStoreCommand::DeleteOwner(owner, response_tx) => {
                    let result = self.delete_owner_events(owner);
                    let _ = response_tx.send(result).await;
                }
                EventStoreCommand::List(owner, response_tx) => {
                    let result = self.list_events(owner);
                    let _ = response_tx.send(result).await;
                }
                EventStoreCommand::Search(owner, query, response_tx) => {
                    let result = self.search_events(owner, &query);
                    let _ = response_tx.send(result).await;
                }
                EventStoreCommand::QueryRange {
                    owner,
                    start,
                    end,
                    exclude,
                    reply,
                } => {
                    let result = self.query_overlapping(owner, start, end, exclude);
                    let _ = reply.send(result).await;
                }
                EventStoreCommand::QueryDueReminders { now, window, reply } => {
                    let result = self.query_due(now, window);
                    let _ = reply.send(result).await;
                }
                EventStoreCommand::MarkReminderSent(id, response_tx) => {
                    let result = self.mark_reminder_sent(id);
                    let _ = response_tx.send(result).await;
                }
                EventStoreCommand::Shutdown => {
                    info!("Event store actor shutting down");
                    break;
                }
            }
        }

        info!("Event store actor shut down");
    }

    fn create_event(&mut self, new_event: NewEvent) -> AppResult<Event> {
        let id = self.next_id;
        self.next_id += 1;

        let event = Event {
            id,
            owner: new_event.owner,
            title: new_event.title,
            description: new_event.description,
            start_time: new_event.start_time,
            end_time: new_event.end_time,
            is_recurring: new_event.is_recurring,
            recurrence_type: new_event.recurrence_type,
            recurrence_end: new_event.recurrence_end,
            reminder_sent: false,
            created_at: Local::now().naive_local(),
        };

        self.events.insert(id, event.clone());
        Ok(event)
    }

    fn get_event(&self, id: EventId, owner: OwnerId) -> AppResult<Event> {
        self.events
            .get(&id)
            .filter(|e| e.owner == owner)
            .cloned()
            .ok_or_else(|| not_found_error(&format!("No event with id {}", id)))
    }

    fn update_event(&mut self, event: Event) -> AppResult<Event> {
        let stored = self
            .events
            .get(&event.id)
            .filter(|e| e.owner == event.owner)
            .ok_or_else(|| not_found_error(&format!("No event with id {}", event.id)))?;

        // Creation time and the reminder flag are owned by the store and the
        // reminder scheduler respectively; edits never touch them
        let updated = Event {
            created_at: stored.created_at,
            reminder_sent: stored.reminder_sent,
            ..event
        };

        self.events.insert(updated.id, updated.clone());
        Ok(updated)
    }

    fn delete_event(&mut self, id: EventId, owner: OwnerId) -> AppResult<()> {
        match self.events.get(&id) {
            Some(event) if event.owner == owner => {
                self.events.remove(&id);
                Ok(())
            }
            _ => Err(not_found_error(&format!("No event with id {}", id))),
        }
    }

    fn delete_owner_events(&mut self, owner: OwnerId) -> AppResult<usize> {
        let before = self.events.len();
        self.events.retain(|_, e| e.owner != owner);
        Ok(before - self.events.len())
    }

    fn list_events(&self, owner: OwnerId) -> AppResult<Vec<Event>> {
        let mut events: Vec<Event> = self
            .events
            .values()
            .filter(|e| e.owner == owner)
            .cloned()
            .collect();
        events.sort_by_key(|e| e.start_time);
        Ok(events)
    }

    fn search_events(&self, owner: OwnerId, query: &str) -> AppResult<Vec<Event>> {
        let needle = query.to_lowercase();
        let mut events: Vec<Event> = self
            .events
            .values()
            .filter(|e| e.owner == owner)
            .filter(|e| {
                e.title.to_lowercase().contains(&needle)
                    || e.description
                        .as_deref()
                        .is_some_and(|d| d.to_lowercase().contains(&needle))
            })
            .cloned()
            .collect();
        events.sort_by_key(|e| e.start_time);
        Ok(events)
    }

    fn query_overlapping(
        &self,
        owner: OwnerId,
        start: NaiveDateTime,
        end: NaiveDateTime,
        exclude: Option<EventId>,
    ) -> AppResult<Vec<Event>> {
        let events = self
            .events
            .values()
            .filter(|e| e.owner == owner)
            .filter(|e| Some(e.id) != exclude)
            .filter(|e| e.start_time < end && e.end_time > start)
            .cloned()
            .collect();
        Ok(events)
    }

    fn query_due(&self, now: NaiveDateTime, window: Duration) -> AppResult<Vec<Event>> {
        let until = now + window;
        let events = self
            .events
            .values()
            .filter(|e| !e.reminder_sent)
            .filter(|e| e.start_time >= now && e.start_time <= until)
            .cloned()
            .collect();
        Ok(events)
    }

    fn mark_reminder_sent(&mut self, id: EventId) -> AppResult<()> {
        let event = self
            .events
            .get_mut(&id)
            .ok_or_else(|| not_found_error(&format!("No event with id {}", id)))?;
        event.reminder_sent = true;
        Ok(())
    }
}
