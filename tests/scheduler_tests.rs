use aikataulu::components::event_store::{Event, EventStoreHandle, NewEvent, OwnerId};
use aikataulu::components::reminders::{format_reminder, run_scan, NotificationSink, Reminders};
use aikataulu::components::Component;
use aikataulu::config::Config;
use aikataulu::error::{AppResult, Error};
use async_trait::async_trait;
use chrono::{Duration, NaiveDateTime};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

fn ts(value: &str) -> NaiveDateTime {
    value.parse().unwrap()
}

/// Notification sink that counts deliveries
#[derive(Default)]
struct CountingSink {
    calls: AtomicUsize,
}

impl CountingSink {
    fn count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl NotificationSink for CountingSink {
    async fn notify(&self, _event: &Event) -> AppResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Notification sink that always fails
struct FailingSink;

#[async_trait]
impl NotificationSink for FailingSink {
    async fn notify(&self, event: &Event) -> AppResult<()> {
        Err(Error::Notification(format!(
            "Delivery failed for '{}'",
            event.title
        )))
    }
}

async fn seed_event(
    store: &EventStoreHandle,
    owner: OwnerId,
    start: NaiveDateTime,
    end: NaiveDateTime,
) -> Event {
    store
        .create(NewEvent {
            owner,
            title: "Dentist".to_string(),
            description: None,
            start_time: start,
            end_time: end,
            is_recurring: false,
            recurrence_type: None,
            recurrence_end: None,
        })
        .await
        .unwrap()
}

/// An event due within the window is notified exactly once; a second cycle
/// does not re-notify it
#[tokio::test]
async fn test_reminder_exactly_once() {
    let store = EventStoreHandle::new();
    let owner = Uuid::new_v4();
    let now = ts("2024-06-03T09:00:00");
    let event = seed_event(&store, owner, now + Duration::minutes(30), now + Duration::minutes(90)).await;

    let sink = CountingSink::default();
    let window = Duration::hours(1);

    let fired = run_scan(&store, &sink, now, window).await.unwrap();
    assert_eq!(fired, 1);
    assert_eq!(sink.count(), 1);
    assert!(store.get(event.id, owner).await.unwrap().reminder_sent);

    // Second cycle: nothing new to notify
    let fired = run_scan(&store, &sink, now, window).await.unwrap();
    assert_eq!(fired, 0);
    assert_eq!(sink.count(), 1);

    store.shutdown().await.unwrap();
}

/// Window edges: already-started events and events beyond the window are
/// both excluded, and the upper bound is inclusive
#[tokio::test]
async fn test_reminder_window_edges() {
    let store = EventStoreHandle::new();
    let owner = Uuid::new_v4();
    let now = ts("2024-06-03T09:00:00");
    let window = Duration::hours(1);

    // One minute in the past: outside the lower bound
    let started = seed_event(&store, owner, now - Duration::minutes(1), now + Duration::minutes(30)).await;
    // Two hours ahead: outside the window
    let far = seed_event(&store, owner, now + Duration::hours(2), now + Duration::hours(3)).await;
    // Exactly at the window's upper edge: included
    let edge = seed_event(&store, owner, now + window, now + window + Duration::hours(1)).await;
    // Exactly at now: included
    let immediate = seed_event(&store, owner, now, now + Duration::minutes(15)).await;

    let sink = CountingSink::default();
    let fired = run_scan(&store, &sink, now, window).await.unwrap();

    assert_eq!(fired, 2);
    assert_eq!(sink.count(), 2);
    assert!(!store.get(started.id, owner).await.unwrap().reminder_sent);
    assert!(!store.get(far.id, owner).await.unwrap().reminder_sent);
    assert!(store.get(edge.id, owner).await.unwrap().reminder_sent);
    assert!(store.get(immediate.id, owner).await.unwrap().reminder_sent);

    store.shutdown().await.unwrap();
}

/// A notification failure does not prevent flagging the event; delivery is
/// at-most-once
#[tokio::test]
async fn test_sink_failure_still_marks_event() {
    let store = EventStoreHandle::new();
    let owner = Uuid::new_v4();
    let now = ts("2024-06-03T09:00:00");
    let event = seed_event(&store, owner, now + Duration::minutes(10), now + Duration::minutes(40)).await;

    let fired = run_scan(&store, &FailingSink, now, Duration::hours(1))
        .await
        .unwrap();

    assert_eq!(fired, 1);
    assert!(store.get(event.id, owner).await.unwrap().reminder_sent);

    store.shutdown().await.unwrap();
}

/// A store failure surfaces as a scan error so the loop can log it and
/// carry on with the next cycle
#[tokio::test]
async fn test_store_failure_is_reported_not_fatal() {
    let store = EventStoreHandle::empty();
    let sink = CountingSink::default();

    let result = run_scan(&store, &sink, ts("2024-06-03T09:00:00"), Duration::hours(1)).await;

    assert!(result.is_err());
    assert_eq!(sink.count(), 0);
}

/// Reminders are picked up across owners in a single cycle
#[tokio::test]
async fn test_scan_covers_all_owners() {
    let store = EventStoreHandle::new();
    let now = ts("2024-06-03T09:00:00");

    seed_event(&store, Uuid::new_v4(), now + Duration::minutes(5), now + Duration::minutes(20)).await;
    seed_event(&store, Uuid::new_v4(), now + Duration::minutes(10), now + Duration::minutes(25)).await;

    let sink = CountingSink::default();
    let fired = run_scan(&store, &sink, now, Duration::hours(1)).await.unwrap();

    assert_eq!(fired, 2);

    store.shutdown().await.unwrap();
}

/// The component lifecycle starts and stops the scan loop cleanly
#[tokio::test]
async fn test_reminders_component_lifecycle() {
    let config = Arc::new(RwLock::new(Config::default()));
    let store = EventStoreHandle::new();

    let component = Reminders::new(Arc::new(CountingSink::default()));
    assert_eq!(component.name(), "reminders");

    component
        .init(Arc::clone(&config), store.clone())
        .await
        .unwrap();

    // Stop signal is cooperative and idempotent
    component.shutdown().await.unwrap();
    component.shutdown().await.unwrap();

    // Shutting down a component that was never started is also safe
    let idle = Reminders::with_log_sink();
    idle.shutdown().await.unwrap();

    store.shutdown().await.unwrap();
}

/// The reminder body carries the event details
#[tokio::test]
async fn test_reminder_message_format() {
    let store = EventStoreHandle::new();
    let owner = Uuid::new_v4();
    let event = store
        .create(NewEvent {
            owner,
            title: "Budget review".to_string(),
            description: Some("Bring the Q3 numbers".to_string()),
            start_time: ts("2024-06-03T14:00:00"),
            end_time: ts("2024-06-03T15:00:00"),
            is_recurring: false,
            recurrence_type: None,
            recurrence_end: None,
        })
        .await
        .unwrap();

    let body = format_reminder(&event);
    assert!(body.contains("Event Reminder: Budget review"));
    assert!(body.contains("Bring the Q3 numbers"));
    assert!(body.contains("2024-06-03 14:00"));

    store.shutdown().await.unwrap();
}
