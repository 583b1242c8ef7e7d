use crate::components::event_store::Event;
use crate::error::{AppResult, Error};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

/// Side-effecting reminder delivery, injected into the scheduler.
///
/// Failures are reported to the caller but are never fatal to the scan loop.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn notify(&self, event: &Event) -> AppResult<()>;
}

/// Render the reminder message body for an event
pub fn format_reminder(event: &Event) -> String {
    let description = event.description.as_deref().unwrap_or("");
    format!(
        "Event Reminder: {}\n\nDescription: {}\nStart Time: {}\nEnd Time: {}\n\nThis event is starting soon!",
        event.title,
        description,
        event.start_time.format("%Y-%m-%d %H:%M"),
        event.end_time.format("%Y-%m-%d %H:%M"),
    )
}

/// Notification sink that writes reminders to the log
#[derive(Debug, Default, Clone)]
pub struct LogSink;

#[async_trait]
impl NotificationSink for LogSink {
    async fn notify(&self, event: &Event) -> AppResult<()> {
        info!(
            event_id = event.id,
            "Reminder: event '{}' starts at {}",
            event.title,
            event.start_time
        );
        tracing::debug!("{}", format_reminder(event));
        Ok(())
    }
}

/// Build the notification sink named in the configuration
pub fn sink_from_name(name: &str) -> AppResult<Arc<dyn NotificationSink>> {
    match name {
        "log" => Ok(Arc::new(LogSink)),
        other => Err(Error::Config(format!(
            "Unknown notification sink: {}",
            other
        ))),
    }
}
