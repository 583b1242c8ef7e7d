mod notifications;
mod scheduler;

pub use notifications::{format_reminder, sink_from_name, LogSink, NotificationSink};
pub use scheduler::{run_scan, start_scheduler};

use crate::components::event_store::EventStoreHandle;
use crate::config::Config;
use crate::error::AppResult;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;

/// Reminder scheduler component: a perpetual background scan loop with
/// start/stop lifecycle and an injected notification sink
pub struct Reminders {
    sink: Arc<dyn NotificationSink>,
    cancel: RwLock<Option<CancellationToken>>,
}

impl Reminders {
    /// Create a new reminders component with the given notification sink
    pub fn new(sink: Arc<dyn NotificationSink>) -> Self {
        Self {
            sink,
            cancel: RwLock::new(None),
        }
    }

    /// Create a reminders component that notifies through the log
    pub fn with_log_sink() -> Self {
        Self::new(Arc::new(LogSink))
    }
}

#[async_trait]
impl super::Component for Reminders {
    fn name(&self) -> &'static str {
        "reminders"
    }

    async fn init(&self, config: Arc<RwLock<Config>>, store: EventStoreHandle) -> AppResult<()> {
        let token = CancellationToken::new();

        let mut cancel_lock = self.cancel.write().await;
        *cancel_lock = Some(token.clone());
        drop(cancel_lock);

        start_scheduler(config, store, Arc::clone(&self.sink), token).await;

        Ok(())
    }

    async fn shutdown(&self) -> AppResult<()> {
        // Cancel the scan loop if it was started
        let cancel_lock = self.cancel.read().await;
        if let Some(token) = &*cancel_lock {
            token.cancel();
        }
        Ok(())
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}
