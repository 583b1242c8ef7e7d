use chrono::{Duration, Local, NaiveDateTime};
use lazy_static::lazy_static;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::time::{sleep, Duration as TokioDuration};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use super::notifications::NotificationSink;
use crate::components::event_store::EventStoreHandle;
use crate::config::Config;
use crate::error::AppResult;

lazy_static! {
    static ref SCHEDULER_INSTANCES: AtomicU32 = AtomicU32::new(0);
    static ref SCHEDULER_TASK_RUNNING: AtomicBool = AtomicBool::new(false);
}

/// Start the reminder scheduler
pub async fn start_scheduler(
    config: Arc<RwLock<Config>>,
    store: EventStoreHandle,
    sink: Arc<dyn NotificationSink>,
    cancel: CancellationToken,
) {
    // Increment instance counter and log; this design assumes a single
    // scheduler instance, a second one means double notification
    let instance_count = SCHEDULER_INSTANCES.fetch_add(1, Ordering::SeqCst) + 1;
    if instance_count > 1 {
        warn!(
            "Multiple reminder schedulers detected! Instance count: {}",
            instance_count
        );
    }
    info!("Starting reminder scheduler (instance {})", instance_count);

    // Read config values
    let config_read = config.read().await;
    let interval = TokioDuration::from_secs(config_read.scan_interval_secs);
    let window = Duration::minutes(config_read.reminder_window_minutes);
    drop(config_read);

    // Only spawn the scheduler task if it's not already running
    if !SCHEDULER_TASK_RUNNING.swap(true, Ordering::SeqCst) {
        info!("Starting reminder scan task");

        tokio::spawn(async move {
            run_scheduler_loop(store, sink, cancel, interval, window).await;
            SCHEDULER_TASK_RUNNING.store(false, Ordering::SeqCst);
            SCHEDULER_INSTANCES.fetch_sub(1, Ordering::SeqCst);
        });
    } else {
        warn!("Reminder scan task is already running, skipping initialization");
    }
}

/// Main scheduler loop: sleep a fixed interval between scan completions and
/// stop cooperatively when cancelled
async fn run_scheduler_loop(
    store: EventStoreHandle,
    sink: Arc<dyn NotificationSink>,
    cancel: CancellationToken,
    interval: TokioDuration,
    window: Duration,
) {
    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                info!("Reminder scheduler stopping");
                break;
            }
            _ = sleep(interval) => {}
        }

        let now = Local::now().naive_local();
        match run_scan(&store, sink.as_ref(), now, window).await {
            Ok(fired) => {
                if fired > 0 {
                    info!("Reminder scan fired {} notification(s)", fired);
                }
            }
            // A failed cycle never terminates the loop; the next cycle
            // proceeds independently
            Err(e) => {
                error!("Error in reminder scan: {}", e);
            }
        }
    }
}

/// Run a single scan cycle: select events starting within the window that
/// have not been notified, fire the sink for each and flag it handled.
///
/// The flag is committed per event, so a crash mid-scan neither re-notifies
/// processed events nor loses unprocessed ones. A sink failure is logged and
/// does not prevent flagging; delivery is at-most-once.
pub async fn run_scan(
    store: &EventStoreHandle,
    sink: &dyn NotificationSink,
    now: NaiveDateTime,
    window: Duration,
) -> AppResult<usize> {
    let due = store.query_due_reminders(now, window).await?;
    let mut fired = 0;

    for event in due {
        if let Err(e) = sink.notify(&event).await {
            warn!(
                "Failed to send reminder for event '{}': {}",
                event.title, e
            );
        }

        store.mark_reminder_sent(event.id).await?;
        fired += 1;
    }

    Ok(fired)
}
