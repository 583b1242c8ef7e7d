use crate::shutdown;
use aikataulu::components::reminders::{sink_from_name, Reminders};
use aikataulu::components::{ComponentManager, EventStoreHandle};
use aikataulu::config::Config;
use aikataulu::error::Error;
use std::sync::Arc;
use tokio::sync::{oneshot, RwLock};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Initialize logging with environment-based configuration
pub fn init_logging() -> miette::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| Error::Other(format!("Failed to set up logging: {}", e)))?;

    Ok(())
}

/// Load and initialize the application config
pub async fn load_config() -> miette::Result<Arc<RwLock<Config>>> {
    match Config::load() {
        Ok(config) => Ok(Arc::new(RwLock::new(config))),
        Err(e) => {
            error!("Failed to load configuration: {:?}", e);
            Err(e.into())
        }
    }
}

/// Wire up the event store, components and signal handling, then run until
/// shutdown
pub async fn run(config: Arc<RwLock<Config>>) -> miette::Result<()> {
    // Build the notification sink named in the config
    let sink_name = {
        let config_read = config.read().await;
        config_read.notification_sink.clone()
    };
    let sink = sink_from_name(&sink_name)?;

    // Start the event store actor
    let store = EventStoreHandle::new();

    // Initialize component manager
    let mut component_manager = ComponentManager::new(Arc::clone(&config));

    // Register the reminder scheduler component
    component_manager.register(Reminders::new(sink));

    // Create a shared component manager
    let component_manager = Arc::new(component_manager);

    // Create shutdown channel
    let (shutdown_send, shutdown_recv) = oneshot::channel();

    // Clone store handle for shutdown handler
    let shutdown_store = store.clone();

    // Clone component manager for shutdown handler
    let shutdown_components = Arc::clone(&component_manager);

    // Spawn signal handler task
    tokio::spawn(async move {
        shutdown::handle_signals(shutdown_send, shutdown_components, shutdown_store).await;
    });

    // Initialize components
    if let Err(e) = component_manager
        .init_all(Arc::clone(&config), store.clone())
        .await
    {
        error!("Failed to initialize components: {:?}", e);
    }

    info!("Scheduling core running");

    // Wait for the shutdown signal
    let _ = shutdown_recv.await;
    info!("Shut down cleanly");

    Ok(())
}
