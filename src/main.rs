mod shutdown;
mod startup;

use tracing::info;

#[tokio::main]
async fn main() -> miette::Result<()> {
    // Initialize logging
    startup::init_logging()?;

    info!("Starting aikataulu");

    // Load configuration
    let config = startup::load_config().await?;

    // Run the scheduling core until a shutdown signal arrives
    startup::run(config).await
}
