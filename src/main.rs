use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

use stock_monitor::browser;
use stock_monitor::config::Config;
use stock_monitor::notify::Notifier;
use stock_monitor::poller::Poller;
use stock_monitor::vendors::VendorRegistry;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("stock_monitor=info".parse()?),
        )
        .init();

    info!("Starting Stock Monitor");

    let config = Arc::new(Config::load().context("Failed to load configuration")?);

    let registry = VendorRegistry::with_defaults();
    registry
        .ensure_covers(&config.vendors)
        .context("Configured vendor has no extractor")?;

    let browser = browser::from_config(&config);
    let notifier = Notifier::from_config(&config);

    info!(
        "Watching {} vendor(s) for {}",
        config.vendors.len(),
        config.item_name
    );

    Poller::new(config, registry, browser, notifier)
        .run()
        .await;

    Ok(())
}
