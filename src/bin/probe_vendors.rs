use anyhow::{Context, Result};
use std::fs;

use stock_monitor::browser;
use stock_monitor::config::Config;
use stock_monitor::vendors::{count_markers, VendorRegistry};

/// Fetches every configured vendor page once, reports how many stock markers
/// each extractor sees, and saves the HTML next to the binary's working dir.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let config = Config::load().context("Failed to load configuration")?;
    let registry = VendorRegistry::with_defaults();
    let session = browser::from_config(&config).open_session().await?;

    for vendor_config in &config.vendors {
        println!("Fetching {} ({})...", vendor_config.name, vendor_config.url);
        let page = match session.fetch(&vendor_config.url).await {
            Ok(page) => page,
            Err(e) => {
                println!("  fetch failed: {e}");
                continue;
            }
        };

        let sample_path = format!("{}_sample.html", vendor_config.vendor.key());
        fs::write(&sample_path, &page.html)?;
        println!("  saved {} bytes to {}", page.html.len(), sample_path);
        println!("  title: {}", page.title);

        match registry.get(vendor_config.vendor) {
            Some(extractor) => {
                let selector = extractor.stock_markers();
                println!("  selector '{}' matched {} elements", selector, count_markers(&page, selector));
            }
            None => println!("  no extractor registered"),
        }
    }

    Ok(())
}
