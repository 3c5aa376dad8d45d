use async_trait::async_trait;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashMap;
use tracing::debug;

use crate::browser::{Page, PageSession};
use crate::config::VendorConfig;
use crate::error::{ExtractError, VendorError};
use crate::models::{StockReport, Vendor};
use crate::parsers::{element_text, first, resolve_url};

mod amazon;
mod bestbuy;
mod canada_computers;
mod memory_express;
mod newegg;
mod pc_canada;

pub use amazon::AmazonExtractor;
pub use bestbuy::BestBuyExtractor;
pub use canada_computers::CanadaComputersExtractor;
pub use memory_express::MemoryExpressExtractor;
pub use newegg::NeweggExtractor;
pub use pc_canada::PcCanadaExtractor;

/// Turns a vendor's listing page into stock records.
///
/// Extractors may visit item detail pages through `session` when the listing
/// alone does not carry store-level stock.
#[async_trait]
pub trait StockExtractor: Send + Sync {
    fn vendor(&self) -> Vendor;

    /// CSS selector of the listing elements that carry stock-status text.
    fn stock_markers(&self) -> &'static str;

    async fn extract(
        &self,
        session: &dyn PageSession,
        page: &Page,
        vendor_config: &VendorConfig,
    ) -> Result<StockReport, ExtractError>;
}

pub struct VendorRegistry {
    extractors: HashMap<Vendor, Box<dyn StockExtractor>>,
}

impl VendorRegistry {
    pub fn new() -> Self {
        Self {
            extractors: HashMap::new(),
        }
    }

    /// Registry with an extractor for every known vendor.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(NeweggExtractor));
        registry.register(Box::new(BestBuyExtractor));
        registry.register(Box::new(MemoryExpressExtractor));
        registry.register(Box::new(CanadaComputersExtractor));
        registry.register(Box::new(AmazonExtractor));
        registry.register(Box::new(PcCanadaExtractor));
        registry
    }

    /// Adds an extractor, replacing any previous one for the same vendor.
    pub fn register(&mut self, extractor: Box<dyn StockExtractor>) {
        self.extractors.insert(extractor.vendor(), extractor);
    }

    pub fn get(&self, vendor: Vendor) -> Option<&dyn StockExtractor> {
        self.extractors.get(&vendor).map(|e| e.as_ref())
    }

    /// Fails on the first configured vendor without an extractor.
    pub fn ensure_covers(&self, vendors: &[VendorConfig]) -> Result<(), VendorError> {
        match vendors.iter().find(|v| self.get(v.vendor).is_none()) {
            Some(missing) => Err(VendorError::Unregistered(missing.vendor.key().to_string())),
            None => Ok(()),
        }
    }

    /// Fetches the vendor's listing page and extracts its stock.
    pub async fn scan(
        &self,
        session: &dyn PageSession,
        vendor_config: &VendorConfig,
    ) -> Result<StockReport, VendorError> {
        let extractor = self
            .get(vendor_config.vendor)
            .ok_or_else(|| VendorError::Unregistered(vendor_config.vendor.key().to_string()))?;

        let page = session.fetch(&vendor_config.url).await?;
        let report = extractor.extract(session, &page, vendor_config).await?;
        for record in &report {
            debug!(
                "{} | {}: online {}, store {}, backorder {}",
                vendor_config.vendor,
                record.item_name,
                record.online_status,
                record.store_status,
                record.backorder_status
            );
        }
        Ok(report)
    }
}

impl Default for VendorRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Number of elements on `page` matching `selector`.
pub fn count_markers(page: &Page, selector: &str) -> usize {
    let document = Html::parse_document(&page.html);
    match Selector::parse(selector) {
        Ok(selector) => document.select(&selector).count(),
        Err(_) => 0,
    }
}

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("Invalid vendor selector")
}

fn missing(selector: &str, page: &Page) -> ExtractError {
    ExtractError::MissingElement {
        selector: selector.to_string(),
        url: page.url.clone(),
    }
}

/// Absolute href of the first `selector` match under `scope`, with its text.
fn item_link(
    scope: ElementRef<'_>,
    link_selector: &Selector,
    css: &str,
    page: &Page,
) -> Result<(String, String), ExtractError> {
    let link = first(scope, link_selector).ok_or_else(|| missing(css, page))?;
    let url = link
        .value()
        .attr("href")
        .and_then(|href| resolve_url(&page.url, href))
        .ok_or_else(|| missing(css, page))?;
    Ok((element_text(link), url))
}
