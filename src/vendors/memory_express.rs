use async_trait::async_trait;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use tracing::info;

use super::{item_link, missing, selector, StockExtractor};
use crate::browser::{Page, PageSession};
use crate::config::VendorConfig;
use crate::error::ExtractError;
use crate::models::{BackorderStatus, OnlineStatus, StockRecord, StockReport, StoreStatus, Vendor};
use crate::parsers::{closest, element_text, first, strip_title_suffix};

const ADD_BUTTON: &str = ".c-shca-add-product-button";
const LIST_ITEM: &str = ".c-shca-list-item";
const ITEM_TITLE: &str = ".c-shca-list-item__title a[href]";
const INVENTORY_STORE: &str = ".c-capr-inventory-store";
const STORE_NAME: &str = ".c-capr-inventory-store__name";
const STORE_AVAILABILITY: &str = ".c-capr-inventory-store__availability";

const BUY_MARKER: &str = "Buy this item";
const ONLINE_STORE: &str = "Online Store";
const TITLE_SUFFIX: &str = "- Memory Express Inc.";

static ADD_BUTTON_SELECTOR: Lazy<Selector> = Lazy::new(|| selector(ADD_BUTTON));
static LIST_ITEM_SELECTOR: Lazy<Selector> = Lazy::new(|| selector(LIST_ITEM));
static ITEM_TITLE_SELECTOR: Lazy<Selector> = Lazy::new(|| selector(ITEM_TITLE));
static INVENTORY_STORE_SELECTOR: Lazy<Selector> = Lazy::new(|| selector(INVENTORY_STORE));
static STORE_NAME_SELECTOR: Lazy<Selector> = Lazy::new(|| selector(STORE_NAME));
static STORE_AVAILABILITY_SELECTOR: Lazy<Selector> = Lazy::new(|| selector(STORE_AVAILABILITY));

/// Memory Express category pages. Buyable listings are followed to their
/// product page, whose inventory panel lists online and per-store counts.
pub struct MemoryExpressExtractor;

#[async_trait]
impl StockExtractor for MemoryExpressExtractor {
    fn vendor(&self) -> Vendor {
        Vendor::MemoryExpress
    }

    fn stock_markers(&self) -> &'static str {
        ADD_BUTTON
    }

    async fn extract(
        &self,
        session: &dyn PageSession,
        page: &Page,
        vendor_config: &VendorConfig,
    ) -> Result<StockReport, ExtractError> {
        let item_urls = parse_listing(page)?;

        let mut report = StockReport::new();
        for item_url in item_urls {
            let detail = session.fetch(&item_url).await?;
            report.insert(parse_detail(&detail, &item_url, &vendor_config.stores_to_check)?);
        }
        Ok(report)
    }
}

fn parse_listing(page: &Page) -> Result<Vec<String>, ExtractError> {
    let document = Html::parse_document(&page.html);
    let mut item_urls = Vec::new();

    for button in document.select(&ADD_BUTTON_SELECTOR) {
        let buyable = button
            .value()
            .attr("title")
            .is_some_and(|title| title.contains(BUY_MARKER));
        if !buyable {
            continue;
        }

        let list_item = closest(button, &LIST_ITEM_SELECTOR).ok_or_else(|| missing(LIST_ITEM, page))?;
        let (_, item_url) = item_link(list_item, &ITEM_TITLE_SELECTOR, ITEM_TITLE, page)?;
        item_urls.push(item_url);
    }

    Ok(item_urls)
}

fn parse_detail(page: &Page, item_url: &str, stores_to_check: &[String]) -> Result<StockRecord, ExtractError> {
    let document = Html::parse_document(&page.html);
    let mut record = StockRecord::new(strip_title_suffix(&page.title, TITLE_SUFFIX), item_url);
    record.online_status = OnlineStatus::OutOfStock;
    record.backorder_status = BackorderStatus::NotChecked;

    for inventory in document.select(&INVENTORY_STORE_SELECTOR) {
        let store = first(inventory, &STORE_NAME_SELECTOR)
            .map(element_text)
            .ok_or_else(|| missing(STORE_NAME, page))?;
        let store = store.trim_end_matches(':').trim();
        let availability = first(inventory, &STORE_AVAILABILITY_SELECTOR)
            .map(element_text)
            .ok_or_else(|| missing(STORE_AVAILABILITY, page))?;
        let count = inventory_count(&availability, page)?;

        if store.contains(ONLINE_STORE) {
            if count > 0 {
                info!("Online stock found: {}", item_url);
                record.online_status = OnlineStatus::InStock;
            }
        } else if count > 0 && stores_to_check.iter().any(|s| s == store) {
            info!("In-store stock found at {}: {}", store, item_url);
            record.add_store_location(store);
        }
    }

    if stores_to_check.is_empty() {
        record.store_status = StoreStatus::NotChecked;
    } else if record.store_locations.is_empty() {
        record.store_status = StoreStatus::NoStoreStock;
    }

    Ok(record)
}

/// "Out of Stock" and "Backorder" read as zero; "5+" reads as 5.
fn inventory_count(availability: &str, page: &Page) -> Result<u32, ExtractError> {
    match availability {
        "Out of Stock" | "Backorder" => Ok(0),
        other => other
            .trim_end_matches('+')
            .trim()
            .parse()
            .map_err(|_| ExtractError::UnexpectedValue {
                field: "inventory count",
                value: other.to_string(),
                url: page.url.clone(),
            }),
    }
}
