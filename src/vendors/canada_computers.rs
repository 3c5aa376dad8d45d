use async_trait::async_trait;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use std::collections::HashMap;
use tracing::{debug, info};

use super::{item_link, missing, selector, StockExtractor};
use crate::browser::{Page, PageSession};
use crate::config::VendorConfig;
use crate::error::ExtractError;
use crate::models::{BackorderStatus, OnlineStatus, StockRecord, StockReport, StoreStatus, Vendor};
use crate::parsers::{closest, element_text, first, parse_stock_count, strip_title_suffix};

const STOCK_STATUS: &str = ".pq-hdr-bolder";
const PRODUCT: &str = ".productTemplate";
const PRODUCT_TITLE: &str = ".productTemplate_title a[href]";
const AVAILABILITY: &str = ".pi-prod-availability";
const STORE_ROW: &str = ".stocklevel-pop .stocklevel-row";
const STORE_NAME: &str = "a";
const STORE_QUANTITY: &str = ".stocklevel-qty";

const ONLINE_MARKER: &str = "Online In Stock";
const STORE_MARKER: &str = "Available In Stores";
const TITLE_SUFFIX: &str = "| Canada Computers & Electronics";

static STOCK_STATUS_SELECTOR: Lazy<Selector> = Lazy::new(|| selector(STOCK_STATUS));
static PRODUCT_SELECTOR: Lazy<Selector> = Lazy::new(|| selector(PRODUCT));
static PRODUCT_TITLE_SELECTOR: Lazy<Selector> = Lazy::new(|| selector(PRODUCT_TITLE));
static AVAILABILITY_SELECTOR: Lazy<Selector> = Lazy::new(|| selector(AVAILABILITY));
static STORE_ROW_SELECTOR: Lazy<Selector> = Lazy::new(|| selector(STORE_ROW));
static STORE_NAME_SELECTOR: Lazy<Selector> = Lazy::new(|| selector(STORE_NAME));
static STORE_QUANTITY_SELECTOR: Lazy<Selector> = Lazy::new(|| selector(STORE_QUANTITY));

/// Canada Computers category pages. Candidates are followed to their product
/// page to separate online stock from stock at the configured stores.
pub struct CanadaComputersExtractor;

#[async_trait]
impl StockExtractor for CanadaComputersExtractor {
    fn vendor(&self) -> Vendor {
        Vendor::CanadaComputers
    }

    fn stock_markers(&self) -> &'static str {
        STOCK_STATUS
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
            for record in parse_detail(&detail, &item_url, &vendor_config.stores_to_check)? {
                report.insert(record);
            }
        }
        Ok(report)
    }
}

fn parse_listing(page: &Page) -> Result<Vec<String>, ExtractError> {
    let document = Html::parse_document(&page.html);
    let mut item_urls = Vec::new();

    for stock_status in document.select(&STOCK_STATUS_SELECTOR) {
        let status_text = element_text(stock_status).to_lowercase();
        if status_text.contains("not available") || status_text.contains("back order") {
            continue;
        }

        let product = closest(stock_status, &PRODUCT_SELECTOR).ok_or_else(|| missing(PRODUCT, page))?;
        let (_, item_url) = item_link(product, &PRODUCT_TITLE_SELECTOR, PRODUCT_TITLE, page)?;
        item_urls.push(item_url);
    }

    Ok(item_urls)
}

/// One record per availability panel on the product page (normally exactly one).
fn parse_detail(page: &Page, item_url: &str, stores_to_check: &[String]) -> Result<Vec<StockRecord>, ExtractError> {
    let document = Html::parse_document(&page.html);
    let item_name = strip_title_suffix(&page.title, TITLE_SUFFIX);

    let store_quantities: HashMap<String, u32> = document
        .select(&STORE_ROW_SELECTOR)
        .filter_map(|row| {
            let name = first(row, &STORE_NAME_SELECTOR).map(element_text)?;
            let quantity = first(row, &STORE_QUANTITY_SELECTOR).map(element_text)?;
            Some((name, parse_stock_count(&quantity)))
        })
        .collect();

    let mut records = Vec::new();
    for availability in document.select(&AVAILABILITY_SELECTOR) {
        let availability_text = element_text(availability);
        let mut record = StockRecord::new(item_name.clone(), item_url);
        record.backorder_status = BackorderStatus::NotChecked;

        record.online_status = if availability_text.contains(ONLINE_MARKER) {
            info!("Online stock found: {}", item_url);
            OnlineStatus::InStock
        } else {
            OnlineStatus::OutOfStock
        };

        if stores_to_check.is_empty() {
            record.store_status = StoreStatus::NotChecked;
        } else {
            record.store_status = StoreStatus::NoStoreStock;
            if availability_text.contains(STORE_MARKER) {
                for store in stores_to_check {
                    match store_quantities.get(store) {
                        Some(&quantity) if quantity > 0 => {
                            info!("In-store stock found at {}: {}", store, item_url);
                            record.add_store_location(store.clone());
                        }
                        Some(_) => {}
                        None => debug!("Store {} not listed on {}", store, item_url),
                    }
                }
            }
        }

        records.push(record);
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vendors::testing::FixtureSession;
    use pretty_assertions::assert_eq;

    const LISTING_URL: &str = "https://www.canadacomputers.com/index.php?cPath=43_557_559";
    const ITEM_URL: &str = "https://www.canadacomputers.com/product_info.php?item_id=183099";

    fn listing_html() -> String {
        let product = |id: &str, title: &str, status: &str| {
            format!(
                r#"<div class="productTemplate">
                     <div class="productTemplate_title"><a href="/product_info.php?item_id={id}">{title}</a></div>
                     <div class="pq-stock"><span class="pq-hdr-bolder">{status}</span></div>
                   </div>"#
            )
        };
        format!(
            "<html><body>{}{}{}</body></html>",
            product("183099", "EVGA RTX 3080 XC3", "Available In Stores"),
            product("183100", "MSI RTX 3080 Ventus", "Not Available Online"),
            product("183101", "ASUS RTX 3080 TUF", "Back Order")
        )
    }

    fn detail_html(availability: &str, stores: &[(&str, &str)]) -> String {
        let rows: String = stores
            .iter()
            .map(|(name, qty)| {
                format!(
                    r#"<div class="stocklevel-row"><a href="/location/{name}">{name}</a><p><span class="stocklevel-qty">{qty}</span></p></div>"#
                )
            })
            .collect();
        format!(
            r#"<html><head><title>EVGA GeForce RTX 3080 XC3 | Canada Computers &amp; Electronics</title></head>
               <body><div class="pi-prod-availability">{availability}</div>
               <div class="stocklevel-pop d-none">{rows}</div></body></html>"#
        )
    }

    fn vendor_config(stores: &[&str]) -> VendorConfig {
        VendorConfig {
            vendor: Vendor::CanadaComputers,
            name: "Canada Computers".to_string(),
            url: LISTING_URL.to_string(),
            stores_to_check: stores.iter().map(|s| s.to_string()).collect(),
            price_limit: None,
        }
    }

    #[test]
    fn listing_skips_unavailable_and_back_order() {
        let urls = parse_listing(&Page::new(LISTING_URL, listing_html())).unwrap();
        assert_eq!(urls, [ITEM_URL]);
    }

    #[tokio::test]
    async fn store_stock_at_configured_locations_is_reported_in_config_order() {
        let session = FixtureSession::default().with_page(
            ITEM_URL,
            &detail_html(
                "Online In Stock Available In Stores",
                &[("Markham Unionville", "-"), ("Richmond Hill", "5+"), ("Burnaby", "1"), ("Ottawa", "3")],
            ),
        );

        let report = CanadaComputersExtractor
            .extract(
                &session,
                &Page::new(LISTING_URL, listing_html()),
                &vendor_config(&["Burnaby", "Markham Unionville", "Richmond Hill"]),
            )
            .await
            .unwrap();

        let record = report.get("EVGA GeForce RTX 3080 XC3").unwrap();
        assert_eq!(record.url, ITEM_URL);
        assert_eq!(record.online_status, OnlineStatus::InStock);
        assert_eq!(record.store_status, StoreStatus::InStore);
        assert_eq!(record.store_locations, ["Burnaby", "Richmond Hill"]);
    }

    #[test]
    fn store_panel_ignored_without_in_store_marker() {
        let page = Page::new(ITEM_URL, detail_html("Online In Stock", &[("Richmond Hill", "2")]));
        let records = parse_detail(&page, ITEM_URL, &["Richmond Hill".to_string()]).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].store_status, StoreStatus::NoStoreStock);
        assert!(records[0].store_locations.is_empty());
    }

    #[test]
    fn empty_store_list_leaves_store_unchecked() {
        let page = Page::new(ITEM_URL, detail_html("Available In Stores", &[("Richmond Hill", "2")]));
        let records = parse_detail(&page, ITEM_URL, &[]).unwrap();

        assert_eq!(records[0].online_status, OnlineStatus::OutOfStock);
        assert_eq!(records[0].store_status, StoreStatus::NotChecked);
    }

    #[test]
    fn page_without_availability_panel_yields_nothing() {
        let page = Page::new(ITEM_URL, "<html><head><title>Gone</title></head><body></body></html>");
        assert!(parse_detail(&page, ITEM_URL, &[]).unwrap().is_empty());
    }
}
