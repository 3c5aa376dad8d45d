use async_trait::async_trait;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use tracing::info;

use super::{missing, selector, StockExtractor};
use crate::browser::{Page, PageSession};
use crate::config::VendorConfig;
use crate::error::ExtractError;
use crate::models::{BackorderStatus, OnlineStatus, StockRecord, StockReport, StoreStatus, Vendor};
use crate::parsers::{closest, element_text, first, resolve_url};

const STOCK_STATUS: &str = r#"[class*="availabilityMessageSearch"]"#;
const ITEM_LINK: &str = "a[href]";
const ITEM_NAME: &str = r#"[class*="productItemName"]"#;

const SHIP_MARKERS: [&str; 2] = ["Available to ship", "Available online only"];
const STORE_MARKER: &str = "Available at nearby stores";
const BACKORDER_MARKER: &str = "Available for backorder";
const UNSPECIFIED_STORE: &str = "Store location unspecified";

static STOCK_STATUS_SELECTOR: Lazy<Selector> = Lazy::new(|| selector(STOCK_STATUS));
static ITEM_LINK_SELECTOR: Lazy<Selector> = Lazy::new(|| selector(ITEM_LINK));
static ITEM_NAME_SELECTOR: Lazy<Selector> = Lazy::new(|| selector(ITEM_NAME));

/// Best Buy collection pages, which report online, in-store and backorder
/// availability per listing.
pub struct BestBuyExtractor;

#[async_trait]
impl StockExtractor for BestBuyExtractor {
    fn vendor(&self) -> Vendor {
        Vendor::BestBuy
    }

    fn stock_markers(&self) -> &'static str {
        STOCK_STATUS
    }

    async fn extract(
        &self,
        _session: &dyn PageSession,
        page: &Page,
        _vendor_config: &VendorConfig,
    ) -> Result<StockReport, ExtractError> {
        parse_listing(page)
    }
}

fn parse_listing(page: &Page) -> Result<StockReport, ExtractError> {
    let document = Html::parse_document(&page.html);
    let mut report = StockReport::new();

    for stock_status in document.select(&STOCK_STATUS_SELECTOR) {
        let status_text = element_text(stock_status);
        let online = SHIP_MARKERS.iter().any(|m| status_text.contains(m));
        let in_store = status_text.contains(STORE_MARKER);
        let backorder = status_text.contains(BACKORDER_MARKER);
        if !(online || in_store || backorder) {
            continue;
        }

        let link = closest(stock_status, &ITEM_LINK_SELECTOR).ok_or_else(|| missing(ITEM_LINK, page))?;
        let item_url = link
            .value()
            .attr("href")
            .and_then(|href| resolve_url(&page.url, href))
            .ok_or_else(|| missing(ITEM_LINK, page))?;
        let item_name = first(link, &ITEM_NAME_SELECTOR)
            .map(element_text)
            .ok_or_else(|| missing(ITEM_NAME, page))?;

        let mut record = StockRecord::new(item_name, item_url);

        record.online_status = if online {
            info!("Online stock found: {}", record.url);
            OnlineStatus::InStock
        } else {
            OnlineStatus::OutOfStock
        };

        if in_store {
            record.add_store_location(UNSPECIFIED_STORE);
        } else {
            record.store_status = StoreStatus::NoStoreStock;
        }

        record.backorder_status = if backorder {
            info!("Backorder stock found: {}", record.url);
            BackorderStatus::Available
        } else {
            BackorderStatus::Unavailable
        };

        report.insert(record);
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn listing(name: &str, href: &str, availability: &str) -> String {
        format!(
            r#"<div class="col-xs-12"><a class="link_3hcyN" href="{href}">
                 <div class="productItemTextContainer_HocvR">
                   <div class="productItemName_3IZ3c">{name}</div>
                   <div class="availabilityMessageSearch_23ZLw"><span>{availability}</span></div>
                 </div>
               </a></div>"#
        )
    }

    fn page(listings: &[String]) -> Page {
        Page::new(
            "https://www.bestbuy.ca/en-ca/collection/rtx-30-series-graphic-cards/316108",
            format!("<html><body>{}</body></html>", listings.concat()),
        )
    }

    #[test]
    fn availability_phrases_map_to_statuses() {
        let page = page(&[
            listing("Founders Edition", "/en-ca/product/15463567", "Available to ship"),
            listing("Gigabyte Eagle", "/en-ca/product/15078017", "Available at nearby stores"),
            listing("ASUS Strix", "/en-ca/product/14953247", "Available for backorder"),
            listing("MSI Gaming X", "/en-ca/product/14950588", "Sold out online"),
        ]);

        let report = parse_listing(&page).unwrap();
        let names: Vec<_> = report.iter().map(|r| r.item_name.as_str()).collect();
        assert_eq!(names, ["Founders Edition", "Gigabyte Eagle", "ASUS Strix"]);

        let founders = report.get("Founders Edition").unwrap();
        assert_eq!(founders.url, "https://www.bestbuy.ca/en-ca/product/15463567");
        assert_eq!(founders.online_status, OnlineStatus::InStock);
        assert_eq!(founders.store_status, StoreStatus::NoStoreStock);
        assert_eq!(founders.backorder_status, BackorderStatus::Unavailable);

        let eagle = report.get("Gigabyte Eagle").unwrap();
        assert_eq!(eagle.online_status, OnlineStatus::OutOfStock);
        assert_eq!(eagle.store_status, StoreStatus::InStore);
        assert_eq!(eagle.store_locations, [UNSPECIFIED_STORE]);

        let strix = report.get("ASUS Strix").unwrap();
        assert_eq!(strix.backorder_status, BackorderStatus::Available);
        assert_eq!(strix.store_status, StoreStatus::NoStoreStock);
    }

    #[test]
    fn online_only_counts_as_online_stock() {
        let page = page(&[listing("Zotac Trinity", "/en-ca/product/1", "Available online only")]);
        let report = parse_listing(&page).unwrap();
        assert_eq!(report.get("Zotac Trinity").unwrap().online_status, OnlineStatus::InStock);
    }

    #[test]
    fn markers_are_case_sensitive() {
        let page = page(&[listing("EVGA XC3", "/en-ca/product/2", "AVAILABLE TO SHIP")]);
        assert!(parse_listing(&page).unwrap().is_empty());
    }
}
