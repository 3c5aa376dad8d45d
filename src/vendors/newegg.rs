use async_trait::async_trait;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use tracing::info;

use super::{item_link, missing, selector, StockExtractor};
use crate::browser::{Page, PageSession};
use crate::config::VendorConfig;
use crate::error::ExtractError;
use crate::models::{StockRecord, StockReport, Vendor};
use crate::parsers::{closest, element_text, first};

const STOCK_STATUS: &str = ".item-operate";
const ITEM_CELL: &str = ".item-cell";
const ITEM_TITLE: &str = "a.item-title";
const ITEM_BUTTON: &str = ".item-button-area button";

static STOCK_STATUS_SELECTOR: Lazy<Selector> = Lazy::new(|| selector(STOCK_STATUS));
static ITEM_CELL_SELECTOR: Lazy<Selector> = Lazy::new(|| selector(ITEM_CELL));
static ITEM_TITLE_SELECTOR: Lazy<Selector> = Lazy::new(|| selector(ITEM_TITLE));
static ITEM_BUTTON_SELECTOR: Lazy<Selector> = Lazy::new(|| selector(ITEM_BUTTON));

/// Newegg search results. Stock is online-only.
pub struct NeweggExtractor;

#[async_trait]
impl StockExtractor for NeweggExtractor {
    fn vendor(&self) -> Vendor {
        Vendor::Newegg
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
        if status_text.contains("OUT OF STOCK") || status_text.contains("SOLD OUT") {
            continue;
        }

        let cell = closest(stock_status, &ITEM_CELL_SELECTOR)
            .ok_or_else(|| missing(ITEM_CELL, page))?;

        // Listings without stock may still render an "AUTO NOTIFY" button
        let auto_notify = first(cell, &ITEM_BUTTON_SELECTOR)
            .map(element_text)
            .is_some_and(|label| label.contains("AUTO NOTIFY"));
        if auto_notify {
            continue;
        }

        let (item_name, item_url) = item_link(cell, &ITEM_TITLE_SELECTOR, ITEM_TITLE, page)?;
        info!("Online stock found: {}", item_url);
        report.insert(StockRecord::in_stock_online(item_name, item_url));
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BackorderStatus, OnlineStatus, StoreStatus};

    fn cell(title: &str, href: &str, status: &str, button: &str) -> String {
        format!(
            r#"<div class="item-cell"><div class="item-container">
                 <div class="item-info"><a class="item-title" href="{href}">{title}</a></div>
                 <div class="item-action"><div class="item-button-area"><button>{button}</button></div></div>
                 <div class="item-operate"><p>{status}</p></div>
               </div></div>"#
        )
    }

    fn page(cells: &[String]) -> Page {
        Page::new(
            "https://www.newegg.ca/p/pl?d=rtx+3080",
            format!("<html><body><div class=\"list-wrap\">{}</div></body></html>", cells.concat()),
        )
    }

    #[test]
    fn in_stock_listings_become_online_records() {
        let page = page(&[
            cell("ASUS TUF RTX 3080", "/asus-tuf/p/N82E1", "Free Shipping", "ADD TO CART"),
            cell("MSI Ventus RTX 3080", "/msi/p/N82E2", "OUT OF STOCK", "AUTO NOTIFY"),
            cell("EVGA FTW3 RTX 3080", "/evga/p/N82E3", "SOLD OUT", "VIEW DETAILS"),
        ]);

        let report = parse_listing(&page).unwrap();

        assert_eq!(report.len(), 1);
        let record = report.get("ASUS TUF RTX 3080").unwrap();
        assert_eq!(record.url, "https://www.newegg.ca/asus-tuf/p/N82E1");
        assert_eq!(record.online_status, OnlineStatus::InStock);
        assert_eq!(record.store_status, StoreStatus::NotChecked);
        assert_eq!(record.backorder_status, BackorderStatus::NotChecked);
    }

    #[test]
    fn auto_notify_button_is_not_stock() {
        let page = page(&[cell("Zotac RTX 3080", "/zotac/p/N1", "Ships from Canada", "AUTO NOTIFY")]);
        assert!(parse_listing(&page).unwrap().is_empty());
    }

    #[test]
    fn missing_title_link_aborts_extraction() {
        let page = Page::new(
            "https://www.newegg.ca/p/pl",
            r#"<div class="item-cell"><div class="item-operate">In stock</div></div>"#,
        );
        assert!(matches!(
            parse_listing(&page),
            Err(ExtractError::MissingElement { .. })
        ));
    }
}
