use async_trait::async_trait;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use tracing::info;

use super::{item_link, missing, selector, StockExtractor};
use crate::browser::{Page, PageSession};
use crate::config::VendorConfig;
use crate::error::ExtractError;
use crate::models::{StockRecord, StockReport, Vendor};
use crate::parsers::{closest, element_text};

const SHIPPING: &str = "p.text-theme-shipping";
const PRODUCT_CARD: &str = ".product-card";
const PRODUCT_NAME: &str = ".product-card__name a[href]";

const BACKORDER_MARKER: &str = "On Backorder";

static SHIPPING_SELECTOR: Lazy<Selector> = Lazy::new(|| selector(SHIPPING));
static PRODUCT_CARD_SELECTOR: Lazy<Selector> = Lazy::new(|| selector(PRODUCT_CARD));
static PRODUCT_NAME_SELECTOR: Lazy<Selector> = Lazy::new(|| selector(PRODUCT_NAME));

pub struct PcCanadaExtractor;

#[async_trait]
impl StockExtractor for PcCanadaExtractor {
    fn vendor(&self) -> Vendor {
        Vendor::PcCanada
    }

    fn stock_markers(&self) -> &'static str {
        SHIPPING
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

    for shipping in document.select(&SHIPPING_SELECTOR) {
        let shipping_text = element_text(shipping);
        if shipping_text.is_empty() || shipping_text.contains(BACKORDER_MARKER) {
            continue;
        }

        let card = closest(shipping, &PRODUCT_CARD_SELECTOR).ok_or_else(|| missing(PRODUCT_CARD, page))?;
        let (item_name, item_url) = item_link(card, &PRODUCT_NAME_SELECTOR, PRODUCT_NAME, page)?;
        info!("Online stock found: {}", item_url);
        report.insert(StockRecord::in_stock_online(item_name, item_url));
    }

    Ok(report)
}
