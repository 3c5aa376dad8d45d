use async_trait::async_trait;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use tracing::info;

use super::{item_link, missing, selector, StockExtractor};
use crate::browser::{Page, PageSession};
use crate::config::VendorConfig;
use crate::error::ExtractError;
use crate::models::{StockRecord, StockReport, Vendor};
use crate::parsers::{closest, element_text, first, parse_price};

pub const DEFAULT_PRICE_LIMIT: f64 = 1300.0;

const PRICE_WHOLE: &str = r#"[class*="style__whole"]"#;
const DEAL_CARD: &str = r#"[class*="DealGridItem"]"#;
const DEAL_LINK: &str = "a[href]";
const DEAL_TITLE: &str = r#"[class*="dealTitle"]"#;

static PRICE_WHOLE_SELECTOR: Lazy<Selector> = Lazy::new(|| selector(PRICE_WHOLE));
static DEAL_CARD_SELECTOR: Lazy<Selector> = Lazy::new(|| selector(DEAL_CARD));
static DEAL_LINK_SELECTOR: Lazy<Selector> = Lazy::new(|| selector(DEAL_LINK));
static DEAL_TITLE_SELECTOR: Lazy<Selector> = Lazy::new(|| selector(DEAL_TITLE));

/// Amazon deal grids only render a price for purchasable listings, so any
/// price under the configured limit counts as online stock.
pub struct AmazonExtractor;

#[async_trait]
impl StockExtractor for AmazonExtractor {
    fn vendor(&self) -> Vendor {
        Vendor::Amazon
    }

    fn stock_markers(&self) -> &'static str {
        PRICE_WHOLE
    }

    async fn extract(
        &self,
        _session: &dyn PageSession,
        page: &Page,
        vendor_config: &VendorConfig,
    ) -> Result<StockReport, ExtractError> {
        parse_listing(page, vendor_config.price_limit.unwrap_or(DEFAULT_PRICE_LIMIT))
    }
}

fn parse_listing(page: &Page, price_limit: f64) -> Result<StockReport, ExtractError> {
    let document = Html::parse_document(&page.html);
    let mut report = StockReport::new();

    for price_element in document.select(&PRICE_WHOLE_SELECTOR) {
        let price_text = element_text(price_element);
        let price = parse_price(&price_text).ok_or_else(|| ExtractError::UnexpectedValue {
            field: "price",
            value: price_text.clone(),
            url: page.url.clone(),
        })?;
        if price >= price_limit {
            continue;
        }

        let card = closest(price_element, &DEAL_CARD_SELECTOR).ok_or_else(|| missing(DEAL_CARD, page))?;
        let (_, item_url) = item_link(card, &DEAL_LINK_SELECTOR, DEAL_LINK, page)?;
        let item_name = first(card, &DEAL_TITLE_SELECTOR)
            .map(element_text)
            .ok_or_else(|| missing(DEAL_TITLE, page))?;

        info!("Online stock found: {}", item_url);
        report.insert(StockRecord::in_stock_online(item_name, item_url));
    }

    Ok(report)
}
