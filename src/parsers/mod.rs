use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use url::Url;

static LEADING_COUNT_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(\d+)").expect("Invalid count regex"));

static TITLE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("title").expect("Invalid title selector"));

/// Collapses runs of whitespace (including non-breaking spaces) to one space.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Text content of `element`. The parser has already decoded entities, so
/// only whitespace is normalized here.
pub fn element_text(element: ElementRef<'_>) -> String {
    collapse_whitespace(&element.text().collect::<String>())
}

/// Nearest ancestor of `element` matching `selector`.
pub fn closest<'a>(element: ElementRef<'a>, selector: &Selector) -> Option<ElementRef<'a>> {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|ancestor| selector.matches(ancestor))
}

/// First element under `scope` matching `selector`.
pub fn first<'a>(scope: ElementRef<'a>, selector: &Selector) -> Option<ElementRef<'a>> {
    scope.select(selector).next()
}

/// Resolves `href` against the page it was found on.
pub fn resolve_url(page_url: &str, href: &str) -> Option<String> {
    match Url::parse(href) {
        Ok(absolute) => Some(absolute.to_string()),
        Err(_) => Url::parse(page_url)
            .and_then(|base| base.join(href))
            .ok()
            .map(|u| u.to_string()),
    }
}

pub fn document_title(html: &str) -> String {
    let document = Html::parse_document(html);
    document
        .select(&TITLE_SELECTOR)
        .next()
        .map(element_text)
        .unwrap_or_default()
}

/// Strips a vendor's branding from a detail page title.
pub fn strip_title_suffix(title: &str, suffix: &str) -> String {
    title
        .trim()
        .strip_suffix(suffix)
        .unwrap_or(title)
        .trim()
        .to_string()
}

/// Leading digits of an inventory count: "5+" is 5, "-" and "Out of Stock" are 0.
pub fn parse_stock_count(text: &str) -> u32 {
    LEADING_COUNT_REGEX
        .captures(text)
        .and_then(|caps| caps[1].parse().ok())
        .unwrap_or(0)
}

/// Parses a listed price such as "1,249" or "999.99".
pub fn parse_price(text: &str) -> Option<f64> {
    text.replace(',', "")
        .replace('$', "")
        .trim()
        .trim_end_matches('.')
        .parse::<f64>()
        .ok()
}

/// Section banner printed before each vendor pass.
pub fn title_line(vendor_name: &str) -> String {
    format!("{:-<30}", format!("{vendor_name} "))
}
