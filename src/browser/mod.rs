pub mod webdriver;

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::FetchError;
use crate::parsers::document_title;
use crate::utils::http::{create_client, fetch_html, random_user_agent};

pub use webdriver::WebDriverBrowser;

/// A fetched page: final URL, `<title>` text and raw HTML.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub url: String,
    pub title: String,
    pub html: String,
}

impl Page {
    pub fn new(url: impl Into<String>, html: impl Into<String>) -> Self {
        let html = html.into();
        Self {
            url: url.into(),
            title: document_title(&html),
            html,
        }
    }
}

/// One browsing session. Lives for a single poll cycle and is dropped at its end.
#[async_trait]
pub trait PageSession: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Page, FetchError>;
}

/// Opens page sessions.
#[async_trait]
pub trait Browser: Send + Sync {
    async fn open_session(&self) -> Result<Box<dyn PageSession>, FetchError>;
}

/// Rendering browser when a WebDriver endpoint is configured, plain HTTP otherwise.
pub fn from_config(config: &Config) -> Box<dyn Browser> {
    let timeout = Duration::from_secs(config.request_timeout_seconds);
    match &config.webdriver_url {
        Some(endpoint) => {
            info!("Rendering pages through WebDriver at {}", endpoint);
            Box::new(WebDriverBrowser::new(endpoint.clone(), timeout))
        }
        None => {
            warn!("WEBDRIVER_URL not set; fetching static HTML, client-rendered stock markers will not be seen");
            Box::new(HttpBrowser::new(timeout))
        }
    }
}

/// Fetches server-rendered HTML with a plain HTTP client.
pub struct HttpBrowser {
    timeout: Duration,
}

impl HttpBrowser {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl Browser for HttpBrowser {
    async fn open_session(&self) -> Result<Box<dyn PageSession>, FetchError> {
        let user_agent = random_user_agent();
        debug!("Opening session as {}", user_agent);
        let client = create_client(user_agent, self.timeout)?;
        Ok(Box::new(HttpSession { client }))
    }
}

pub struct HttpSession {
    client: Client,
}

#[async_trait]
impl PageSession for HttpSession {
    async fn fetch(&self, url: &str) -> Result<Page, FetchError> {
        let (final_url, html) = fetch_html(&self.client, url).await?;
        Ok(Page::new(final_url, html))
    }
}
