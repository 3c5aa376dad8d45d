use async_trait::async_trait;
use fantoccini::wd::Capabilities;
use fantoccini::{Client, ClientBuilder};
use serde_json::json;
use std::time::Duration;
use tracing::debug;

use super::{Browser, Page, PageSession};
use crate::error::FetchError;
use crate::utils::http::random_user_agent;

/// Renders pages in a headless browser behind a WebDriver endpoint
/// (chromedriver, geckodriver or a Selenium grid).
pub struct WebDriverBrowser {
    endpoint: String,
    timeout: Duration,
}

impl WebDriverBrowser {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Self {
        Self {
            endpoint: endpoint.into(),
            timeout,
        }
    }
}

/// Headless Chrome and Firefox options with the given user agent.
pub fn headless_capabilities(user_agent: &str) -> Capabilities {
    let mut caps = Capabilities::new();
    caps.insert(
        "goog:chromeOptions".to_string(),
        json!({
            "args": [
                "--headless=new",
                "--disable-gpu",
                "--no-sandbox",
                format!("--user-agent={user_agent}"),
            ]
        }),
    );
    caps.insert(
        "moz:firefoxOptions".to_string(),
        json!({
            "args": ["-headless"],
            "prefs": { "general.useragent.override": user_agent }
        }),
    );
    caps
}

#[async_trait]
impl Browser for WebDriverBrowser {
    async fn open_session(&self) -> Result<Box<dyn PageSession>, FetchError> {
        let user_agent = random_user_agent();
        debug!("Opening WebDriver session at {} as {}", self.endpoint, user_agent);

        let mut builder = ClientBuilder::native();
        builder.capabilities(headless_capabilities(user_agent));
        let client = builder
            .connect(&self.endpoint)
            .await
            .map_err(|e| FetchError::WebDriverSession {
                endpoint: self.endpoint.clone(),
                reason: e.to_string(),
            })?;

        Ok(Box::new(WebDriverSession {
            client,
            timeout: self.timeout,
        }))
    }
}

/// One browser session; every fetch shares its cookies. The remote session is
/// closed when this is dropped.
pub struct WebDriverSession {
    client: Client,
    timeout: Duration,
}

impl WebDriverSession {
    async fn render(&self, url: &str) -> Result<Page, FetchError> {
        let command_failed = |e: fantoccini::error::CmdError| FetchError::WebDriver {
            url: url.to_string(),
            reason: e.to_string(),
        };

        self.client.goto(url).await.map_err(command_failed)?;
        let html = self.client.source().await.map_err(command_failed)?;
        let final_url = self.client.current_url().await.map_err(command_failed)?;

        Ok(Page::new(final_url.to_string(), html))
    }
}

#[async_trait]
impl PageSession for WebDriverSession {
    async fn fetch(&self, url: &str) -> Result<Page, FetchError> {
        match tokio::time::timeout(self.timeout, self.render(url)).await {
            Ok(result) => result,
            Err(_) => Err(FetchError::Timeout {
                url: url.to_string(),
                seconds: self.timeout.as_secs(),
            }),
        }
    }
}

impl Drop for WebDriverSession {
    fn drop(&mut self) {
        let client = self.client.clone();
        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            handle.spawn(async move {
                if let Err(e) = client.close().await {
                    debug!("Failed to close WebDriver session: {}", e);
                }
            });
        }
    }
}
