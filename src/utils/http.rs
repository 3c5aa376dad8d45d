use rand::seq::IndexedRandom;
use reqwest::{Client, ClientBuilder};
use std::time::Duration;
use tracing::warn;

use crate::error::FetchError;

const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/108.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/16.1 Safari/605.1.15",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:107.0) Gecko/20100101 Firefox/107.0",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/107.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/108.0.0.0 Safari/537.36 Edg/108.0.1462.46",
];

pub fn random_user_agent() -> &'static str {
    USER_AGENTS
        .choose(&mut rand::rng())
        .copied()
        .unwrap_or(USER_AGENTS[0])
}

/// Builds a client with its own cookie jar, so each session starts clean.
pub fn create_client(user_agent: &str, timeout: Duration) -> Result<Client, FetchError> {
    ClientBuilder::new()
        .user_agent(user_agent)
        .timeout(timeout)
        .cookie_store(true)
        .build()
        .map_err(FetchError::Client)
}

/// Fetches `url` once and returns the final URL and body.
pub async fn fetch_html(client: &Client, url: &str) -> Result<(String, String), FetchError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|source| FetchError::Request {
            url: url.to_string(),
            source,
        })?;

    let status = response.status();
    if !status.is_success() {
        warn!("HTTP error {}: {}", status, url);
        return Err(FetchError::UnexpectedStatus {
            status: status.as_u16(),
            url: url.to_string(),
        });
    }

    let final_url = response.url().to_string();
    let body = response.text().await.map_err(|source| FetchError::Request {
        url: url.to_string(),
        source,
    })?;

    Ok((final_url, body))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_user_agent_comes_from_the_pool() {
        for _ in 0..20 {
            assert!(USER_AGENTS.contains(&random_user_agent()));
        }
    }
}
