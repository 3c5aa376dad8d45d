use serde::{Deserialize, Serialize};
use std::env::VarError;

use crate::error::ConfigError;
use crate::models::Vendor;

pub const DEFAULT_CONFIG_FILE: &str = "stock_monitor";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Product name used in notification subjects.
    pub item_name: String,
    pub vendors: Vec<VendorConfig>,
    pub poll: PollConfig,
    pub request_timeout_seconds: u64,
    /// WebDriver endpoint used to render pages; static HTTP fetches when unset.
    pub webdriver_url: Option<String>,
    pub email_enabled: bool,
    pub discord_enabled: bool,
    #[serde(skip)]
    pub secrets: Secrets,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VendorConfig {
    pub vendor: Vendor,
    pub name: String,
    pub url: String,
    /// Store names to check for in-store stock, matched case-sensitively.
    #[serde(default)]
    pub stores_to_check: Vec<String>,
    #[serde(default)]
    pub price_limit: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollConfig {
    pub base_interval_seconds: u64,
    pub jitter_min_seconds: u64,
    pub jitter_max_seconds: u64,
}

/// Credentials and endpoints read from the process environment.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Secrets {
    pub email_login: Option<String>,
    pub email_password: Option<String>,
    pub recipients: Vec<String>,
    pub discord_webhook: Option<String>,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            base_interval_seconds: 0,
            jitter_min_seconds: 15,
            jitter_max_seconds: 30,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            item_name: "RTX 3080".to_string(),
            vendors: default_vendors(),
            poll: PollConfig::default(),
            request_timeout_seconds: 25,
            webdriver_url: None,
            email_enabled: true,
            discord_enabled: true,
            secrets: Secrets::default(),
        }
    }
}

fn default_vendors() -> Vec<VendorConfig> {
    vec![
        VendorConfig {
            vendor: Vendor::Newegg,
            name: "Newegg".to_string(),
            url: "https://www.newegg.ca/p/pl?d=Rtx+3080&N=50001402%2050001312%2050001315%2050012150%2050001314%20601357282%20100007708&LeftPriceRange=0+1300".to_string(),
            stores_to_check: Vec::new(),
            price_limit: None,
        },
        VendorConfig {
            vendor: Vendor::BestBuy,
            name: "Best Buy".to_string(),
            url: "https://www.bestbuy.ca/en-ca/collection/rtx-30-series-graphic-cards/316108?path=category%253AComputers%2B%2526%2BTablets%253Bcategory%253APC%2BComponents%253Bcategory%253AGraphics%2BCards%253Bcustom0graphicscardtype%253AGeForce%2BRTX%2B3080".to_string(),
            stores_to_check: Vec::new(),
            price_limit: None,
        },
        VendorConfig {
            vendor: Vendor::MemoryExpress,
            name: "Memory Express".to_string(),
            url: "https://www.memoryexpress.com/Category/VideoCards?FilterID=fdd27ae5-da44-3d27-95bc-3076cc5fc8f3".to_string(),
            stores_to_check: ["Vancouver", "Victoria", "Burnaby", "Richmond"]
                .map(String::from)
                .to_vec(),
            price_limit: None,
        },
        VendorConfig {
            vendor: Vendor::CanadaComputers,
            name: "Canada Computers".to_string(),
            url: "https://www.canadacomputers.com/index.php?cPath=43_557_559&sf=:3_5&mfr=&pr=".to_string(),
            stores_to_check: [
                "Markham Unionville",
                "Midtown Toronto",
                "Richmond Hill",
                "Toronto 284",
                "Vancouver Broadway",
                "East Vancouver",
                "Burnaby",
                "Richmond",
            ]
            .map(String::from)
            .to_vec(),
            price_limit: None,
        },
    ]
}

impl Config {
    /// Loads `.env`, the optional `stock_monitor.toml` and the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        let file = config::File::with_name(DEFAULT_CONFIG_FILE).required(false);
        Self::from_sources(file, |key| std::env::var(key))
    }

    /// Builds the configuration from one file source and an env-var lookup.
    pub fn from_sources<S, F>(file: S, lookup: F) -> Result<Self, ConfigError>
    where
        S: config::Source + Send + Sync + 'static,
        F: Fn(&str) -> Result<String, VarError>,
    {
        let mut config: Config = config::Config::builder()
            .add_source(file)
            .build()?
            .try_deserialize()?;

        if let Some(raw) = lookup("BASE_INTERVAL").ok().filter(|v| !v.trim().is_empty()) {
            config.poll.base_interval_seconds =
                raw.trim().parse().map_err(|e: std::num::ParseIntError| {
                    ConfigError::InvalidValue {
                        var: "BASE_INTERVAL".to_string(),
                        reason: e.to_string(),
                    }
                })?;
        }

        if let Some(endpoint) = lookup("WEBDRIVER_URL").ok().filter(|v| !v.trim().is_empty()) {
            config.webdriver_url = Some(endpoint.trim().to_string());
        }

        config.secrets = Secrets::from_lookup(&lookup);
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.vendors.is_empty() {
            return Err(ConfigError::InvalidValue {
                var: "vendors".to_string(),
                reason: "at least one vendor must be configured".to_string(),
            });
        }
        if self.poll.jitter_min_seconds >= self.poll.jitter_max_seconds {
            return Err(ConfigError::InvalidValue {
                var: "poll.jitter_min_seconds".to_string(),
                reason: format!(
                    "must be lower than poll.jitter_max_seconds ({} >= {})",
                    self.poll.jitter_min_seconds, self.poll.jitter_max_seconds
                ),
            });
        }
        Ok(())
    }
}

impl Secrets {
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Result<String, VarError>,
    {
        let non_empty = |key: &str| lookup(key).ok().filter(|v| !v.trim().is_empty());

        Self {
            email_login: non_empty("EMAIL"),
            email_password: non_empty("PASSWORD"),
            recipients: ["RECIPIENT1", "RECIPIENT2"]
                .iter()
                .filter_map(|key| non_empty(*key))
                .collect(),
            discord_webhook: non_empty("DISCORD_WEBHOOK"),
        }
    }
}
