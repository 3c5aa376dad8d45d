use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("could not start a WebDriver session at {endpoint}: {reason}")]
    WebDriverSession { endpoint: String, reason: String },

    #[error("WebDriver command for {url} failed: {reason}")]
    WebDriver { url: String, reason: String },

    #[error("{url} did not load within {seconds}s")]
    Timeout { url: String, seconds: u64 },
}

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("expected element `{selector}` not found on {url}")]
    MissingElement { selector: String, url: String },

    #[error("unparseable {field} value \"{value}\" on {url}")]
    UnexpectedValue {
        field: &'static str,
        value: String,
        url: String,
    },

    #[error("detail page fetch failed: {0}")]
    Detail(#[from] FetchError),
}

/// Failure of one vendor pass, classified by phase.
#[derive(Debug, Error)]
pub enum VendorError {
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("extraction failed: {0}")]
    Extract(#[from] ExtractError),

    #[error("no extractor registered for vendor `{0}`")]
    Unregistered(String),
}

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("missing credential: {0}")]
    MissingCredential(&'static str),

    #[error("invalid email address \"{address}\": {reason}")]
    InvalidAddress { address: String, reason: String },

    #[error("failed to build email: {0}")]
    Message(#[from] lettre::error::Error),

    #[error("SMTP delivery failed: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),

    #[error("webhook request failed: {0}")]
    Webhook(#[from] reqwest::Error),

    #[error("webhook returned {status}: {body}")]
    WebhookStatus { status: u16, body: String },
}

#[derive(Debug, Error)]
pub enum CycleError {
    #[error("could not open page session: {0}")]
    Session(#[from] FetchError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration source error: {0}")]
    Source(#[from] config::ConfigError),

    #[error("invalid value for {var}: {reason}")]
    InvalidValue { var: String, reason: String },
}
