pub mod dedup;
pub mod message;

use async_trait::async_trait;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::discord::DiscordChannel;
use crate::email::EmailChannel;
use crate::error::NotifyError;
use crate::models::StockReport;

pub use dedup::{decide, Decision, NotifyState, DEDUP_PREFIX_CHARS};
pub use message::{derive_subject, format_body};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub vendor_name: String,
    pub subject: String,
    pub body: String,
}

/// An outbound channel (email, chat webhook).
#[async_trait]
pub trait NotificationChannel: Send + Sync {
    fn name(&self) -> &'static str;
    async fn send(&self, notification: &Notification) -> Result<(), NotifyError>;
}

#[derive(Debug)]
pub struct ChannelFailure {
    pub channel: &'static str,
    pub error: NotifyError,
}

#[derive(Debug)]
pub struct DispatchReport {
    pub subject: String,
    pub delivered: Vec<&'static str>,
    pub failures: Vec<ChannelFailure>,
}

impl DispatchReport {
    /// True when a channel delivered, or when there was no channel to fail.
    pub fn succeeded(&self) -> bool {
        !self.delivered.is_empty() || self.failures.is_empty()
    }
}

#[derive(Debug)]
pub enum NotifyOutcome {
    NoStock,
    Suppressed,
    Dispatched(DispatchReport),
}

pub struct Notifier {
    product: String,
    channels: Vec<Box<dyn NotificationChannel>>,
}

impl Notifier {
    pub fn new(product: impl Into<String>, channels: Vec<Box<dyn NotificationChannel>>) -> Self {
        Self {
            product: product.into(),
            channels,
        }
    }

    /// Discord first, then email, each only when enabled.
    pub fn from_config(config: &Config) -> Self {
        let mut channels: Vec<Box<dyn NotificationChannel>> = Vec::new();
        if config.discord_enabled {
            channels.push(Box::new(DiscordChannel::new(config.secrets.discord_webhook.clone())));
        }
        if config.email_enabled {
            channels.push(Box::new(EmailChannel::from_secrets(&config.secrets)));
        }
        if channels.is_empty() {
            warn!("All notification channels are disabled; stock will only be logged");
        }
        Self::new(config.item_name.clone(), channels)
    }

    /// Formats `report` and sends it unless the dedup policy suppresses it.
    /// `state` is updated only when the send succeeds.
    pub async fn notify(
        &self,
        state: &mut NotifyState,
        vendor_name: &str,
        report: &StockReport,
    ) -> NotifyOutcome {
        let body = format_body(report, vendor_name);

        match decide(state.last_sent(vendor_name), &body) {
            Decision::NoStock => {
                info!("No stock found");
                NotifyOutcome::NoStock
            }
            Decision::Unchanged => {
                info!("Previous items still in stock");
                NotifyOutcome::Suppressed
            }
            Decision::Send => {
                let notification = Notification {
                    vendor_name: vendor_name.to_string(),
                    subject: derive_subject(&self.product, vendor_name, &body),
                    body,
                };
                info!("Sending notification: {}", notification.subject);

                let dispatch = self.dispatch(&notification).await;
                if dispatch.succeeded() {
                    state.record_sent(vendor_name, notification.body);
                } else {
                    warn!("Every channel failed for {}; will retry next cycle", vendor_name);
                }
                NotifyOutcome::Dispatched(dispatch)
            }
        }
    }

    async fn dispatch(&self, notification: &Notification) -> DispatchReport {
        let mut report = DispatchReport {
            subject: notification.subject.clone(),
            delivered: Vec::new(),
            failures: Vec::new(),
        };

        for channel in &self.channels {
            match channel.send(notification).await {
                Ok(()) => report.delivered.push(channel.name()),
                Err(error) => {
                    error!("Error sending {} notification: {}", channel.name(), error);
                    report.failures.push(ChannelFailure {
                        channel: channel.name(),
                        error,
                    });
                }
            }
        }

        report
    }
}
