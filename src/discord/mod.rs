pub mod embed;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use tracing::{error, info};

use crate::error::NotifyError;
use crate::notify::{Notification, NotificationChannel};
use embed::create_embed;

pub async fn send_webhook(
    client: &Client,
    webhook_url: &str,
    notification: &Notification,
) -> Result<(), NotifyError> {
    let payload = json!({
        "embeds": [create_embed(notification)]
    });

    let response = client.post(webhook_url).json(&payload).send().await?;

    if response.status().is_success() {
        info!("Successfully sent Discord notification for {}", notification.vendor_name);
        Ok(())
    } else {
        let status = response.status();
        let error_text = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());
        error!("Discord webhook failed with status {}: {}", status, error_text);
        Err(NotifyError::WebhookStatus {
            status: status.as_u16(),
            body: error_text,
        })
    }
}

/// Posts notifications as embeds to a Discord webhook.
pub struct DiscordChannel {
    client: Client,
    webhook_url: Option<String>,
}

impl DiscordChannel {
    pub fn new(webhook_url: Option<String>) -> Self {
        Self {
            client: Client::new(),
            webhook_url,
        }
    }
}

#[async_trait]
impl NotificationChannel for DiscordChannel {
    fn name(&self) -> &'static str {
        "discord"
    }

    async fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
        let webhook_url = self
            .webhook_url
            .as_deref()
            .ok_or(NotifyError::MissingCredential("DISCORD_WEBHOOK"))?;
        send_webhook(&self.client, webhook_url, notification).await
    }
}
