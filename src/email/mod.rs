use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::{Credentials, Mechanism};
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::info;

use crate::config::Secrets;
use crate::error::NotifyError;
use crate::notify::{Notification, NotificationChannel};

pub const SMTP_HOST: &str = "smtp.gmail.com";
pub const SMTP_PORT: u16 = 587;

/// Sends plain-text mail through an authenticated STARTTLS submission server.
pub struct EmailChannel {
    login: Option<String>,
    password: Option<String>,
    recipients: Vec<String>,
}

impl EmailChannel {
    pub fn from_secrets(secrets: &Secrets) -> Self {
        Self {
            login: secrets.email_login.clone(),
            password: secrets.email_password.clone(),
            recipients: secrets.recipients.clone(),
        }
    }

    /// Builds the message; credentials are only checked here, at send time.
    pub fn build_message(&self, notification: &Notification) -> Result<Message, NotifyError> {
        let login = self
            .login
            .as_deref()
            .ok_or(NotifyError::MissingCredential("EMAIL"))?;
        if self.recipients.is_empty() {
            return Err(NotifyError::MissingCredential("RECIPIENT1"));
        }

        let mut builder = Message::builder()
            .from(mailbox(login)?)
            .subject(notification.subject.as_str())
            .header(ContentType::TEXT_PLAIN);
        for recipient in &self.recipients {
            builder = builder.to(mailbox(recipient)?);
        }

        Ok(builder.body(notification.body.clone())?)
    }
}

fn mailbox(address: &str) -> Result<Mailbox, NotifyError> {
    address.parse().map_err(|e: lettre::address::AddressError| NotifyError::InvalidAddress {
        address: address.to_string(),
        reason: e.to_string(),
    })
}

#[async_trait]
impl NotificationChannel for EmailChannel {
    fn name(&self) -> &'static str {
        "email"
    }

    async fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
        let message = self.build_message(notification)?;
        let login = self
            .login
            .clone()
            .ok_or(NotifyError::MissingCredential("EMAIL"))?;
        let password = self
            .password
            .clone()
            .ok_or(NotifyError::MissingCredential("PASSWORD"))?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(SMTP_HOST)?
            .port(SMTP_PORT)
            .credentials(Credentials::new(login, password))
            .authentication(vec![Mechanism::Login])
            .build();

        transport.send(message).await?;
        info!("Email sent to {} recipient(s)", self.recipients.len());
        Ok(())
    }
}
