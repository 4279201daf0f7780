use std::time::Duration;

use async_trait::async_trait;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{Mailbox, header::ContentType},
};
use tokio::time::timeout;

use super::MailTransport;
use crate::{entities::contact::OutboundEmail, errors::MailError, settings::AppConfig};

/// SMTP-backed transport. The send call is bounded by a timeout; expiry is
/// treated as a transport failure.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    timeout: Duration,
}

impl SmtpMailer {
    pub fn from_config(config: &AppConfig) -> Result<Self, MailError> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::from_url(&config.smtp_url)?.build();

        Ok(SmtpMailer {
            transport,
            timeout: Duration::from_secs(config.smtp_timeout_secs),
        })
    }

    fn build_message(email: &OutboundEmail) -> Result<Message, MailError> {
        let mut builder = Message::builder()
            .from(email.from.parse::<Mailbox>()?)
            .to(email.recipient.parse::<Mailbox>()?)
            .subject(email.subject.clone())
            .user_agent(format!("contact-gateway/{}", env!("CARGO_PKG_VERSION")))
            .header(ContentType::TEXT_PLAIN);

        if !email.reply_to.is_empty() {
            builder = builder.reply_to(email.reply_to.parse::<Mailbox>()?);
        }

        Ok(builder.body(email.body.clone())?)
    }
}

#[async_trait]
impl MailTransport for SmtpMailer {
    async fn send(&self, email: &OutboundEmail) -> Result<(), MailError> {
        let message = Self::build_message(email)?;

        match timeout(self.timeout, self.transport.send(message)).await {
            Ok(Ok(_)) => Ok(()),
            Ok(Err(e)) => Err(e.into()),
            Err(_) => Err(MailError::Timeout),
        }
    }

    async fn probe(&self) -> bool {
        self.transport.test_connection().await.unwrap_or(false)
    }
}
