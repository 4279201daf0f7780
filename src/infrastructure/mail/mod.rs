pub mod smtp;

pub use smtp::SmtpMailer;

use async_trait::async_trait;

use crate::{entities::contact::OutboundEmail, errors::MailError};

/// Outbound mail collaborator. Accepts one message and reports success or
/// failure synchronously; no queueing or retries.
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, email: &OutboundEmail) -> Result<(), MailError>;

    /// Connectivity probe for the health endpoint.
    async fn probe(&self) -> bool {
        true
    }
}
