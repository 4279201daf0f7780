mod domain;
mod infrastructure;
mod interfaces;

pub mod background_task;
pub mod constants;
pub mod errors;
pub mod graceful_shutdown;
pub mod settings;

pub use domain::{entities, use_cases};
pub use infrastructure::{mail, session, utils};
pub use interfaces::{handlers, routes};

use errors::MailError;
use mail::{MailTransport, SmtpMailer};
use session::{InMemorySessionStore, SessionStore};
use settings::{AppConfig, ContactSettings};
use use_cases::contact::ContactHandler;

pub type AppContactHandler = ContactHandler<SmtpMailer, InMemorySessionStore>;

pub struct AppState<M = SmtpMailer, S = InMemorySessionStore>
where
    M: MailTransport,
    S: SessionStore,
{
    pub contact_handler: ContactHandler<M, S>,
    pub trust_x_forwarded_for: bool,
}

impl AppState {
    pub fn new(config: &AppConfig, sessions: InMemorySessionStore) -> Result<Self, MailError> {
        let mailer = SmtpMailer::from_config(config)?;
        let contact_handler = ContactHandler::new(mailer, sessions, ContactSettings::from(config));

        Ok(AppState {
            contact_handler,
            trust_x_forwarded_for: config.trust_x_forwarded_for,
        })
    }
}
