use derive_more::Display;

/// All errors related to building and delivering outbound mail.
#[derive(Debug, Display)]
pub enum MailError {
    #[display("Failed to build outbound message: {_0}")]
    Build(String),

    #[display("Mail transport error: {_0}")]
    Transport(String),

    #[display("Mail transport timed out")]
    Timeout,
}

impl std::error::Error for MailError {}

impl From<lettre::error::Error> for MailError {
    fn from(err: lettre::error::Error) -> Self {
        MailError::Build(err.to_string())
    }
}

impl From<lettre::address::AddressError> for MailError {
    fn from(err: lettre::address::AddressError) -> Self {
        MailError::Build(format!("Invalid address: {}", err))
    }
}

impl From<lettre::transport::smtp::Error> for MailError {
    fn from(err: lettre::transport::smtp::Error) -> Self {
        MailError::Transport(err.to_string())
    }
}
