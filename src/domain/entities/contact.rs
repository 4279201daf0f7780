use serde::{Deserialize, Serialize};

/// Raw contact-form fields as posted by the browser. Every field defaults so
/// an absent field behaves like an empty one.
#[derive(Debug, Default, Deserialize)]
pub struct ContactForm {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub email: String,

    #[serde(default)]
    pub subject: String,

    #[serde(default)]
    pub message: String,

    /// Honeypot. Hidden from humans; any value here signals a bot.
    #[serde(default)]
    pub website: String,

    /// Client-side render time of the form, epoch milliseconds.
    #[serde(default)]
    pub timestamp: i64,
}

/// Form fields after trimming and HTML escaping, safe to embed in output.
#[derive(Debug, Clone)]
pub struct SanitizedSubmission {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

/// One message handed to the mail transport, then discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundEmail {
    pub recipient: String,
    pub from: String,
    pub reply_to: String,
    pub subject: String,
    pub body: String,
}

/// Wire body for every contact-endpoint response.
#[derive(Debug, Serialize)]
pub struct ContactResponse {
    pub success: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ContactResponse {
    pub fn success() -> Self {
        ContactResponse {
            success: true,
            message: None,
        }
    }

    pub fn success_with(message: impl Into<String>) -> Self {
        ContactResponse {
            success: true,
            message: Some(message.into()),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        ContactResponse {
            success: false,
            message: Some(message.into()),
        }
    }
}
