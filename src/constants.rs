use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;

pub static START_TIME: Lazy<DateTime<Utc>> = Lazy::new(Utc::now);

/// Minimum gap between two recorded submissions from one session.
pub const MIN_SUBMISSION_INTERVAL_SECS: i64 = 30;

/// Forms filled out faster than this are treated as bot traffic.
pub const MIN_FORM_OPEN_MS: i64 = 3000;

pub const MAX_NAME_LEN: usize = 100;
pub const MAX_EMAIL_LEN: usize = 100;
pub const MAX_SUBJECT_LEN: usize = 200;
pub const MAX_MESSAGE_LEN: usize = 5000;
