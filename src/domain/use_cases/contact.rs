use chrono::{DateTime, Utc};
use validator::ValidateEmail;

use crate::{
    constants::{
        MAX_EMAIL_LEN, MAX_MESSAGE_LEN, MAX_NAME_LEN, MAX_SUBJECT_LEN, MIN_FORM_OPEN_MS,
        MIN_SUBMISSION_INTERVAL_SECS,
    },
    entities::contact::{ContactForm, OutboundEmail, SanitizedSubmission},
    mail::MailTransport,
    session::SessionStore,
    settings::ContactSettings,
    use_cases::spam::SpamFilter,
    utils::sanitize::{escape_html, strip_crlf},
};

/// Why a submission was refused. Every reason maps to an explicit error
/// response on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    RateLimited,
    TooFast,
    MissingField,
    TooLong,
    InvalidEmail,
    TransportFailure,
}

/// Why a submission was silently dropped. The caller answers with a success
/// response so automated clients cannot tell they were detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeceiveReason {
    Honeypot,
    SpamPattern(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionOutcome {
    /// Mail was handed to the transport.
    Accepted,
    /// No mail; the client gets an error response.
    Rejected(RejectReason),
    /// No mail; the client gets a success response anyway.
    Deceived(DeceiveReason),
}

pub struct ContactHandler<M, S>
where
    M: MailTransport,
    S: SessionStore,
{
    mailer: M,
    sessions: S,
    settings: ContactSettings,
    spam_filter: SpamFilter,
}

impl<M, S> ContactHandler<M, S>
where
    M: MailTransport,
    S: SessionStore,
{
    pub fn new(mailer: M, sessions: S, settings: ContactSettings) -> Self {
        ContactHandler {
            mailer,
            sessions,
            settings,
            spam_filter: SpamFilter::default(),
        }
    }

    pub fn with_spam_filter(mut self, spam_filter: SpamFilter) -> Self {
        self.spam_filter = spam_filter;
        self
    }

    pub async fn probe_transport(&self) -> bool {
        self.mailer.probe().await
    }

    /// Runs the submission pipeline: rate limit, honeypot, timing check,
    /// field validation, sanitization, spam filter, delivery. Stages
    /// short-circuit; only accepted and silently-dropped submissions update
    /// the session timestamp.
    pub async fn handle_submission(
        &self,
        form: &ContactForm,
        client_ip: &str,
        session_id: &str,
    ) -> SubmissionOutcome {
        let now = Utc::now();
        let now_secs = now.timestamp();

        if let Some(last) = self.sessions.last_submission(session_id).await {
            if now_secs - last < MIN_SUBMISSION_INTERVAL_SECS {
                tracing::info!(ip = %client_ip, "submission rate-limited");
                return SubmissionOutcome::Rejected(RejectReason::RateLimited);
            }
        }

        if !form.website.trim().is_empty() {
            self.sessions.record_submission(session_id, now_secs).await;
            tracing::warn!(ip = %client_ip, "honeypot field filled, dropping submission");
            return SubmissionOutcome::Deceived(DeceiveReason::Honeypot);
        }

        // The client stamps the form at render time; a fast turnaround means
        // no human filled it out. A missing stamp defaults to zero and passes.
        let form_open_ms = now_secs * 1000 - form.timestamp;
        if form_open_ms < MIN_FORM_OPEN_MS {
            tracing::info!(ip = %client_ip, form_open_ms, "form submitted too quickly");
            return SubmissionOutcome::Rejected(RejectReason::TooFast);
        }

        let name = form.name.trim();
        let email = form.email.trim();
        let message = form.message.trim();
        let subject = match form.subject.trim() {
            "" => format!("Contact request via {}", self.settings.site),
            s => s.to_string(),
        };

        if name.is_empty() || email.is_empty() || message.is_empty() {
            return SubmissionOutcome::Rejected(RejectReason::MissingField);
        }

        if name.len() > MAX_NAME_LEN
            || email.len() > MAX_EMAIL_LEN
            || subject.len() > MAX_SUBJECT_LEN
            || message.len() > MAX_MESSAGE_LEN
        {
            return SubmissionOutcome::Rejected(RejectReason::TooLong);
        }

        if !email.validate_email() {
            return SubmissionOutcome::Rejected(RejectReason::InvalidEmail);
        }

        if let Some(rule) = self.spam_filter.first_match(&[name, &subject, message]) {
            self.sessions.record_submission(session_id, now_secs).await;
            tracing::warn!(ip = %client_ip, rule, "spam pattern matched, dropping submission");
            return SubmissionOutcome::Deceived(DeceiveReason::SpamPattern(rule));
        }

        let submission = SanitizedSubmission {
            name: escape_html(name),
            email: escape_html(email),
            subject: escape_html(&subject),
            message: escape_html(message),
        };

        let email_out = self.compose_email(&submission, client_ip, &now);

        match self.mailer.send(&email_out).await {
            Ok(()) => {
                self.sessions.record_submission(session_id, now_secs).await;
                tracing::info!(ip = %client_ip, "contact message delivered");
                SubmissionOutcome::Accepted
            }
            Err(e) => {
                // No state update here, so the client may retry immediately.
                tracing::error!(ip = %client_ip, error = %e, "mail delivery failed");
                SubmissionOutcome::Rejected(RejectReason::TransportFailure)
            }
        }
    }

    fn compose_email(
        &self,
        submission: &SanitizedSubmission,
        client_ip: &str,
        now: &DateTime<Utc>,
    ) -> OutboundEmail {
        let body = format!(
            "New contact request via {site}\n\n\
             Name: {name}\n\
             Email: {email}\n\n\
             Message:\n{message}\n\n\
             ---\n\
             IP address: {ip}\n\
             Timestamp: {timestamp}\n",
            site = self.settings.site,
            name = submission.name,
            email = submission.email,
            message = submission.message,
            ip = client_ip,
            timestamp = now.format("%Y-%m-%d %H:%M:%S"),
        );

        OutboundEmail {
            recipient: self.settings.recipient.clone(),
            from: self.settings.from_address.clone(),
            reply_to: strip_crlf(&submission.email),
            subject: format!("[{}] {}", self.settings.site, submission.subject),
            body,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{errors::MailError, session::InMemorySessionStore, use_cases::spam::SpamRule};
    use async_trait::async_trait;
    use mockall::mock;

    mock! {
        pub Mailer {}

        #[async_trait]
        impl MailTransport for Mailer {
            async fn send(&self, email: &OutboundEmail) -> Result<(), MailError>;
            async fn probe(&self) -> bool;
        }
    }

    fn test_settings() -> ContactSettings {
        ContactSettings {
            site: "example.com".to_string(),
            recipient: "owner@example.com".to_string(),
            from_address: "noreply@example.com".to_string(),
        }
    }

    fn valid_form() -> ContactForm {
        ContactForm {
            name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
            subject: String::new(),
            message: "Hello there".to_string(),
            website: String::new(),
            timestamp: Utc::now().timestamp_millis() - 5000,
        }
    }

    fn handler(mailer: MockMailer) -> ContactHandler<MockMailer, InMemorySessionStore> {
        ContactHandler::new(mailer, InMemorySessionStore::new(), test_settings())
    }

    #[tokio::test]
    async fn first_submission_is_accepted_and_second_is_rate_limited() {
        let mut mailer = MockMailer::new();
        mailer.expect_send().times(1).returning(|_| Ok(()));
        let handler = handler(mailer);

        let outcome = handler
            .handle_submission(&valid_form(), "203.0.113.7", "session-1")
            .await;
        assert_eq!(outcome, SubmissionOutcome::Accepted);

        let outcome = handler
            .handle_submission(&valid_form(), "203.0.113.7", "session-1")
            .await;
        assert_eq!(
            outcome,
            SubmissionOutcome::Rejected(RejectReason::RateLimited)
        );
    }

    #[tokio::test]
    async fn sessions_are_rate_limited_independently() {
        let mut mailer = MockMailer::new();
        mailer.expect_send().times(2).returning(|_| Ok(()));
        let handler = handler(mailer);

        let first = handler
            .handle_submission(&valid_form(), "203.0.113.7", "session-1")
            .await;
        let second = handler
            .handle_submission(&valid_form(), "203.0.113.8", "session-2")
            .await;
        assert_eq!(first, SubmissionOutcome::Accepted);
        assert_eq!(second, SubmissionOutcome::Accepted);
    }

    #[tokio::test]
    async fn filled_honeypot_is_silently_dropped_even_with_invalid_fields() {
        let mailer = MockMailer::new();
        let handler = handler(mailer);

        let form = ContactForm {
            website: "http://bot.example".to_string(),
            email: "not-an-email".to_string(),
            ..valid_form()
        };

        let outcome = handler
            .handle_submission(&form, "203.0.113.7", "session-1")
            .await;
        assert_eq!(
            outcome,
            SubmissionOutcome::Deceived(DeceiveReason::Honeypot)
        );

        // The drop still counts against the rate limit.
        let outcome = handler
            .handle_submission(&valid_form(), "203.0.113.7", "session-1")
            .await;
        assert_eq!(
            outcome,
            SubmissionOutcome::Rejected(RejectReason::RateLimited)
        );
    }

    #[tokio::test]
    async fn too_fast_submission_is_rejected_without_state_update() {
        let mut mailer = MockMailer::new();
        mailer.expect_send().times(1).returning(|_| Ok(()));
        let handler = handler(mailer);

        let form = ContactForm {
            timestamp: Utc::now().timestamp_millis() - 1000,
            ..valid_form()
        };
        let outcome = handler
            .handle_submission(&form, "203.0.113.7", "session-1")
            .await;
        assert_eq!(outcome, SubmissionOutcome::Rejected(RejectReason::TooFast));

        // Nothing was recorded, so a proper submission goes straight through.
        let outcome = handler
            .handle_submission(&valid_form(), "203.0.113.7", "session-1")
            .await;
        assert_eq!(outcome, SubmissionOutcome::Accepted);
    }

    #[tokio::test]
    async fn missing_timestamp_passes_the_timing_check() {
        let mut mailer = MockMailer::new();
        mailer.expect_send().times(1).returning(|_| Ok(()));
        let handler = handler(mailer);

        let form = ContactForm {
            timestamp: 0,
            ..valid_form()
        };
        let outcome = handler
            .handle_submission(&form, "203.0.113.7", "session-1")
            .await;
        assert_eq!(outcome, SubmissionOutcome::Accepted);
    }

    #[tokio::test]
    async fn blank_required_fields_are_rejected() {
        let mailer = MockMailer::new();
        let handler = handler(mailer);

        for blanked in ["name", "email", "message"] {
            let mut form = valid_form();
            match blanked {
                "name" => form.name = "   ".to_string(),
                "email" => form.email = String::new(),
                _ => form.message = "\t\n".to_string(),
            }
            let outcome = handler
                .handle_submission(&form, "203.0.113.7", "session-1")
                .await;
            assert_eq!(
                outcome,
                SubmissionOutcome::Rejected(RejectReason::MissingField),
                "field: {blanked}"
            );
        }
    }

    #[tokio::test]
    async fn overlong_fields_are_rejected() {
        let mailer = MockMailer::new();
        let handler = handler(mailer);

        let form = ContactForm {
            message: "x".repeat(5001),
            ..valid_form()
        };
        let outcome = handler
            .handle_submission(&form, "203.0.113.7", "session-1")
            .await;
        assert_eq!(outcome, SubmissionOutcome::Rejected(RejectReason::TooLong));
    }

    #[tokio::test]
    async fn malformed_email_is_rejected() {
        let mailer = MockMailer::new();
        let handler = handler(mailer);

        let form = ContactForm {
            email: "alice at example dot com".to_string(),
            ..valid_form()
        };
        let outcome = handler
            .handle_submission(&form, "203.0.113.7", "session-1")
            .await;
        assert_eq!(
            outcome,
            SubmissionOutcome::Rejected(RejectReason::InvalidEmail)
        );
    }

    #[tokio::test]
    async fn script_tag_in_message_is_silently_dropped() {
        let mailer = MockMailer::new();
        let handler = handler(mailer);

        let form = ContactForm {
            message: "hi <ScRiPt>alert(1)</script>".to_string(),
            ..valid_form()
        };
        let outcome = handler
            .handle_submission(&form, "203.0.113.7", "session-1")
            .await;
        assert_eq!(
            outcome,
            SubmissionOutcome::Deceived(DeceiveReason::SpamPattern("script-tag"))
        );

        // Spam drops also count against the rate limit.
        let outcome = handler
            .handle_submission(&valid_form(), "203.0.113.7", "session-1")
            .await;
        assert_eq!(
            outcome,
            SubmissionOutcome::Rejected(RejectReason::RateLimited)
        );
    }

    #[tokio::test]
    async fn spam_keywords_in_subject_are_silently_dropped() {
        let mailer = MockMailer::new();
        let handler = handler(mailer);

        let form = ContactForm {
            subject: "cheap CASINO chips".to_string(),
            ..valid_form()
        };
        let outcome = handler
            .handle_submission(&form, "203.0.113.7", "session-1")
            .await;
        assert_eq!(
            outcome,
            SubmissionOutcome::Deceived(DeceiveReason::SpamPattern("spam-keywords"))
        );
    }

    #[tokio::test]
    async fn delivered_mail_carries_escaped_fields_and_audit_trail() {
        let mut mailer = MockMailer::new();
        mailer
            .expect_send()
            .times(1)
            .withf(|email| {
                email.recipient == "owner@example.com"
                    && email.from == "noreply@example.com"
                    && email.reply_to == "alice@example.com"
                    && email.subject == "[example.com] Contact request via example.com"
                    && email.body.contains("Name: Tom &amp; &quot;Jerry&quot;")
                    && email.body.contains("Message:\n1 &lt; 2")
                    && email.body.contains("IP address: 203.0.113.7")
                    && !email.body.contains('<')
                    && !email.body.contains('"')
            })
            .returning(|_| Ok(()));
        let handler = handler(mailer);

        let form = ContactForm {
            name: "Tom & \"Jerry\"".to_string(),
            message: "1 < 2".to_string(),
            ..valid_form()
        };
        let outcome = handler
            .handle_submission(&form, "203.0.113.7", "session-1")
            .await;
        assert_eq!(outcome, SubmissionOutcome::Accepted);
    }

    #[tokio::test]
    async fn transport_failure_leaves_the_session_free_to_retry() {
        let mut mailer = MockMailer::new();
        mailer
            .expect_send()
            .times(1)
            .returning(|_| Err(MailError::Transport("connection refused".to_string())));
        mailer.expect_send().times(1).returning(|_| Ok(()));
        let handler = handler(mailer);

        let outcome = handler
            .handle_submission(&valid_form(), "203.0.113.7", "session-1")
            .await;
        assert_eq!(
            outcome,
            SubmissionOutcome::Rejected(RejectReason::TransportFailure)
        );

        // Failure must not consume the rate-limit window.
        let outcome = handler
            .handle_submission(&valid_form(), "203.0.113.7", "session-1")
            .await;
        assert_eq!(outcome, SubmissionOutcome::Accepted);
    }

    #[test]
    fn reply_to_header_value_has_crlf_stripped() {
        let handler = handler(MockMailer::new());
        let submission = SanitizedSubmission {
            name: "Alice".to_string(),
            email: "alice@example.com\r\nBcc: spam@evil.example".to_string(),
            subject: "Hi".to_string(),
            message: "Hello".to_string(),
        };

        let email = handler.compose_email(&submission, "203.0.113.7", &Utc::now());
        assert_eq!(email.reply_to, "alice@example.comBcc: spam@evil.example");
        assert!(!email.reply_to.contains('\r'));
        assert!(!email.reply_to.contains('\n'));
    }

    #[tokio::test]
    async fn custom_spam_rules_replace_the_default_set() {
        let mut mailer = MockMailer::new();
        mailer.expect_send().times(1).returning(|_| Ok(()));
        let handler = handler(mailer)
            .with_spam_filter(SpamFilter::with_rules(vec![SpamRule::new(
                "greeting",
                r"(?i)^hello there$",
            )]));

        let outcome = handler
            .handle_submission(&valid_form(), "203.0.113.7", "session-1")
            .await;
        assert_eq!(
            outcome,
            SubmissionOutcome::Deceived(DeceiveReason::SpamPattern("greeting"))
        );

        let form = ContactForm {
            message: "something else".to_string(),
            ..valid_form()
        };
        let outcome = handler
            .handle_submission(&form, "203.0.113.7", "session-2")
            .await;
        assert_eq!(outcome, SubmissionOutcome::Accepted);
    }
}
