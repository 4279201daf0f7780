use actix_web::{
    HttpRequest, HttpResponse, Responder,
    cookie::{Cookie, SameSite},
    web,
};
use uuid::Uuid;

use crate::{
    AppState,
    entities::contact::{ContactForm, ContactResponse},
    mail::MailTransport,
    session::SessionStore,
    use_cases::contact::{RejectReason, SubmissionOutcome},
    utils::get_client_ip::get_client_ip,
};

pub const SESSION_COOKIE: &str = "contact_session";

pub async fn submit_contact<M, S>(
    req: HttpRequest,
    state: web::Data<AppState<M, S>>,
    form: web::Form<ContactForm>,
) -> impl Responder
where
    M: MailTransport,
    S: SessionStore,
{
    let client_ip = get_client_ip(&req, state.trust_x_forwarded_for);

    let (session_id, minted) = match req.cookie(SESSION_COOKIE) {
        Some(cookie) => (cookie.value().to_string(), false),
        None => (Uuid::new_v4().to_string(), true),
    };

    let outcome = state
        .contact_handler
        .handle_submission(&form, &client_ip, &session_id)
        .await;

    let mut response = match outcome {
        SubmissionOutcome::Accepted => {
            HttpResponse::Ok().json(ContactResponse::success_with("Message sent successfully"))
        }
        // Indistinguishable from a real success on the wire.
        SubmissionOutcome::Deceived(_) => HttpResponse::Ok().json(ContactResponse::success()),
        SubmissionOutcome::Rejected(reason) => rejection_response(reason),
    };

    if minted {
        let cookie = Cookie::build(SESSION_COOKIE, session_id)
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .finish();
        if let Err(e) = response.add_cookie(&cookie) {
            tracing::warn!(error = %e, "failed to attach session cookie");
        }
    }

    response
}

fn rejection_response(reason: RejectReason) -> HttpResponse {
    match reason {
        RejectReason::RateLimited => HttpResponse::TooManyRequests()
            .json(ContactResponse::failure("Please wait 30 seconds between requests")),
        RejectReason::TooFast => {
            HttpResponse::Ok().json(ContactResponse::failure("Form submitted too quickly"))
        }
        RejectReason::MissingField => {
            HttpResponse::Ok().json(ContactResponse::failure("Please fill in all required fields"))
        }
        RejectReason::TooLong => {
            HttpResponse::Ok().json(ContactResponse::failure("Input too long"))
        }
        RejectReason::InvalidEmail => {
            HttpResponse::Ok().json(ContactResponse::failure("Invalid email address"))
        }
        RejectReason::TransportFailure => HttpResponse::InternalServerError()
            .json(ContactResponse::failure("Failed to send the message")),
    }
}

pub async fn method_not_allowed() -> impl Responder {
    HttpResponse::MethodNotAllowed().json(ContactResponse::failure("Method not allowed"))
}
