use actix_web::web;

use crate::{
    handlers::contact::{method_not_allowed, submit_contact},
    mail::MailTransport,
    session::SessionStore,
};

pub fn config_routes<M, S>(cfg: &mut web::ServiceConfig)
where
    M: MailTransport + 'static,
    S: SessionStore + 'static,
{
    cfg.service(
        web::resource("/contact")
            .route(web::post().to(submit_contact::<M, S>))
            // Anything but POST gets an explicit 405 with the JSON body.
            .default_service(web::route().to(method_not_allowed)),
    );
}
