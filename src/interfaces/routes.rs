use actix_web::web;

use crate::{
    handlers::{home::home, system},
    mail::MailTransport,
    session::SessionStore,
};

mod contact;
mod form_error;

pub fn configure_routes<M, S>(cfg: &mut web::ServiceConfig)
where
    M: MailTransport + 'static,
    S: SessionStore + 'static,
{
    cfg.service(home);
    cfg.route("/health", web::get().to(system::health_check::<M, S>));

    cfg.configure(contact::config_routes::<M, S>);
    cfg.configure(form_error::config_routes);
}
