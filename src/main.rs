use std::time::Duration;

use actix_cors::Cors;
use actix_web::{
    App, HttpServer, http,
    middleware::{DefaultHeaders, NormalizePath},
    web,
};
use tracing_actix_web::TracingLogger;

use contact_gateway::{
    AppState,
    background_task::start_purge_task,
    graceful_shutdown::shutdown_signal,
    mail::SmtpMailer,
    routes::configure_routes,
    session::InMemorySessionStore,
    settings::AppConfig,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt::init();

    let config = match AppConfig::new() {
        Ok(cfg) => {
            tracing::info!("Loaded configuration: {:?}", cfg);
            cfg
        }
        Err(e) => {
            tracing::error!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    let sessions = InMemorySessionStore::new();

    let app_state = match AppState::new(&config, sessions.clone()) {
        Ok(state) => web::Data::new(state),
        Err(e) => {
            tracing::error!("Mail transport error: {}", e);
            std::process::exit(1);
        }
    };

    let server_addr = format!("{}:{}", config.host, config.port);

    tracing::info!(
        "🚀 Starting {} v{} on {}",
        config.name,
        env!("CARGO_PKG_VERSION"),
        server_addr
    );

    let cors_origins = config.cors_origins();
    let session_ttl = Duration::from_secs(config.session_ttl_secs);

    let server = HttpServer::new(move || {
        let cors = cors_origins.iter().fold(
            Cors::default()
                .allowed_methods(vec!["GET", "POST"])
                .allowed_header(http::header::CONTENT_TYPE)
                .max_age(3600),
            |cors, origin| {
                if origin == "*" {
                    cors.allow_any_origin()
                } else {
                    cors.allowed_origin(origin)
                }
            },
        );

        App::new()
            .app_data(app_state.clone())
            .wrap(NormalizePath::trim())
            .wrap(TracingLogger::default())
            .wrap(cors)
            .wrap(
                DefaultHeaders::new()
                    .add(("X-Content-Type-Options", "nosniff"))
                    .add(("X-Frame-Options", "DENY"))
                    .add(("X-XSS-Protection", "1; mode=block")),
            )
            .configure(configure_routes::<SmtpMailer, InMemorySessionStore>)
    })
    .workers(config.worker_count)
    .bind(server_addr)?
    .run();

    tokio::spawn(start_purge_task(sessions, session_ttl));

    tokio::select! {
        res = server => res,
        _ = shutdown_signal() => Ok(()),
    }
}
