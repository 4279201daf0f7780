use std::time::Duration;

use tokio::time::interval;

use crate::session::InMemorySessionStore;

const PURGE_INTERVAL: Duration = Duration::from_secs(600);

/// Periodically drops sessions that have been idle longer than `ttl` so the
/// in-memory store cannot grow without bound.
pub async fn start_purge_task(sessions: InMemorySessionStore, ttl: Duration) {
    let mut interval = interval(PURGE_INTERVAL);

    loop {
        interval.tick().await;

        let purged = sessions.purge_idle(ttl);
        if purged > 0 {
            tracing::info!("Purged {} idle contact sessions", purged);
        }
    }
}
