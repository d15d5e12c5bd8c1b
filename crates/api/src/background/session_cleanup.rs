//! Periodic sweep of expired sessions.
//!
//! Validation already expires sessions lazily on access; the sweep catches
//! the ones nobody presents again.

use std::time::Duration;

use paper_db::DbPool;
use tokio_util::sync::CancellationToken;

use crate::auth::service::AuthService;

/// Run the session cleanup loop until `cancel` is triggered.
///
/// The first sweep runs immediately, then once per `period`.
pub async fn run(pool: DbPool, period: Duration, cancel: CancellationToken) {
    tracing::info!(interval_secs = period.as_secs(), "Session cleanup job started");

    let mut interval = tokio::time::interval(period);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Session cleanup job stopping");
                break;
            }
            _ = interval.tick() => {
                match AuthService::cleanup_expired_sessions(&pool).await {
                    Ok(0) => tracing::debug!("Session cleanup: nothing to expire"),
                    Ok(expired) => tracing::info!(expired, "Session cleanup: expired sessions deactivated"),
                    Err(e) => tracing::error!(error = %e, "Session cleanup failed"),
                }
            }
        }
    }
}
