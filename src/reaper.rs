use std::sync::Arc;

use tracing::info;

use crate::engine::Engine;

/// Background task that periodically purges completed idempotency records
/// past their retention window. Locked records are never touched — an
/// in-flight request owns them.
pub async fn run_reaper(engine: Arc<Engine>) {
    let mut interval = tokio::time::interval(engine.config().reaper_interval);
    loop {
        interval.tick().await;
        match engine.purge_idempotency_records().await {
            Ok(0) => {}
            Ok(n) => info!("reaped {n} completed idempotency records"),
            Err(e) => tracing::warn!("idempotency reaper skipped a pass: {e}"),
        }
    }
}
