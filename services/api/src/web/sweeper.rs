//! services/api/src/web/sweeper.rs
//!
//! A background task that forgets uploaded documents nobody has asked about
//! for a while, so abandoned sessions do not pin their text in memory forever.

use pdf_chat_core::ports::DocumentStore;
use std::sync::Arc;
use std::time::Duration;
use tokio::{task::JoinHandle, time::MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// How often to sweep for a given TTL: a quarter of it, between 1 and 60 seconds.
pub fn sweep_interval(ttl: Duration) -> Duration {
    (ttl / 4).clamp(Duration::from_secs(1), Duration::from_secs(60))
}

/// Spawns the sweeper. It stops when `shutdown` is cancelled.
pub fn spawn_document_sweeper(
    store: Arc<dyn DocumentStore>,
    ttl: Duration,
    every: Duration,
    shutdown: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    info!("Document sweeper stopped.");
                    break;
                }
                _ = ticker.tick() => {
                    match store.evict_idle(ttl).await {
                        Ok(0) => {}
                        Ok(evicted) => info!("Evicted {} idle document(s).", evicted),
                        Err(e) => error!("Failed to evict idle documents: {}", e),
                    }
                }
            }
        }
    })
}
