//! Cache-warming observers.
//!
//! Collaborators that keep in-memory caches over persisted storage
//! implement [`CacheWarmer`] and are attached to the environment's event
//! bus with [`spawn_cache_warmer`]. Each `WarmCaches` signal runs the
//! warmer exactly once on its own task, even when signals arrive faster
//! than the warmer completes; failures are logged and never reach the
//! broadcaster.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error, info};

use ssk_core::error::SskResult;

use crate::event_bus::{EnvironmentEvent, EventBus};

/// An observer that populates its caches from storage on demand.
#[async_trait]
pub trait CacheWarmer: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &str;

    /// Load caches from storage.
    async fn warm_caches(&self) -> SskResult<()>;
}

/// Subscribe `warmer` to `events` and run it once per `WarmCaches` signal.
///
/// The subscription is taken before this returns, so a broadcast issued
/// right after the call is not missed. The task ends when the bus closes.
pub fn spawn_cache_warmer(
    warmer: Arc<dyn CacheWarmer>,
    events: &EventBus,
) -> tokio::task::JoinHandle<()> {
    let mut rx = events.subscribe();
    tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            if event != EnvironmentEvent::WarmCaches {
                continue;
            }
            debug!("warming caches: {}", warmer.name());
            if let Err(e) = warmer.warm_caches().await {
                error!("cache warmer {} failed: {e}", warmer.name());
            }
        }
        info!("cache warmer {}: event bus closed", warmer.name());
    })
}
