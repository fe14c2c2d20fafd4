//! Shared test utilities for integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;

use ssk_core::config::{AppConfig, EnvironmentConfig};
use ssk_core::error::SskResult;
use ssk_services::capabilities::{AddressCache, ModelReadCaches, SessionStore};
use ssk_services::{CacheWarmer, Collaborator, Environment, EnvironmentBuilder};

/// Create a test configuration that skips the construction health report.
pub fn create_test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.environment = EnvironmentConfig { report_unhealthy: false };
    config
}

/// Builder with every role filled by a noop collaborator.
pub fn noop_builder() -> EnvironmentBuilder {
    Environment::builder().fill_missing_with_noop()
}

/// Environment with every role filled by a noop collaborator.
pub fn noop_environment() -> Environment {
    noop_builder()
        .build_with_config(&create_test_config().environment)
        .expect("noop environment should build")
}

/// An in-memory cache that records how often it was warmed.
///
/// Stands in for collaborators such as the address cache or the model
/// read caches, which preload from storage when told to.
pub struct WarmingCache {
    name: String,
    warmed: AtomicUsize,
    runs: mpsc::UnboundedSender<usize>,
}

impl WarmingCache {
    pub fn new(name: &str) -> (Arc<Self>, mpsc::UnboundedReceiver<usize>) {
        let (runs, rx) = mpsc::unbounded_channel();
        let cache = Arc::new(Self {
            name: name.to_string(),
            warmed: AtomicUsize::new(0),
            runs,
        });
        (cache, rx)
    }

    pub fn warmed(&self) -> usize {
        self.warmed.load(Ordering::SeqCst)
    }
}

impl Collaborator for WarmingCache {
    fn name(&self) -> &str {
        &self.name
    }
}

impl AddressCache for WarmingCache {}
impl ModelReadCaches for WarmingCache {}

#[async_trait]
impl CacheWarmer for WarmingCache {
    fn name(&self) -> &str {
        &self.name
    }

    async fn warm_caches(&self) -> SskResult<()> {
        let run = self.warmed.fetch_add(1, Ordering::SeqCst) + 1;
        let _ = self.runs.send(run);
        Ok(())
    }
}

/// Wait for the next warm run reported by a `WarmingCache`.
pub async fn next_warm(rx: &mut mpsc::UnboundedReceiver<usize>) -> usize {
    tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("cache was not warmed in time")
        .expect("cache dropped its channel")
}

/// A session store that reports itself unhealthy until opened.
pub struct TestSessionStore {
    pub open: std::sync::atomic::AtomicBool,
}

impl TestSessionStore {
    pub fn closed() -> Arc<Self> {
        Arc::new(Self {
            open: std::sync::atomic::AtomicBool::new(false),
        })
    }
}

impl Collaborator for TestSessionStore {
    fn name(&self) -> &str {
        "test_session_store"
    }

    fn is_healthy(&self) -> bool {
        self.open.load(Ordering::SeqCst)
    }
}

impl SessionStore for TestSessionStore {}
