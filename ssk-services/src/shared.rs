//! Process-wide shared environment.
//!
//! Prefer passing `Arc<Environment>` explicitly. This slot exists for call
//! sites that cannot be reached by a handle, and for test bootstrap.
//! Installation is a single compare-and-swap, so a reader that sees an
//! environment sees a fully constructed one, and two racing publishers
//! cannot both win.

use std::sync::Arc;

use arc_swap::ArcSwapOption;
use lazy_static::lazy_static;
use tracing::info;

use ssk_core::error::{SskError, SskResult};

use crate::environment::Environment;
use crate::event_bus::{EnvironmentEvent, EventBus};

lazy_static! {
    static ref SHARED: ArcSwapOption<Environment> = ArcSwapOption::empty();
}

/// Install `env` as the shared environment.
///
/// # Panics
/// If an environment is already installed. Double initialization is a
/// startup-ordering bug.
pub fn publish(env: Arc<Environment>) {
    if let Err(e) = try_publish(env) {
        panic!("cannot publish environment: {e}");
    }
}

/// Install `env` as the shared environment unless one is already installed.
pub fn try_publish(env: Arc<Environment>) -> SskResult<()> {
    let bus: EventBus = env.event_bus().clone();
    let previous = SHARED.compare_and_swap(&None::<Arc<Environment>>, Some(env));
    if previous.is_some() {
        return Err(SskError::AlreadyPublished);
    }
    info!("shared environment published");
    bus.emit(EnvironmentEvent::Published);
    Ok(())
}

/// The shared environment.
///
/// # Panics
/// If no environment has been published yet.
pub fn current() -> Arc<Environment> {
    match SHARED.load_full() {
        Some(env) => env,
        None => panic!("{}", SskError::NotPublished),
    }
}

/// The shared environment, or `None` before publication.
pub fn try_current() -> Option<Arc<Environment>> {
    SHARED.load_full()
}

/// Whether an environment is installed.
pub fn is_published() -> bool {
    SHARED.load().is_some()
}

/// Remove the shared environment so the next test can publish its own.
#[cfg(any(test, feature = "testing"))]
pub fn clear_for_tests() {
    if SHARED.swap(None).is_some() {
        info!("shared environment cleared");
    }
}
