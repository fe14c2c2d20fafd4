//! Typed event bus for environment-level signals.
//!
//! Each subscriber owns an unbounded tokio channel, so the environment can
//! signal its collaborators without knowing who is listening and without
//! dropping or coalescing anything for a subscriber that is slow to drain.

use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::mpsc;
use tracing::debug;

use ssk_core::constants::WARM_CACHES_NOTIFICATION;

/// Events emitted by the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvironmentEvent {
    /// Storage is ready; observers should populate in-memory caches now.
    WarmCaches,
    /// A late-bound collaborator was attached (or re-attached).
    LateBoundAttached {
        role: &'static str,
    },
    /// The environment was installed as the process-wide shared instance.
    Published,
}

impl EnvironmentEvent {
    /// Well-known name of this event.
    pub fn name(&self) -> &'static str {
        match self {
            EnvironmentEvent::WarmCaches => WARM_CACHES_NOTIFICATION,
            EnvironmentEvent::LateBoundAttached { .. } => "LateBoundAttached",
            EnvironmentEvent::Published => "EnvironmentPublished",
        }
    }
}

/// Environment event bus with one unbounded queue per subscriber.
///
/// Every subscriber gets every event emitted after it subscribed, once per
/// emission, in emission order. Subscribers whose receiver was dropped are
/// pruned on the next emit.
#[derive(Clone, Default)]
pub struct EventBus {
    subscribers: Arc<Mutex<Vec<mpsc::UnboundedSender<EnvironmentEvent>>>>,
}

impl EventBus {
    /// Create a new EventBus with no subscribers.
    pub fn new() -> Self {
        Self::default()
    }

    fn subscribers(&self) -> MutexGuard<'_, Vec<mpsc::UnboundedSender<EnvironmentEvent>>> {
        // Senders stay valid even if a holder panicked.
        self.subscribers.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Subscribe to environment events emitted from now on.
    pub fn subscribe(&self) -> mpsc::UnboundedReceiver<EnvironmentEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers().push(tx);
        rx
    }

    /// Emit an event to all current subscribers.
    ///
    /// Never blocks. Returns the number of subscribers the event was queued for.
    pub fn emit(&self, event: EnvironmentEvent) -> usize {
        let label = event.name();
        let mut subscribers = self.subscribers();
        subscribers.retain(|tx| tx.send(event.clone()).is_ok());
        let count = subscribers.len();
        if count == 0 {
            debug!("event_bus: no subscribers for {label}");
        } else {
            debug!("event_bus: emitted {label} to {count} subscriber(s)");
        }
        count
    }

    /// Get the current number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        let mut subscribers = self.subscribers();
        subscribers.retain(|tx| !tx.is_closed());
        subscribers.len()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}
