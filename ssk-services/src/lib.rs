//! Service Kit Services - the application's service environment.
//!
//! This crate provides the composition root that every other part of the
//! client uses to reach its collaborators:
//! - Capability traits, one per collaborator role
//! - The `Environment` registry, built once from every required collaborator
//! - Late-bound slots for the call handler and notifications presenter
//! - The process-wide shared environment holder
//! - Environment event bus and cache-warming observers
//! - Startup wiring from the config file and logging setup

pub mod collaborator;
pub mod capabilities;
pub mod noop;
pub mod late_bound;
pub mod environment;
pub mod shared;
pub mod event_bus;
pub mod warm;
pub mod startup;

// Re-export key types
pub use collaborator::{Collaborator, CollaboratorHealth};
pub use environment::{Environment, EnvironmentBuilder, EnvironmentParts, REQUIRED_ROLES};
pub use event_bus::{EnvironmentEvent, EventBus};
pub use late_bound::LateBound;
pub use noop::NoopCollaborator;
pub use startup::Startup;
pub use warm::{spawn_cache_warmer, CacheWarmer};
