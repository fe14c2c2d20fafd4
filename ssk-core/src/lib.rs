//! Service Kit Core - Foundation types, error handling, configuration, and logging.
//!
//! This crate provides the shared foundation used by the service crates:
//! - Application configuration (logging, environment tuning)
//! - Global error type covering registry and startup failures
//! - Structured logging with tracing
//! - Platform directory resolution
//! - Common constants

pub mod config;
pub mod error;
pub mod logging;
pub mod platform;
pub mod constants;

// Re-export commonly used items at the crate root
pub use config::AppConfig;
pub use error::{SskError, SskResult};
pub use logging::init_logging;
