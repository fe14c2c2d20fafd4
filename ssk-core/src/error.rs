//! Global error types for the service kit.
//!
//! All error categories are unified into a single `SskError` enum with
//! conversions from underlying library errors.

use thiserror::Error;

/// Convenience type alias for Results using SskError.
pub type SskResult<T> = Result<T, SskError>;

/// Unified error type covering configuration, registry and startup failures.
#[derive(Error, Debug)]
pub enum SskError {
    // -- Configuration errors --
    /// Failed to load or parse application configuration.
    #[error("configuration error: {0}")]
    Config(String),

    // -- Registry errors --
    /// One or more required collaborators were not supplied at construction.
    #[error("missing collaborators: {}", .0.join(", "))]
    MissingCollaborators(Vec<&'static str>),

    /// A shared environment is already installed for this process.
    #[error("shared environment already published")]
    AlreadyPublished,

    /// The shared environment was read before it was published.
    #[error("shared environment not published")]
    NotPublished,

    /// A cache observer failed to warm its caches.
    #[error("cache warm failed in {observer}: {message}")]
    CacheWarm {
        /// Name of the failing observer.
        observer: String,
        /// Failure description.
        message: String,
    },

    // -- Startup errors --
    /// A global tracing subscriber was installed before logging setup ran.
    #[error("logging already initialized: {0}")]
    LoggingInitialized(String),

    // -- File/IO errors --
    /// File system operation failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    // -- Generic --
    /// An unexpected internal error.
    #[error("internal error: {0}")]
    Internal(String),

    /// Wrapping anyhow errors for interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<toml::de::Error> for SskError {
    fn from(e: toml::de::Error) -> Self {
        SskError::Config(e.to_string())
    }
}

impl From<toml::ser::Error> for SskError {
    fn from(e: toml::ser::Error) -> Self {
        SskError::Serialization(e.to_string())
    }
}
