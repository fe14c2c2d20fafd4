//! Application-wide constants.

/// Application name, also used as the platform directory name.
pub const APP_NAME: &str = "SignalServiceKit";

/// Application version.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Well-known name of the broadcast telling collaborators to warm their
/// in-memory caches from persisted storage.
pub const WARM_CACHES_NOTIFICATION: &str = "WarmCachesNotification";

/// Base name of the rotating log file.
pub const LOG_FILE_NAME: &str = "ssk.log";

/// Config file name inside the platform config directory.
pub const CONFIG_FILE_NAME: &str = "config.toml";
