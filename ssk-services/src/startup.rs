//! Process startup: config file, logging, then the environment.

use std::path::Path;

use tracing::{info, warn};

use ssk_core::config::AppConfig;
use ssk_core::error::{SskError, SskResult};
use ssk_core::logging::{init_from_config, LogGuard};

use crate::environment::{Environment, EnvironmentBuilder};

/// A constructed environment together with the settings it was built from.
pub struct Startup {
    pub environment: Environment,
    pub config: AppConfig,
    /// Keeps the file log writer alive. `None` when a subscriber was
    /// already installed by the host process.
    pub log_guard: Option<LogGuard>,
}

/// Start from the per-user config file (defaults if there is none).
pub fn from_default_config(builder: EnvironmentBuilder) -> SskResult<Startup> {
    start(builder, AppConfig::load_default()?)
}

/// Start from the config file at `path` (defaults if it does not exist).
pub fn from_config_file(builder: EnvironmentBuilder, path: &Path) -> SskResult<Startup> {
    start(builder, AppConfig::load_or_default(path)?)
}

/// Initialize logging from `config`, then build the environment.
///
/// Fails without building anything if the log directory cannot be created,
/// and with [`SskError::MissingCollaborators`] if a required role is unset.
pub fn start(builder: EnvironmentBuilder, config: AppConfig) -> SskResult<Startup> {
    let log_dir = config.effective_log_dir()?;
    let log_guard = match init_from_config(&config.logging, &log_dir) {
        Ok(guard) => Some(guard),
        Err(SskError::LoggingInitialized(reason)) => {
            warn!("keeping existing log subscriber: {reason}");
            None
        }
        Err(e) => return Err(e),
    };

    let environment = builder.build_with_config(&config.environment)?;
    info!("startup complete, logs in {}", log_dir.display());

    Ok(Startup {
        environment,
        config,
        log_guard,
    })
}
