//! Per-user locations for the config file and logs.

use std::path::PathBuf;

use crate::constants::{APP_NAME, CONFIG_FILE_NAME};
use crate::error::{SskError, SskResult};

fn app_dir(base: Option<PathBuf>, kind: &str) -> SskResult<PathBuf> {
    base.map(|dir| dir.join(APP_NAME))
        .ok_or_else(|| SskError::Config(format!("could not determine {kind} directory")))
}

/// `config.toml` inside the user's config directory, e.g.
/// `~/.config/SignalServiceKit/config.toml` on Linux.
pub fn config_file() -> SskResult<PathBuf> {
    Ok(app_dir(dirs::config_dir(), "config")?.join(CONFIG_FILE_NAME))
}

/// Default log directory under the user's data directory.
pub fn log_dir() -> SskResult<PathBuf> {
    Ok(app_dir(dirs::data_dir(), "data")?.join("logs"))
}
