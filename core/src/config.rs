//! Loading and validation of [`FeedConfig`].
//!
//! The config lives in the per-user config directory (via `confy`, TOML
//! backend) unless an explicit path is given.

use std::path::{Path, PathBuf};

use killfeed_types::{DEFAULT_LOG_FILE_NAME, FeedConfig};
use thiserror::Error;

/// confy application name
pub const APP_NAME: &str = "killfeed";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load config: {0}")]
    Load(#[from] confy::ConfyError),

    #[error("log_file_path is required")]
    MissingLogPath,

    #[error("invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Load the config from `path`, or from the per-user location when `None`.
///
/// A missing file is created with defaults by confy.
pub fn load_config(path: Option<&Path>) -> Result<FeedConfig, ConfigError> {
    let config = match path {
        Some(path) => confy::load_path(path)?,
        None => confy::load(APP_NAME, None)?,
    };
    Ok(config)
}

/// Where [`load_config(None)`](load_config) reads from.
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    Ok(confy::get_configuration_file_path(APP_NAME, None)?)
}

/// Reject option combinations the feed cannot run with.
pub fn validate(config: &FeedConfig) -> Result<(), ConfigError> {
    if config.log_file_path.as_os_str().is_empty() {
        return Err(ConfigError::MissingLogPath);
    }
    if config.max_visible_entries == 0 {
        return Err(ConfigError::Invalid {
            field: "max_visible_entries",
            reason: "must be at least 1".to_string(),
        });
    }
    if config.tick_interval_ms == 0 {
        return Err(ConfigError::Invalid {
            field: "tick_interval_ms",
            reason: "must be at least 1".to_string(),
        });
    }
    if config.poll_interval_ms == 0 {
        return Err(ConfigError::Invalid {
            field: "poll_interval_ms",
            reason: "must be at least 1".to_string(),
        });
    }
    Ok(())
}

/// Resolve the configured path to the log file itself.
///
/// A directory means "the game directory", and the log inside it is used.
pub fn resolve_log_path(config: &FeedConfig) -> PathBuf {
    let path = &config.log_file_path;
    if path.is_dir() {
        path.join(DEFAULT_LOG_FILE_NAME)
    } else {
        path.to_path_buf()
    }
}
