//! Config loading.

use std::path::PathBuf;

use crate::config::Config;
use crate::error::DaemonError;

/// Load configuration from the given path, or the default location.
///
/// Returns the file the config was read from, or `None` when the file is
/// missing and the defaults are used. Loading happens before logging is set
/// up, so the caller reports the source.
pub fn load_config(path: Option<&str>) -> Result<(Config, Option<PathBuf>), DaemonError> {
    let config_path = match path {
        Some(p) => PathBuf::from(p),
        None => default_config_path(),
    };

    if config_path.exists() {
        let content = std::fs::read_to_string(&config_path)
            .map_err(|e| DaemonError::Config(format!("failed to read config: {e}")))?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| DaemonError::Config(format!("failed to parse config: {e}")))?;
        if config.daemon.read_chunk == 0 {
            return Err(DaemonError::Config("read_chunk must be positive".to_string()));
        }
        Ok((config, Some(config_path)))
    } else {
        Ok((Config::default(), None))
    }
}

/// Get the default config directory path.
pub fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("~/.config"))
        .join("touchbridge")
}

fn default_config_path() -> PathBuf {
    config_dir().join("config.toml")
}
