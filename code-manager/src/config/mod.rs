//! Configuration management: defaults, validation, loading from the config file + environment.

pub mod app_config;
pub mod defaults;
pub mod validation;

use std::path::PathBuf;

pub use app_config::AppConfig;
pub use validation::validate_setting;

/// Name of the key/value config file inside the data directory.
pub const CONFIG_FILE_NAME: &str = "config.env";

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "CODE_MANAGER_DATA_DIR";

/// Prefix for per-key environment overrides (`CODE_MANAGER_CODES_DIR`, ...).
pub const ENV_PREFIX: &str = "CODE_MANAGER_";

/// Determine the data directory for the application.
/// Priority: CODE_MANAGER_DATA_DIR env var > ~/.code-manager
pub fn data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        return PathBuf::from(dir);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".code-manager")
}
