//! Catalog manager for generated QR codes and Code128 barcodes.
//!
//! Generates code images into a local directory, records each one in a
//! SQLite catalog, and keeps the two consistent through batch generation,
//! edits and deletes.

pub mod app;
pub mod config;
pub mod error;
pub mod services;
pub mod validation;

use std::path::{Path, PathBuf};

pub use app::AppContext;
pub use config::AppConfig;
pub use error::{ErrorKind, ManagerError};

/// Resolve the data directory, load the config, open the catalog.
///
/// `data_dir_override` wins over `CODE_MANAGER_DATA_DIR` and the default.
pub fn init_foundation(data_dir_override: Option<&Path>) -> Result<AppContext, anyhow::Error> {
    let dir: PathBuf = data_dir_override
        .map(Path::to_path_buf)
        .unwrap_or_else(config::data_dir);
    std::fs::create_dir_all(&dir)?;

    let config = AppConfig::load(&dir)?;
    let ctx = AppContext::open(config)?;

    tracing::info!(
        codes_dir = %ctx.config().codes_dir.display(),
        "Settings loaded"
    );
    Ok(ctx)
}
