use catalog_db::Database;
use code_engine::{CaptionFont, CodeGenerator};

use crate::config::AppConfig;
use crate::error::Result;

/// Everything an operation needs: configuration, catalog and image writer.
///
/// Built once per session and passed by reference; there is no global state.
#[derive(Clone)]
pub struct AppContext {
    config: AppConfig,
    db: Database,
    generator: CodeGenerator,
}

impl AppContext {
    /// Assemble a context from already-opened parts.
    pub fn new(config: AppConfig, db: Database, generator: CodeGenerator) -> Self {
        Self {
            config,
            db,
            generator,
        }
    }

    /// Open the catalog and prepare the image directory described by `config`.
    pub fn open(config: AppConfig) -> Result<Self> {
        if let Some(parent) = config.database_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        tracing::info!("Opening catalog at {}", config.database_path.display());
        let db = Database::open(&config.database_path)?;

        let mut generator = CodeGenerator::new(&config.codes_dir);
        if let Some(font_path) = &config.caption_font {
            let font = CaptionFont::load(font_path)?.with_size(config.caption_size);
            generator = generator.with_caption_font(font);
        }
        generator.ensure_output_dir()?;

        Ok(Self::new(config, db, generator))
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn db(&self) -> &Database {
        &self.db
    }

    pub fn generator(&self) -> &CodeGenerator {
        &self.generator
    }
}
