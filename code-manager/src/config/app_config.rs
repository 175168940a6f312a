//! Runtime application configuration loaded from the config file + environment overrides.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Context;

use super::defaults::{DEFAULT_SETTINGS, get_default};
use super::validation::validate_setting;
use super::{CONFIG_FILE_NAME, ENV_PREFIX};

/// Runtime configuration, loaded once and passed to every operation.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub database_path: PathBuf,
    pub codes_dir: PathBuf,
    pub backup_dir: PathBuf,
    pub printer: Option<String>,
    pub large_batch_threshold: u64,
    pub caption_font: Option<PathBuf>,
    pub caption_size: f32,
}

impl AppConfig {
    /// Configuration made of defaults only, rooted at `data_dir`.
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self::from_values(data_dir.into(), &BTreeMap::new())
    }

    /// Load `config.env` from `data_dir` (creating it with defaults if
    /// missing), then apply `CODE_MANAGER_<KEY>` environment overrides.
    pub fn load(data_dir: &Path) -> Result<Self, anyhow::Error> {
        let path = Self::config_path(data_dir);
        if !path.exists() {
            write_values(&path, &default_values())?;
            tracing::info!("Created default config at {}", path.display());
        }

        let mut values = read_values(&path)?;
        for def in DEFAULT_SETTINGS {
            if let Ok(v) = std::env::var(format!("{ENV_PREFIX}{}", def.key)) {
                values.insert(def.key.to_string(), v);
            }
        }

        for (key, value) in &values {
            if let Err(e) = validate_setting(key, value) {
                tracing::warn!("Ignoring setting {key}={value:?}: {e}");
            }
        }
        let values = values
            .into_iter()
            .filter(|(k, v)| validate_setting(k, v).is_ok())
            .collect();

        Ok(Self::from_values(data_dir.to_path_buf(), &values))
    }

    pub fn config_path(data_dir: &Path) -> PathBuf {
        data_dir.join(CONFIG_FILE_NAME)
    }

    /// Validate and persist one setting in the config file.
    pub fn set_value(data_dir: &Path, key: &str, value: &str) -> Result<(), anyhow::Error> {
        validate_setting(key, value)
            .map_err(|e| anyhow::anyhow!("validation error for {key}: {e}"))?;

        let path = Self::config_path(data_dir);
        let mut values = if path.exists() {
            read_values(&path)?
        } else {
            default_values()
        };
        values.insert(key.to_string(), value.to_string());
        write_values(&path, &values)
    }

    /// Write every effective value back to the config file.
    pub fn save(&self) -> Result<(), anyhow::Error> {
        write_values(&Self::config_path(&self.data_dir), &self.to_values())
    }

    /// Effective values as they would be written back to the config file.
    pub fn to_values(&self) -> BTreeMap<String, String> {
        let path_text = |p: &Path| p.to_string_lossy().into_owned();
        BTreeMap::from([
            ("DATABASE".to_string(), path_text(&self.database_path)),
            ("CODES_DIR".to_string(), path_text(&self.codes_dir)),
            ("BACKUP_DIR".to_string(), path_text(&self.backup_dir)),
            ("PRINTER".to_string(), self.printer.clone().unwrap_or_default()),
            (
                "LARGE_BATCH_THRESHOLD".to_string(),
                self.large_batch_threshold.to_string(),
            ),
            (
                "CAPTION_FONT".to_string(),
                self.caption_font.as_deref().map(path_text).unwrap_or_default(),
            ),
            ("CAPTION_SIZE".to_string(), self.caption_size.to_string()),
        ])
    }

    fn from_values(data_dir: PathBuf, values: &BTreeMap<String, String>) -> Self {
        let g = |key: &str| -> String {
            values
                .get(key)
                .cloned()
                .unwrap_or_else(|| get_default(key).unwrap_or_default().to_string())
        };
        let resolve = |value: String| -> PathBuf {
            let p = PathBuf::from(value);
            if p.is_absolute() { p } else { data_dir.join(p) }
        };
        let non_empty = |value: String| -> Option<String> {
            let trimmed = value.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        };

        Self {
            database_path: resolve(g("DATABASE")),
            codes_dir: resolve(g("CODES_DIR")),
            backup_dir: non_empty(g("BACKUP_DIR"))
                .map(&resolve)
                .unwrap_or_else(|| data_dir.clone()),
            printer: non_empty(g("PRINTER")),
            large_batch_threshold: g("LARGE_BATCH_THRESHOLD").parse().unwrap_or(500),
            caption_font: non_empty(g("CAPTION_FONT")).map(&resolve),
            caption_size: g("CAPTION_SIZE").parse().unwrap_or(32.0),
            data_dir,
        }
    }
}

fn default_values() -> BTreeMap<String, String> {
    DEFAULT_SETTINGS
        .iter()
        .map(|d| (d.key.to_string(), d.default.to_string()))
        .collect()
}

fn read_values(path: &Path) -> Result<BTreeMap<String, String>, anyhow::Error> {
    let iter = dotenvy::from_path_iter(path)
        .with_context(|| format!("failed to open config {}", path.display()))?;
    let mut values = BTreeMap::new();
    for item in iter {
        let (key, value) =
            item.with_context(|| format!("failed to parse config {}", path.display()))?;
        values.insert(key, value);
    }
    Ok(values)
}

fn write_values(path: &Path, values: &BTreeMap<String, String>) -> Result<(), anyhow::Error> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut out = String::from("# code-manager settings\n");
    for (key, value) in values {
        if let Some(def) = super::defaults::find(key) {
            out.push_str(&format!("# {}\n", def.description));
        }
        out.push_str(&format!("{key}={}\n", quote_value(value)));
    }
    std::fs::write(path, out).with_context(|| format!("failed to write config {}", path.display()))
}

/// Quote a value so dotenv parsing returns it verbatim.
fn quote_value(value: &str) -> String {
    if !value.contains('\'') {
        return format!("'{value}'");
    }
    let escaped = value
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('$', "\\$");
    format!("\"{escaped}\"")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_resolve_inside_data_dir() {
        let config = AppConfig::with_data_dir("/srv/codes");
        assert_eq!(config.database_path, PathBuf::from("/srv/codes/catalog.db"));
        assert_eq!(config.codes_dir, PathBuf::from("/srv/codes/codes_generated"));
        assert_eq!(config.backup_dir, PathBuf::from("/srv/codes"));
        assert_eq!(config.printer, None);
        assert_eq!(config.large_batch_threshold, 500);
        assert_eq!(config.caption_font, None);
    }

    #[test]
    fn load_creates_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load(dir.path()).unwrap();
        assert!(AppConfig::config_path(dir.path()).exists());
        assert_eq!(config.codes_dir, dir.path().join("codes_generated"));
    }

    #[test]
    fn set_value_persists_and_reloads() {
        let dir = tempfile::tempdir().unwrap();
        AppConfig::set_value(dir.path(), "PRINTER", "Label_Printer").unwrap();
        AppConfig::set_value(dir.path(), "CODES_DIR", "/var/labels").unwrap();

        let config = AppConfig::load(dir.path()).unwrap();
        assert_eq!(config.printer.as_deref(), Some("Label_Printer"));
        assert_eq!(config.codes_dir, PathBuf::from("/var/labels"));
    }

    #[test]
    fn save_writes_effective_values() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = AppConfig::with_data_dir(dir.path());
        config.large_batch_threshold = 50;
        config.save().unwrap();

        let reloaded = AppConfig::load(dir.path()).unwrap();
        assert_eq!(reloaded.large_batch_threshold, 50);
        assert_eq!(reloaded.codes_dir, config.codes_dir);
    }

    #[test]
    fn set_value_rejects_invalid_values() {
        let dir = tempfile::tempdir().unwrap();
        assert!(AppConfig::set_value(dir.path(), "LARGE_BATCH_THRESHOLD", "-1").is_err());
        assert!(AppConfig::set_value(dir.path(), "HOST", "localhost").is_err());
    }

    #[test]
    fn invalid_file_values_fall_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            AppConfig::config_path(dir.path()),
            "LARGE_BATCH_THRESHOLD=lots\nCAPTION_SIZE=20\n",
        )
        .unwrap();
        let config = AppConfig::load(dir.path()).unwrap();
        assert_eq!(config.large_batch_threshold, 500);
        assert_eq!(config.caption_size, 20.0);
    }

    #[test]
    fn quoted_values_survive_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quoted.env");
        let values = BTreeMap::from([
            ("CODES_DIR".to_string(), "it's $HOME \"labels\"".to_string()),
            ("DATABASE".to_string(), "my catalog.db".to_string()),
        ]);
        write_values(&path, &values).unwrap();
        assert_eq!(read_values(&path).unwrap(), values);
    }
}
