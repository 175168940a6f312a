//! All setting definitions with their default values.

/// A single setting definition.
#[derive(Debug, Clone, Copy)]
pub struct SettingDef {
    pub key: &'static str,
    pub default: &'static str,
    pub description: &'static str,
}

pub const DEFAULT_SETTINGS: &[SettingDef] = &[
    SettingDef {
        key: "DATABASE",
        default: "catalog.db",
        description: "SQLite catalog file (relative paths live in the data directory)",
    },
    SettingDef {
        key: "CODES_DIR",
        default: "codes_generated",
        description: "Directory receiving generated PNG images",
    },
    SettingDef {
        key: "BACKUP_DIR",
        default: "",
        description: "Directory for catalog backups (empty = data directory)",
    },
    SettingDef {
        key: "PRINTER",
        default: "",
        description: "Printer used by `print` (empty = system default)",
    },
    SettingDef {
        key: "LARGE_BATCH_THRESHOLD",
        default: "500",
        description: "Batches larger than this need explicit confirmation",
    },
    SettingDef {
        key: "CAPTION_FONT",
        default: "",
        description: "TTF/OTF font for the text under barcodes (empty = no caption)",
    },
    SettingDef {
        key: "CAPTION_SIZE",
        default: "32",
        description: "Caption font size in pixels",
    },
];

pub fn find(key: &str) -> Option<&'static SettingDef> {
    DEFAULT_SETTINGS.iter().find(|d| d.key == key)
}

/// Get the default value for a setting key, or `None` if not defined.
pub fn get_default(key: &str) -> Option<&'static str> {
    find(key).map(|d| d.default)
}
