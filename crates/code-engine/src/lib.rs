//! Code image generation for the catalog.
//!
//! Rasterizes QR symbols and Code128 barcodes into grayscale PNG files,
//! with staged writes so an existing image is only replaced once the new
//! one has been encoded and flushed to disk.

pub mod barcode;
pub mod caption;
pub mod naming;
pub mod payload;
pub mod qr;
pub mod writer;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// Re-exports for convenience
pub use barcode::{is_code128_safe, render_code128};
pub use caption::CaptionFont;
pub use naming::{image_file_name, is_generated_file_name, logical_name};
pub use payload::{WifiAuth, format_wifi_payload};
pub use qr::render_qr;
pub use writer::{CodeGenerator, Generate, StagedImage};

/// Symbology of a generated code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CodeType {
    #[serde(rename = "QR")]
    Qr,
    #[serde(rename = "BAR")]
    Bar,
}

impl CodeType {
    /// Canonical text stored in the catalog.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Qr => "QR",
            Self::Bar => "BAR",
        }
    }

    /// Suffix appended to the logical name when building the file name.
    pub fn file_suffix(self) -> &'static str {
        match self {
            Self::Qr => "_QR",
            Self::Bar => "_BAR",
        }
    }
}

impl fmt::Display for CodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown code type: {0:?} (expected QR or BAR)")]
pub struct ParseCodeTypeError(pub String);

impl FromStr for CodeType {
    type Err = ParseCodeTypeError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "QR" => Ok(Self::Qr),
            "BAR" | "BARCODE" | "CODE128" => Ok(Self::Bar),
            _ => Err(ParseCodeTypeError(s.to_string())),
        }
    }
}

/// Errors that can occur while encoding or writing a code image.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("Encode error: {0}")]
    Encode(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Caption font error: {0}")]
    Font(String),
}

impl From<image::ImageError> for EngineError {
    fn from(err: image::ImageError) -> Self {
        match err {
            image::ImageError::IoError(e) => Self::Io(e),
            other => Self::Encode(format!("PNG encode error: {other}")),
        }
    }
}

/// Result type alias for code-engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;
