//! Image file naming: `{base}_QR.png` / `{base}_BAR.png`.

use std::path::Path;

use crate::CodeType;

pub const IMAGE_EXTENSION: &str = "png";

/// File name for a code image built from its logical name.
pub fn image_file_name(base: &str, code_type: CodeType) -> String {
    format!("{base}{}.{IMAGE_EXTENSION}", code_type.file_suffix())
}

/// Recover the logical name from an image path.
///
/// Strips the extension and a trailing `_QR` or `_BAR`. A stem without
/// either suffix is returned whole.
pub fn logical_name(path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    [CodeType::Qr, CodeType::Bar]
        .iter()
        .find_map(|t| stem.strip_suffix(t.file_suffix()))
        .map(str::to_string)
        .unwrap_or(stem)
}

/// Whether `name` is a code image or a staging leftover this crate writes:
/// `*_QR.png`, `*_BAR.png`, `.*.tmp` or `.*.bak`.
pub fn is_generated_file_name(name: &str) -> bool {
    let is_image = [CodeType::Qr, CodeType::Bar].iter().any(|t| {
        name.strip_suffix(&format!(".{IMAGE_EXTENSION}"))
            .is_some_and(|stem| stem.ends_with(t.file_suffix()))
    });
    let is_staging = name.starts_with('.') && (name.ends_with(".tmp") || name.ends_with(".bak"));
    is_image || is_staging
}
