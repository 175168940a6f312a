//! Request validation done before any file or catalog work.

use code_engine::{CodeType, is_code128_safe};

use crate::error::{ManagerError, Result};

/// File names become `{name}_QR.png` inside the codes directory, so they
/// must not escape it.
pub fn validate_file_name(name: &str) -> Result<()> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ManagerError::Invalid("file name cannot be empty".into()));
    }
    if trimmed == "." || trimmed == ".." {
        return Err(ManagerError::Invalid(format!("file name {trimmed:?} is reserved")));
    }
    if trimmed.contains(['/', '\\', '\0']) {
        return Err(ManagerError::Invalid(format!(
            "file name {trimmed:?} must not contain path separators"
        )));
    }
    Ok(())
}

/// Data must be non-empty; barcode data must fit the printable Code128 set.
pub fn validate_code_data(code_type: CodeType, data: &str) -> Result<()> {
    if data.trim().is_empty() {
        return Err(ManagerError::Invalid("data cannot be empty".into()));
    }
    if code_type == CodeType::Bar && !is_code128_safe(data) {
        return Err(ManagerError::Invalid(format!(
            "barcode data {data:?} may only contain letters, digits and ' -$./+%'"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    #[test]
    fn file_names() {
        assert!(validate_file_name("ITEM-001").is_ok());
        assert!(validate_file_name("  ").is_err());
        assert!(validate_file_name("..").is_err());
        assert!(validate_file_name("a/b").is_err());
        assert!(validate_file_name("a\\b").is_err());
    }

    #[test]
    fn barcode_data_is_checked() {
        assert!(validate_code_data(CodeType::Bar, "ITEM-001").is_ok());
        let err = validate_code_data(CodeType::Bar, "ITEM_001").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        // QR accepts anything non-empty.
        assert!(validate_code_data(CodeType::Qr, "ITEM_001 ✓").is_ok());
        assert!(validate_code_data(CodeType::Qr, "").is_err());
    }
}
