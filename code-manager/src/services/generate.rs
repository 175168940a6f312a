//! Single code generation.

use catalog_db::{CatalogRecord, CatalogStore};
use code_engine::{CodeType, WifiAuth, format_wifi_payload};

use crate::app::AppContext;
use crate::error::{ManagerError, Result};
use crate::validation::{validate_code_data, validate_file_name};

/// Generate one code image and record it in the catalog.
///
/// Surrounding whitespace is trimmed from `data` and `file_name`.
///
/// An append failure after a successful write leaves the image on disk and
/// reports the store error.
pub fn generate_single(
    ctx: &AppContext,
    code_type: CodeType,
    data: &str,
    file_name: &str,
) -> Result<CatalogRecord> {
    let data = data.trim();
    validate_file_name(file_name)?;
    validate_code_data(code_type, data)?;
    let file_name = file_name.trim();

    let path = ctx.generator().generate(code_type, data, file_name)?;
    let id = ctx.db().append(code_type, data, &path)?;
    tracing::info!(id, code_type = %code_type, path = %path.display(), "Code generated");

    ctx.db()
        .get_created_code(id)?
        .ok_or_else(|| ManagerError::not_found(format!("created code {id}")))
}

/// Generate a Wi-Fi join QR code.
pub fn generate_wifi(
    ctx: &AppContext,
    ssid: &str,
    password: &str,
    auth: WifiAuth,
    file_name: &str,
) -> Result<CatalogRecord> {
    let ssid = ssid.trim();
    if ssid.is_empty() {
        return Err(ManagerError::Invalid(
            "Wi-Fi network name (SSID) cannot be empty".into(),
        ));
    }
    let payload = format_wifi_payload(ssid, password.trim(), auth);
    generate_single(ctx, CodeType::Qr, &payload, file_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use crate::services::test_support::test_context;

    #[test]
    fn generates_file_and_row() {
        let (_dir, ctx) = test_context();
        let record = generate_single(&ctx, CodeType::Qr, "hello world", "greeting").unwrap();

        assert_eq!(record.code_type, CodeType::Qr);
        assert_eq!(record.data, "hello world");
        assert_eq!(record.image_path, ctx.config().codes_dir.join("greeting_QR.png"));
        assert!(ctx
            .generator()
            .matches(&record.image_path, CodeType::Qr, "hello world")
            .unwrap());
    }

    #[test]
    fn barcode_with_unsupported_chars_is_rejected_before_writing() {
        let (_dir, ctx) = test_context();
        let err = generate_single(&ctx, CodeType::Bar, "under_score", "label").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        assert!(!ctx.config().codes_dir.join("label_BAR.png").exists());
        assert_eq!(ctx.db().count_created_codes().unwrap(), 0);
    }

    #[test]
    fn empty_file_name_is_rejected() {
        let (_dir, ctx) = test_context();
        let err = generate_single(&ctx, CodeType::Qr, "data", " ").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn long_data_is_stored_truncated_but_encoded_whole() {
        let (_dir, ctx) = test_context();
        let data = "X".repeat(400);
        let record = generate_single(&ctx, CodeType::Qr, &data, "long").unwrap();
        assert_eq!(record.data.len(), catalog_db::DATA_MAX_CHARS);
        assert!(ctx
            .generator()
            .matches(&record.image_path, CodeType::Qr, &data)
            .unwrap());
    }

    #[test]
    fn wifi_payload_is_encoded() {
        let (_dir, ctx) = test_context();
        let record = generate_wifi(&ctx, "office", "secret", WifiAuth::Wpa, "office-wifi").unwrap();
        assert_eq!(record.data, "WIFI:T:WPA;S:office;P:secret;;");
        assert!(record.image_path.ends_with("office-wifi_QR.png"));

        let err = generate_wifi(&ctx, "  ", "x", WifiAuth::Wpa, "none").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn surrounding_whitespace_is_trimmed() {
        let (_dir, ctx) = test_context();
        let record = generate_single(&ctx, CodeType::Bar, "  SKU-9 \n", " sku9 ").unwrap();
        assert_eq!(record.data, "SKU-9");
        assert_eq!(record.image_path, ctx.config().codes_dir.join("sku9_BAR.png"));
        assert!(ctx
            .generator()
            .matches(&record.image_path, CodeType::Bar, "SKU-9")
            .unwrap());
    }
}
