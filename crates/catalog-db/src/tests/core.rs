use std::path::Path;

use code_engine::CodeType;

use super::test_db;
use crate::{CatalogStore, Database};

#[test]
fn test_open_and_migrate() {
    let db = test_db();
    assert_eq!(db.count_created_codes().unwrap(), 0);
    assert!(db.list_scanned_codes().unwrap().is_empty());
}

#[test]
fn test_setup_is_idempotent() {
    let db = test_db();
    db.append(CodeType::Qr, "ITEM-001", Path::new("codes/ITEM-001_QR.png"))
        .unwrap();
    db.setup().unwrap();
    db.setup().unwrap();
    assert_eq!(db.count_created_codes().unwrap(), 1);
}

#[test]
fn test_reopen_file_database_keeps_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.db");

    let id = {
        let db = Database::open(&path).unwrap();
        db.append(CodeType::Bar, "SKU-9", Path::new("codes/SKU-9_BAR.png"))
            .unwrap()
    };

    let db = Database::open(&path).unwrap();
    let record = db.get_created_code(id).unwrap().unwrap();
    assert_eq!(record.data, "SKU-9");
    assert_eq!(record.code_type, CodeType::Bar);
}

#[test]
fn test_unknown_type_text_is_rejected_by_schema() {
    let db = test_db();
    let result = db.with_conn(|conn| {
        conn.execute(
            "INSERT INTO created_codes (type, data, image_path, date_created)
             VALUES ('EAN', 'x', 'x.png', CURRENT_TIMESTAMP)",
            [],
        )?;
        Ok(())
    });
    assert!(result.is_err());
}
