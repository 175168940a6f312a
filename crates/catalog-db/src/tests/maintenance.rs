use std::path::Path;

use code_engine::CodeType;

use super::test_db;
use crate::{CatalogStore, Database, DbError};

#[test]
fn test_backup_copies_rows() {
    let dir = tempfile::tempdir().unwrap();
    let db = test_db();
    db.append(CodeType::Qr, "ITEM-001", Path::new("ITEM-001_QR.png"))
        .unwrap();
    db.add_scanned_code("ITEM-001").unwrap();

    let dest = dir.path().join("backup.db");
    db.backup_to(&dest).unwrap();

    let restored = Database::open(&dest).unwrap();
    assert_eq!(restored.count_created_codes().unwrap(), 1);
    assert_eq!(restored.list_scanned_codes().unwrap().len(), 1);
}

#[test]
fn test_backup_refuses_existing_target() {
    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("backup.db");
    std::fs::write(&dest, b"occupied").unwrap();

    let err = test_db().backup_to(&dest).unwrap_err();
    assert!(matches!(err, DbError::InvalidData(_)));
}

#[test]
fn test_clear_catalog_restarts_ids() {
    let db = test_db();
    db.append(CodeType::Qr, "a", Path::new("a_QR.png")).unwrap();
    db.append(CodeType::Qr, "b", Path::new("b_QR.png")).unwrap();
    db.add_scanned_code("a").unwrap();

    let cleared = db.clear_catalog().unwrap();
    assert_eq!(cleared.created, 2);
    assert_eq!(cleared.scanned, 1);
    assert_eq!(db.count_created_codes().unwrap(), 0);

    let id = db.append(CodeType::Bar, "c", Path::new("c_BAR.png")).unwrap();
    assert_eq!(id, 1);
}
