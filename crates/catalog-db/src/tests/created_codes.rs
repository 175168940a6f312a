use std::path::{Path, PathBuf};

use code_engine::CodeType;

use super::test_db;
use crate::{CatalogStore, DATA_MAX_CHARS, DbError, RecordOrder};

#[test]
fn test_insert_and_get() {
    let db = test_db();
    let id = db
        .insert_created_code(CodeType::Qr, "ITEM-001", Path::new("codes/ITEM-001_QR.png"))
        .unwrap();

    let record = db.get_created_code(id).unwrap().unwrap();
    assert_eq!(record.id, id);
    assert_eq!(record.code_type, CodeType::Qr);
    assert_eq!(record.data, "ITEM-001");
    assert_eq!(record.image_path, PathBuf::from("codes/ITEM-001_QR.png"));

    assert!(db.get_created_code(id + 1).unwrap().is_none());
}

#[test]
fn test_long_data_is_truncated() {
    let db = test_db();
    let data = "A".repeat(DATA_MAX_CHARS + 50);
    let id = db.append(CodeType::Qr, &data, Path::new("long_QR.png")).unwrap();

    let record = db.get_created_code(id).unwrap().unwrap();
    assert_eq!(record.data.len(), DATA_MAX_CHARS);
    assert!(data.starts_with(&record.data));
}

#[test]
fn test_list_orders() {
    let db = test_db();
    let a = db.append(CodeType::Qr, "a", Path::new("a_QR.png")).unwrap();
    let b = db.append(CodeType::Bar, "b", Path::new("b_BAR.png")).unwrap();
    let c = db.append(CodeType::Qr, "c", Path::new("c_QR.png")).unwrap();

    let by_id: Vec<i64> = db
        .list_created_codes(RecordOrder::IdDescending)
        .unwrap()
        .iter()
        .map(|r| r.id)
        .collect();
    assert_eq!(by_id, vec![c, b, a]);

    let newest: Vec<i64> = db
        .list_created_codes(RecordOrder::NewestFirst)
        .unwrap()
        .iter()
        .map(|r| r.id)
        .collect();
    assert_eq!(newest, vec![c, b, a]);
    assert_eq!(db.count_created_codes().unwrap(), 3);
}

#[test]
fn test_update() {
    let db = test_db();
    let id = db.append(CodeType::Qr, "old", Path::new("label_QR.png")).unwrap();

    db.update_created_code(id, "new", Path::new("other_QR.png"))
        .unwrap();

    let record = db.get_created_code(id).unwrap().unwrap();
    assert_eq!(record.data, "new");
    assert_eq!(record.image_path, PathBuf::from("other_QR.png"));
}

#[test]
fn test_update_missing_row_is_not_found() {
    let db = test_db();
    let err = db
        .update_created_code(42, "new", Path::new("x_QR.png"))
        .unwrap_err();
    assert!(matches!(err, DbError::NotFound(_)));
}

#[test]
fn test_delete_returns_record() {
    let db = test_db();
    let keep = db.append(CodeType::Qr, "keep", Path::new("keep_QR.png")).unwrap();
    let gone = db.append(CodeType::Bar, "gone", Path::new("gone_BAR.png")).unwrap();

    let removed = db.delete_created_code(gone).unwrap();
    assert_eq!(removed.data, "gone");
    assert_eq!(removed.image_path, PathBuf::from("gone_BAR.png"));

    let remaining = db.list_created_codes(RecordOrder::default()).unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, keep);

    assert!(matches!(
        db.delete_created_code(gone),
        Err(DbError::NotFound(_))
    ));
}
