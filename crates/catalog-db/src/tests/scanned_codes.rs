use super::test_db;
use crate::DbError;

#[test]
fn test_scanned_codes() {
    let db = test_db();
    let first = db.add_scanned_code("ITEM-001").unwrap();
    let second = db.add_scanned_code("WIFI:T:WPA;S:office;P:x;;").unwrap();

    let scans = db.list_scanned_codes().unwrap();
    assert_eq!(scans.len(), 2);
    assert_eq!(scans[0].id, second);
    assert_eq!(scans[1].data, "ITEM-001");

    db.delete_scanned_code(first).unwrap();
    assert_eq!(db.list_scanned_codes().unwrap().len(), 1);
    assert!(matches!(
        db.delete_scanned_code(first),
        Err(DbError::NotFound(_))
    ));
}
