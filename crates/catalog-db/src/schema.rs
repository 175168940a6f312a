//! Database schema definitions.

use rusqlite::Connection;

use crate::DbError;

pub fn run_migrations(conn: &Connection) -> Result<(), DbError> {
    conn.execute_batch(SCHEMA)?;
    Ok(())
}

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS created_codes (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    type TEXT NOT NULL CHECK (type IN ('QR', 'BAR')),
    data TEXT NOT NULL,
    image_path TEXT NOT NULL,
    date_created TIMESTAMP NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_created_codes_date_created ON created_codes(date_created);

CREATE TABLE IF NOT EXISTS scanned_codes (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    data TEXT NOT NULL,
    date_scanned TIMESTAMP NOT NULL
);
"#;
