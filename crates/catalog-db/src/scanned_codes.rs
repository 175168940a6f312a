//! Scanned code log (`scanned_codes` table).

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::{Database, DbError};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScannedCode {
    pub id: i64,
    pub data: String,
    pub date_scanned: NaiveDateTime,
}

impl Database {
    pub fn add_scanned_code(&self, data: &str) -> Result<i64, DbError> {
        let now = chrono::Local::now().naive_local();
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO scanned_codes (data, date_scanned) VALUES (?1, ?2)",
                rusqlite::params![data, now],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    pub fn list_scanned_codes(&self) -> Result<Vec<ScannedCode>, DbError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, data, date_scanned FROM scanned_codes ORDER BY date_scanned DESC, id DESC",
            )?;
            let rows = stmt.query_map([], |row| {
                Ok(ScannedCode {
                    id: row.get(0)?,
                    data: row.get(1)?,
                    date_scanned: row.get(2)?,
                })
            })?;
            rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
        })
    }

    pub fn delete_scanned_code(&self, id: i64) -> Result<(), DbError> {
        self.with_conn(|conn| {
            let changed = conn.execute("DELETE FROM scanned_codes WHERE id = ?1", [id])?;
            if changed == 0 {
                return Err(DbError::NotFound(format!("scanned code {id}")));
            }
            Ok(())
        })
    }
}
