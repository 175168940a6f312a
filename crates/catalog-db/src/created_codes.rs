//! Generated code records (`created_codes` table).

use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use code_engine::CodeType;
use rusqlite::types::Type;
use rusqlite::{OptionalExtension, Row};
use serde::{Deserialize, Serialize};

use crate::{Database, DbError};

/// Longest `data` value stored, in characters. Longer values are truncated.
pub const DATA_MAX_CHARS: usize = 250;

const SELECT_COLUMNS: &str = "SELECT id, type, data, image_path, date_created FROM created_codes";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CatalogRecord {
    pub id: i64,
    #[serde(rename = "type")]
    pub code_type: CodeType,
    pub data: String,
    pub image_path: PathBuf,
    pub date_created: NaiveDateTime,
}

/// Listing order for catalog records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecordOrder {
    /// Most recently created first.
    #[default]
    NewestFirst,
    /// Highest id first.
    IdDescending,
}

impl RecordOrder {
    fn sql(self) -> &'static str {
        match self {
            Self::NewestFirst => "ORDER BY date_created DESC, id DESC",
            Self::IdDescending => "ORDER BY id DESC",
        }
    }
}

/// Cut `data` down to [`DATA_MAX_CHARS`] characters.
pub fn truncate_data(data: &str) -> String {
    data.chars().take(DATA_MAX_CHARS).collect()
}

fn map_record(row: &Row<'_>) -> rusqlite::Result<CatalogRecord> {
    let type_text: String = row.get(1)?;
    let code_type = type_text
        .parse::<CodeType>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(1, Type::Text, Box::new(e)))?;

    Ok(CatalogRecord {
        id: row.get(0)?,
        code_type,
        data: row.get(2)?,
        image_path: PathBuf::from(row.get::<_, String>(3)?),
        date_created: row.get(4)?,
    })
}

impl Database {
    /// Insert a record for a freshly written image and return its id.
    pub fn insert_created_code(
        &self,
        code_type: CodeType,
        data: &str,
        image_path: &Path,
    ) -> Result<i64, DbError> {
        let now = chrono::Local::now().naive_local();
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO created_codes (type, data, image_path, date_created) VALUES (?1, ?2, ?3, ?4)",
                rusqlite::params![
                    code_type.as_str(),
                    truncate_data(data),
                    image_path.to_string_lossy(),
                    now,
                ],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    pub fn get_created_code(&self, id: i64) -> Result<Option<CatalogRecord>, DbError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!("{SELECT_COLUMNS} WHERE id = ?1"))?;
            let record = stmt.query_row([id], map_record).optional()?;
            Ok(record)
        })
    }

    pub fn list_created_codes(&self, order: RecordOrder) -> Result<Vec<CatalogRecord>, DbError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!("{SELECT_COLUMNS} {}", order.sql()))?;
            let rows = stmt.query_map([], map_record)?;
            rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
        })
    }

    pub fn count_created_codes(&self) -> Result<i64, DbError> {
        self.with_conn(|conn| {
            let count = conn.query_row("SELECT COUNT(*) FROM created_codes", [], |row| row.get(0))?;
            Ok(count)
        })
    }

    /// Point a record at new data and a new image path.
    ///
    /// Runs in its own transaction; a missing id rolls back and returns
    /// [`DbError::NotFound`].
    pub fn update_created_code(&self, id: i64, data: &str, image_path: &Path) -> Result<(), DbError> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            let changed = tx.execute(
                "UPDATE created_codes SET data = ?1, image_path = ?2 WHERE id = ?3",
                rusqlite::params![truncate_data(data), image_path.to_string_lossy(), id],
            )?;
            if changed == 0 {
                return Err(DbError::NotFound(format!("created code {id}")));
            }
            tx.commit()?;
            Ok(())
        })
    }

    /// Remove a record and return it, so the caller can clean up its image.
    pub fn delete_created_code(&self, id: i64) -> Result<CatalogRecord, DbError> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            let record = tx
                .query_row(&format!("{SELECT_COLUMNS} WHERE id = ?1"), [id], map_record)
                .optional()?
                .ok_or_else(|| DbError::NotFound(format!("created code {id}")))?;
            tx.execute("DELETE FROM created_codes WHERE id = ?1", [id])?;
            tx.commit()?;
            Ok(record)
        })
    }
}
