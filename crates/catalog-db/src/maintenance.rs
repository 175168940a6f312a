//! Catalog backup and reset.

use std::path::Path;

use crate::{Database, DbError};

/// Row counts removed by [`Database::clear_catalog`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClearedRows {
    pub created: usize,
    pub scanned: usize,
}

impl Database {
    /// Write a consistent copy of the whole database to `dest`.
    ///
    /// `dest` must not exist yet.
    pub fn backup_to(&self, dest: &Path) -> Result<(), DbError> {
        if dest.exists() {
            return Err(DbError::InvalidData(format!(
                "backup target already exists: {}",
                dest.display()
            )));
        }
        self.with_conn(|conn| {
            conn.execute("VACUUM INTO ?1", [dest.to_string_lossy()])?;
            Ok(())
        })
    }

    /// Delete every row of both tables and restart id numbering.
    pub fn clear_catalog(&self) -> Result<ClearedRows, DbError> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            let created = tx.execute("DELETE FROM created_codes", [])?;
            let scanned = tx.execute("DELETE FROM scanned_codes", [])?;
            tx.execute(
                "DELETE FROM sqlite_sequence WHERE name IN ('created_codes', 'scanned_codes')",
                [],
            )?;
            tx.commit()?;
            tracing::info!(created, scanned, "Catalog cleared");
            Ok(ClearedRows { created, scanned })
        })
    }
}
