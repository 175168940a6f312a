//! Catalog backup and full reset.

use std::fs;
use std::io;
use std::path::PathBuf;

use catalog_db::{ClearedRows, RecordOrder};
use chrono::NaiveDateTime;
use code_engine::is_generated_file_name;

use crate::app::AppContext;
use crate::error::Result;

const BACKUP_PREFIX: &str = "code_manager_backup_";

/// `code_manager_backup_YYYYMMDD_HHMMSS.db`
pub fn backup_file_name(now: NaiveDateTime) -> String {
    format!("{BACKUP_PREFIX}{}.db", now.format("%Y%m%d_%H%M%S"))
}

/// Snapshot the catalog into the configured backup directory.
pub fn backup_catalog(ctx: &AppContext) -> Result<PathBuf> {
    let dir = &ctx.config().backup_dir;
    fs::create_dir_all(dir)?;

    let dest = dir.join(backup_file_name(chrono::Local::now().naive_local()));
    ctx.db().backup_to(&dest)?;
    tracing::info!(path = %dest.display(), "Catalog backed up");
    Ok(dest)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResetOutcome {
    pub rows: ClearedRows,
    pub files_removed: usize,
}

/// Remove every catalog row and every generated image.
///
/// Only files this tool writes are deleted: catalog image paths inside the
/// codes directory, `*_QR.png` / `*_BAR.png` and staging leftovers. Anything
/// else in the codes directory (a catalog database, config) is left alone.
pub fn reset_catalog(ctx: &AppContext) -> Result<ResetOutcome> {
    let codes_dir = &ctx.config().codes_dir;
    let tracked: Vec<PathBuf> = ctx
        .db()
        .list_created_codes(RecordOrder::default())?
        .into_iter()
        .map(|r| r.image_path)
        .filter(|p| p.parent() == Some(codes_dir.as_path()))
        .collect();

    let rows = ctx.db().clear_catalog()?;

    let mut files_removed = 0;
    let entries = match fs::read_dir(codes_dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            ctx.generator().ensure_output_dir()?;
            return Ok(ResetOutcome { rows, files_removed });
        }
        Err(e) => return Err(e.into()),
    };
    for entry in entries {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let path = entry.path();
        let generated = is_generated_file_name(&entry.file_name().to_string_lossy());
        if !generated && !tracked.contains(&path) {
            continue;
        }
        match fs::remove_file(&path) {
            Ok(()) => files_removed += 1,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
    }
    ctx.generator().ensure_output_dir()?;

    tracing::warn!(
        created = rows.created,
        scanned = rows.scanned,
        files_removed,
        "Catalog reset"
    );
    Ok(ResetOutcome {
        rows,
        files_removed,
    })
}
