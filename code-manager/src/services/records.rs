//! Listing, lookup, delete, export and verification of catalog records.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use catalog_db::{CatalogRecord, RecordOrder};

use crate::app::AppContext;
use crate::error::{ManagerError, Result};

#[derive(Debug, Clone)]
pub struct DeleteOutcome {
    pub record: CatalogRecord,
    pub file_removed: bool,
}

pub fn list_codes(ctx: &AppContext, order: RecordOrder) -> Result<Vec<CatalogRecord>> {
    Ok(ctx.db().list_created_codes(order)?)
}

pub fn get_code(ctx: &AppContext, id: i64) -> Result<CatalogRecord> {
    ctx.db()
        .get_created_code(id)?
        .ok_or_else(|| ManagerError::not_found(format!("created code {id}")))
}

/// Delete a record, then remove its image if it is still on disk.
///
/// The row is gone even when removing the file fails; that failure is only logged.
pub fn delete_code(ctx: &AppContext, id: i64) -> Result<DeleteOutcome> {
    let record = ctx.db().delete_created_code(id)?;

    let file_removed = match fs::remove_file(&record.image_path) {
        Ok(()) => true,
        Err(e) if e.kind() == io::ErrorKind::NotFound => false,
        Err(e) => {
            tracing::warn!(id, path = %record.image_path.display(), "Failed to remove image: {e}");
            false
        }
    };

    tracing::info!(id, file_removed, "Code deleted");
    Ok(DeleteOutcome {
        record,
        file_removed,
    })
}

/// Copy a record's image to `dest`. A directory destination keeps the file name.
pub fn export_image(ctx: &AppContext, id: i64, dest: &Path) -> Result<PathBuf> {
    let record = get_code(ctx, id)?;
    let source = &record.image_path;
    if !source.is_file() {
        return Err(missing_image(source));
    }

    let dest = if dest.is_dir() {
        match source.file_name() {
            Some(name) => dest.join(name),
            None => return Err(missing_image(source)),
        }
    } else {
        dest.to_path_buf()
    };

    fs::copy(source, &dest)?;
    tracing::info!(id, dest = %dest.display(), "Image exported");
    Ok(dest)
}

/// Whether the record's image exists and renders exactly its stored data.
///
/// Data longer than the stored limit was truncated in the catalog, so such
/// records never verify.
pub fn verify_code(ctx: &AppContext, id: i64) -> Result<bool> {
    let record = get_code(ctx, id)?;
    if !record.image_path.is_file() {
        return Ok(false);
    }
    Ok(ctx
        .generator()
        .matches(&record.image_path, record.code_type, &record.data)?)
}

pub(crate) fn missing_image(path: &Path) -> ManagerError {
    ManagerError::Io(io::Error::new(
        io::ErrorKind::NotFound,
        format!("image file not found at {}", path.display()),
    ))
}
