//! Edit a record's data and replace its image.
//!
//! Order of operations:
//! 1. render the new image into a synced temp file next to its final path;
//! 2. if a file already sits at the final path, copy it aside;
//! 3. rename the temp file into place;
//! 4. update the catalog row (own transaction);
//! 5. delete the previous image if it lived at a different path.
//!
//! A failure in 1-3 leaves the catalog and the old image untouched. A failure
//! in 4 puts the copied-aside file back (or removes the new one), so the row
//! never points at a missing or mismatched file. Step 5 is best-effort.

use std::fs;
use std::path::{Path, PathBuf};

use catalog_db::{CatalogRecord, Database};
use code_engine::{CodeGenerator, logical_name};

use crate::app::AppContext;
use crate::error::{ManagerError, Result};
use crate::validation::validate_code_data;

#[derive(Debug, Clone)]
pub struct RegenerateOutcome {
    pub record: CatalogRecord,
    pub previous_path: PathBuf,
    pub previous_file_removed: bool,
}

pub fn update_and_regenerate(ctx: &AppContext, id: i64, new_data: &str) -> Result<RegenerateOutcome> {
    let new_data = new_data.trim();
    let record = ctx
        .db()
        .get_created_code(id)?
        .ok_or_else(|| ManagerError::not_found(format!("created code {id}")))?;
    validate_code_data(record.code_type, new_data)?;

    let outcome = replace_image(ctx.generator(), ctx.db(), &record, new_data)?;
    tracing::info!(
        id,
        path = %outcome.record.image_path.display(),
        "Code regenerated and catalog updated"
    );
    Ok(outcome)
}

fn replace_image(
    generator: &CodeGenerator,
    db: &Database,
    record: &CatalogRecord,
    new_data: &str,
) -> Result<RegenerateOutcome> {
    let base = logical_name(&record.image_path);
    let staged = generator.stage(record.code_type, new_data, &base)?;
    let target = staged.target().to_path_buf();

    let backup = if target.exists() {
        let backup = sibling_with_suffix(&target, ".bak");
        fs::copy(&target, &backup)?;
        Some(backup)
    } else {
        None
    };

    let new_path = match staged.commit() {
        Ok(path) => path,
        Err(e) => {
            discard(backup.as_deref());
            return Err(e.into());
        }
    };

    if let Err(e) = db.update_created_code(record.id, new_data, &new_path) {
        restore(&new_path, backup.as_deref());
        return Err(e.into());
    }
    discard(backup.as_deref());

    let previous_file_removed = if !is_same_file(&record.image_path, &new_path)
        && record.image_path.exists()
    {
        match fs::remove_file(&record.image_path) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(
                    path = %record.image_path.display(),
                    "Failed to remove previous image: {e}"
                );
                false
            }
        }
    } else {
        false
    };

    let updated = db
        .get_created_code(record.id)?
        .ok_or_else(|| ManagerError::not_found(format!("created code {}", record.id)))?;

    Ok(RegenerateOutcome {
        record: updated,
        previous_path: record.image_path.clone(),
        previous_file_removed,
    })
}

fn sibling_with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{name}{suffix}"))
}

/// Undo a committed image after the catalog refused the update.
fn restore(new_path: &Path, backup: Option<&Path>) {
    let result = match backup {
        Some(backup) => fs::rename(backup, new_path),
        None => fs::remove_file(new_path),
    };
    if let Err(e) = result {
        tracing::error!(path = %new_path.display(), "Failed to restore image after catalog error: {e}");
    }
}

fn discard(backup: Option<&Path>) {
    if let Some(backup) = backup
        && let Err(e) = fs::remove_file(backup)
    {
        tracing::warn!(path = %backup.display(), "Failed to remove image backup: {e}");
    }
}

fn is_same_file(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
