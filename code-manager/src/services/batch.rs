//! Batch generation over a numeric sequence.
//!
//! Every number in `[start, end]` becomes one item: data
//! `prefix + padded + suffix`, image `{prefix + padded}_{QR|BAR}.png`. Items
//! run strictly in ascending order, one at a time; a failing item is recorded
//! and the batch moves on.
//!
//! An item only counts as generated once both its image and its catalog row
//! exist, so `generated + errors.len() == total` always holds. A row append
//! that fails after the image was written is an item error; the image stays
//! on disk.
//!
//! Batches assume a single writer. The suffix is not part of the file name,
//! so two batches that differ only in suffix overwrite each other's images.

use catalog_db::CatalogStore;
use code_engine::{CodeType, Generate, is_code128_safe};
use serde::{Deserialize, Serialize};

use crate::app::AppContext;
use crate::error::{ManagerError, Result};
use crate::validation::validate_file_name;

/// How many item errors are shown to the operator after a batch.
pub const ERROR_PREVIEW_LIMIT: usize = 5;

/// Widest accepted zero padding. Wider numbers cannot fit a file name.
pub const MAX_PAD_LENGTH: usize = 200;

/// A numeric-sequence generation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSpec {
    pub code_type: CodeType,
    pub prefix: String,
    pub suffix: String,
    pub start: u64,
    pub end: u64,
    pub pad_length: usize,
}

/// One element of a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchItem {
    pub number: u64,
    pub data: String,
    pub file_base: String,
}

impl BatchSpec {
    /// Build a spec, trimming surrounding whitespace from prefix and suffix.
    pub fn new(
        code_type: CodeType,
        prefix: &str,
        suffix: &str,
        start: u64,
        end: u64,
        pad_length: usize,
    ) -> Self {
        Self {
            code_type,
            prefix: prefix.trim().to_string(),
            suffix: suffix.trim().to_string(),
            start,
            end,
            pad_length,
        }
    }

    /// Number of items in the sequence (0 when `end < start`).
    pub fn total(&self) -> u64 {
        if self.end < self.start {
            0
        } else {
            self.end - self.start + 1
        }
    }

    /// Whether the batch should be confirmed before running.
    pub fn is_large(&self, threshold: u64) -> bool {
        self.total() > threshold
    }

    pub fn validate(&self) -> Result<()> {
        if self.start == 0 || self.end == 0 || self.pad_length == 0 {
            return Err(ManagerError::Invalid(
                "start, end and padding must all be greater than zero".into(),
            ));
        }
        if self.pad_length > MAX_PAD_LENGTH {
            return Err(ManagerError::Invalid(format!(
                "padding ({}) must be at most {MAX_PAD_LENGTH}",
                self.pad_length
            )));
        }
        if self.end < self.start {
            return Err(ManagerError::Invalid(format!(
                "end ({}) must be greater than or equal to start ({})",
                self.end, self.start
            )));
        }
        validate_file_name(&format!("{}0", self.prefix))?;
        if self.code_type == CodeType::Bar
            && !is_code128_safe(&format!("{}0{}", self.prefix, self.suffix))
        {
            return Err(ManagerError::Invalid(format!(
                "barcode prefix {:?} / suffix {:?} may only contain letters, digits and ' -$./+%'",
                self.prefix, self.suffix
            )));
        }
        Ok(())
    }

    /// Items in ascending order.
    pub fn items(&self) -> impl Iterator<Item = BatchItem> + '_ {
        (self.start..=self.end).map(move |number| {
            let padded = zero_pad(number, self.pad_length);
            BatchItem {
                number,
                data: format!("{}{padded}{}", self.prefix, self.suffix),
                file_base: format!("{}{padded}", self.prefix),
            }
        })
    }
}

/// Left-pad `n` with zeros to at least `width` digits. Never truncates.
pub fn zero_pad(n: u64, width: usize) -> String {
    let digits = n.to_string();
    let mut padded = "0".repeat(width.saturating_sub(digits.len()));
    padded.push_str(&digits);
    padded
}

/// Failure of a single batch item.
#[derive(Debug, thiserror::Error)]
#[error("Failed to generate code for data: {data} ({source})")]
pub struct BatchItemError {
    pub data: String,
    #[source]
    pub source: ManagerError,
}

/// Outcome of a batch run.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub total: u64,
    pub generated: u64,
    pub errors: Vec<BatchItemError>,
}

impl BatchReport {
    pub fn failed(&self) -> u64 {
        self.errors.len() as u64
    }

    pub fn is_complete(&self) -> bool {
        self.errors.is_empty()
    }

    /// The first `limit` error messages, in item order.
    pub fn error_preview(&self, limit: usize) -> Vec<String> {
        self.errors.iter().take(limit).map(|e| e.to_string()).collect()
    }
}

/// Run `spec` against any generator and store.
///
/// Nothing is validated here; use [`run_batch_in`] for checked runs.
pub fn run_batch<G, S>(generator: &G, store: &S, spec: &BatchSpec) -> BatchReport
where
    G: Generate + ?Sized,
    S: CatalogStore + ?Sized,
{
    let mut report = BatchReport {
        total: spec.total(),
        ..BatchReport::default()
    };

    for item in spec.items() {
        let result = generator
            .generate(spec.code_type, &item.data, &item.file_base)
            .map_err(ManagerError::from)
            .and_then(|path| {
                store
                    .append(spec.code_type, &item.data, &path)
                    .map_err(ManagerError::from)
            });

        match result {
            Ok(id) => {
                report.generated += 1;
                tracing::debug!(id, number = item.number, data = %item.data, "Batch item generated");
            }
            Err(source) => {
                tracing::warn!(number = item.number, data = %item.data, "Batch item failed: {source}");
                report.errors.push(BatchItemError {
                    data: item.data,
                    source,
                });
            }
        }
    }

    debug_assert_eq!(report.generated + report.failed(), report.total);
    tracing::info!(
        code_type = %spec.code_type,
        total = report.total,
        generated = report.generated,
        failed = report.failed(),
        "Batch finished"
    );
    report
}

/// Validate `spec` and run it against the session's generator and catalog.
pub fn run_batch_in(ctx: &AppContext, spec: &BatchSpec) -> Result<BatchReport> {
    spec.validate()?;
    Ok(run_batch(ctx.generator(), ctx.db(), spec))
}
