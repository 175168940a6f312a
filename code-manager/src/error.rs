//! Error type shared by all catalog operations.

use catalog_db::DbError;
use code_engine::EngineError;

/// Coarse failure category callers can branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The data could not be encoded or rendered.
    EncodeError,
    /// The catalog database rejected or failed the operation.
    StoreError,
    /// A file could not be read, written, moved or removed.
    IoError,
    /// The request itself was rejected before doing any work.
    InvalidInput,
}

#[derive(Debug, thiserror::Error)]
pub enum ManagerError {
    #[error("{0}")]
    Encode(String),

    #[error("Catalog error: {0}")]
    Store(#[from] DbError),

    #[error("File error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid input: {0}")]
    Invalid(String),
}

impl ManagerError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Encode(_) => ErrorKind::EncodeError,
            Self::Store(_) => ErrorKind::StoreError,
            Self::Io(_) => ErrorKind::IoError,
            Self::Invalid(_) => ErrorKind::InvalidInput,
        }
    }

    pub(crate) fn not_found(what: String) -> Self {
        Self::Store(DbError::NotFound(what))
    }
}

impl From<EngineError> for ManagerError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::Encode(msg) => Self::Encode(msg),
            EngineError::Io(e) => Self::Io(e),
            EngineError::Font(msg) => Self::Invalid(format!("caption font: {msg}")),
        }
    }
}

/// Result type alias for catalog operations.
pub type Result<T> = std::result::Result<T, ManagerError>;
