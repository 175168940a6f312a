//! Catalog operations.

pub mod backup;
pub mod batch;
pub mod generate;
pub mod printer;
pub mod records;
pub mod regenerate;
