//! FILENAME: core/persistence/src/error.rs
//! Errors from loading the solution list and writing exports.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The export workbook could not be built or saved.
    #[error("Failed to write workbook: {0}")]
    XlsxWrite(#[from] rust_xlsxwriter::XlsxError),

    /// The source workbook is unreadable (missing, corrupt, not XLSX).
    #[error("Failed to read workbook: {0}")]
    XlsxRead(#[from] calamine::XlsxError),

    #[error("Failed to write CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid file format: {0}")]
    InvalidFormat(String),

    /// A configured worksheet name that the workbook does not contain.
    #[error("Worksheet not found: {0}")]
    SheetNotFound(String),
}
