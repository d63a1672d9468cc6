//! # Error Types
//!
//! Domain-level error types for formulary-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  formulary-core errors (this file)                                     │
//! │  ├── ValidationError  - Input validation failures                      │
//! │  └── CsvError         - Product CSV decode failures                    │
//! │                                                                         │
//! │  formulary-db                                                          │
//! │  └── DbError          - Storage operation failures                     │
//! │                                                                         │
//! │  formulary-ai                                                          │
//! │  └── AiError          - Remote model failures                          │
//! │                                                                         │
//! │  formulary-app                                                         │
//! │  ├── AuthError        - Account failures                               │
//! │  └── AppError         - What the host surfaces to the user             │
//! │                                                                         │
//! │  Flow: ValidationError → AppError → user-facing message                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

/// Input validation errors.
///
/// These are caught before anything touches persistence and are surfaced
/// inline next to the offending field.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// A field exceeds its maximum length.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// A field has an invalid format.
    #[error("{field} is invalid: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// A product with the same case-insensitive name already exists.
    #[error("a product named '{name}' already exists")]
    DuplicateProductName { name: String },
}

impl ValidationError {
    pub fn required(field: impl Into<String>) -> Self {
        ValidationError::Required {
            field: field.into(),
        }
    }
}

/// Product CSV decode failures.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CsvError {
    /// The file has no header row.
    #[error("CSV file is empty")]
    Empty,

    /// The header row lacks the required `name` column.
    #[error("CSV header is missing the required 'name' column")]
    MissingNameColumn,

    /// A quoted field was never closed.
    #[error("unterminated quoted field on line {line}")]
    UnterminatedQuote { line: usize },
}
