//! # Application Error Types
//!
//! The top of the error taxonomy: everything lower-level errors converge
//! into before the host surfaces them. Variants map one-to-one onto the
//! notification the user sees; none of them is retried automatically.

use thiserror::Error;

use formulary_ai::AiError;
use formulary_core::{CsvError, ValidationError};
use formulary_db::DbError;

use crate::auth::AuthError;

/// Application-level errors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Db(#[from] DbError),

    #[error(transparent)]
    Ai(#[from] AiError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Csv(#[from] CsvError),

    /// A backup file that isn't a valid snapshot. Nothing was restored.
    #[error("invalid backup file: {0}")]
    InvalidBackup(String),

    /// A structurally identical prescription is already stored.
    #[error("this prescription is already saved")]
    AlreadySaved,
}

/// Result type for application operations.
pub type AppResult<T> = Result<T, AppError>;
