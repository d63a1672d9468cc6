//! # AI Gateway Error Types
//!
//! Errors for the Gemini gateway. Streaming operations surface mid-stream
//! failures as an `Err` item in the stream itself; everything before the
//! failure stands.

use thiserror::Error;

/// Gemini gateway errors.
#[derive(Debug, Error)]
pub enum AiError {
    /// No API key configured. Fatal for the AI surface, harmless for the
    /// rest of the app.
    #[error("GEMINI_API_KEY environment variable is not set")]
    MissingApiKey,

    /// Transport-level failure (connect, TLS, timeout, mid-stream drop).
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The response body didn't have the expected shape.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// The model produced no usable suggestion text.
    #[error("model returned an empty response")]
    EmptyResponse,

    /// Icon generation returned no inline image part.
    #[error("no image data found in the response")]
    NoImageData,

    /// Model output claimed to be JSON but wasn't.
    #[error("failed to parse model output: {0}")]
    Json(#[from] serde_json::Error),
}

impl AiError {
    pub fn invalid(message: impl Into<String>) -> Self {
        AiError::InvalidResponse(message.into())
    }
}

/// Result type for AI gateway operations.
pub type AiResult<T> = Result<T, AiError>;
