//! # AI Gateway Configuration
//!
//! The key comes from `GEMINI_API_KEY`; a missing key fails construction,
//! not the first request. The base URL exists so tests can point the client
//! at a local mock server.

use std::env;

use crate::error::{AiError, AiResult};

/// Default API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Model used for text work: suggestions and prescription reading.
pub const TEXT_MODEL: &str = "gemini-2.5-flash";

/// Model used for icon image generation.
pub const IMAGE_MODEL: &str = "gemini-2.5-flash-image";

/// Gemini gateway configuration.
#[derive(Debug, Clone)]
pub struct AiConfig {
    /// API key sent as a query parameter.
    pub api_key: String,

    /// Endpoint root, without a trailing slash.
    pub base_url: String,

    /// Model for suggestion and prescription requests.
    pub text_model: String,

    /// Model for icon generation.
    pub image_model: String,
}

impl AiConfig {
    /// Creates a configuration with an explicit key and default endpoint.
    pub fn new(api_key: impl Into<String>) -> Self {
        AiConfig {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            text_model: TEXT_MODEL.to_string(),
            image_model: IMAGE_MODEL.to_string(),
        }
    }

    /// Reads the key from `GEMINI_API_KEY`.
    pub fn from_env() -> AiResult<Self> {
        let api_key = env::var("GEMINI_API_KEY").map_err(|_| AiError::MissingApiKey)?;
        Ok(AiConfig::new(api_key))
    }

    /// Overrides the endpoint root (tests point this at a mock server).
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        let mut url: String = base_url.into();
        while url.ends_with('/') {
            url.pop();
        }
        self.base_url = url;
        self
    }

    /// Overrides the text model.
    pub fn text_model(mut self, model: impl Into<String>) -> Self {
        self.text_model = model.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_strips_trailing_slash() {
        let config = AiConfig::new("key").base_url("http://localhost:9090/");
        assert_eq!(config.base_url, "http://localhost:9090");
    }

    #[test]
    fn defaults() {
        let config = AiConfig::new("key");
        assert_eq!(config.text_model, "gemini-2.5-flash");
        assert_eq!(config.image_model, "gemini-2.5-flash-image");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }
}
