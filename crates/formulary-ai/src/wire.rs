//! # Gemini Wire Format
//!
//! Request and response bodies for the `generateContent` family of
//! endpoints, plus the SSE framing the streaming endpoint uses.
//!
//! ## Endpoints
//! ```text
//! POST {base}/v1beta/models/{model}:streamGenerateContent?alt=sse&key=...
//!      → text/event-stream, one "data: {json}" line per chunk
//! POST {base}/v1beta/models/{model}:generateContent?key=...
//!      → single JSON body
//! ```
//!
//! `alt=sse` is deliberate: the default streaming format is one large JSON
//! array that only frames cleanly once complete, while SSE gives one
//! self-contained JSON object per `data:` line.

use serde::{Deserialize, Serialize};

use formulary_core::GroundingSource;

// =============================================================================
// Request Types
// =============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<Tool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<InlineData>,
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Part {
            text: Some(text.into()),
            inline_data: None,
        }
    }

    pub fn inline_data(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        Part {
            text: None,
            inline_data: Some(InlineData {
                mime_type: mime_type.into(),
                data: data.into(),
            }),
        }
    }
}

/// Base64 payload with its MIME type, both directions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    pub mime_type: String,
    pub data: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tool {
    pub google_search: serde_json::Value,
}

impl Tool {
    /// The Google Search grounding tool (an empty object on the wire).
    pub fn google_search() -> Self {
        Tool {
            google_search: serde_json::json!({}),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_modalities: Option<Vec<String>>,
}

impl GenerateContentRequest {
    /// A plain single-prompt request.
    pub fn text(prompt: impl Into<String>) -> Self {
        GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part::text(prompt)],
            }],
            tools: None,
            generation_config: None,
        }
    }

    /// Enables the Google Search grounding tool.
    pub fn with_search(mut self) -> Self {
        self.tools = Some(vec![Tool::google_search()]);
        self
    }

    /// Requests an image response.
    pub fn with_image_response(mut self) -> Self {
        self.generation_config = Some(GenerationConfig {
            response_modalities: Some(vec!["IMAGE".to_string()]),
        });
        self
    }

    /// A request pairing an inline image with an instruction.
    pub fn image_with_text(
        mime_type: impl Into<String>,
        base64_data: impl Into<String>,
        prompt: impl Into<String>,
    ) -> Self {
        GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part::inline_data(mime_type, base64_data), Part::text(prompt)],
            }],
            tools: None,
            generation_config: None,
        }
    }
}

// =============================================================================
// Response Types
// =============================================================================

#[derive(Debug, Clone, Deserialize, Default)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
    #[serde(default)]
    pub grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroundingMetadata {
    #[serde(default)]
    pub grounding_chunks: Vec<GroundingChunk>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GroundingChunk {
    #[serde(default)]
    pub web: Option<WebSource>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebSource {
    #[serde(default)]
    pub uri: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub snippet: Option<String>,
}

/// Error envelope the API returns on non-2xx statuses.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorDetail {
    pub message: String,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate's parts.
    pub fn text(&self) -> String {
        let mut out = String::new();
        if let Some(candidate) = self.candidates.first() {
            if let Some(content) = &candidate.content {
                for part in &content.parts {
                    if let Some(text) = &part.text {
                        out.push_str(text);
                    }
                }
            }
        }
        out
    }

    /// The first inline image payload, if any.
    pub fn inline_image(&self) -> Option<&InlineData> {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .and_then(|content| content.parts.iter().find_map(|p| p.inline_data.as_ref()))
    }

    /// Grounding sources with both a URI and a title; chunks missing either
    /// are dropped.
    pub fn grounding_sources(&self) -> Vec<GroundingSource> {
        self.candidates
            .first()
            .and_then(|c| c.grounding_metadata.as_ref())
            .map(|metadata| {
                metadata
                    .grounding_chunks
                    .iter()
                    .filter_map(|chunk| {
                        let web = chunk.web.as_ref()?;
                        Some(GroundingSource {
                            uri: web.uri.clone()?,
                            title: web.title.clone()?,
                            snippet: web.snippet.clone(),
                        })
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Extracts the API's error message from an error body, falling back to the
/// raw text when the body isn't the documented envelope.
pub fn api_error_message(body: &str) -> String {
    match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(parsed) => parsed.error.message,
        Err(_) => body.trim().to_string(),
    }
}

// =============================================================================
// SSE Framing
// =============================================================================

/// Extracts the JSON payload from one SSE line, if it carries one.
/// Comment lines, empty keep-alives and event names are skipped.
pub fn sse_data(line: &str) -> Option<&str> {
    let line = line.trim_end_matches('\r');
    let payload = line.strip_prefix("data:")?.trim_start();
    if payload.is_empty() {
        None
    } else {
        Some(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_request_serializes_minimal() {
        let request = GenerateContentRequest::text("hello");
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["contents"][0]["parts"][0]["text"], "hello");
        assert!(value.get("tools").is_none());
        assert!(value.get("generationConfig").is_none());
    }

    #[test]
    fn search_tool_is_an_empty_object() {
        let request = GenerateContentRequest::text("hello").with_search();
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["tools"][0]["googleSearch"], serde_json::json!({}));
    }

    #[test]
    fn image_response_modality() {
        let request = GenerateContentRequest::text("icon").with_image_response();
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["generationConfig"]["responseModalities"][0], "IMAGE");
    }

    #[test]
    fn image_with_text_orders_parts() {
        let request = GenerateContentRequest::image_with_text("image/png", "QUFB", "read this");
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["contents"][0]["parts"][0]["inlineData"]["mimeType"], "image/png");
        assert_eq!(value["contents"][0]["parts"][1]["text"], "read this");
    }

    #[test]
    fn response_text_concatenates_parts() {
        let raw = r#"{"candidates":[{"content":{"parts":[{"text":"Hello "},{"text":"world"}]}}]}"#;
        let response: GenerateContentResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(response.text(), "Hello world");
    }

    #[test]
    fn grounding_sources_require_uri_and_title() {
        let raw = r#"{"candidates":[{"content":{"parts":[]},"groundingMetadata":{"groundingChunks":[
            {"web":{"uri":"https://a.example","title":"A","snippet":"sa"}},
            {"web":{"uri":"https://b.example"}},
            {"web":null}
        ]}}]}"#;
        let response: GenerateContentResponse = serde_json::from_str(raw).unwrap();

        let sources = response.grounding_sources();
        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].uri, "https://a.example");
        assert_eq!(sources[0].snippet.as_deref(), Some("sa"));
    }

    #[test]
    fn sse_data_lines() {
        assert_eq!(sse_data("data: {\"a\":1}"), Some("{\"a\":1}"));
        assert_eq!(sse_data("data:{\"a\":1}\r"), Some("{\"a\":1}"));
        assert_eq!(sse_data("data: "), None);
        assert_eq!(sse_data(": keep-alive"), None);
        assert_eq!(sse_data("event: message"), None);
        assert_eq!(sse_data(""), None);
    }

    #[test]
    fn api_error_message_falls_back_to_raw() {
        let body = r#"{"error":{"message":"API key not valid","code":400}}"#;
        assert_eq!(api_error_message(body), "API key not valid");
        assert_eq!(api_error_message("plain failure\n"), "plain failure");
    }
}
