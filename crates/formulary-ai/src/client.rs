//! # Gemini Client
//!
//! The HTTP client behind every AI feature: streamed formula suggestions,
//! one-shot icon generation, and prescription reading.
//!
//! ## Streaming Shape
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                 Suggestion Streaming                                    │
//! │                                                                         │
//! │  stream_formula_suggestions(request)                                   │
//! │       │  POST :streamGenerateContent?alt=sse                           │
//! │       │  (non-2xx fails HERE, before any chunk is produced)            │
//! │       ▼                                                                 │
//! │  spawned reader task                                                   │
//! │  ├── buffers bytes into lines                                          │
//! │  ├── "data: {json}" → SuggestionChunk { text }                         │
//! │  ├── first groundingMetadata → SuggestionChunk { sources } (once)      │
//! │  └── transport error → Err item, then stop                            │
//! │       │                                                                 │
//! │       ▼  mpsc channel                                                  │
//! │  ReceiverStream<AiResult<SuggestionChunk>>  ← what the caller drains   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Text accumulation and JSON parsing happen in the caller; the client
//! only frames chunks.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use futures_util::StreamExt;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, warn};

use formulary_core::{GroundingSource, Language, PrescriptionData};

use crate::config::AiConfig;
use crate::error::{AiError, AiResult};
use crate::parse;
use crate::prompts::{self, SuggestionRequest};
use crate::wire::{api_error_message, sse_data, GenerateContentRequest, GenerateContentResponse};

/// One streamed suggestion item. Chunks carry text, sources, or both.
#[derive(Debug, Clone, Default)]
pub struct SuggestionChunk {
    /// A fragment of the model's answer, in emission order.
    pub text: Option<String>,
    /// Grounding sources; emitted at most once per stream.
    pub sources: Option<Vec<GroundingSource>>,
}

/// Client for the Gemini REST API.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    config: AiConfig,
}

impl GeminiClient {
    pub fn new(config: AiConfig) -> Self {
        GeminiClient {
            http: reqwest::Client::new(),
            config,
        }
    }

    /// Builds a client from `GEMINI_API_KEY`.
    pub fn from_env() -> AiResult<Self> {
        Ok(GeminiClient::new(AiConfig::from_env()?))
    }

    fn generate_url(&self, model: &str) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.config.base_url, model, self.config.api_key
        )
    }

    fn stream_url(&self, model: &str) -> String {
        format!(
            "{}/v1beta/models/{}:streamGenerateContent?alt=sse&key={}",
            self.config.base_url, model, self.config.api_key
        )
    }

    /// Starts a streamed suggestion request.
    ///
    /// The HTTP exchange is opened before this returns, so a bad key or
    /// unreachable endpoint fails the call itself; only mid-stream
    /// failures arrive as `Err` items.
    pub async fn stream_formula_suggestions(
        &self,
        request: &SuggestionRequest,
    ) -> AiResult<ReceiverStream<AiResult<SuggestionChunk>>> {
        let prompt = prompts::suggestion_prompt(request);
        debug!(disease = %request.disease, "Starting suggestion stream");

        let body = GenerateContentRequest::text(prompt).with_search();
        let response = self
            .http
            .post(self.stream_url(&self.config.text_model))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AiError::Api {
                status: status.as_u16(),
                message: api_error_message(&body),
            });
        }

        let (tx, rx) = mpsc::channel(32);

        tokio::spawn(async move {
            let mut bytes = response.bytes_stream();
            let mut buffer = String::new();
            let mut sources_sent = false;

            'read: while let Some(next) = bytes.next().await {
                let chunk = match next {
                    Ok(chunk) => chunk,
                    Err(err) => {
                        warn!(error = %err, "Suggestion stream dropped");
                        let _ = tx.send(Err(AiError::Http(err))).await;
                        return;
                    }
                };
                buffer.push_str(&String::from_utf8_lossy(&chunk));

                while let Some(newline) = buffer.find('\n') {
                    let line = buffer[..newline].to_string();
                    buffer.drain(..=newline);

                    for item in frame_line(&line, &mut sources_sent) {
                        if tx.send(item).await.is_err() {
                            // Receiver hung up; stop reading.
                            break 'read;
                        }
                    }
                }
            }

            // Trailing data without a final newline.
            let trailing = std::mem::take(&mut buffer);
            for item in frame_line(&trailing, &mut sources_sent) {
                if tx.send(item).await.is_err() {
                    break;
                }
            }
        });

        Ok(ReceiverStream::new(rx))
    }

    /// Generates an icon for a formula, returned as a `data:image/png`
    /// URL ready for the icon cache.
    pub async fn generate_icon(
        &self,
        formula_name: &str,
        language: Language,
    ) -> AiResult<String> {
        debug!(formula = formula_name, "Generating icon");

        let body = GenerateContentRequest::text(prompts::icon_prompt(formula_name, language))
            .with_image_response();
        let response = self.post_generate(&self.config.image_model, &body).await?;

        let image = response.inline_image().ok_or(AiError::NoImageData)?;
        Ok(format!("data:image/png;base64,{}", image.data))
    }

    /// Reads a prescription photograph into structured data.
    pub async fn read_prescription(
        &self,
        image: &[u8],
        mime_type: &str,
        language: Language,
    ) -> AiResult<PrescriptionData> {
        debug!(mime_type, bytes = image.len(), "Reading prescription");

        let body = GenerateContentRequest::image_with_text(
            mime_type,
            BASE64.encode(image),
            prompts::prescription_prompt(language),
        );
        let response = self.post_generate(&self.config.text_model, &body).await?;

        parse::parse_prescription(&response.text())
    }

    async fn post_generate(
        &self,
        model: &str,
        body: &GenerateContentRequest,
    ) -> AiResult<GenerateContentResponse> {
        let response = self
            .http
            .post(self.generate_url(model))
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AiError::Api {
                status: status.as_u16(),
                message: api_error_message(&body),
            });
        }

        Ok(response.json().await?)
    }
}

/// Turns one SSE line into zero, one, or two stream items.
/// Sources come before text when both arrive in the same wire chunk, so
/// the caller can render attribution alongside the first words.
fn frame_line(line: &str, sources_sent: &mut bool) -> Vec<AiResult<SuggestionChunk>> {
    let Some(payload) = sse_data(line) else {
        return Vec::new();
    };

    let parsed: GenerateContentResponse = match serde_json::from_str(payload) {
        Ok(parsed) => parsed,
        Err(err) => {
            return vec![Err(AiError::invalid(format!(
                "malformed stream chunk: {err}"
            )))];
        }
    };

    let mut items = Vec::new();

    if !*sources_sent {
        let sources = parsed.grounding_sources();
        if !sources.is_empty() {
            *sources_sent = true;
            items.push(Ok(SuggestionChunk {
                sources: Some(sources),
                ..Default::default()
            }));
        }
    }

    let text = parsed.text();
    if !text.is_empty() {
        items.push(Ok(SuggestionChunk {
            text: Some(text),
            ..Default::default()
        }));
    }

    items
}

// =============================================================================
// Unit Tests
// =============================================================================
