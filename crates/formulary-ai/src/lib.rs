//! # Formulary AI - Gemini Gateway
//!
//! Everything that talks to the Gemini API: streamed formula suggestions
//! with search grounding, icon image generation, and prescription photo
//! reading.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       formulary-ai                          │
//! │                                                             │
//! │  ┌───────────┐  ┌──────────┐  ┌────────┐  ┌────────────┐    │
//! │  │  client   │  │ prompts  │  │  wire  │  │   parse    │    │
//! │  │ streaming │──│ pt-BR/en │  │ bodies │  │ fences +   │    │
//! │  │ + oneshot │  │ assembly │  │ + SSE  │  │ id assign  │    │
//! │  └───────────┘  └──────────┘  └────────┘  └────────────┘    │
//! │        │                                                     │
//! │        ▼  ReceiverStream<AiResult<SuggestionChunk>>          │
//! │  formulary-app (accumulates, parses, persists)              │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! The gateway never touches storage. It hands back chunks and structured
//! values; persistence and history are the controller's business.

pub mod client;
pub mod config;
pub mod error;
pub mod parse;
pub mod prompts;
pub mod wire;

pub use client::{GeminiClient, SuggestionChunk};
pub use config::AiConfig;
pub use error::{AiError, AiResult};
pub use prompts::SuggestionRequest;
