//! # Formulary App - Application Controller
//!
//! The orchestration crate hosts embed: it wires the persistence gateway
//! and the AI gateway together and exposes every user-facing operation as
//! a method on [`AppController`], plus local accounts on [`AuthService`].
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       formulary-app                         │
//! │                                                             │
//! │  ┌────────────────────┐      ┌───────────────┐              │
//! │  │   AppController    │      │  AuthService  │              │
//! │  │ search / catalog / │      │ register /    │              │
//! │  │ pins / icons /     │      │ login / reset │              │
//! │  │ backup / prefs     │      └───────┬───────┘              │
//! │  └───────┬──────┬─────┘              │                      │
//! │          │      │                    │                      │
//! │          ▼      ▼                    ▼                      │
//! │   formulary-ai  formulary-db ◄───────┘                      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Typical Host Setup
//! ```rust,ignore
//! let db = Database::new(DbConfig::new(data_dir.join("formulary.db"))).await?;
//! let ai = GeminiClient::from_env()?;
//! let app = AppController::new(db.clone(), ai);
//! let auth = AuthService::new(db);
//! let state = app.load().await?;
//! ```

pub mod auth;
pub mod controller;
pub mod error;
pub mod telemetry;

pub use auth::{AuthError, AuthService};
pub use controller::{
    AppController, AppSnapshot, IconOutcome, ImportSummary, ProductInput, SearchParams,
    SearchProgress,
};
pub use error::{AppError, AppResult};
