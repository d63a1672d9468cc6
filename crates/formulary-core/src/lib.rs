//! # formulary-core: Pure Domain Logic for Formulary
//!
//! Formulary is an offline-first pharmacy assistant: pharmacists request
//! AI-generated compounding formulas for a condition, keep a product
//! catalog, read prescriptions from images, and own all of their data in a
//! local database. This crate is the **heart** of that system: every domain
//! type and every rule that can be expressed as a pure function lives here.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Formulary Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  Host UI (out of scope)                         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                     formulary-app                               │   │
//! │  │      AppController, AuthService, backup orchestration           │   │
//! │  └─────────────┬──────────────────────────────────┬────────────────┘   │
//! │                │                                  │                     │
//! │  ┌─────────────▼──────────────┐   ┌───────────────▼────────────────┐   │
//! │  │       formulary-db         │   │         formulary-ai           │   │
//! │  │  SQLite collections,       │   │  Gemini streaming, icons,      │   │
//! │  │  backup/restore            │   │  prescription OCR              │   │
//! │  └─────────────┬──────────────┘   └───────────────┬────────────────┘   │
//! │                │                                  │                     │
//! │  ┌─────────────▼──────────────────────────────────▼────────────────┐   │
//! │  │               ★ formulary-core (THIS CRATE) ★                   │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐   │   │
//! │  │   │   types   │  │    ids    │  │    csv    │  │ validation│   │   │
//! │  │   │  Formula  │  │ timestamp │  │  product  │  │   rules   │   │   │
//! │  │   │  History  │  │   keys    │  │   codec   │  │   checks  │   │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘   │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Formula, HistoryItem, Product, etc.)
//! - [`ids`] - Timestamp-derived string identifiers
//! - [`csv`] - Product catalog CSV import/export codec
//! - [`validation`] - Input validation rules
//! - [`error`] - Domain error types

pub mod csv;
pub mod error;
pub mod ids;
pub mod types;
pub mod validation;

// Re-export the most used items at crate root
pub use error::{CsvError, ValidationError};
pub use types::{
    AiSuggestions, Formula, GroundingSource, HistoryItem, Language, PrescribedItem,
    PrescriptionData, Product, SavedPrescription, SettingRecord, TreatmentType, User,
};
