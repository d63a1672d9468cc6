//! # Formulary DB - Local Persistence
//!
//! SQLite persistence for the formulary assistant. Every record the app
//! owns lives here: search history, pinned formulas, the product catalog,
//! prescription readings, keyed settings, and local accounts.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       formulary-db                          │
//! │                                                             │
//! │  ┌───────────┐  ┌──────────────┐  ┌────────────────────┐    │
//! │  │   pool    │  │  collection  │  │     repository     │    │
//! │  │ Database  │──│ Collection<T>│  │ users / settings   │    │
//! │  │ DbConfig  │  │  (JSON docs) │  │  (indexed tables)  │    │
//! │  └───────────┘  └──────────────┘  └────────────────────┘    │
//! │        │                                                    │
//! │  ┌───────────┐  ┌──────────────┐                            │
//! │  │  backup   │  │  migrations  │                            │
//! │  │ snapshot  │  │   embedded   │                            │
//! │  └───────────┘  └──────────────┘                            │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Storage Model
//! Record collections are stored as JSON documents in `(id, doc)` tables,
//! one table per collection. Users additionally carry an indexed unique
//! `email` column; settings are a plain `(key, value)` table. Serialization
//! uses the same camelCase field names the backup format exposes, so a
//! document written here round-trips through an export untouched.

pub mod backup;
pub mod collection;
pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

pub use backup::BackupSnapshot;
pub use collection::{Collection, Document};
pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use repository::{SettingsRepository, UserRepository};
