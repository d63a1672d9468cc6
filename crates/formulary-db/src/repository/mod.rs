//! # Repository Module
//!
//! Specialized repositories for the two collections the generic document
//! table shape doesn't fully cover:
//!
//! - [`users::UserRepository`] - extra indexed `email` column with the
//!   system's only unique constraint
//! - [`settings::SettingsRepository`] - key/value rows instead of id/doc

pub mod settings;
pub mod users;

pub use settings::SettingsRepository;
pub use users::UserRepository;
