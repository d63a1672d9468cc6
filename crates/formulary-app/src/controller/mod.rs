//! # Application Controller
//!
//! The orchestration layer every host (desktop shell, CLI, tests) drives.
//! It owns no state of its own: storage is authoritative, and each
//! operation reads, mutates and persists through the injected [`Database`]
//! and [`GeminiClient`].
//!
//! ## Operation Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    AppController Operations                             │
//! │                                                                         │
//! │  Host Action               Module              Storage Change          │
//! │  ───────────               ──────              ──────────────          │
//! │  Search condition ───────► search.rs ────────► history += item         │
//! │  Pin/unpin formula ──────► formulas.rs ──────► saved_formulas ±        │
//! │  Edit formula ───────────► formulas.rs ──────► 3-way propagation       │
//! │  Manage catalog ─────────► products.rs ──────► products ±              │
//! │  Import/export CSV ──────► products.rs ──────► products +=             │
//! │  Read prescription ──────► prescriptions.rs ─► saved_prescriptions +   │
//! │  Pick formula icon ──────► icons.rs ─────────► settings[customIcons]   │
//! │  Backup/restore ─────────► backup.rs ────────► everything              │
//! │  Preferences ────────────► mod.rs ───────────► settings[...]           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;

use tracing::info;

use formulary_ai::GeminiClient;
use formulary_core::{Formula, HistoryItem, Language, Product, SavedPrescription};
use formulary_db::Database;

use crate::error::AppResult;

pub mod backup;
pub mod formulas;
pub mod icons;
pub mod prescriptions;
pub mod products;
pub mod search;

pub use icons::IconOutcome;
pub use products::{ImportSummary, ProductInput};
pub use search::{SearchParams, SearchProgress};

// Settings keys, spelled exactly as stored (and as old backups carry them).
pub(crate) const LANGUAGE_KEY: &str = "language";
pub(crate) const SHOW_DOCTOR_NAME_KEY: &str = "showDoctorName";
pub(crate) const SHOW_PATIENT_NAME_KEY: &str = "showPatientName";
pub(crate) const CUSTOM_ICONS_KEY: &str = "customIcons";

/// What a host renders after startup or a restore.
#[derive(Debug, Clone, Default)]
pub struct AppSnapshot {
    /// Newest first.
    pub history: Vec<HistoryItem>,
    /// Alphabetical, case-insensitive.
    pub saved_formulas: Vec<Formula>,
    /// Alphabetical, case-insensitive.
    pub products: Vec<Product>,
    /// Newest first.
    pub saved_prescriptions: Vec<SavedPrescription>,
    /// Formula id → data URL, user-chosen overrides only.
    pub custom_icons: HashMap<String, String>,
    pub language: Language,
    pub show_doctor_name: bool,
    pub show_patient_name: bool,
}

/// The application controller. Cheap to clone; both members are handles.
#[derive(Debug, Clone)]
pub struct AppController {
    pub(crate) db: Database,
    pub(crate) ai: GeminiClient,
}

impl AppController {
    pub fn new(db: Database, ai: GeminiClient) -> Self {
        AppController { db, ai }
    }

    /// Loads everything a host renders, in display order.
    pub async fn load(&self) -> AppResult<AppSnapshot> {
        let mut history = self.db.history().get_all().await?;
        history.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

        let mut saved_formulas = self.db.saved_formulas().get_all().await?;
        saved_formulas.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));

        let mut products = self.db.products().get_all().await?;
        products.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));

        let mut saved_prescriptions = self.db.saved_prescriptions().get_all().await?;
        saved_prescriptions.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

        let settings = self.db.settings();
        let custom_icons = settings
            .get_as::<HashMap<String, String>>(CUSTOM_ICONS_KEY)
            .await?
            .unwrap_or_default();
        let language = settings
            .get_as::<Language>(LANGUAGE_KEY)
            .await?
            .unwrap_or_default();
        let show_doctor_name = settings
            .get_as::<bool>(SHOW_DOCTOR_NAME_KEY)
            .await?
            .unwrap_or(false);
        let show_patient_name = settings
            .get_as::<bool>(SHOW_PATIENT_NAME_KEY)
            .await?
            .unwrap_or(false);

        info!(
            history = history.len(),
            products = products.len(),
            "Loaded application state"
        );

        Ok(AppSnapshot {
            history,
            saved_formulas,
            products,
            saved_prescriptions,
            custom_icons,
            language,
            show_doctor_name,
            show_patient_name,
        })
    }

    // =========================================================================
    // Preferences
    // =========================================================================

    pub async fn set_language(&self, language: Language) -> AppResult<()> {
        self.db.settings().set(LANGUAGE_KEY, &language).await?;
        Ok(())
    }

    pub async fn language(&self) -> AppResult<Language> {
        Ok(self
            .db
            .settings()
            .get_as::<Language>(LANGUAGE_KEY)
            .await?
            .unwrap_or_default())
    }

    pub async fn set_show_doctor_name(&self, show: bool) -> AppResult<()> {
        self.db.settings().set(SHOW_DOCTOR_NAME_KEY, &show).await?;
        Ok(())
    }

    pub async fn set_show_patient_name(&self, show: bool) -> AppResult<()> {
        self.db.settings().set(SHOW_PATIENT_NAME_KEY, &show).await?;
        Ok(())
    }

    /// Clears the search history. Pinned formulas survive; they are
    /// independent copies.
    pub async fn clear_history(&self) -> AppResult<()> {
        self.db.history().clear().await?;
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
