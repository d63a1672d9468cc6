//! # Backup & Restore Orchestration
//!
//! The controller face of [`formulary_db::BackupSnapshot`]: serialize to
//! the JSON file the user downloads, and restore from one. Parsing happens
//! before any write, and the restore itself is a single transaction, so a
//! bad file can never half-apply.

use tracing::info;

use formulary_db::BackupSnapshot;

use crate::controller::AppController;
use crate::error::{AppError, AppResult};

impl AppController {
    /// Serializes the whole store into a downloadable JSON backup.
    pub async fn backup_json(&self) -> AppResult<String> {
        let snapshot = self.db.export_all().await?;
        Ok(serde_json::to_string_pretty(&snapshot)
            .map_err(formulary_db::DbError::Serialization)?)
    }

    /// Restores the whole store from a backup file's contents.
    ///
    /// ## Returns
    /// * `Err(AppError::InvalidBackup)` - not a parseable snapshot; storage
    ///   untouched
    pub async fn restore_json(&self, raw: &str) -> AppResult<()> {
        let snapshot: BackupSnapshot =
            serde_json::from_str(raw).map_err(|e| AppError::InvalidBackup(e.to_string()))?;

        self.db.import_all(&snapshot).await?;
        info!("Restore complete");
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
