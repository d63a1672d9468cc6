//! # Backup & Restore
//!
//! Whole-database export/import. The snapshot is the only way data moves
//! between devices: there is no server-side truth.
//!
//! ## Snapshot Format
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Backup Snapshot (JSON)                               │
//! │                                                                         │
//! │  {                                                                      │
//! │    "history":            [ HistoryItem... ],        ← required         │
//! │    "savedFormulas":      [ Formula... ],                               │
//! │    "products":           [ Product... ],            ← required         │
//! │    "settings":           [ {key, value}... ],       ← required         │
//! │    "savedPrescriptions": [ SavedPrescription... ],                     │
//! │    "users":              [ User... ]                                   │
//! │  }                                                                      │
//! │                                                                         │
//! │  Key names match the original application's backup files, so old       │
//! │  exports restore cleanly. Missing required keys fail deserialization   │
//! │  BEFORE any write happens.                                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Atomicity
//! `import_all` clears and repopulates every collection inside one
//! transaction. A failure at any point rolls the whole restore back; prior
//! state survives. (The original left this ambiguous; here it is a
//! guarantee.)

use serde::{Deserialize, Serialize};
use tracing::info;

use formulary_core::{Formula, HistoryItem, Product, SavedPrescription, SettingRecord, User};

use crate::collection::{clear_docs, fetch_all_docs, put_doc, Document};
use crate::error::{DbError, DbResult};
use crate::pool::Database;
use crate::repository::{settings, users};

/// A full export of every collection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupSnapshot {
    pub history: Vec<HistoryItem>,
    #[serde(default)]
    pub saved_formulas: Vec<Formula>,
    pub products: Vec<Product>,
    pub settings: Vec<SettingRecord>,
    #[serde(default)]
    pub saved_prescriptions: Vec<SavedPrescription>,
    #[serde(default)]
    pub users: Vec<User>,
}

impl Database {
    /// Reads every collection inside one transaction and returns the
    /// snapshot. A consistent point-in-time view even if other tasks write
    /// concurrently.
    pub async fn export_all(&self) -> DbResult<BackupSnapshot> {
        let mut tx = self.pool().begin().await?;

        let snapshot = BackupSnapshot {
            history: fetch_all_docs::<HistoryItem, _>(&mut *tx).await?,
            saved_formulas: fetch_all_docs::<Formula, _>(&mut *tx).await?,
            products: fetch_all_docs::<Product, _>(&mut *tx).await?,
            settings: settings::fetch_settings(&mut *tx).await?,
            saved_prescriptions: fetch_all_docs::<SavedPrescription, _>(&mut *tx).await?,
            users: users::fetch_users(&mut *tx).await?,
        };

        tx.commit().await?;

        info!(
            history = snapshot.history.len(),
            products = snapshot.products.len(),
            users = snapshot.users.len(),
            "Exported backup snapshot"
        );

        Ok(snapshot)
    }

    /// Clears every collection and repopulates it from the snapshot, all
    /// inside one transaction. On any failure the transaction rolls back
    /// and storage is untouched.
    pub async fn import_all(&self, snapshot: &BackupSnapshot) -> DbResult<()> {
        info!(
            history = snapshot.history.len(),
            products = snapshot.products.len(),
            "Importing backup snapshot"
        );

        let mut tx = self
            .pool()
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        clear_docs(&mut *tx, HistoryItem::COLLECTION).await?;
        clear_docs(&mut *tx, Formula::COLLECTION).await?;
        clear_docs(&mut *tx, Product::COLLECTION).await?;
        clear_docs(&mut *tx, settings::TABLE).await?;
        clear_docs(&mut *tx, SavedPrescription::COLLECTION).await?;
        clear_docs(&mut *tx, users::TABLE).await?;

        for item in &snapshot.history {
            put_doc(&mut *tx, item).await?;
        }
        for item in &snapshot.saved_formulas {
            put_doc(&mut *tx, item).await?;
        }
        for item in &snapshot.products {
            put_doc(&mut *tx, item).await?;
        }
        for record in &snapshot.settings {
            settings::put_setting(&mut *tx, record).await?;
        }
        for item in &snapshot.saved_prescriptions {
            put_doc(&mut *tx, item).await?;
        }
        for user in &snapshot.users {
            users::put_user(&mut *tx, user).await?;
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!("Backup snapshot imported");
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
