//! # Prescription Reading
//!
//! A photographed prescription goes through the AI gateway and comes back
//! as structured fields; the user reviews them and may store the reading.
//! Dedup is structural: the same extracted fields count as the same
//! prescription no matter when they were scanned.

use tracing::info;

use formulary_core::ids::{now_millis, timestamp_id};
use formulary_core::{Language, PrescriptionData, SavedPrescription};

use crate::controller::AppController;
use crate::error::{AppError, AppResult};

impl AppController {
    /// Reads a prescription image into structured data. Nothing is stored;
    /// saving is a separate, reviewed step.
    pub async fn read_prescription(
        &self,
        image: &[u8],
        mime_type: &str,
        language: Language,
    ) -> AppResult<PrescriptionData> {
        Ok(self.ai.read_prescription(image, mime_type, language).await?)
    }

    /// Stores a reviewed prescription reading.
    ///
    /// ## Returns
    /// * `Err(AppError::AlreadySaved)` - a stored reading has identical
    ///   extracted fields
    pub async fn save_prescription(
        &self,
        data: PrescriptionData,
        image_preview_url: String,
    ) -> AppResult<SavedPrescription> {
        let existing = self.db.saved_prescriptions().get_all().await?;
        if existing.iter().any(|p| p.data == data) {
            return Err(AppError::AlreadySaved);
        }

        let prescription = SavedPrescription {
            id: timestamp_id(),
            timestamp: now_millis(),
            data,
            image_preview_url,
        };
        self.db.saved_prescriptions().put(&prescription).await?;
        info!(id = %prescription.id, "Saved prescription");
        Ok(prescription)
    }

    pub async fn delete_prescription(&self, id: &str) -> AppResult<()> {
        self.db.saved_prescriptions().remove(id).await?;
        Ok(())
    }

    pub async fn clear_prescriptions(&self) -> AppResult<()> {
        self.db.saved_prescriptions().clear().await?;
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
