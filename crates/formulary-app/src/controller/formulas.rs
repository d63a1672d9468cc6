//! # Formula Pinning & Editing
//!
//! Pinned formulas are independent copies keyed by the formula id; a
//! formula keeps its identity whether it lives in a history item, the
//! pinned collection, or a host's current result view. Editing propagates
//! by id to every stored occurrence, so the copies never drift apart.

use tracing::info;

use formulary_core::Formula;

use crate::controller::AppController;
use crate::error::AppResult;

impl AppController {
    /// Pins a formula if it isn't pinned, unpins it if it is.
    ///
    /// ## Returns
    /// `true` when the formula is pinned after the call.
    pub async fn toggle_save_formula(&self, formula: &Formula) -> AppResult<bool> {
        let saved = self.db.saved_formulas();

        if saved.get(&formula.id).await?.is_some() {
            saved.remove(&formula.id).await?;
            info!(id = %formula.id, "Unpinned formula");
            Ok(false)
        } else {
            saved.put(formula).await?;
            info!(id = %formula.id, "Pinned formula");
            Ok(true)
        }
    }

    /// Whether a formula is currently pinned.
    pub async fn is_formula_saved(&self, formula_id: &str) -> AppResult<bool> {
        Ok(self.db.saved_formulas().get(formula_id).await?.is_some())
    }

    /// Applies an edited formula to every stored occurrence of its id:
    /// the pinned copy (if any) and every history item containing it.
    /// Hosts update their in-view copy themselves.
    pub async fn update_formula(&self, updated: &Formula) -> AppResult<()> {
        let saved = self.db.saved_formulas();
        if saved.get(&updated.id).await?.is_some() {
            saved.put(updated).await?;
        }

        // Rewrite only the history items that actually contain the id.
        let history = self.db.history();
        for mut item in history.get_all().await? {
            let mut changed = false;
            for formula in &mut item.response.formulas {
                if formula.id == updated.id {
                    *formula = updated.clone();
                    changed = true;
                }
            }
            if changed {
                history.put(&item).await?;
            }
        }

        info!(id = %updated.id, "Updated formula everywhere");
        Ok(())
    }

    /// Unpins everything.
    pub async fn clear_saved_formulas(&self) -> AppResult<()> {
        self.db.saved_formulas().clear().await?;
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
