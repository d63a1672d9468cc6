//! # Formula Icons
//!
//! Icon generation runs as an explicit batch: one task per formula name,
//! all awaited, each with its own result. A failed icon never fails the
//! batch; its name just keeps the default glyph until retried.
//!
//! Generated icons are session state. The host shows them to the user and
//! persists a pick only through `set_custom_icon`, so the stored
//! `customIcons` map holds user-chosen overrides keyed by formula id.

use std::collections::HashMap;

use tracing::{info, warn};

use formulary_ai::AiError;
use formulary_core::Language;

use crate::controller::{AppController, CUSTOM_ICONS_KEY};
use crate::error::AppResult;

/// Result of one icon in a batch.
#[derive(Debug)]
pub struct IconOutcome {
    pub name: String,
    /// The data URL on success.
    pub result: Result<String, AiError>,
}

impl AppController {
    /// Generates icons for a batch of formula names concurrently.
    ///
    /// Nothing is stored; each outcome carries its own data URL or error.
    pub async fn generate_icons(
        &self,
        names: Vec<String>,
        language: Language,
    ) -> AppResult<Vec<IconOutcome>> {
        let handles: Vec<_> = names
            .into_iter()
            .map(|name| {
                let ai = self.ai.clone();
                tokio::spawn(async move {
                    let result = ai.generate_icon(&name, language).await;
                    IconOutcome { name, result }
                })
            })
            .collect();

        let mut outcomes = Vec::with_capacity(handles.len());
        for handle in handles {
            match handle.await {
                Ok(outcome) => outcomes.push(outcome),
                Err(err) => warn!(error = %err, "Icon task panicked"),
            }
        }

        let generated = outcomes.iter().filter(|o| o.result.is_ok()).count();
        info!(total = outcomes.len(), generated, "Icon batch finished");
        Ok(outcomes)
    }

    /// Pins an icon override for one formula.
    pub async fn set_custom_icon(&self, formula_id: &str, data_url: &str) -> AppResult<()> {
        let mut icons = self.custom_icons().await?;
        icons.insert(formula_id.to_string(), data_url.to_string());
        self.db.settings().set(CUSTOM_ICONS_KEY, &icons).await?;
        Ok(())
    }

    /// The stored override map (formula id → data URL).
    pub async fn custom_icons(&self) -> AppResult<HashMap<String, String>> {
        Ok(self
            .db
            .settings()
            .get_as::<HashMap<String, String>>(CUSTOM_ICONS_KEY)
            .await?
            .unwrap_or_default())
    }

    /// Drops one override, reverting that formula to the default glyph.
    pub async fn remove_custom_icon(&self, formula_id: &str) -> AppResult<()> {
        let mut icons = self.custom_icons().await?;
        if icons.remove(formula_id).is_some() {
            self.db.settings().set(CUSTOM_ICONS_KEY, &icons).await?;
        }
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
