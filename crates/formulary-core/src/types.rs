//! # Domain Types
//!
//! Core domain types used throughout Formulary.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │   HistoryItem   │   │    Formula      │   │    Product      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id, timestamp  │   │  id             │   │  id             │       │
//! │  │  disease        │──►│  name           │   │  name (unique   │       │
//! │  │  response ──────┤   │  ingredients[]  │   │   by lowercase) │       │
//! │  │  sources[]      │   │  instructions   │   │  category?      │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │SavedPrescription│   │      User       │   │  SettingRecord  │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id, timestamp  │   │  id, name       │   │  key            │       │
//! │  │  data (dedup    │   │  email (unique) │   │  value (opaque  │       │
//! │  │   by structure) │   │  password       │   │   JSON)         │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! Every entity is keyed by a string id derived from an epoch-millisecond
//! timestamp (see [`crate::ids`]). History embeds a *copy* of each formula
//! and the saved-formula collection holds *another* copy; there is no
//! foreign-key integrity and copies may diverge after an edit.
//!
//! ## Wire Names
//! All serde names are camelCase so that stored documents and backup
//! snapshots stay byte-compatible with the original application's exports.

use serde::{Deserialize, Serialize};

// =============================================================================
// Formula
// =============================================================================

/// A compounding prescription record, suggested by the model or authored
/// by the pharmacist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Formula {
    pub id: String,
    pub name: String,
    pub description: String,
    pub ingredients: Vec<String>,
    pub instructions: String,
    /// Free-form price estimate (e.g. "R$ 45,00 - R$ 60,00").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_value: Option<String>,
}

// =============================================================================
// Grounding
// =============================================================================

/// A web citation returned alongside generated text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroundingSource {
    pub uri: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
}

/// The parsed shape of a complete suggestion response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiSuggestions {
    pub summary: String,
    pub formulas: Vec<Formula>,
}

// =============================================================================
// History
// =============================================================================

/// Requested route of administration for a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TreatmentType {
    Topical,
    Internal,
    #[default]
    All,
}

/// One completed search: the inputs that produced it plus the parsed
/// response and its grounding sources.
///
/// History is append-only and ordered newest first. Individual items are
/// never deleted, only the whole collection is cleared.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryItem {
    pub id: String,
    /// Epoch milliseconds.
    pub timestamp: i64,
    pub disease: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doctor_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observations: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_ingredients: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_lactose_intolerant: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_allergic_to_dye: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub treatment_type: Option<TreatmentType>,
    pub response: AiSuggestions,
    pub sources: Vec<GroundingSource>,
}

// =============================================================================
// Product
// =============================================================================

/// A catalog product the pharmacy can compound with.
///
/// Uniqueness by case-insensitive name is a controller-level rule, not a
/// storage constraint (see [`crate::validation::normalized_name`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

// =============================================================================
// Prescriptions
// =============================================================================

/// One prescribed line item extracted from a prescription image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrescribedItem {
    pub name: String,
    pub instructions: String,
}

/// Structured fields extracted from a prescription image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrescriptionData {
    pub doctor_name: String,
    pub patient_name: String,
    pub date: String,
    pub prescribed_items: Vec<PrescribedItem>,
}

/// A stored prescription reading.
///
/// Dedup compares the structural `data` fields, never the id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedPrescription {
    pub id: String,
    /// Epoch milliseconds.
    pub timestamp: i64,
    pub data: PrescriptionData,
    /// Data URL of the scanned image, kept for the detail view.
    pub image_preview_url: String,
}

// =============================================================================
// User
// =============================================================================

/// A local account.
///
/// The password is stored in plaintext: the store never leaves the device
/// and login is a local equality check. There is no hashing, no session
/// token, no server-side truth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password: String,
}

// =============================================================================
// Settings
// =============================================================================

/// A generic keyed setting (theme, language, feature flags, custom icon
/// map). The value is opaque JSON; interpretation belongs to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingRecord {
    pub key: String,
    pub value: serde_json::Value,
}

// =============================================================================
// Language
// =============================================================================

/// Prompt and message language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Language {
    #[default]
    #[serde(rename = "pt-BR")]
    PtBr,
    #[serde(rename = "en")]
    En,
}

impl Language {
    /// BCP 47 tag, as stored in settings.
    pub fn tag(&self) -> &'static str {
        match self {
            Language::PtBr => "pt-BR",
            Language::En => "en",
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formula_serializes_camel_case() {
        let formula = Formula {
            id: "1700000000000-0".to_string(),
            name: "Hydration cream".to_string(),
            description: "Barrier repair".to_string(),
            ingredients: vec!["Urea 10%".to_string(), "Cream base qsp 50g".to_string()],
            instructions: "Apply twice daily".to_string(),
            average_value: Some("R$ 40,00".to_string()),
        };

        let json = serde_json::to_value(&formula).unwrap();
        assert_eq!(json["averageValue"], "R$ 40,00");
        assert!(json.get("average_value").is_none());
    }

    #[test]
    fn formula_omits_missing_average_value() {
        let formula = Formula {
            id: "1".to_string(),
            name: "x".to_string(),
            description: String::new(),
            ingredients: vec![],
            instructions: String::new(),
            average_value: None,
        };

        let json = serde_json::to_string(&formula).unwrap();
        assert!(!json.contains("averageValue"));
    }

    #[test]
    fn treatment_type_round_trips_lowercase() {
        assert_eq!(
            serde_json::to_string(&TreatmentType::Topical).unwrap(),
            "\"topical\""
        );
        let parsed: TreatmentType = serde_json::from_str("\"internal\"").unwrap();
        assert_eq!(parsed, TreatmentType::Internal);
    }

    #[test]
    fn history_item_round_trips_original_shape() {
        // A document shaped like what the original application stored.
        let json = r#"{
            "id": "1700000000000",
            "timestamp": 1700000000000,
            "disease": "psoriasis",
            "doctorName": "Dr. Lima",
            "isLactoseIntolerant": true,
            "treatmentType": "all",
            "response": { "summary": "s", "formulas": [] },
            "sources": [ { "uri": "https://a", "title": "A" } ]
        }"#;

        let item: HistoryItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.disease, "psoriasis");
        assert_eq!(item.doctor_name.as_deref(), Some("Dr. Lima"));
        assert_eq!(item.treatment_type, Some(TreatmentType::All));
        assert_eq!(item.sources[0].title, "A");

        let back = serde_json::to_value(&item).unwrap();
        assert_eq!(back["doctorName"], "Dr. Lima");
        assert_eq!(back["isLactoseIntolerant"], true);
    }

    #[test]
    fn language_tags() {
        assert_eq!(Language::PtBr.tag(), "pt-BR");
        assert_eq!(serde_json::to_string(&Language::En).unwrap(), "\"en\"");
        let parsed: Language = serde_json::from_str("\"pt-BR\"").unwrap();
        assert_eq!(parsed, Language::PtBr);
    }
}
