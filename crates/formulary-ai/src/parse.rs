//! # Model Output Parsing
//!
//! The suggestion and prescription prompts ask for a fenced JSON block.
//! Models mostly comply but wrap it in markdown fences and occasional
//! prose, so parsing is: strip fences, trim, deserialize.
//!
//! Formula ids are assigned here: the model doesn't produce ids, the
//! caller's timestamp does (`{millis}-{index}` per formula).

use serde::Deserialize;

use formulary_core::ids::indexed_id;
use formulary_core::{AiSuggestions, Formula, PrescriptionData};

use crate::error::{AiError, AiResult};

/// Removes markdown code fences from model output.
/// Mirrors the lenient approach of replacing every fence marker rather than
/// matching balanced pairs; models sometimes emit stray fences.
pub fn strip_code_fences(text: &str) -> String {
    text.replace("```json", "").replace("```", "").trim().to_string()
}

/// What the model actually emits for a suggestion answer.
#[derive(Debug, Deserialize)]
struct RawSuggestions {
    summary: String,
    formulas: Vec<RawFormula>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawFormula {
    name: String,
    description: String,
    ingredients: Vec<String>,
    instructions: String,
    #[serde(default)]
    average_value: Option<String>,
}

/// Parses accumulated suggestion text into structured suggestions,
/// assigning each formula an id derived from `millis`.
///
/// ## Returns
/// * `Err(AiError::EmptyResponse)` - nothing left after stripping fences
/// * `Err(AiError::Json)` - the text wasn't the requested JSON shape
pub fn parse_suggestions(text: &str, millis: i64) -> AiResult<AiSuggestions> {
    let cleaned = strip_code_fences(text);
    if cleaned.is_empty() {
        return Err(AiError::EmptyResponse);
    }

    let raw: RawSuggestions = serde_json::from_str(&cleaned)?;

    let formulas = raw
        .formulas
        .into_iter()
        .enumerate()
        .map(|(index, f)| Formula {
            id: indexed_id(millis, index),
            name: f.name,
            description: f.description,
            ingredients: f.ingredients,
            instructions: f.instructions,
            average_value: f.average_value,
        })
        .collect();

    Ok(AiSuggestions {
        summary: raw.summary,
        formulas,
    })
}

/// Parses prescription-reader output into structured prescription data.
pub fn parse_prescription(text: &str) -> AiResult<PrescriptionData> {
    let cleaned = strip_code_fences(text);
    if cleaned.is_empty() {
        return Err(AiError::EmptyResponse);
    }
    Ok(serde_json::from_str(&cleaned)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SUGGESTIONS: &str = r#"{
        "summary": "Tratamento tópico para psoríase leve.",
        "formulas": [
            {
                "name": "Pomada de Clobetasol",
                "description": "Corticoide de alta potência",
                "ingredients": ["Clobetasol 0,05%", "Vaselina qsp 30g"],
                "instructions": "Aplicar 2x ao dia",
                "averageValue": "R$ 45,00"
            },
            {
                "name": "Loção de Calcipotriol",
                "description": "Análogo da vitamina D",
                "ingredients": ["Calcipotriol 0,005%"],
                "instructions": "Aplicar à noite"
            }
        ]
    }"#;

    #[test]
    fn parses_fenced_suggestions_and_assigns_ids() {
        let fenced = format!("```json\n{SUGGESTIONS}\n```");
        let suggestions = parse_suggestions(&fenced, 1_700_000_000_000).unwrap();

        assert_eq!(suggestions.formulas.len(), 2);
        assert_eq!(suggestions.formulas[0].id, "1700000000000-0");
        assert_eq!(suggestions.formulas[1].id, "1700000000000-1");
        assert_eq!(suggestions.formulas[0].average_value.as_deref(), Some("R$ 45,00"));
        assert!(suggestions.formulas[1].average_value.is_none());
    }

    #[test]
    fn parses_unfenced_output_too() {
        let suggestions = parse_suggestions(SUGGESTIONS, 42).unwrap();
        assert_eq!(suggestions.summary, "Tratamento tópico para psoríase leve.");
    }

    #[test]
    fn empty_after_stripping_is_empty_response() {
        let err = parse_suggestions("```json\n```", 42).unwrap_err();
        assert!(matches!(err, AiError::EmptyResponse));
    }

    #[test]
    fn prose_instead_of_json_is_a_parse_error() {
        let err = parse_suggestions("I cannot help with that.", 42).unwrap_err();
        assert!(matches!(err, AiError::Json(_)));
    }

    #[test]
    fn parses_prescription() {
        let raw = r#"```json
        {
            "doctorName": "Dr. Souza",
            "patientName": "Maria",
            "date": "2024-03-10",
            "prescribedItems": [
                {"name": "Minoxidil 5%", "instructions": "Aplicar à noite"}
            ]
        }
        ```"#;
        let data = parse_prescription(raw).unwrap();

        assert_eq!(data.doctor_name, "Dr. Souza");
        assert_eq!(data.prescribed_items.len(), 1);
        assert_eq!(data.prescribed_items[0].name, "Minoxidil 5%");
    }

    #[test]
    fn strip_handles_stray_fences() {
        assert_eq!(strip_code_fences("```json\n{}\n``` trailing ```"), "{}\n trailing");
    }
}
