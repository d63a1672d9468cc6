//! # Formula Search
//!
//! The main flow: stream suggestion chunks from the AI gateway, surface
//! progress to the host as text arrives, then parse the accumulated answer
//! and persist it as a new history item.
//!
//! Nothing is written until the stream completes and parses; a failed or
//! empty search leaves history untouched.

use futures_util::{Stream, StreamExt};
use tracing::info;

use formulary_ai::{AiResult, SuggestionChunk, SuggestionRequest};
use formulary_core::ids::now_millis;
use formulary_core::validation::validate_condition;
use formulary_core::{AiSuggestions, GroundingSource, HistoryItem, Language, TreatmentType};

use crate::controller::AppController;
use crate::error::AppResult;

/// Input for one search.
#[derive(Debug, Clone, Default)]
pub struct SearchParams {
    pub disease: String,
    pub doctor_name: Option<String>,
    pub patient_name: Option<String>,
    pub observations: Option<String>,
    /// Ingredients the patient already takes.
    pub current_ingredients: Vec<String>,
    pub is_lactose_intolerant: bool,
    pub is_allergic_to_dye: bool,
    /// When set, the saved product catalog is offered to the model as
    /// preferred ingredients. Off unless the user asks for it.
    pub consider_products: bool,
    pub treatment_type: TreatmentType,
    pub language: Language,
}

/// Progress surfaced while the stream runs.
#[derive(Debug, Clone)]
pub enum SearchProgress {
    /// A fragment of the model's answer, in order.
    Text(String),
    /// Grounding sources; arrives at most once.
    Sources(Vec<GroundingSource>),
}

impl AppController {
    /// Runs a search and returns the persisted history item.
    ///
    /// `progress` fires for every streamed fragment, so a host can render
    /// the answer as it forms. Hosts that don't render progress pass
    /// `|_| {}`.
    pub async fn search(
        &self,
        params: SearchParams,
        mut progress: impl FnMut(SearchProgress),
    ) -> AppResult<HistoryItem> {
        validate_condition(&params.disease)?;

        let catalog = if params.consider_products {
            self.db.products().get_all().await?
        } else {
            Vec::new()
        };
        let request = SuggestionRequest {
            disease: params.disease.trim().to_string(),
            products: catalog,
            current_ingredients: params.current_ingredients.clone(),
            is_lactose_intolerant: params.is_lactose_intolerant,
            is_allergic_to_dye: params.is_allergic_to_dye,
            treatment_type: params.treatment_type,
            language: params.language,
        };

        let stream = self.ai.stream_formula_suggestions(&request).await?;
        let millis = now_millis();
        let (response, sources) = drain_suggestions(stream, millis, &mut progress).await?;

        let item = HistoryItem {
            id: millis.to_string(),
            timestamp: millis,
            disease: request.disease.clone(),
            doctor_name: params.doctor_name.filter(|s| !s.trim().is_empty()),
            patient_name: params.patient_name.filter(|s| !s.trim().is_empty()),
            observations: params.observations.filter(|s| !s.trim().is_empty()),
            current_ingredients: if params.current_ingredients.is_empty() {
                None
            } else {
                Some(params.current_ingredients)
            },
            is_lactose_intolerant: Some(params.is_lactose_intolerant),
            is_allergic_to_dye: Some(params.is_allergic_to_dye),
            treatment_type: Some(params.treatment_type),
            response,
            sources,
        };

        self.db.history().put(&item).await?;
        info!(disease = %item.disease, formulas = item.response.formulas.len(), "Search complete");
        Ok(item)
    }
}

/// Drains a suggestion stream: forwards progress, accumulates text and the
/// single sources emission, then parses the whole answer.
///
/// Generic over the stream so tests can feed canned chunks without a
/// server.
pub(crate) async fn drain_suggestions<S>(
    stream: S,
    millis: i64,
    progress: &mut impl FnMut(SearchProgress),
) -> AppResult<(AiSuggestions, Vec<GroundingSource>)>
where
    S: Stream<Item = AiResult<SuggestionChunk>>,
{
    let mut text = String::new();
    let mut sources: Vec<GroundingSource> = Vec::new();

    futures_util::pin_mut!(stream);
    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;

        if let Some(chunk_sources) = chunk.sources {
            if sources.is_empty() {
                sources = chunk_sources.clone();
                progress(SearchProgress::Sources(chunk_sources));
            }
        }
        if let Some(fragment) = chunk.text {
            text.push_str(&fragment);
            progress(SearchProgress::Text(fragment));
        }
    }

    let suggestions = formulary_ai::parse::parse_suggestions(&text, millis)?;
    Ok((suggestions, sources))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::tests::controller;
    use crate::error::AppError;
    use formulary_ai::AiError;

    fn ok_chunk(text: &str) -> AiResult<SuggestionChunk> {
        Ok(SuggestionChunk {
            text: Some(text.to_string()),
            sources: None,
        })
    }

    fn sources_chunk(uri: &str) -> AiResult<SuggestionChunk> {
        Ok(SuggestionChunk {
            text: None,
            sources: Some(vec![GroundingSource {
                uri: uri.to_string(),
                title: "Fonte".to_string(),
                snippet: None,
            }]),
        })
    }

    const ANSWER: &str = r#"```json
    {"summary": "Resumo", "formulas": [
        {"name": "Pomada", "description": "d", "ingredients": ["a"], "instructions": "i"}
    ]}
    ```"#;

    #[tokio::test]
    async fn drain_concatenates_fragments_in_order() {
        let mid = ANSWER.len() / 2;
        let chunks = vec![ok_chunk(&ANSWER[..mid]), ok_chunk(&ANSWER[mid..])];
        let mut seen = String::new();

        let (suggestions, _) = drain_suggestions(
            tokio_stream::iter(chunks),
            1_700_000_000_000,
            &mut |p| {
                if let SearchProgress::Text(t) = p {
                    seen.push_str(&t);
                }
            },
        )
        .await
        .unwrap();

        assert_eq!(seen, ANSWER);
        assert_eq!(suggestions.summary, "Resumo");
        assert_eq!(suggestions.formulas[0].id, "1700000000000-0");
    }

    #[tokio::test]
    async fn drain_keeps_first_sources_only() {
        let chunks = vec![
            sources_chunk("https://a.example"),
            ok_chunk(ANSWER),
            sources_chunk("https://b.example"),
        ];

        let (_, sources) = drain_suggestions(tokio_stream::iter(chunks), 1, &mut |_| {})
            .await
            .unwrap();

        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].uri, "https://a.example");
    }

    #[tokio::test]
    async fn empty_stream_is_an_empty_response() {
        let err = drain_suggestions(tokio_stream::iter(Vec::new()), 1, &mut |_| {})
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Ai(AiError::EmptyResponse)));
    }

    #[tokio::test]
    async fn mid_stream_error_fails_the_search() {
        let chunks = vec![ok_chunk("{"), Err(AiError::EmptyResponse)];
        let err = drain_suggestions(tokio_stream::iter(chunks), 1, &mut |_| {})
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Ai(_)));
    }

    #[tokio::test]
    async fn blank_disease_is_rejected_before_any_request() {
        let app = controller().await;
        let err = app
            .search(
                SearchParams {
                    disease: "   ".to_string(),
                    ..Default::default()
                },
                |_| {},
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
