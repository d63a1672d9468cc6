//! End-to-end search flow: a streamed suggestion answer arrives in
//! fragments from a mock endpoint, gets accumulated and parsed, and lands
//! in history with grounding sources attached.

use formulary_ai::{AiConfig, GeminiClient};
use formulary_app::{AppController, SearchParams, SearchProgress};
use formulary_core::{Language, TreatmentType};
use formulary_db::{Database, DbConfig};

use wiremock::matchers::{body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn app_against(server: &MockServer) -> AppController {
    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    let ai = GeminiClient::new(AiConfig::new("test-key").base_url(server.uri()));
    AppController::new(db, ai)
}

fn sse_chunk(text_json_escaped: &str) -> String {
    format!(
        "data: {{\"candidates\":[{{\"content\":{{\"parts\":[{{\"text\":\"{text_json_escaped}\"}}]}}}}]}}\n\n"
    )
}

#[tokio::test]
async fn streamed_search_lands_in_history_with_sources() {
    let server = MockServer::start().await;

    // The answer split across three SSE chunks, with sources on the first.
    let answer = concat!(
        r#"```json{\"summary\":\"Tratamento tópico para psoríase em placas.\","#,
        r#"\"formulas\":[{\"name\":\"Pomada de Clobetasol\",\"description\":\"Corticoide potente\","#,
        r#"\"ingredients\":[\"Clobetasol 0,05%\",\"Vaselina qsp 30g\"],"#,
        r#"\"instructions\":\"Aplicar 2x ao dia\",\"averageValue\":\"R$ 45,00\"}]}```"#,
    );
    // Cut on a char boundary and never between a backslash and the
    // character it escapes; each chunk must stay valid JSON string content.
    fn boundary(s: &str, mut i: usize) -> usize {
        while !s.is_char_boundary(i) || s.as_bytes().get(i.wrapping_sub(1)) == Some(&b'\\') {
            i -= 1;
        }
        i
    }
    let first_cut = boundary(answer, answer.len() / 3);
    let second_cut = boundary(answer, 2 * answer.len() / 3);
    let mut body = String::new();
    body.push_str(&format!(
        "data: {{\"candidates\":[{{\"content\":{{\"parts\":[{{\"text\":\"{}\"}}]}},\
         \"groundingMetadata\":{{\"groundingChunks\":[{{\"web\":{{\"uri\":\"https://derm.example/psoriase\",\
         \"title\":\"Consenso de Psoríase\"}}}}]}}}}]}}\n\n",
        &answer[..first_cut]
    ));
    body.push_str(&sse_chunk(&answer[first_cut..second_cut]));
    body.push_str(&sse_chunk(&answer[second_cut..]));

    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-2.5-flash:streamGenerateContent"))
        .and(query_param("alt", "sse"))
        .and(body_string_contains("Psoríase"))
        .and(body_string_contains("Minoxidil")) // catalog reaches the prompt
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/event-stream"))
        .expect(1)
        .mount(&server)
        .await;

    let app = app_against(&server).await;
    app.add_product(formulary_app::ProductInput {
        name: "Minoxidil".to_string(),
        description: "vasodilatador".to_string(),
        category: None,
    })
    .await
    .unwrap();

    let mut fragments = 0usize;
    let mut saw_sources = false;
    let item = app
        .search(
            SearchParams {
                disease: "Psoríase".to_string(),
                doctor_name: Some("Dr. Souza".to_string()),
                consider_products: true,
                treatment_type: TreatmentType::Topical,
                language: Language::PtBr,
                ..Default::default()
            },
            |progress| match progress {
                SearchProgress::Text(_) => fragments += 1,
                SearchProgress::Sources(_) => saw_sources = true,
            },
        )
        .await
        .unwrap();

    assert!(fragments >= 3);
    assert!(saw_sources);

    assert_eq!(item.disease, "Psoríase");
    assert_eq!(item.doctor_name.as_deref(), Some("Dr. Souza"));
    assert_eq!(item.response.formulas.len(), 1);
    let formula = &item.response.formulas[0];
    assert_eq!(formula.name, "Pomada de Clobetasol");
    assert_eq!(formula.id, format!("{}-0", item.timestamp));
    assert_eq!(item.sources.len(), 1);
    assert_eq!(item.sources[0].title, "Consenso de Psoríase");

    // Persisted and first in display order.
    let snapshot = app.load().await.unwrap();
    assert_eq!(snapshot.history.len(), 1);
    assert_eq!(snapshot.history[0].id, item.id);
}

#[tokio::test]
async fn catalog_stays_out_of_the_prompt_unless_asked() {
    let server = MockServer::start().await;
    let answer = concat!(
        r#"```json{\"summary\":\"s\",\"formulas\":[{\"name\":\"Pomada\","#,
        r#"\"description\":\"d\",\"ingredients\":[\"a\"],\"instructions\":\"i\"}]}```"#,
    );
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(sse_chunk(answer), "text/event-stream"))
        .mount(&server)
        .await;

    let app = app_against(&server).await;
    app.add_product(formulary_app::ProductInput {
        name: "Minoxidil".to_string(),
        description: "vasodilatador".to_string(),
        category: None,
    })
    .await
    .unwrap();

    app.search(
        SearchParams {
            disease: "Acne".to_string(),
            ..Default::default()
        },
        |_| {},
    )
    .await
    .unwrap();

    // consider_products defaulted to false: the saved product must not
    // have been offered to the model.
    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let prompt = String::from_utf8(requests[0].body.clone()).unwrap();
    assert!(!prompt.contains("Minoxidil"));
    assert!(prompt.contains("Acne"));
}

#[tokio::test]
async fn failed_search_leaves_history_untouched() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).set_body_raw(
            r#"{"error":{"message":"Resource has been exhausted"}}"#,
            "application/json",
        ))
        .mount(&server)
        .await;

    let app = app_against(&server).await;
    let err = app
        .search(
            SearchParams {
                disease: "Acne".to_string(),
                ..Default::default()
            },
            |_| {},
        )
        .await
        .unwrap_err();

    assert!(err.to_string().contains("Resource has been exhausted"));
    assert!(app.load().await.unwrap().history.is_empty());
}

#[tokio::test]
async fn empty_answer_is_an_error_and_not_persisted() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(sse_chunk("```json```"), "text/event-stream"),
        )
        .mount(&server)
        .await;

    let app = app_against(&server).await;
    let result = app
        .search(
            SearchParams {
                disease: "Acne".to_string(),
                ..Default::default()
            },
            |_| {},
        )
        .await;

    assert!(result.is_err());
    assert!(app.load().await.unwrap().history.is_empty());
}
