//! HTTP API integration tests
//!
//! Drives the real router with tower's `oneshot` against an in-memory
//! database and stub model collaborators, so every pipeline step except the
//! external model calls themselves is the production code path.

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use sqlx::SqlitePool;
use tower::ServiceExt;

use sentia_api::models::{
    Entity, GenerativeModel, LinguisticEngine, ParsedDocument, ScoredLabel, SentimentModel, Token,
};
use sentia_api::{build_router, AppState, Orchestrator};
use sentia_common::config::Settings;
use sentia_common::{Error, Result};

// ========================================
// Stub collaborators
// ========================================

/// Sentiment stub returning a fixed ranked label list
struct FixedSentiment(Vec<ScoredLabel>);

#[async_trait]
impl SentimentModel for FixedSentiment {
    async fn classify(&self, _text: &str) -> Result<Vec<ScoredLabel>> {
        Ok(self.0.clone())
    }
}

/// Sentiment stub that always fails
struct FailingSentiment;

#[async_trait]
impl SentimentModel for FailingSentiment {
    async fn classify(&self, _text: &str) -> Result<Vec<ScoredLabel>> {
        Err(Error::ModelUnavailable("stub sentiment outage".to_string()))
    }
}

/// Linguistic stub returning a fixed parsed document
struct FixedLinguistic(Vec<(&'static str, &'static str)>, Vec<(&'static str, &'static str)>);

#[async_trait]
impl LinguisticEngine for FixedLinguistic {
    async fn process(&self, _text: &str) -> Result<ParsedDocument> {
        Ok(ParsedDocument {
            tokens: self
                .0
                .iter()
                .map(|(surface, pos)| Token {
                    surface: surface.to_string(),
                    pos_tag: pos.to_string(),
                    vector: vec![0.1, 0.2],
                })
                .collect(),
            entities: self
                .1
                .iter()
                .map(|(surface, tag)| Entity {
                    surface: surface.to_string(),
                    entity_tag: tag.to_string(),
                })
                .collect(),
        })
    }
}

/// Generative stub echoing its prompts
struct EchoGenerative;

#[async_trait]
impl GenerativeModel for EchoGenerative {
    async fn complete(
        &self,
        _system_instruction: &str,
        user_text: &str,
        follow_up: &str,
    ) -> Result<String> {
        Ok(format!("{} | {}", user_text, follow_up))
    }
}

// ========================================
// Test harness
// ========================================

fn five_star_stub() -> Arc<FixedSentiment> {
    Arc::new(FixedSentiment(vec![
        ScoredLabel {
            label: "5".to_string(),
            score: 0.9,
        },
        ScoredLabel {
            label: "4".to_string(),
            score: 0.07,
        },
    ]))
}

fn default_linguistic() -> Arc<FixedLinguistic> {
    Arc::new(FixedLinguistic(
        vec![
            ("Madrid", "PROPN"),
            ("brilla", "VERB"),
            ("hoy", "ADV"),
            ("Sevilla", "PROPN"),
        ],
        vec![("Madrid", "LOC"), ("Sevilla", "LOC")],
    ))
}

async fn test_app(sentiment: Arc<dyn SentimentModel>) -> (Router, SqlitePool) {
    let pool = SqlitePool::connect(":memory:").await.unwrap();
    sentia_common::db::init_tables(&pool).await.unwrap();

    let orchestrator = Arc::new(Orchestrator::new(
        pool.clone(),
        Arc::new(Settings::default()),
        sentiment,
        default_linguistic(),
        Arc::new(EchoGenerative),
    ));

    (build_router(AppState::new(orchestrator)), pool)
}

async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    // Rejections (e.g. missing fields) come back as plain text, not JSON
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

// ========================================
// Tests
// ========================================

#[tokio::test]
async fn health_reports_ok() {
    let (app, _pool) = test_app(five_star_stub()).await;

    let (status, body) = get_json(app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "sentia-api");
}

#[tokio::test]
async fn status_is_created_once_and_read_back() {
    let (app, pool) = test_app(five_star_stub()).await;

    let (status1, body1) = get_json(app.clone(), "/status").await;
    assert_eq!(status1, StatusCode::OK);
    assert_eq!(body1["status"], "Running");
    assert_eq!(
        body1["models_info"]["sentiment_model"],
        "nlptown/bert-base-multilingual-uncased-sentiment"
    );

    let (status2, body2) = get_json(app, "/status").await;
    assert_eq!(status2, StatusCode::OK);
    // Second call reads the stored row; models_info must be identical
    assert_eq!(body1["models_info"], body2["models_info"]);

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM service_status")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn sentiment_normalizes_score_and_persists() {
    let (app, pool) = test_app(five_star_stub()).await;

    let (status, body) =
        post_json(app, "/sentiment", json!({"text": "great day", "log_id": 7})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["prediction"]["label"], "5");
    let score = body["prediction"]["score"].as_f64().unwrap();
    assert!((score - 0.8).abs() < 1e-9);

    let info = &body["execution_info"];
    assert_eq!(info["text_length"], 9);
    assert_eq!(
        info["model_version"],
        "nlptown/bert-base-multilingual-uncased-sentiment"
    );
    assert!(info["execution_time"].as_f64().unwrap() >= 0.0);
    assert!(!info["prediction_datetime"].as_str().unwrap().is_empty());

    let (user_id, stored_score): (i64, f64) =
        sqlx::query_as("SELECT user_id, score FROM sentiment")
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(user_id, 7);
    assert!((stored_score - 0.8).abs() < 1e-9);
}

#[tokio::test]
async fn sentiment_counts_characters_not_bytes() {
    let (app, _pool) = test_app(five_star_stub()).await;

    let (status, body) = post_json(app, "/sentiment", json!({"text": "añoño"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["execution_info"]["text_length"], 5);
}

#[tokio::test]
async fn empty_text_is_passed_through_to_the_model() {
    // Empty input is deliberately not short-circuited locally; the model's
    // own response drives the label and score.
    let (app, pool) = test_app(five_star_stub()).await;

    let (status, body) = post_json(app, "/sentiment", json!({"text": ""})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["execution_info"]["text_length"], 0);
    assert_eq!(body["prediction"]["label"], "5");

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sentiment")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn failing_model_persists_nothing() {
    let (app, pool) = test_app(Arc::new(FailingSentiment)).await;

    let (status, body) = post_json(app, "/sentiment", json!({"text": "gran dia"})).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"]["code"], "MODEL_UNAVAILABLE");

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sentiment")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
async fn missing_text_field_is_a_client_error() {
    let (app, _pool) = test_app(five_star_stub()).await;

    let (status, _body) = post_json(app, "/sentiment", json!({"log_id": 7})).await;
    assert!(status.is_client_error());
}

#[tokio::test]
async fn analysis_counts_match_summaries() {
    let (app, pool) = test_app(five_star_stub()).await;

    let (status, body) = post_json(
        app,
        "/analysis",
        json!({"text": "Madrid brilla hoy Sevilla", "user_id": 3}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let nlp = &body["nlp_analysis"];
    for (summary_key, count_key) in [
        ("pos_tags_summary", "pos_tags_count"),
        ("ner_summary", "ner_count"),
    ] {
        let summary = nlp[summary_key].as_object().unwrap();
        let counts = nlp[count_key].as_object().unwrap();
        assert_eq!(summary.len(), counts.len());
        for (tag, surfaces) in summary {
            assert_eq!(
                counts[tag].as_u64().unwrap(),
                surfaces.as_array().unwrap().len() as u64,
                "count mismatch for tag {}",
                tag
            );
        }
    }

    // Stub emits two PROPN tokens and one LOC pair
    assert_eq!(nlp["pos_tags_count"]["PROPN"], 2);
    assert_eq!(nlp["ner_count"]["LOC"], 2);

    // One embedding vector per token
    assert_eq!(nlp["embeddings"].as_array().unwrap().len(), 4);

    assert_eq!(body["sentiment_analysis"]["label"], "5");
    let score = body["sentiment_analysis"]["score"].as_f64().unwrap();
    assert!((score - 0.8).abs() < 1e-9);

    let (user_id, stored_counts): (i64, String) =
        sqlx::query_as("SELECT user_id, pos_counts FROM analysis")
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(user_id, 3);
    let stored_counts: Value = serde_json::from_str(&stored_counts).unwrap();
    assert_eq!(stored_counts["PROPN"], 2);
}

#[tokio::test]
async fn personalized_response_uses_mood_bucket() {
    let (app, _pool) = test_app(five_star_stub()).await;

    let (status, body) = post_json(
        app,
        "/personalized_response",
        json!({"text": "me encanta este dia", "log_id": 1}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let message = body["message"].as_str().unwrap();
    // EchoGenerative reflects the follow-up prompt; label "5" buckets happy
    assert!(message.contains("me encanta este dia"));
    assert!(message.contains("I am feeling happy"));
}

#[tokio::test]
async fn personalized_response_neutral_and_sad_buckets() {
    for (label, expected) in [("3", "neutral"), ("1", "sad or angry")] {
        let stub = Arc::new(FixedSentiment(vec![ScoredLabel {
            label: label.to_string(),
            score: 0.5,
        }]));
        let (app, _pool) = test_app(stub).await;

        let (status, body) = post_json(
            app,
            "/personalized_response",
            json!({"text": "un dia cualquiera", "log_id": 1}),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let message = body["message"].as_str().unwrap();
        assert!(
            message.contains(&format!("I am feeling {}", expected)),
            "label {} should bucket to {}",
            label,
            expected
        );
    }
}
