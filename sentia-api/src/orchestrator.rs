//! Per-endpoint analysis orchestration
//!
//! Each operation is one linear pipeline: validate, invoke the external
//! model(s), normalize the score, assemble the telemetry envelope, persist,
//! shape the response. Collaborators are injected at construction; the
//! orchestrator owns no request state between calls.
//!
//! Persistence policy: the record is written before the response is
//! returned, but a write failure after a successful analysis only logs a
//! warning; the caller still gets its computed result. The one exception is
//! first-time status initialization, where the stored row IS the response
//! and a write failure must surface.

use std::collections::BTreeMap;
use std::sync::Arc;

use sqlx::SqlitePool;
use tracing::{info, warn};

use sentia_common::api::types::{
    AnalysisRequest, ModelsInfo, NlpAnalysis, PersonalizedRequest, PersonalizedResponse,
    SentimentAnalysisResponse, SentimentPrediction, SentimentRequest, StatusResponse,
    TextAnalysisResponse,
};
use sentia_common::config::Settings;
use sentia_common::db::records::{
    self, AnalysisRecord, SentimentRecord, ServiceStatusRecord,
};
use sentia_common::{Error, Result};

use crate::models::{GenerativeModel, LinguisticEngine, ScoredLabel, SentimentModel};
use crate::score::{normalize, Mood};
use crate::telemetry;

/// System instruction for the personalized reply generation
const REPLY_SYSTEM_INSTRUCTION: &str = "Respond empathetically to the user's sentiment. \
Include a proverb, saying or joke matched to their mood, and always close with a song \
recommendation matched to their mood.";

/// Orchestrates the analysis endpoints over injected collaborators
pub struct Orchestrator {
    db: SqlitePool,
    settings: Arc<Settings>,
    sentiment: Arc<dyn SentimentModel>,
    linguistic: Arc<dyn LinguisticEngine>,
    generative: Arc<dyn GenerativeModel>,
}

impl Orchestrator {
    pub fn new(
        db: SqlitePool,
        settings: Arc<Settings>,
        sentiment: Arc<dyn SentimentModel>,
        linguistic: Arc<dyn LinguisticEngine>,
        generative: Arc<dyn GenerativeModel>,
    ) -> Self {
        Self {
            db,
            settings,
            sentiment,
            linguistic,
            generative,
        }
    }

    /// GET /status pipeline
    ///
    /// The service_status row is created lazily on first access and then
    /// serves as the cached value. Two concurrent first calls may both
    /// attempt the write; the upsert is idempotent by service_name, so the
    /// race is benign and deliberately not locked against. The response is
    /// always built from the re-read stored row, never from the locally
    /// constructed record.
    pub async fn get_status(&self) -> Result<StatusResponse> {
        if let Some(stored) = records::get_status(&self.db).await? {
            return Ok(status_response(stored));
        }

        let record = ServiceStatusRecord {
            service_name: self.settings.service_name.clone(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            log_level: self.settings.log_level.clone(),
            status: "Running".to_string(),
            models_info: ModelsInfo {
                sentiment_model: self.settings.sentiment_model_id.clone(),
                nlp_model: self.settings.nlp_model_id.clone(),
                gpt_model: self.settings.openai_model.clone(),
            },
        };

        // First-time initialization: here the write failure is fatal, the
        // stored row is the return value itself.
        records::upsert_status(&self.db, &record).await?;
        info!("Service status record created");

        let stored = records::get_status(&self.db)
            .await?
            .ok_or_else(|| Error::Internal("service_status row missing after upsert".to_string()))?;

        Ok(status_response(stored))
    }

    /// POST /sentiment pipeline
    ///
    /// Empty input is passed through to the model rather than short-circuited
    /// locally; whatever label/score the model assigns to it stands.
    pub async fn analyze_sentiment(
        &self,
        request: &SentimentRequest,
    ) -> Result<SentimentAnalysisResponse> {
        let (predictions, execution_info) = telemetry::wrap(
            &request.text,
            &self.settings.sentiment_model_id,
            || self.sentiment.classify(&request.text),
        )
        .await?;

        let top = top_prediction(predictions)?;
        let normalized_score = normalize(top.score);

        let record = SentimentRecord {
            user_id: request.log_id,
            text: request.text.clone(),
            label: top.label.clone(),
            score: normalized_score,
            predicted_at: execution_info.prediction_datetime.clone(),
            execution_time: execution_info.execution_time,
            model_version: execution_info.model_version.clone(),
            text_length: execution_info.text_length as i64,
            memory_usage: execution_info.memory_usage as i64,
            cpu_usage: execution_info.cpu_usage as f64,
        };

        if let Err(e) = records::insert_sentiment(&self.db, &record).await {
            warn!("Sentiment persistence failed (response still returned): {}", e);
        }

        Ok(SentimentAnalysisResponse {
            prediction: SentimentPrediction {
                label: top.label,
                score: normalized_score,
            },
            execution_info,
        })
    }

    /// POST /analysis pipeline
    ///
    /// Linguistic analysis and sentiment classification run on the same
    /// input within one telemetry envelope; one combined record is
    /// persisted.
    pub async fn analyze_text(&self, request: &AnalysisRequest) -> Result<TextAnalysisResponse> {
        let model_version = format!(
            "{} + {}",
            self.settings.nlp_model_id, self.settings.sentiment_model_id
        );

        let ((document, predictions), execution_info) =
            telemetry::wrap(&request.text, &model_version, || async {
                let document = self.linguistic.process(&request.text).await?;
                let predictions = self.sentiment.classify(&request.text).await?;
                Ok((document, predictions))
            })
            .await?;

        let top = top_prediction(predictions)?;
        let normalized_score = normalize(top.score);

        // Group surfaces by exact tag string, preserving token order within
        // each tag. Counts mirror the summary lengths by construction.
        let mut pos_tags_summary: BTreeMap<String, Vec<String>> = BTreeMap::new();
        let mut embeddings = Vec::with_capacity(document.tokens.len());
        for token in &document.tokens {
            pos_tags_summary
                .entry(token.pos_tag.clone())
                .or_default()
                .push(token.surface.clone());
            embeddings.push(token.vector.clone());
        }
        let pos_tags_count: BTreeMap<String, usize> = pos_tags_summary
            .iter()
            .map(|(tag, surfaces)| (tag.clone(), surfaces.len()))
            .collect();

        let mut ner_summary: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for entity in &document.entities {
            ner_summary
                .entry(entity.entity_tag.clone())
                .or_default()
                .push(entity.surface.clone());
        }
        let ner_count: BTreeMap<String, usize> = ner_summary
            .iter()
            .map(|(tag, surfaces)| (tag.clone(), surfaces.len()))
            .collect();

        let record = AnalysisRecord {
            user_id: Some(request.user_id),
            text: request.text.clone(),
            pos_summary: pos_tags_summary.clone(),
            pos_counts: pos_tags_count.clone(),
            ner_summary: ner_summary.clone(),
            ner_counts: ner_count.clone(),
            sentiment_label: top.label.clone(),
            sentiment_score: normalized_score,
            predicted_at: execution_info.prediction_datetime.clone(),
            execution_time: execution_info.execution_time,
            model_version: execution_info.model_version.clone(),
            text_length: execution_info.text_length as i64,
            memory_usage: execution_info.memory_usage as i64,
            cpu_usage: execution_info.cpu_usage as f64,
        };

        if let Err(e) = records::insert_analysis(&self.db, &record).await {
            warn!("Analysis persistence failed (response still returned): {}", e);
        }

        Ok(TextAnalysisResponse {
            nlp_analysis: NlpAnalysis {
                pos_tags_summary,
                pos_tags_count,
                ner_summary,
                ner_count,
                embeddings,
            },
            sentiment_analysis: SentimentPrediction {
                label: top.label,
                score: normalized_score,
            },
            execution_info,
        })
    }

    /// POST /personalized_response pipeline
    ///
    /// Classifies the text, buckets the label into a coarse mood and issues
    /// one generative call. No retry; a generation failure propagates.
    pub async fn personalized_reply(
        &self,
        request: &PersonalizedRequest,
    ) -> Result<PersonalizedResponse> {
        let predictions = self.sentiment.classify(&request.text).await?;
        let top = top_prediction(predictions)?;

        let mood = Mood::from_label(&top.label);
        let follow_up = format!(
            "I am feeling {}. Can you provide a supportive message?",
            mood
        );

        let message = self
            .generative
            .complete(REPLY_SYSTEM_INSTRUCTION, &request.text, &follow_up)
            .await?;

        Ok(PersonalizedResponse { message })
    }
}

fn top_prediction(predictions: Vec<ScoredLabel>) -> Result<ScoredLabel> {
    predictions
        .into_iter()
        .next()
        .ok_or_else(|| Error::ModelUnavailable("sentiment model returned no predictions".to_string()))
}

fn status_response(record: ServiceStatusRecord) -> StatusResponse {
    StatusResponse {
        service_name: record.service_name,
        version: record.version,
        log_level: record.log_level,
        status: record.status,
        models_info: record.models_info,
    }
}
