//! External model collaborators
//!
//! The three models are opaque external services behind object-safe trait
//! seams, injected into the orchestrator at construction. Tests substitute
//! stub implementations; production wires the HTTP clients below.

pub mod generative;
pub mod linguistic;
pub mod sentiment;

pub use generative::OpenAiChatModel;
pub use linguistic::TaggerClient;
pub use sentiment::HostedSentimentModel;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use sentia_common::Result;

/// One sentiment label with its raw model confidence in [0, 1]
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScoredLabel {
    pub label: String,
    pub score: f64,
}

/// One token from the linguistic engine
#[derive(Debug, Clone)]
pub struct Token {
    pub surface: String,
    pub pos_tag: String,
    /// Per-token embedding vector
    pub vector: Vec<f32>,
}

/// One recognized named entity
#[derive(Debug, Clone)]
pub struct Entity {
    pub surface: String,
    pub entity_tag: String,
}

/// Full output of the linguistic engine for one input text
#[derive(Debug, Clone, Default)]
pub struct ParsedDocument {
    pub tokens: Vec<Token>,
    pub entities: Vec<Entity>,
}

/// Sentiment classification model (black box)
///
/// Returns labels ordered highest-confidence first; callers use element 0.
#[async_trait]
pub trait SentimentModel: Send + Sync {
    async fn classify(&self, text: &str) -> Result<Vec<ScoredLabel>>;
}

/// Linguistic analysis engine (black box): tokenizer, POS tagger,
/// entity recognizer and per-token embeddings.
#[async_trait]
pub trait LinguisticEngine: Send + Sync {
    async fn process(&self, text: &str) -> Result<ParsedDocument>;
}

/// Generative chat model (black box): one round trip, no streaming.
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    async fn complete(
        &self,
        system_instruction: &str,
        user_text: &str,
        follow_up: &str,
    ) -> Result<String>;
}
