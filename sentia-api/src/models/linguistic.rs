//! Linguistic tagger service client
//!
//! Talks to a spaCy-style tagger microservice: one POST with the raw text,
//! one response carrying tokens (surface, POS tag, embedding vector) and
//! recognized entities. Tags are passed through exactly as the engine
//! emits them; no normalization is imposed here or downstream.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

use sentia_common::{Error, Result};

use super::{Entity, LinguisticEngine, ParsedDocument, Token};

const USER_AGENT: &str = concat!("sentia/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Wire format of the tagger service response
#[derive(Debug, Deserialize)]
struct TaggerResponse {
    #[serde(default)]
    tokens: Vec<WireToken>,
    #[serde(default)]
    ents: Vec<WireEntity>,
}

#[derive(Debug, Deserialize)]
struct WireToken {
    text: String,
    pos: String,
    #[serde(default)]
    vector: Vec<f32>,
}

#[derive(Debug, Deserialize)]
struct WireEntity {
    text: String,
    label: String,
}

/// HTTP client for the linguistic tagger service
pub struct TaggerClient {
    http_client: reqwest::Client,
    endpoint: String,
}

impl TaggerClient {
    pub fn new(endpoint: &str) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| Error::ModelUnavailable(e.to_string()))?;

        Ok(Self {
            http_client,
            endpoint: endpoint.to_string(),
        })
    }
}

#[async_trait]
impl LinguisticEngine for TaggerClient {
    async fn process(&self, text: &str) -> Result<ParsedDocument> {
        tracing::debug!(endpoint = %self.endpoint, "Querying linguistic engine");

        let response = self
            .http_client
            .post(&self.endpoint)
            .json(&json!({ "text": text }))
            .send()
            .await
            .map_err(|e| Error::ModelUnavailable(format!("tagger request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(Error::ModelUnavailable(format!(
                "linguistic engine returned {}: {}",
                status, error_text
            )));
        }

        let parsed: TaggerResponse = response
            .json()
            .await
            .map_err(|e| Error::ModelUnavailable(format!("tagger response parse: {}", e)))?;

        let document = ParsedDocument {
            tokens: parsed
                .tokens
                .into_iter()
                .map(|t| Token {
                    surface: t.text,
                    pos_tag: t.pos,
                    vector: t.vector,
                })
                .collect(),
            entities: parsed
                .ents
                .into_iter()
                .map(|e| Entity {
                    surface: e.text,
                    entity_tag: e.label,
                })
                .collect(),
        };

        tracing::debug!(
            tokens = document.tokens.len(),
            entities = document.entities.len(),
            "Linguistic engine responded"
        );

        Ok(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tagger_response_deserializes() {
        let body = r#"{
            "tokens": [
                {"text": "Madrid", "pos": "PROPN", "vector": [0.1, 0.2]},
                {"text": "brilla", "pos": "VERB", "vector": [0.3, 0.4]}
            ],
            "ents": [
                {"text": "Madrid", "label": "LOC"}
            ]
        }"#;

        let parsed: TaggerResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.tokens.len(), 2);
        assert_eq!(parsed.tokens[0].pos, "PROPN");
        assert_eq!(parsed.ents[0].label, "LOC");
    }

    #[test]
    fn missing_sections_default_to_empty() {
        let parsed: TaggerResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.tokens.is_empty());
        assert!(parsed.ents.is_empty());
    }
}
