//! Hosted sentiment model client
//!
//! Talks to a hosted inference endpoint (HuggingFace-style) serving a
//! five-point review-polarity classifier. The endpoint accepts
//! `{"inputs": "<text>"}` and answers one ranked label list per input,
//! highest confidence first.

use async_trait::async_trait;
use serde_json::json;
use std::time::Duration;

use sentia_common::{Error, Result};

use super::{ScoredLabel, SentimentModel};

const USER_AGENT: &str = concat!("sentia/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client for the hosted sentiment inference endpoint
pub struct HostedSentimentModel {
    http_client: reqwest::Client,
    endpoint: String,
}

impl HostedSentimentModel {
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
impl SentimentModel for HostedSentimentModel {
    async fn classify(&self, text: &str) -> Result<Vec<ScoredLabel>> {
        tracing::debug!(endpoint = %self.endpoint, "Querying sentiment model");

        let response = self
            .http_client
            .post(&self.endpoint)
            .json(&json!({ "inputs": text }))
            .send()
            .await
            .map_err(|e| Error::ModelUnavailable(format!("sentiment request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(Error::ModelUnavailable(format!(
                "sentiment model returned {}: {}",
                status, error_text
            )));
        }

        // One ranked list per input; we send exactly one input.
        let batches: Vec<Vec<ScoredLabel>> = response
            .json()
            .await
            .map_err(|e| Error::ModelUnavailable(format!("sentiment response parse: {}", e)))?;

        let predictions = batches.into_iter().next().unwrap_or_default();

        tracing::debug!(
            predictions = predictions.len(),
            "Sentiment model responded"
        );

        Ok(predictions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_creation() {
        let client = HostedSentimentModel::new("http://127.0.0.1:8601/classify");
        assert!(client.is_ok());
    }

    #[test]
    fn scored_label_deserializes_ranked_batch() {
        let body = r#"[[{"label":"5","score":0.9},{"label":"4","score":0.07}]]"#;
        let batches: Vec<Vec<ScoredLabel>> = serde_json::from_str(body).unwrap();
        assert_eq!(batches[0][0].label, "5");
        assert!((batches[0][0].score - 0.9).abs() < f64::EPSILON);
    }
}
