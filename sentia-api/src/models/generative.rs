//! Generative chat model client (OpenAI-compatible)
//!
//! One chat-completions round trip per call: system instruction, the
//! user's original text, then the mood follow-up prompt. No streaming, no
//! retries; a failed call propagates to the endpoint as a generation error.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

use sentia_common::{Error, Result};

use super::GenerativeModel;

const USER_AGENT: &str = concat!("sentia/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);
const TEMPERATURE: f64 = 0.7;

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: String,
}

/// HTTP client for an OpenAI-compatible chat completions endpoint
pub struct OpenAiChatModel {
    http_client: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
}

impl OpenAiChatModel {
    pub fn new(endpoint: &str, api_key: &str, model: &str) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| Error::ModelUnavailable(e.to_string()))?;

        Ok(Self {
            http_client,
            endpoint: endpoint.to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
        })
    }
}

#[async_trait]
impl GenerativeModel for OpenAiChatModel {
    async fn complete(
        &self,
        system_instruction: &str,
        user_text: &str,
        follow_up: &str,
    ) -> Result<String> {
        tracing::debug!(model = %self.model, "Requesting chat completion");

        let body = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": system_instruction },
                { "role": "user", "content": user_text },
                { "role": "user", "content": follow_up },
            ],
            "temperature": TEMPERATURE,
        });

        let response = self
            .http_client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::ModelUnavailable(format!("completion request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(Error::ModelUnavailable(format!(
                "generative model returned {}: {}",
                status, error_text
            )));
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| Error::ModelUnavailable(format!("completion response parse: {}", e)))?;

        completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| Error::ModelUnavailable("completion returned no choices".to_string()))
    }
}
