//! Sentia API client
//!
//! Thin reqwest wrapper over the three endpoints the bot consumes, using
//! the shared wire types from sentia-common.

use anyhow::{anyhow, Result};
use std::time::Duration;

use sentia_common::api::types::{
    AnalysisRequest, SentimentAnalysisResponse, SentimentRequest, StatusResponse,
    TextAnalysisResponse,
};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// HTTP client for the sentia-api service
pub struct SentiaApiClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl SentiaApiClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub async fn get_status(&self) -> Result<StatusResponse> {
        let url = format!("{}/status", self.base_url);
        let response = self.http_client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(anyhow!("status request failed: {}", response.status()));
        }

        Ok(response.json().await?)
    }

    pub async fn analyze_sentiment(
        &self,
        text: &str,
        log_id: Option<i64>,
    ) -> Result<SentimentAnalysisResponse> {
        let url = format!("{}/sentiment", self.base_url);
        let request = SentimentRequest {
            text: text.to_string(),
            log_id,
        };

        let response = self.http_client.post(&url).json(&request).send().await?;

        if !response.status().is_success() {
            return Err(anyhow!("sentiment request failed: {}", response.status()));
        }

        Ok(response.json().await?)
    }

    pub async fn analyze_text(&self, text: &str, user_id: i64) -> Result<TextAnalysisResponse> {
        let url = format!("{}/analysis", self.base_url);
        let request = AnalysisRequest {
            text: text.to_string(),
            user_id,
        };

        let response = self.http_client.post(&url).json(&request).send().await?;

        if !response.status().is_success() {
            return Err(anyhow!("analysis request failed: {}", response.status()));
        }

        Ok(response.json().await?)
    }
}
