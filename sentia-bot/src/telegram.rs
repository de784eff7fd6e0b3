//! Minimal Telegram Bot API client
//!
//! Long polling via getUpdates plus sendMessage; nothing else of the Bot
//! API surface is needed here.

use anyhow::{anyhow, Result};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

const POLL_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Deserialize)]
struct ApiEnvelope<T> {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
    result: Option<T>,
}

/// One long-poll update
#[derive(Debug, Deserialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
}

/// Incoming chat message
#[derive(Debug, Deserialize)]
pub struct Message {
    pub from: Option<User>,
    pub chat: Chat,
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Chat {
    pub id: i64,
}

/// Telegram Bot API client
pub struct TelegramClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl TelegramClient {
    pub fn new(token: &str) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            // Long poll blocks up to POLL_TIMEOUT_SECS server-side
            .timeout(Duration::from_secs(POLL_TIMEOUT_SECS + 10))
            .build()?;

        Ok(Self {
            http_client,
            base_url: format!("https://api.telegram.org/bot{}", token),
        })
    }

    /// Fetch pending updates past `offset` (long poll)
    pub async fn get_updates(&self, offset: i64) -> Result<Vec<Update>> {
        let url = format!("{}/getUpdates", self.base_url);

        let envelope: ApiEnvelope<Vec<Update>> = self
            .http_client
            .get(&url)
            .query(&[("offset", offset), ("timeout", POLL_TIMEOUT_SECS as i64)])
            .send()
            .await?
            .json()
            .await?;

        if !envelope.ok {
            return Err(anyhow!(
                "getUpdates failed: {}",
                envelope.description.unwrap_or_default()
            ));
        }

        Ok(envelope.result.unwrap_or_default())
    }

    /// Send a plain-text message to a chat
    pub async fn send_message(&self, chat_id: i64, text: &str) -> Result<()> {
        let url = format!("{}/sendMessage", self.base_url);

        let envelope: ApiEnvelope<serde_json::Value> = self
            .http_client
            .post(&url)
            .json(&json!({ "chat_id": chat_id, "text": text }))
            .send()
            .await?
            .json()
            .await?;

        if !envelope.ok {
            return Err(anyhow!(
                "sendMessage failed: {}",
                envelope.description.unwrap_or_default()
            ));
        }

        Ok(())
    }
}
