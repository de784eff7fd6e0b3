//! Configuration loading for Sentia services
//!
//! Settings are resolved in two tiers: a TOML config file (explicit path,
//! `~/.config/sentia/config.toml`, or compiled defaults when absent), then
//! `SENTIA_*` environment variable overrides on top. The environment tier
//! wins so deployments can inject secrets without editing files.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Service configuration shared by the API server and the bot
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Service identity, also the upsert key of the service_status row
    pub service_name: String,
    /// Log level reported via /status ("INFO", "DEBUG", ...)
    pub log_level: String,
    /// API server bind address
    pub bind_addr: String,
    /// SQLite database file path
    pub database_path: PathBuf,
    /// Hosted sentiment inference endpoint URL
    pub sentiment_endpoint: String,
    /// Sentiment model identifier reported in telemetry and /status
    pub sentiment_model_id: String,
    /// Linguistic tagger service endpoint URL
    pub nlp_endpoint: String,
    /// Linguistic model identifier reported in /status
    pub nlp_model_id: String,
    /// OpenAI-compatible chat completions endpoint
    pub openai_endpoint: String,
    /// Generative model identifier (e.g. "gpt-4")
    pub openai_model: String,
    /// API key for the generative endpoint (env override recommended)
    pub openai_api_key: Option<String>,
    /// Base URL the bot uses to reach the API server
    pub api_url: String,
    /// Telegram bot token (bot only)
    pub telegram_token: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            service_name: "sentia-api".to_string(),
            log_level: "INFO".to_string(),
            bind_addr: "127.0.0.1:8080".to_string(),
            database_path: default_database_path(),
            sentiment_endpoint: "http://127.0.0.1:8601/classify".to_string(),
            sentiment_model_id: "nlptown/bert-base-multilingual-uncased-sentiment"
                .to_string(),
            nlp_endpoint: "http://127.0.0.1:8602/process".to_string(),
            nlp_model_id: "spacy es_core_news_sm".to_string(),
            openai_endpoint: "https://api.openai.com/v1/chat/completions".to_string(),
            openai_model: "gpt-4".to_string(),
            openai_api_key: None,
            api_url: "http://127.0.0.1:8080".to_string(),
            telegram_token: None,
        }
    }
}

impl Settings {
    /// Load settings from the given TOML file (or the default location),
    /// then apply `SENTIA_*` environment overrides.
    pub fn load(explicit_path: Option<&Path>) -> Result<Settings> {
        let mut settings = match explicit_path {
            // An explicitly named file that does not exist is a
            // misconfiguration, not a fallback case.
            Some(path) if !path.exists() => {
                return Err(Error::Config(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            Some(path) => parse_toml_file(path)?,
            None => match default_config_path() {
                Some(path) => parse_toml_file(&path)?,
                None => Settings::default(),
            },
        };

        settings.apply_env_overrides();
        Ok(settings)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(v) = std::env::var("SENTIA_SERVICE_NAME") {
            self.service_name = v;
        }
        if let Ok(v) = std::env::var("SENTIA_LOG_LEVEL") {
            self.log_level = v;
        }
        if let Ok(v) = std::env::var("SENTIA_BIND_ADDR") {
            self.bind_addr = v;
        }
        if let Ok(v) = std::env::var("SENTIA_DATABASE_PATH") {
            self.database_path = PathBuf::from(v);
        }
        if let Ok(v) = std::env::var("SENTIA_SENTIMENT_ENDPOINT") {
            self.sentiment_endpoint = v;
        }
        if let Ok(v) = std::env::var("SENTIA_SENTIMENT_MODEL_ID") {
            self.sentiment_model_id = v;
        }
        if let Ok(v) = std::env::var("SENTIA_NLP_ENDPOINT") {
            self.nlp_endpoint = v;
        }
        if let Ok(v) = std::env::var("SENTIA_NLP_MODEL_ID") {
            self.nlp_model_id = v;
        }
        if let Ok(v) = std::env::var("SENTIA_OPENAI_ENDPOINT") {
            self.openai_endpoint = v;
        }
        if let Ok(v) = std::env::var("SENTIA_OPENAI_MODEL") {
            self.openai_model = v;
        }
        if let Ok(v) = std::env::var("SENTIA_OPENAI_API_KEY") {
            self.openai_api_key = Some(v);
        }
        if let Ok(v) = std::env::var("SENTIA_API_URL") {
            self.api_url = v;
        }
        if let Ok(v) = std::env::var("SENTIA_TELEGRAM_TOKEN") {
            self.telegram_token = Some(v);
        }
    }
}

fn parse_toml_file(path: &Path) -> Result<Settings> {
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))
}

/// Per-user config file location; None when no file exists there.
fn default_config_path() -> Option<PathBuf> {
    let user_config = dirs::config_dir().map(|d| d.join("sentia").join("config.toml"))?;
    if user_config.exists() {
        Some(user_config)
    } else {
        None
    }
}

/// OS-dependent default database location
fn default_database_path() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("sentia").join("sentia.db"))
        .unwrap_or_else(|| PathBuf::from("./sentia.db"))
}
