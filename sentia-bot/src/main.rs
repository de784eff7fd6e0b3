//! sentia-bot - Companion chat bot
//!
//! Long-polls the Telegram Bot API, dispatches the five supported commands,
//! calls the sentia API on behalf of remote chat users and logs every
//! command to the shared user_log table.

mod api_client;
mod session;
mod telegram;

use anyhow::{anyhow, Result};
use chrono::Utc;
use clap::Parser;
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

use sentia_common::api::types::TextAnalysisResponse;
use sentia_common::config::Settings;
use sentia_common::db::records::{self, UserLogRecord};

use api_client::SentiaApiClient;
use session::{SessionMap, SessionState};
use telegram::{Message, TelegramClient};

#[derive(Parser, Debug)]
#[command(name = "sentia-bot", version, about = "Sentia companion chat bot")]
struct Args {
    /// Path to TOML config file
    #[arg(long, env = "SENTIA_CONFIG")]
    config: Option<PathBuf>,
}

const HELP_TEXT: &str = "Available commands:\n\
/start - start interacting with the bot\n\
/help - show this help\n\
/status - current service status\n\
/sentiment - sentiment analysis of a text\n\
/analysis - full text analysis (POS tags, NER and sentiment)";

const ANALYSIS_FAILED_REPLY: &str =
    "The analysis could not be completed, please try again later.";

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("Starting sentia-bot v{}", env!("CARGO_PKG_VERSION"));

    let settings = Settings::load(args.config.as_deref())?;
    let token = settings
        .telegram_token
        .as_deref()
        .ok_or_else(|| anyhow!("telegram_token is not configured"))?;

    let pool = sentia_common::db::init_database_pool(&settings.database_path).await?;
    let telegram = TelegramClient::new(token)?;
    let api = SentiaApiClient::new(&settings.api_url)?;
    let mut sessions = SessionMap::new();

    info!("Polling for updates (API at {})", settings.api_url);

    let mut offset = 0i64;
    loop {
        let updates = match telegram.get_updates(offset).await {
            Ok(updates) => updates,
            Err(e) => {
                warn!("getUpdates failed, retrying: {}", e);
                tokio::time::sleep(Duration::from_secs(5)).await;
                continue;
            }
        };

        for update in updates {
            offset = offset.max(update.update_id + 1);
            let Some(message) = update.message else {
                continue;
            };

            if let Err(e) = handle_message(&telegram, &api, &pool, &mut sessions, &message).await {
                warn!(chat_id = message.chat.id, "Message handling failed: {}", e);
            }
        }
    }
}

async fn handle_message(
    telegram: &TelegramClient,
    api: &SentiaApiClient,
    pool: &SqlitePool,
    sessions: &mut SessionMap,
    message: &Message,
) -> Result<()> {
    let chat_id = message.chat.id;
    let Some(text) = message.text.as_deref() else {
        return Ok(());
    };

    if text.starts_with('/') {
        // A fresh command supersedes any pending prompt
        sessions.reset(chat_id);
        return handle_command(telegram, api, pool, sessions, message, text).await;
    }

    let state = sessions.take(chat_id);
    let user_id = message.from.as_ref().map(|u| u.id).unwrap_or(chat_id);
    let reply = prompted_reply(api, state, text, user_id).await;
    telegram.send_message(chat_id, &reply).await
}

/// Build the chat reply for a prompted (command-less) message. An API
/// failure becomes a visible failure notice rather than silence.
async fn prompted_reply(
    api: &SentiaApiClient,
    state: SessionState,
    text: &str,
    user_id: i64,
) -> String {
    let result = match state {
        SessionState::AwaitingCommand => {
            return "Send a command first. Try /help.".to_string();
        }
        SessionState::AwaitingSentimentText => {
            api.analyze_sentiment(text, Some(user_id)).await.map(|r| {
                format!(
                    "Sentiment analysis:\nLabel: {}\nScore: {:.4}",
                    r.prediction.label, r.prediction.score
                )
            })
        }
        SessionState::AwaitingAnalysisText => match api.analyze_text(text, user_id).await {
            Ok(r) => analysis_reply(&r),
            Err(e) => Err(e),
        },
    };

    result.unwrap_or_else(|e| {
        warn!(user_id, "Prompted analysis failed: {}", e);
        ANALYSIS_FAILED_REPLY.to_string()
    })
}

fn analysis_reply(result: &TextAnalysisResponse) -> Result<String> {
    Ok(format!(
        "Text analysis:\nPOS tags: {}\nEntities: {}\nSentiment: {} ({:.4})",
        serde_json::to_string(&result.nlp_analysis.pos_tags_count)?,
        serde_json::to_string(&result.nlp_analysis.ner_count)?,
        result.sentiment_analysis.label,
        result.sentiment_analysis.score,
    ))
}

async fn handle_command(
    telegram: &TelegramClient,
    api: &SentiaApiClient,
    pool: &SqlitePool,
    sessions: &mut SessionMap,
    message: &Message,
    text: &str,
) -> Result<()> {
    let chat_id = message.chat.id;
    let user_id = message.from.as_ref().map(|u| u.id).unwrap_or(chat_id);
    let username = message
        .from
        .as_ref()
        .and_then(|u| u.username.clone())
        .unwrap_or_default();

    let command = text.split_whitespace().next().unwrap_or(text);

    if command == "/status" {
        if !authorize_status(pool, user_id, &username, text).await? {
            return telegram
                .send_message(chat_id, "You are not allowed to use this command.")
                .await;
        }
    } else {
        log_user_command(pool, user_id, &username, text).await;
    }

    match command {
        "/start" => {
            let reply = format!("Hello {}, welcome to your text analysis assistant.", username);
            telegram.send_message(chat_id, &reply).await
        }
        "/help" => telegram.send_message(chat_id, HELP_TEXT).await,
        "/status" => {
            let status = api.get_status().await?;
            let reply = format!(
                "Service: {}\nVersion: {}\nStatus: {}\nLog level: {}\nModels:\n\
                 - sentiment: {}\n - nlp: {}\n - gpt: {}",
                status.service_name,
                status.version,
                status.status,
                status.log_level,
                status.models_info.sentiment_model,
                status.models_info.nlp_model,
                status.models_info.gpt_model,
            );
            telegram.send_message(chat_id, &reply).await
        }
        "/sentiment" => {
            sessions.expect(chat_id, SessionState::AwaitingSentimentText);
            telegram
                .send_message(chat_id, "Please send the text for sentiment analysis.")
                .await
        }
        "/analysis" => {
            sessions.expect(chat_id, SessionState::AwaitingAnalysisText);
            telegram
                .send_message(chat_id, "Please send the text for full analysis.")
                .await
        }
        _ => {
            telegram
                .send_message(chat_id, "Unknown command. Try /help.")
                .await
        }
    }
}

/// Gate for /status: only users already present in user_log may query it.
/// The allow-list is read first and the command is recorded only when
/// access is granted, so a denied /status leaves no trace in the log and
/// can never authorize a later attempt.
async fn authorize_status(
    pool: &SqlitePool,
    user_id: i64,
    username: &str,
    command: &str,
) -> Result<bool> {
    let allowed = records::get_distinct_user_ids(pool).await?;
    if !allowed.contains(&user_id) {
        return Ok(false);
    }

    log_user_command(pool, user_id, username, command).await;
    Ok(true)
}

/// Append the command to user_log; a write failure must not break the chat
async fn log_user_command(pool: &SqlitePool, user_id: i64, username: &str, command: &str) {
    let record = UserLogRecord {
        user_id,
        username: username.to_string(),
        command_time: Utc::now(),
        command: command.to_string(),
    };

    if let Err(e) = records::insert_user_log(pool, &record).await {
        warn!("user_log persistence failed: {}", e);
    }
}
