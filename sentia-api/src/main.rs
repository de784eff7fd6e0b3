//! sentia-api - Text analytics API service
//!
//! Accepts user text, runs sentiment classification and linguistic
//! analysis against external model services, optionally generates an
//! empathetic reply, and persists every request with execution telemetry.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use sentia_api::models::{HostedSentimentModel, OpenAiChatModel, TaggerClient};
use sentia_api::{build_router, AppState, Orchestrator};
use sentia_common::config::Settings;

#[derive(Parser, Debug)]
#[command(name = "sentia-api", version, about = "Sentia text analytics API")]
struct Args {
    /// Path to TOML config file
    #[arg(long, env = "SENTIA_CONFIG")]
    config: Option<PathBuf>,

    /// Override the bind address from the config
    #[arg(long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("Starting sentia-api v{}", env!("CARGO_PKG_VERSION"));

    let mut settings = Settings::load(args.config.as_deref())?;
    if let Some(bind) = args.bind {
        settings.bind_addr = bind;
    }
    let settings = Arc::new(settings);

    info!("Database: {}", settings.database_path.display());
    let db_pool = sentia_common::db::init_database_pool(&settings.database_path).await?;
    info!("Database connection established");

    // External model collaborators, injected rather than constructed at
    // module scope.
    let sentiment = Arc::new(HostedSentimentModel::new(&settings.sentiment_endpoint)?);
    let linguistic = Arc::new(TaggerClient::new(&settings.nlp_endpoint)?);
    let api_key = settings.openai_api_key.clone().unwrap_or_default();
    let generative = Arc::new(OpenAiChatModel::new(
        &settings.openai_endpoint,
        &api_key,
        &settings.openai_model,
    )?);
    if api_key.is_empty() {
        tracing::warn!("No OpenAI API key configured; /personalized_response will fail");
    }

    let orchestrator = Arc::new(Orchestrator::new(
        db_pool,
        Arc::clone(&settings),
        sentiment,
        linguistic,
        generative,
    ));

    let state = AppState::new(orchestrator);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&settings.bind_addr).await?;
    info!("sentia-api listening on http://{}", settings.bind_addr);
    info!("Health check: http://{}/health", settings.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
