mod auth;
mod config;
mod db;
mod errors;
mod llm_client;
mod models;
mod pinger;
mod routes;
mod screening;
mod state;

use anyhow::Result;
use axum::http::{header, HeaderValue, Method};
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::create_pool;
use crate::llm_client::GeminiClient;
use crate::routes::build_router;
use crate::screening::prompts;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            let crate_target = env!("CARGO_PKG_NAME").replace('-', "_");
            EnvFilter::new(format!("{crate_target}={}", &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting ResumeWise API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL and apply migrations
    let db = create_pool(&config.database_url).await?;

    // Initialize the Gemini structured client
    let llm = GeminiClient::new(config.gemini_api_key.clone(), config.gemini_api_url.clone());
    info!("LLM client initialized ({})", &config.gemini_api_url);

    // Load the prompt template once; built-in default applies when absent
    let prompt_template = prompts::load_template(&config.prompt_template_path);

    let state = AppState {
        db,
        llm,
        config: config.clone(),
        prompt_template,
    };

    let cors = CorsLayer::new()
        .allow_origin(
            config
                .client_url
                .parse::<HeaderValue>()
                .map_err(|e| anyhow::anyhow!("CLIENT_URL is not a valid origin: {e}"))?,
        )
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;

    // Keep-alive pinger runs for the lifetime of the server
    let pinger = pinger::spawn(&config);

    tokio::select! {
        r = axum::serve(listener, app) => {
            tracing::warn!("server ended unexpectedly: {r:?}");
        }
        _ = tokio::signal::ctrl_c() => {
            info!("received ctrl+c interrupt, shutting down");
        }
    }

    pinger.abort();
    Ok(())
}
