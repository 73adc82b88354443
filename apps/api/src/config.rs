use anyhow::{Context, Result};

use crate::llm_client;

/// Application configuration loaded once from environment variables at
/// startup and treated as read-only afterwards.
///
/// `GEMINI_API_KEY` is deliberately not required here: its absence is
/// surfaced per-request by the LLM client as a configuration fault, so the
/// rest of the service (auth, health) stays usable.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub gemini_api_key: String,
    pub gemini_api_url: String,
    pub prompt_template_path: String,
    pub client_url: String,
    pub environment: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            jwt_secret: require_env("JWT_SECRET")?,
            gemini_api_key: std::env::var("GEMINI_API_KEY").unwrap_or_default(),
            gemini_api_url: std::env::var("GEMINI_API_URL")
                .unwrap_or_else(|_| llm_client::DEFAULT_API_URL.to_string()),
            prompt_template_path: std::env::var("PROMPT_TEMPLATE_PATH")
                .unwrap_or_else(|_| "prompt.txt".to_string()),
            client_url: std::env::var("CLIENT_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            environment: std::env::var("ENVIRONMENT")
                .unwrap_or_else(|_| "development".to_string()),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8000".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}
