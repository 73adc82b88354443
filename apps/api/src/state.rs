use sqlx::PgPool;

use crate::config::Config;
use crate::llm_client::GeminiClient;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub llm: GeminiClient,
    pub config: Config,
    /// Prompt template loaded once at startup; built-in default when the
    /// configured file is absent.
    pub prompt_template: String,
}
