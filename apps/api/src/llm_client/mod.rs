/// LLM Client — the single point of entry for all Gemini API calls in the
/// screening service.
///
/// ARCHITECTURAL RULE: No other module may call the Generative Language API
/// directly. All model interactions MUST go through this module.
use reqwest::StatusCode;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

/// Default generateContent endpoint. Overridable through `GEMINI_API_URL`
/// for tests and regional deployments.
pub const DEFAULT_API_URL: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent";

/// Low temperature to favor deterministic, schema-faithful output.
const TEMPERATURE: f64 = 0.1;
const JSON_MIME_TYPE: &str = "application/json";

/// Retry budget and timing knobs. Retry state itself (the attempt counter and
/// the backoff computed from it) lives on the stack of a single `generate`
/// call and is never shared across requests.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_backoff: Duration,
    pub request_timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            max_attempts: 5,
            initial_backoff: Duration::from_secs(1),
            request_timeout: Duration::from_secs(60),
        }
    }
}

/// Failures are classified here, at the point of origin, into a closed set.
/// Retry decisions are driven only off this classification: 503 and timeouts
/// retry, everything else fails fast. In particular a parse failure on a 200
/// response is permanent — retrying an already-successful HTTP call would
/// only amplify cost.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("GEMINI_API_KEY is not configured")]
    MissingApiKey,

    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("API error (status {status}): {body}")]
    Api { status: u16, body: String },

    #[error("retries exhausted after {attempts} attempts: {last_error}")]
    RetriesExhausted { attempts: u32, last_error: String },

    #[error("malformed response from model: {0}")]
    Malformed(String),
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    role: &'a str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
    response_schema: Value,
    temperature: f64,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

/// Client for Gemini structured-output calls. Wraps the generateContent API
/// with schema-constrained generation, retry with exponential backoff, and
/// strict deserialization of the returned payload.
///
/// Worst case for a fully retried failure is max_attempts × request_timeout
/// plus the backoff sum — about 315 s on default settings. Callers needing a
/// tighter bound should wrap `generate` in their own deadline.
#[derive(Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: String,
    api_url: String,
    policy: RetryPolicy,
}

impl GeminiClient {
    pub fn new(api_key: String, api_url: String) -> Self {
        Self::with_policy(api_key, api_url, RetryPolicy::default())
    }

    pub fn with_policy(api_key: String, api_url: String, policy: RetryPolicy) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(policy.request_timeout)
                .build()
                .expect("Failed to build HTTP client"),
            api_key,
            api_url,
            policy,
        }
    }

    /// Calls the model with a schema-constrained generation config and
    /// deserializes the first candidate's text payload as `T`.
    ///
    /// Retries on HTTP 503 and per-attempt timeouts, with backoff before
    /// attempt n of `2^(n-1)` × the initial backoff (1 s, 2 s, 4 s, 8 s on
    /// defaults). All other failures surface immediately.
    pub async fn generate<T: DeserializeOwned>(
        &self,
        prompt: &str,
        schema: Value,
    ) -> Result<T, LlmError> {
        if self.api_key.is_empty() {
            return Err(LlmError::MissingApiKey);
        }

        let request_body = GenerateContentRequest {
            contents: vec![RequestContent {
                role: "user",
                parts: vec![RequestPart { text: prompt }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: JSON_MIME_TYPE,
                response_schema: schema,
                temperature: TEMPERATURE,
            },
        };

        let mut last_error = String::new();

        for attempt in 0..self.policy.max_attempts {
            if attempt > 0 {
                let delay = self.policy.initial_backoff * (1 << (attempt - 1));
                warn!(
                    "model call attempt {} failed ({}), retrying after {}ms",
                    attempt,
                    last_error,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            debug!(
                "calling Gemini API (attempt {}/{})",
                attempt + 1,
                self.policy.max_attempts
            );

            let response = self
                .client
                .post(&self.api_url)
                .query(&[("key", self.api_key.as_str())])
                .json(&request_body)
                .send()
                .await;

            let response = match response {
                Ok(r) => r,
                Err(e) if e.is_timeout() => {
                    last_error = "request timed out".to_string();
                    continue;
                }
                Err(e) => return Err(LlmError::Transport(e)),
            };

            let status = response.status();

            if status == StatusCode::SERVICE_UNAVAILABLE {
                let body = response.text().await.unwrap_or_default();
                last_error = format!("503 service unavailable: {body}");
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(LlmError::Api {
                    status: status.as_u16(),
                    body,
                });
            }

            let envelope: GenerateContentResponse = response
                .json()
                .await
                .map_err(|e| LlmError::Malformed(format!("invalid response envelope: {e}")))?;

            let text = envelope
                .candidates
                .first()
                .and_then(|c| c.content.parts.first())
                .and_then(|p| p.text.as_deref())
                .ok_or_else(|| {
                    LlmError::Malformed("LLM response format was unexpected".to_string())
                })?;

            return serde_json::from_str(text.trim())
                .map_err(|e| LlmError::Malformed(format!("payload violates schema: {e}")));
        }

        Err(LlmError::RetriesExhausted {
            attempts: self.policy.max_attempts,
            last_error,
        })
    }
}
