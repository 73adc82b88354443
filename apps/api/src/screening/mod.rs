//! Candidate screening pipeline: text extraction → prompt assembly →
//! structured model call → validated result.
//!
//! The pipeline is a pure function of the two inputs. It holds no state
//! between requests and performs no authentication; callers reach it only
//! through the authenticated HTTP layer.

pub mod extract;
pub mod handlers;
pub mod prompts;

use std::fmt;

use bytes::Bytes;
use thiserror::Error;

use crate::llm_client::{GeminiClient, LlmError};
use crate::models::screening::{screening_response_schema, ScreeningResult};

/// Which half of the pair an input belongs to. Only used for error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputSide {
    Resume,
    JobDescription,
}

impl fmt::Display for InputSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputSide::Resume => write!(f, "resume"),
            InputSide::JobDescription => write!(f, "job description"),
        }
    }
}

/// One side of a screening request: an uploaded document, raw text, or
/// neither. When both are present the raw text wins and the file is ignored.
#[derive(Debug, Default)]
pub struct CandidateInput {
    pub file: Option<FileUpload>,
    pub text: Option<String>,
}

#[derive(Debug)]
pub struct FileUpload {
    pub bytes: Bytes,
    pub content_type: String,
}

/// Pipeline error taxonomy. The first three are client faults the caller can
/// correct; `Llm` wraps the structured client's own classification
/// (configuration, transient exhaustion, malformed response, upstream
/// rejection).
#[derive(Debug, Error)]
pub enum ScreeningError {
    #[error("Missing {0} input (file or text).")]
    MissingInput(InputSide),

    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("{0}")]
    ExtractionFailed(String),

    #[error(transparent)]
    Llm(#[from] LlmError),
}

/// Screens a candidate by comparing the resume against the job description.
///
/// Both sides are resolved to non-empty text before anything goes on the
/// wire; the resume is validated first. The result comes back exactly as the
/// model produced it, after schema and range validation.
pub async fn screen(
    llm: &GeminiClient,
    template: &str,
    resume: CandidateInput,
    job_description: CandidateInput,
) -> Result<ScreeningResult, ScreeningError> {
    let resume_text = resolve_text(resume, InputSide::Resume)?;
    let jd_text = resolve_text(job_description, InputSide::JobDescription)?;

    let prompt = prompts::assemble_prompt(template, &jd_text, &resume_text);

    let result: ScreeningResult = llm
        .generate(&prompt, screening_response_schema())
        .await?;
    result.validate().map_err(LlmError::Malformed)?;

    Ok(result)
}

fn resolve_text(input: CandidateInput, side: InputSide) -> Result<String, ScreeningError> {
    let text = match (input.file, input.text) {
        (Some(file), None) => extract::extract_text(&file.bytes, &file.content_type)?,
        (_, Some(text)) => text,
        (None, None) => String::new(),
    };
    let text = text.trim();
    if text.is_empty() {
        return Err(ScreeningError::MissingInput(side));
    }
    Ok(text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::RetryPolicy;
    use serde_json::json;
    use std::time::Duration;

    fn test_client(url: String) -> GeminiClient {
        GeminiClient::with_policy(
            "test-key".into(),
            url,
            RetryPolicy {
                max_attempts: 2,
                initial_backoff: Duration::from_millis(5),
                request_timeout: Duration::from_secs(5),
            },
        )
    }

    fn text_input(text: &str) -> CandidateInput {
        CandidateInput {
            file: None,
            text: Some(text.to_string()),
        }
    }

    fn file_input(bytes: &[u8], content_type: &str) -> CandidateInput {
        CandidateInput {
            file: Some(FileUpload {
                bytes: Bytes::copy_from_slice(bytes),
                content_type: content_type.to_string(),
            }),
            text: None,
        }
    }

    fn screening_payload(score: f64) -> serde_json::Value {
        json!({
            "match_score_percent": score,
            "fit_summary": "Close match on core stack with a short experience gap.",
            "critical_missing_skills": [],
            "technical_skills_matched": ["Python", "AWS"],
            "soft_skills_matched": [],
            "extracted_data": {
                "name": "Jane Doe",
                "email": "jane@example.com",
                "total_years_experience": 5.0
            },
            "skill_breakdown": {
                "technical_match_count": 2,
                "soft_skill_match_count": 0
            }
        })
    }

    fn envelope_with(payload: &serde_json::Value) -> String {
        json!({
            "candidates": [
                {"content": {"parts": [{"text": payload.to_string()}]}}
            ]
        })
        .to_string()
    }

    #[tokio::test]
    async fn test_missing_both_sides_fails_before_any_network_call() {
        let mut server = mockito::Server::new_async().await;
        let mock = server.mock("POST", "/").expect(0).create_async().await;

        let err = screen(
            &test_client(server.url()),
            prompts::DEFAULT_PROMPT_TEMPLATE,
            CandidateInput::default(),
            CandidateInput::default(),
        )
        .await
        .unwrap_err();

        mock.assert_async().await;
        assert!(matches!(err, ScreeningError::MissingInput(InputSide::Resume)));
    }

    #[tokio::test]
    async fn test_missing_job_description_names_that_side() {
        let mut server = mockito::Server::new_async().await;
        let mock = server.mock("POST", "/").expect(0).create_async().await;

        let err = screen(
            &test_client(server.url()),
            prompts::DEFAULT_PROMPT_TEMPLATE,
            text_input("Python, AWS, 5 years experience"),
            text_input("   \n  "),
        )
        .await
        .unwrap_err();

        mock.assert_async().await;
        match err {
            ScreeningError::MissingInput(side) => {
                assert_eq!(side, InputSide::JobDescription);
                assert_eq!(
                    ScreeningError::MissingInput(side).to_string(),
                    "Missing job description input (file or text)."
                );
            }
            other => panic!("expected MissingInput, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unsupported_upload_fails_before_any_network_call() {
        let mut server = mockito::Server::new_async().await;
        let mock = server.mock("POST", "/").expect(0).create_async().await;

        let err = screen(
            &test_client(server.url()),
            prompts::DEFAULT_PROMPT_TEMPLATE,
            file_input(b"\x89PNG\r\n", "image/png"),
            text_input("Looking for Python engineer"),
        )
        .await
        .unwrap_err();

        mock.assert_async().await;
        assert!(matches!(err, ScreeningError::UnsupportedFormat(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn test_end_to_end_returns_model_result_unmodified() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body(envelope_with(&screening_payload(85.5)))
            .expect(1)
            .create_async()
            .await;

        let result = screen(
            &test_client(server.url()),
            prompts::DEFAULT_PROMPT_TEMPLATE,
            file_input(b"Python, AWS, 5 years experience", "text/plain"),
            text_input("Looking for Python engineer with AWS, 3+ years"),
        )
        .await
        .unwrap();

        mock.assert_async().await;
        let expected: ScreeningResult =
            serde_json::from_value(screening_payload(85.5)).unwrap();
        assert_eq!(result, expected);
    }

    #[tokio::test]
    async fn test_out_of_range_score_is_rejected_as_malformed() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body(envelope_with(&screening_payload(150.0)))
            .create_async()
            .await;

        let err = screen(
            &test_client(server.url()),
            prompts::DEFAULT_PROMPT_TEMPLATE,
            text_input("Python, AWS, 5 years experience"),
            text_input("Looking for Python engineer"),
        )
        .await
        .unwrap_err();

        assert!(
            matches!(err, ScreeningError::Llm(LlmError::Malformed(_))),
            "got {err:?}"
        );
    }

    #[tokio::test]
    async fn test_raw_text_wins_over_file_when_both_supplied() {
        let mut server = mockito::Server::new_async().await;
        // The file bytes are an unsupported type; if text wins, extraction
        // never runs and the call succeeds.
        let _mock = server
            .mock("POST", "/")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body(envelope_with(&screening_payload(42.0)))
            .create_async()
            .await;

        let both = CandidateInput {
            file: Some(FileUpload {
                bytes: Bytes::from_static(b"\x89PNG"),
                content_type: "image/png".to_string(),
            }),
            text: Some("Python, AWS, 5 years experience".to_string()),
        };

        let result = screen(
            &test_client(server.url()),
            prompts::DEFAULT_PROMPT_TEMPLATE,
            both,
            text_input("Looking for Python engineer"),
        )
        .await
        .unwrap();

        assert!((result.match_score_percent - 42.0).abs() < f64::EPSILON);
    }
}
