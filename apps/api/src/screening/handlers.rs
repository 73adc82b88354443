//! Axum route handler for the screening API.

use axum::{extract::Multipart, extract::State, Json};

use crate::errors::AppError;
use crate::models::screening::ScreeningResult;
use crate::screening::{self, CandidateInput, FileUpload};
use crate::state::AppState;

/// POST /api/screen
///
/// Multipart form with either a file part or a text part per side:
/// - `resume` / `jobDescription`: uploaded PDF, DOCX, DOC, or TXT
/// - `resumeText` / `jobDescriptionText`: raw text
///
/// Returns the full screening analysis. Runs only behind the authentication
/// layer; the pipeline itself never sees the caller's identity.
pub async fn handle_screen(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ScreeningResult>, AppError> {
    let mut resume = CandidateInput::default();
    let mut job_description = CandidateInput::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("invalid multipart payload: {e}")))?
    {
        match field.name().unwrap_or("") {
            "resume" => {
                let content_type = field.content_type().unwrap_or("text/plain").to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("failed to read resume upload: {e}")))?;
                resume.file = Some(FileUpload { bytes, content_type });
            }
            "jobDescription" => {
                let content_type = field.content_type().unwrap_or("text/plain").to_string();
                let bytes = field.bytes().await.map_err(|e| {
                    AppError::Validation(format!("failed to read job description upload: {e}"))
                })?;
                job_description.file = Some(FileUpload { bytes, content_type });
            }
            "resumeText" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("failed to read resumeText: {e}")))?;
                if !text.trim().is_empty() {
                    resume.text = Some(text);
                }
            }
            "jobDescriptionText" => {
                let text = field.text().await.map_err(|e| {
                    AppError::Validation(format!("failed to read jobDescriptionText: {e}"))
                })?;
                if !text.trim().is_empty() {
                    job_description.text = Some(text);
                }
            }
            _ => {
                // Drain unknown fields so the stream stays consistent.
                let _ = field.bytes().await;
            }
        }
    }

    let result = screening::screen(
        &state.llm,
        &state.prompt_template,
        resume,
        job_description,
    )
    .await?;

    Ok(Json(result))
}
