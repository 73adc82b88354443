//! Prompt template loading and assembly for the screening call.

use tracing::warn;

/// Used when no template file is available. A condensed version of the
/// shipped `prompt.txt`; the model-facing schema constraints live in
/// `models::screening`, not here.
pub const DEFAULT_PROMPT_TEMPLATE: &str = "Assume that you are the HR of a company currently hiring. \
    I will provide you with a resume and a description of the job for which the resume has been \
    submitted. Your task is to compare the resume with the job description and return a structured \
    and extremely detailed analysis of the match between the two.";

/// Reads the template once at startup. A missing or unreadable file is not an
/// error; the built-in default applies.
pub fn load_template(path: &str) -> String {
    match std::fs::read_to_string(path) {
        Ok(template) => template,
        Err(e) => {
            warn!("prompt template not readable at {path} ({e}), using built-in default");
            DEFAULT_PROMPT_TEMPLATE.to_string()
        }
    }
}

/// Pure assembly of the final model input. Section order is a protocol
/// contract with the model: the job description always precedes the resume.
pub fn assemble_prompt(template: &str, job_description: &str, resume: &str) -> String {
    format!(
        "{template}\n\
         JOB DESCRIPTION:\n\
         ---\n\
         {job_description}\n\
         ---\n\
         \n\
         RESUME TEXT:\n\
         ---\n\
         {resume}\n\
         ---"
    )
}
