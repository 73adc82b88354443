//! Screening result contract shared with the Gemini structured-output API.
//!
//! `screening_response_schema()` is the schema declaration sent with every
//! request; `ScreeningResult` is the strict deserialization target for what
//! comes back. The two must stay in lockstep: every field required by the
//! schema is a required field here, with no serde defaults, so a response
//! missing any field fails to parse instead of producing a half-filled result.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Candidate details the model extracts from the resume itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedData {
    pub name: String,
    pub email: String,
    pub total_years_experience: f64,
}

/// Matched-skill counts, reported separately from the skill lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillBreakdown {
    pub technical_match_count: i64,
    pub soft_skill_match_count: i64,
}

/// Complete screening analysis returned to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreeningResult {
    pub match_score_percent: f64,
    pub fit_summary: String,
    pub critical_missing_skills: Vec<String>,
    pub technical_skills_matched: Vec<String>,
    pub soft_skills_matched: Vec<String>,
    pub extracted_data: ExtractedData,
    pub skill_breakdown: SkillBreakdown,
}

impl ScreeningResult {
    /// Range checks that the schema declaration alone cannot guarantee the
    /// model honored. A violation is treated as a malformed response.
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=100.0).contains(&self.match_score_percent) {
            return Err(format!(
                "match_score_percent {} is outside the range [0, 100]",
                self.match_score_percent
            ));
        }
        Ok(())
    }
}

/// JSON schema declaration for the `generationConfig.responseSchema` field.
pub fn screening_response_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "match_score_percent": {
                "type": "number",
                "description": "A score from 0 to 100 indicating the percentage fit of the resume to the job description."
            },
            "fit_summary": {
                "type": "string",
                "description": "A five to six-sentence summary of the candidate's core strengths and weaknesses relative to the job."
            },
            "critical_missing_skills": {
                "type": "array",
                "items": {"type": "string"},
                "description": "A list of all MUST-HAVE skills or certifications from the JD that are not present on the resume."
            },
            "technical_skills_matched": {
                "type": "array",
                "items": {"type": "string"},
                "description": "A list of all specific technical skills (e.g., Python, AWS, React) successfully found and matched on the resume."
            },
            "soft_skills_matched": {
                "type": "array",
                "items": {"type": "string"},
                "description": "A list of all specific soft skills (e.g., leadership, communication, problem-solving) successfully found and matched on the resume."
            },
            "extracted_data": {
                "type": "object",
                "properties": {
                    "name": {"type": "string"},
                    "email": {"type": "string"},
                    "total_years_experience": {
                        "type": "number",
                        "description": "Total relevant years of experience extracted from the resume."
                    }
                },
                "required": ["name", "email", "total_years_experience"]
            },
            "skill_breakdown": {
                "type": "object",
                "properties": {
                    "technical_match_count": {"type": "integer"},
                    "soft_skill_match_count": {"type": "integer"}
                },
                "required": ["technical_match_count", "soft_skill_match_count"]
            }
        },
        "required": [
            "match_score_percent",
            "fit_summary",
            "critical_missing_skills",
            "technical_skills_matched",
            "soft_skills_matched",
            "extracted_data",
            "skill_breakdown"
        ]
    })
}
