//! Clinical assessment collaborator.
//!
//! The assessor is an external, fallible service (in production a generative language model).
//! Its output is untrusted text: [`parse_assessment`] accepts only a bare JSON object carrying
//! exactly `severity`, `ward_need` and `reason`, and [`parse_reassessment`] only a non-empty
//! sentence. Anything else becomes an [`AssessmentError`], never a panic, and the dispatch layer
//! leaves mission state untouched when an assessment fails.

mod heuristic;

pub use heuristic::HeuristicAssessor;

use std::time::Duration;

use async_trait::async_trait;
use resq_types::{NonEmptyText, Severity, WardType};
use serde::{Deserialize, Serialize};

use crate::mission::Vitals;

/// Structured triage outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AssessmentResult {
    pub severity: Severity,
    pub ward_need: WardType,
    pub reason: NonEmptyText,
}

#[derive(Debug, thiserror::Error)]
pub enum AssessmentError {
    #[error("assessment service unavailable: {0}")]
    Unavailable(String),
    #[error("assessment timed out after {0:?}")]
    Timeout(Duration),
    #[error("malformed assessment response: {0}")]
    MalformedResponse(String),
    #[error("assessment service returned an empty response")]
    EmptyResponse,
}

/// Turns clinical input into structured assessments.
#[async_trait]
pub trait Assessor: Send + Sync {
    /// Triage a patient from free-text notes.
    async fn assess(
        &self,
        patient_context: &str,
        clinical_notes: &str,
    ) -> Result<AssessmentResult, AssessmentError>;

    /// One-sentence status update for the receiving doctor after new vitals arrive.
    async fn reassess(&self, prior_reason: &str, vitals: &Vitals)
        -> Result<String, AssessmentError>;
}

/// Strictly parses an assessor's triage response.
///
/// The text must be a bare JSON object with exactly `severity`, `ward_need` and `reason`;
/// markdown fences are not stripped.
///
/// # Errors
///
/// Returns `AssessmentError::EmptyResponse` for blank input and
/// `AssessmentError::MalformedResponse` for anything that does not parse, including a severity
/// outside 1-10 or an unknown field.
pub fn parse_assessment(raw: &str) -> Result<AssessmentResult, AssessmentError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AssessmentError::EmptyResponse);
    }
    serde_json::from_str(trimmed).map_err(|e| AssessmentError::MalformedResponse(e.to_string()))
}

/// Parses a re-evaluation narrative.
///
/// # Returns
/// The trimmed narrative.
///
/// # Errors
///
/// Returns `AssessmentError::EmptyResponse` when nothing but whitespace came back.
pub fn parse_reassessment(raw: &str) -> Result<String, AssessmentError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AssessmentError::EmptyResponse);
    }
    Ok(trimmed.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_assessment_accepts_bare_object() {
        let result = parse_assessment(
            r#" {"severity": 8, "ward_need": "ICU", "reason": "Suspected STEMI."} "#,
        )
        .unwrap();
        assert_eq!(result.severity.value(), 8);
        assert_eq!(result.ward_need, WardType::Icu);
        assert_eq!(result.reason.as_str(), "Suspected STEMI.");
    }

    #[test]
    fn test_parse_assessment_rejects_markdown_fence() {
        let raw = "```json\n{\"severity\": 8, \"ward_need\": \"ICU\", \"reason\": \"x\"}\n```";
        assert!(matches!(
            parse_assessment(raw),
            Err(AssessmentError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_parse_assessment_rejects_bad_fields() {
        let cases = [
            r#"{"severity": 8, "ward_need": "ICU"}"#,
            r#"{"severity": "8", "ward_need": "ICU", "reason": "x"}"#,
            r#"{"severity": 7.5, "ward_need": "OP", "reason": "x"}"#,
            r#"{"severity": 0, "ward_need": "OP", "reason": "x"}"#,
            r#"{"severity": 4, "ward_need": "Ward", "reason": "x"}"#,
            r#"{"severity": 4, "ward_need": "OP", "reason": "  "}"#,
            r#"{"severity": 4, "ward_need": "OP", "reason": "x", "confidence": 0.9}"#,
            r#"[{"severity": 4, "ward_need": "OP", "reason": "x"}]"#,
        ];
        for raw in cases {
            assert!(
                matches!(parse_assessment(raw), Err(AssessmentError::MalformedResponse(_))),
                "accepted {raw}"
            );
        }
    }

    #[test]
    fn test_parse_empty_responses() {
        assert!(matches!(parse_assessment("  \n"), Err(AssessmentError::EmptyResponse)));
        assert!(matches!(parse_reassessment(""), Err(AssessmentError::EmptyResponse)));
        assert_eq!(
            parse_reassessment(" Patient stabilizing. \n").unwrap(),
            "Patient stabilizing."
        );
    }
}
