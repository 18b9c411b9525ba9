//! Offline keyword-based assessor.
//!
//! Used when no language-model credentials are configured so the coordination workflow can be
//! exercised without network access. Scores are coarse and deterministic.

use async_trait::async_trait;
use resq_types::{NonEmptyText, Severity};

use super::{AssessmentError, AssessmentResult, Assessor};
use crate::mission::Vitals;

/// Red-flag phrases and the severity floor each one implies.
///
/// Phrases match whole words only, so "stab" never matches "stable".
const RED_FLAGS: &[(&str, i64, &str)] = &[
    ("cardiac arrest", 10, "cardiac arrest"),
    ("unresponsive", 9, "reduced consciousness"),
    ("stemi", 9, "acute coronary syndrome"),
    ("chest pain", 7, "possible acute coronary syndrome"),
    ("stroke", 9, "suspected stroke"),
    ("facial droop", 9, "suspected stroke"),
    ("hypotension", 8, "haemodynamic instability"),
    ("hemorrhage", 8, "major haemorrhage"),
    ("haemorrhage", 8, "major haemorrhage"),
    ("gunshot", 9, "penetrating trauma"),
    ("stab wound", 8, "penetrating trauma"),
    ("stabbed", 8, "penetrating trauma"),
    ("respiratory distress", 8, "respiratory compromise"),
    ("diaphoresis", 6, "autonomic stress response"),
    ("tachycardia", 6, "tachyarrhythmia"),
    ("fracture", 5, "skeletal injury"),
    ("laceration", 3, "soft tissue injury"),
];

const BASELINE_SEVERITY: i64 = 2;

/// Glasgow Coma Scale bands: (highest score in band, severity floor).
const GCS_BANDS: &[(u8, i64)] = &[(8, 9), (12, 7)];

#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicAssessor;

impl HeuristicAssessor {
    pub fn new() -> Self {
        Self
    }

    fn score(notes: &str) -> (i64, Vec<&'static str>) {
        let words = words(notes);
        let mut severity = BASELINE_SEVERITY;
        let mut findings = Vec::new();
        let mut record = |floor: i64, finding: &'static str| {
            severity = severity.max(floor);
            if !findings.contains(&finding) {
                findings.push(finding);
            }
        };

        for (phrase, floor, finding) in RED_FLAGS {
            if contains_phrase(&words, phrase) {
                record(*floor, *finding);
            }
        }
        if let Some(floor) = gcs_score(&words).and_then(gcs_floor) {
            record(floor, "reduced consciousness");
        }
        // Two or more independent findings escalate one step.
        if findings.len() >= 2 {
            severity += 1;
        }
        (severity.min(i64::from(Severity::MAX)), findings)
    }
}

/// Lower-cased alphanumeric runs of `notes`.
fn words(notes: &str) -> Vec<String> {
    notes
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect()
}

fn contains_phrase(words: &[String], phrase: &str) -> bool {
    let parts: Vec<&str> = phrase.split(' ').collect();
    words
        .windows(parts.len())
        .any(|window| window.iter().zip(&parts).all(|(w, p)| w == p))
}

/// Score following a "GCS" token, e.g. "GCS 7" or "GCS: 14".
fn gcs_score(words: &[String]) -> Option<u8> {
    words
        .windows(2)
        .find(|pair| pair[0] == "gcs")
        .and_then(|pair| pair[1].parse().ok())
        .filter(|score| (3..=15).contains(score))
}

fn gcs_floor(score: u8) -> Option<i64> {
    GCS_BANDS
        .iter()
        .find(|(max, _)| score <= *max)
        .map(|(_, floor)| *floor)
}

#[async_trait]
impl Assessor for HeuristicAssessor {
    async fn assess(
        &self,
        patient_context: &str,
        clinical_notes: &str,
    ) -> Result<AssessmentResult, AssessmentError> {
        let (score, findings) = Self::score(clinical_notes);
        let severity = Severity::new(score)
            .map_err(|e| AssessmentError::MalformedResponse(e.to_string()))?;

        let summary = if findings.is_empty() {
            "No red-flag findings in crew notes".to_string()
        } else {
            format!("Findings suggest {}", findings.join(", "))
        };
        let reason = format!(
            "{summary}. Patient context: {patient_context}. Maintain airway, monitor vitals \
             continuously and reassess en route."
        );

        Ok(AssessmentResult {
            severity,
            ward_need: severity.indicated_ward(),
            reason: NonEmptyText::new(reason)
                .map_err(|e| AssessmentError::MalformedResponse(e.to_string()))?,
        })
    }

    async fn reassess(
        &self,
        _prior_reason: &str,
        vitals: &Vitals,
    ) -> Result<String, AssessmentError> {
        let deteriorating = vitals.spo2 < 90 || vitals.heart_rate > 130 || vitals.heart_rate < 45;
        let message = if deteriorating {
            format!(
                "CRITICAL: Vitals deteriorating (HR {}, SpO2 {}%), prepare resuscitation bay.",
                vitals.heart_rate, vitals.spo2
            )
        } else if vitals.spo2 < 94 || vitals.heart_rate > 110 {
            format!(
                "Caution: borderline vitals (HR {}, SpO2 {}%), continue close monitoring.",
                vitals.heart_rate, vitals.spo2
            )
        } else {
            "Patient stabilizing.".to_string()
        };
        Ok(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use resq_types::WardType;

    fn vitals(heart_rate: u16, spo2: u8) -> Vitals {
        Vitals {
            blood_pressure: "120/80".into(),
            heart_rate,
            spo2,
        }
    }

    #[tokio::test]
    async fn test_red_flags_route_to_icu() {
        let result = HeuristicAssessor::new()
            .assess("UNIDENTIFIED", "Unresponsive male, hypotension, BP 80/40")
            .await
            .unwrap();
        assert!(result.severity.value() > 7);
        assert_eq!(result.ward_need, WardType::Icu);
        assert!(result.reason.as_str().contains("reduced consciousness"));
    }

    #[tokio::test]
    async fn test_minor_injury_routes_to_general() {
        let result = HeuristicAssessor::new()
            .assess("UNIDENTIFIED", "Small laceration on left forearm, bleeding controlled")
            .await
            .unwrap();
        assert_eq!(result.severity.value(), 3);
        assert_eq!(result.ward_need, WardType::Op);
    }

    #[tokio::test]
    async fn test_stable_patient_with_normal_gcs_routes_to_general() {
        let assessor = HeuristicAssessor::new();
        for notes in [
            "Patient stable, GCS 15",
            "Patient stable, alert and oriented",
            "Stabilizing after fluids, GCS: 14",
        ] {
            let result = assessor.assess("UNIDENTIFIED", notes).await.unwrap();
            assert!(result.severity.value() <= 7, "{notes}");
            assert_eq!(result.ward_need, WardType::Op, "{notes}");
        }
    }

    #[tokio::test]
    async fn test_low_gcs_and_stab_wound_route_to_icu() {
        let assessor = HeuristicAssessor::new();
        let result = assessor.assess("UNIDENTIFIED", "GCS 7, pupils sluggish").await.unwrap();
        assert_eq!(result.severity.value(), 9);
        assert!(result.reason.as_str().contains("reduced consciousness"));

        let result = assessor
            .assess("UNIDENTIFIED", "Stab wound to left flank")
            .await
            .unwrap();
        assert_eq!(result.ward_need, WardType::Icu);
        assert!(result.reason.as_str().contains("penetrating trauma"));
    }

    #[test]
    fn test_gcs_floor_bands() {
        assert_eq!(gcs_floor(3), Some(9));
        assert_eq!(gcs_floor(10), Some(7));
        assert_eq!(gcs_floor(15), None);
        assert_eq!(gcs_score(&words("GCS 22")), None);
    }

    #[tokio::test]
    async fn test_reassess_flags_hypoxia() {
        let assessor = HeuristicAssessor::new();
        let alert = assessor.reassess("prior", &vitals(120, 85)).await.unwrap();
        assert!(alert.starts_with("CRITICAL"));
        let alert = assessor.reassess("prior", &vitals(80, 98)).await.unwrap();
        assert_eq!(alert, "Patient stabilizing.");
    }
}
