//! Prompt construction for triage and in-transit re-evaluation.

use resq_core::Vitals;

/// Triage prompt: severity score, ward rule and a short clinical assessment as bare JSON.
pub fn triage_prompt(patient_context: &str, clinical_notes: &str) -> String {
    format!(
        r#"Act as an expert trauma triage assistant.
Patient Data: {patient_context}
Clinical Notes: {clinical_notes}

Task:
1. Calculate a severity score from 1 to 10.
2. Determine the ward need: "ICU" if the score is greater than 7, otherwise "OP".
3. Write a clinical assessment of 40 to 50 words covering the suspected diagnosis, immediate
   risk factors and recommended stabilisation actions.

Return ONLY a JSON object, with no markdown and no code fences:
{{"severity": <integer>, "ward_need": "ICU" | "OP", "reason": "<assessment>"}}"#
    )
}

/// Re-evaluation prompt: one-sentence update for the receiving doctor.
pub fn reassessment_prompt(prior_reason: &str, vitals: &Vitals) -> String {
    format!(
        r#"Patient re-evaluation during transport.
Previous status: {prior_reason}
New vitals: BP {bp}, HR {hr}, SpO2 {spo2}%.

Task: provide a one-sentence status update for the receiving doctor.
Examples: "Patient stabilizing.", "CRITICAL: Vitals deteriorating, prepare crash cart.""#,
        bp = vitals.blood_pressure,
        hr = vitals.heart_rate,
        spo2 = vitals.spo2,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_triage_prompt_embeds_inputs_and_contract() {
        let prompt = triage_prompt("UNIDENTIFIED PATIENT / UNKNOWN HISTORY", "BP 180/110");
        assert!(prompt.contains("Patient Data: UNIDENTIFIED PATIENT / UNKNOWN HISTORY"));
        assert!(prompt.contains("Clinical Notes: BP 180/110"));
        assert!(prompt.contains(r#"{"severity": <integer>"#));
    }

    #[test]
    fn test_reassessment_prompt_lists_vitals() {
        let vitals = Vitals {
            blood_pressure: "90/60".into(),
            heart_rate: 130,
            spo2: 89,
        };
        let prompt = reassessment_prompt("Suspected sepsis.", &vitals);
        assert!(prompt.contains("Previous status: Suspected sepsis."));
        assert!(prompt.contains("BP 90/60, HR 130, SpO2 89%"));
    }
}
