//! Input validation utilities.
//!
//! Operator input is checked here before any mission state is touched.

use resq_types::NonEmptyText;

use crate::constants::MAX_CLINICAL_NOTES_LEN;
use crate::error::{DispatchError, DispatchResult};
use crate::mission::Vitals;

/// Validates crew clinical notes for triage.
///
/// # Errors
///
/// Returns `DispatchError::InvalidInput` if the notes are blank or exceed
/// `MAX_CLINICAL_NOTES_LEN` bytes.
pub fn validate_clinical_notes(notes: &str) -> DispatchResult<NonEmptyText> {
    let notes = NonEmptyText::new(notes)
        .map_err(|_| DispatchError::InvalidInput("clinical notes are required".into()))?;

    if notes.as_str().len() > MAX_CLINICAL_NOTES_LEN {
        return Err(DispatchError::InvalidInput(format!(
            "clinical notes exceed maximum length of {} characters",
            MAX_CLINICAL_NOTES_LEN
        )));
    }

    Ok(notes)
}

/// Validates a vitals transmission.
///
/// Blood pressure stays free-form but must be present; heart rate and SpO2 must be
/// physiologically plausible.
///
/// # Errors
///
/// Returns `DispatchError::InvalidInput` naming the first implausible reading.
pub fn validate_vitals(vitals: &Vitals) -> DispatchResult<()> {
    const MAX_HEART_RATE: u16 = 300;

    if vitals.blood_pressure.trim().is_empty() {
        return Err(DispatchError::InvalidInput(
            "blood pressure reading is required".into(),
        ));
    }
    if vitals.heart_rate > MAX_HEART_RATE {
        return Err(DispatchError::InvalidInput(format!(
            "heart rate {} exceeds {}",
            vitals.heart_rate, MAX_HEART_RATE
        )));
    }
    if vitals.spo2 > 100 {
        return Err(DispatchError::InvalidInput(format!(
            "SpO2 {}% is above 100%",
            vitals.spo2
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clinical_notes() {
        assert!(validate_clinical_notes("").is_err());
        assert!(validate_clinical_notes(" \n\t").is_err());
        assert!(validate_clinical_notes(&"x".repeat(MAX_CLINICAL_NOTES_LEN + 1)).is_err());
        assert_eq!(
            validate_clinical_notes(" BP 180/110 ").unwrap().as_str(),
            "BP 180/110"
        );
    }

    #[test]
    fn test_vitals() {
        assert!(validate_vitals(&Vitals::default()).is_ok());

        let mut vitals = Vitals::default();
        vitals.spo2 = 101;
        assert!(validate_vitals(&vitals).is_err());

        let mut vitals = Vitals::default();
        vitals.heart_rate = 400;
        assert!(validate_vitals(&vitals).is_err());

        let mut vitals = Vitals::default();
        vitals.blood_pressure = " ".into();
        assert!(validate_vitals(&vitals).is_err());
    }
}
