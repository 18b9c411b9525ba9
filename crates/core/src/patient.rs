//! Patient identification.
//!
//! A small in-process stand-in for the EMR: crews scan a patient ID and, if it resolves, the
//! record travels with the mission and is summarised into the assessor prompt.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::constants::{UNIDENTIFIED_PATIENT_CONTEXT, UNIDENTIFIED_PATIENT_NAME, UNKNOWN_PATIENT_AGE};

/// Patient details carried on a mission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatientRecord {
    pub name: String,
    pub age: String,
    pub blood_group: Option<String>,
    pub history: Option<String>,
    pub allergies: Option<String>,
}

impl PatientRecord {
    /// Placeholder used when the crew could not identify the patient.
    pub fn unidentified() -> Self {
        Self {
            name: UNIDENTIFIED_PATIENT_NAME.into(),
            age: UNKNOWN_PATIENT_AGE.into(),
            blood_group: None,
            history: None,
            allergies: None,
        }
    }

    pub fn is_unidentified(&self) -> bool {
        self.blood_group.is_none() && self.history.is_none() && self.name == UNIDENTIFIED_PATIENT_NAME
    }

    /// Context line handed to the assessor.
    pub fn assessment_context(&self) -> String {
        if self.is_unidentified() {
            return UNIDENTIFIED_PATIENT_CONTEXT.into();
        }
        format!(
            "Name: {}; Age: {}; Blood: {}; History: {}; Allergies: {}",
            self.name,
            self.age,
            self.blood_group.as_deref().unwrap_or("unknown"),
            self.history.as_deref().unwrap_or("none recorded"),
            self.allergies.as_deref().unwrap_or("none recorded"),
        )
    }
}

/// Lookup of patient records by scanned ID.
#[derive(Debug, Clone, Default)]
pub struct PatientDirectory {
    records: BTreeMap<String, PatientRecord>,
}

impl PatientDirectory {
    pub fn new(records: BTreeMap<String, PatientRecord>) -> Self {
        Self { records }
    }

    /// Directory preloaded with the demonstration records.
    pub fn demo() -> Self {
        let mut records = BTreeMap::new();
        records.insert(
            "P-101".to_string(),
            PatientRecord {
                name: "Alex Mercer".into(),
                age: "58".into(),
                blood_group: Some("O+".into()),
                history: Some("Hypertension".into()),
                allergies: Some("Penicillin".into()),
            },
        );
        records.insert(
            "P-102".to_string(),
            PatientRecord {
                name: "Sarah Connor".into(),
                age: "34".into(),
                blood_group: Some("A+".into()),
                history: Some("Asthma".into()),
                allergies: Some("None".into()),
            },
        );
        Self { records }
    }

    pub fn lookup(&self, patient_id: &str) -> Option<&PatientRecord> {
        self.records.get(patient_id.trim())
    }
}
