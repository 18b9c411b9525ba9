//! Constants used throughout the ResQ core crate.
//!
//! Seed values mirror the demonstration network the dashboard ships with.

use std::time::Duration;

/// Telemetry alert text before any in-transit re-evaluation has run.
pub const DEFAULT_TELEMETRY_ALERT: &str = "Stable";

/// Default blood pressure reading for a fresh mission.
pub const DEFAULT_BLOOD_PRESSURE: &str = "120/80";

/// Default heart rate (BPM) for a fresh mission.
pub const DEFAULT_HEART_RATE: u16 = 80;

/// Default SpO2 (%) for a fresh mission.
pub const DEFAULT_SPO2: u8 = 98;

/// Staging position of the ambulance unit.
pub const DEFAULT_AMBULANCE_LAT: f64 = 37.7649;
pub const DEFAULT_AMBULANCE_LON: f64 = -122.4294;

/// Patient context passed to the assessor when no EMR record was found.
pub const UNIDENTIFIED_PATIENT_CONTEXT: &str = "UNIDENTIFIED PATIENT / UNKNOWN HISTORY";

/// Name and age placeholders recorded on a mission for an unidentified patient.
pub const UNIDENTIFIED_PATIENT_NAME: &str = "Unidentified";
pub const UNKNOWN_PATIENT_AGE: &str = "Unknown";

/// Upper bound on a single assessor call.
pub const DEFAULT_ASSESSMENT_TIMEOUT: Duration = Duration::from_secs(20);

/// Longest clinical note accepted for triage.
pub const MAX_CLINICAL_NOTES_LEN: usize = 4_000;
