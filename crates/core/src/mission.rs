//! The mission record: lifecycle of the single in-flight transfer.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::assessment::AssessmentResult;
use crate::constants::{
    DEFAULT_AMBULANCE_LAT, DEFAULT_AMBULANCE_LON, DEFAULT_BLOOD_PRESSURE, DEFAULT_HEART_RATE,
    DEFAULT_SPO2, DEFAULT_TELEMETRY_ALERT,
};
use crate::patient::PatientRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MissionStatus {
    /// No transfer in progress.
    Idle,
    /// Admission requested, awaiting Medical Command.
    Pending,
    /// Admission authorised, transport under way.
    Active,
    /// Medical Command diverted the unit.
    Declined,
}

impl MissionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MissionStatus::Idle => "IDLE",
            MissionStatus::Pending => "PENDING",
            MissionStatus::Active => "ACTIVE",
            MissionStatus::Declined => "DECLINED",
        }
    }
}

impl fmt::Display for MissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Live patient vitals as transmitted by the crew.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vitals {
    /// Free-form reading, e.g. `120/80`.
    pub blood_pressure: String,
    pub heart_rate: u16,
    pub spo2: u8,
}

impl Default for Vitals {
    fn default() -> Self {
        Self {
            blood_pressure: DEFAULT_BLOOD_PRESSURE.into(),
            heart_rate: DEFAULT_HEART_RATE,
            spo2: DEFAULT_SPO2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lon: f64,
}

impl Default for Location {
    fn default() -> Self {
        Self {
            lat: DEFAULT_AMBULANCE_LAT,
            lon: DEFAULT_AMBULANCE_LON,
        }
    }
}

/// The shared mission record.
///
/// Fields are only written by the transition methods in [`crate::transitions`]; everything
/// outside the crate sees clones.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Mission {
    pub id: Option<Uuid>,
    pub status: MissionStatus,
    pub target_hospital: Option<String>,
    pub patient: Option<PatientRecord>,
    pub assessment: Option<AssessmentResult>,
    pub vitals: Vitals,
    pub telemetry_alert: String,
    pub ambulance_location: Location,
    pub requested_at: Option<DateTime<Utc>>,
    pub authorized_at: Option<DateTime<Utc>>,
}

impl Mission {
    /// A fresh IDLE record with the unit staged at `ambulance_location`.
    pub fn idle(ambulance_location: Location) -> Self {
        Self {
            id: None,
            status: MissionStatus::Idle,
            target_hospital: None,
            patient: None,
            assessment: None,
            vitals: Vitals::default(),
            telemetry_alert: DEFAULT_TELEMETRY_ALERT.into(),
            ambulance_location,
            requested_at: None,
            authorized_at: None,
        }
    }

    /// Whether a transfer currently occupies the record.
    pub fn is_in_flight(&self) -> bool {
        self.status != MissionStatus::Idle
    }
}

impl Default for Mission {
    fn default() -> Self {
        Self::idle(Location::default())
    }
}
