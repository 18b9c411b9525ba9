//! Request and response bodies for the ResQ HTTP API.
//!
//! These mirror the core types with flat, schema-documented shapes. `From` conversions from the
//! core live here so handlers stay thin.

use chrono::{DateTime, Utc};
use resq_types::WardType;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use resq_core as domain;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

/// Error body returned with every non-2xx response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ErrorRes {
    /// One of `validation_error`, `not_found`, `assessment_failure`, `invariant_violation`.
    pub error: String,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MissionState {
    Idle,
    Pending,
    Active,
    Declined,
}

impl From<domain::MissionStatus> for MissionState {
    fn from(status: domain::MissionStatus) -> Self {
        match status {
            domain::MissionStatus::Idle => MissionState::Idle,
            domain::MissionStatus::Pending => MissionState::Pending,
            domain::MissionStatus::Active => MissionState::Active,
            domain::MissionStatus::Declined => MissionState::Declined,
        }
    }
}

impl std::fmt::Display for MissionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            MissionState::Idle => "IDLE",
            MissionState::Pending => "PENDING",
            MissionState::Active => "ACTIVE",
            MissionState::Declined => "DECLINED",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Hospital {
    pub name: String,
    pub specialty: String,
    pub distance_km: f64,
    pub icu_beds: u32,
    pub op_beds: u32,
    pub lat: f64,
    pub lon: f64,
}

impl From<domain::Hospital> for Hospital {
    fn from(h: domain::Hospital) -> Self {
        Self {
            name: h.name,
            specialty: h.specialty,
            distance_km: h.distance_km,
            icu_beds: h.icu_beds,
            op_beds: h.op_beds,
            lat: h.lat,
            lon: h.lon,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CensusRes {
    pub hospitals: Vec<Hospital>,
    pub total_icu_beds: u32,
    pub total_op_beds: u32,
    pub active_inbound: u32,
}

impl From<domain::HospitalCensus> for CensusRes {
    fn from(census: domain::HospitalCensus) -> Self {
        Self {
            hospitals: census.hospitals.into_iter().map(Hospital::from).collect(),
            total_icu_beds: census.totals.icu_beds,
            total_op_beds: census.totals.op_beds,
            active_inbound: census.active_inbound,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Patient {
    pub name: String,
    pub age: String,
    pub blood_group: Option<String>,
    pub history: Option<String>,
    pub allergies: Option<String>,
}

impl From<domain::PatientRecord> for Patient {
    fn from(p: domain::PatientRecord) -> Self {
        Self {
            name: p.name,
            age: p.age,
            blood_group: p.blood_group,
            history: p.history,
            allergies: p.allergies,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Assessment {
    /// Acuity score, 1-10.
    pub severity: u8,
    pub ward_need: WardType,
    pub reason: String,
}

impl From<domain::AssessmentResult> for Assessment {
    fn from(a: domain::AssessmentResult) -> Self {
        Self {
            severity: a.severity.value(),
            ward_need: a.ward_need,
            reason: a.reason.into_inner(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TriageReq {
    pub clinical_notes: String,
    /// Scanned EMR identifier, if the patient could be identified.
    #[serde(default)]
    pub patient_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TriageRes {
    pub patient: Patient,
    pub assessment: Assessment,
    pub assessed_at: DateTime<Utc>,
}

impl From<domain::TriageReport> for TriageRes {
    fn from(r: domain::TriageReport) -> Self {
        Self {
            patient: r.patient.into(),
            assessment: r.assessment.into(),
            assessed_at: r.assessed_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Candidate {
    pub hospital: Hospital,
    pub available_beds: u32,
    /// Declined earlier in this mission attempt.
    pub refused: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CandidatesRes {
    pub ward: WardType,
    pub candidates: Vec<Candidate>,
    /// True when no hospital in the network has capacity for the ward.
    pub no_capacity: bool,
}

impl From<domain::CandidateList> for CandidatesRes {
    fn from(list: domain::CandidateList) -> Self {
        Self {
            ward: list.ward,
            no_capacity: list.candidates.is_empty(),
            candidates: list
                .candidates
                .into_iter()
                .map(|c| Candidate {
                    hospital: c.hospital.into(),
                    available_beds: c.available_beds,
                    refused: c.refused,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AdmissionReq {
    pub hospital: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Vitals {
    pub blood_pressure: String,
    pub heart_rate: u16,
    pub spo2: u8,
}

impl From<domain::Vitals> for Vitals {
    fn from(v: domain::Vitals) -> Self {
        Self {
            blood_pressure: v.blood_pressure,
            heart_rate: v.heart_rate,
            spo2: v.spo2,
        }
    }
}

impl From<Vitals> for domain::Vitals {
    fn from(v: Vitals) -> Self {
        Self {
            blood_pressure: v.blood_pressure,
            heart_rate: v.heart_rate,
            spo2: v.spo2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Location {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Mission {
    pub id: Option<String>,
    pub status: MissionState,
    pub target_hospital: Option<String>,
    pub patient: Option<Patient>,
    pub assessment: Option<Assessment>,
    pub vitals: Vitals,
    pub telemetry_alert: String,
    pub ambulance_location: Location,
    pub requested_at: Option<DateTime<Utc>>,
    pub authorized_at: Option<DateTime<Utc>>,
}

impl From<domain::Mission> for Mission {
    fn from(m: domain::Mission) -> Self {
        Self {
            id: m.id.map(|id| id.simple().to_string()),
            status: m.status.into(),
            target_hospital: m.target_hospital,
            patient: m.patient.map(Patient::from),
            assessment: m.assessment.map(Assessment::from),
            vitals: m.vitals.into(),
            telemetry_alert: m.telemetry_alert,
            ambulance_location: Location {
                lat: m.ambulance_location.lat,
                lon: m.ambulance_location.lon,
            },
            requested_at: m.requested_at,
            authorized_at: m.authorized_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MissionSnapshotRes {
    pub mission: Mission,
    pub declined_hospitals: Vec<String>,
    pub triage: Option<TriageRes>,
}

impl From<domain::MissionSnapshot> for MissionSnapshotRes {
    fn from(s: domain::MissionSnapshot) -> Self {
        Self {
            mission: s.mission.into(),
            declined_hospitals: s.declined_hospitals,
            triage: s.triage.map(TriageRes::from),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mission_state_wire_names() {
        assert_eq!(
            serde_json::to_string(&MissionState::Declined).unwrap(),
            "\"DECLINED\""
        );
        assert_eq!(
            MissionState::from(domain::MissionStatus::Pending).to_string(),
            "PENDING"
        );
    }

    #[test]
    fn test_idle_mission_conversion() {
        let mission = Mission::from(domain::Mission::default());
        assert_eq!(mission.status, MissionState::Idle);
        assert!(mission.id.is_none());
        assert_eq!(mission.telemetry_alert, "Stable");
        assert_eq!(mission.vitals.blood_pressure, "120/80");
    }

    #[test]
    fn test_triage_req_patient_id_optional() {
        let req: TriageReq = serde_json::from_str(r#"{"clinical_notes": "BP 180/110"}"#).unwrap();
        assert!(req.patient_id.is_none());
    }

    #[test]
    fn test_empty_candidate_list_flags_no_capacity() {
        let res = CandidatesRes::from(domain::CandidateList {
            ward: WardType::Icu,
            candidates: vec![],
        });
        assert!(res.no_capacity);
    }
}
