//! Dispatch centre: the owned shared state both roles act through.
//!
//! ## Concurrency
//!
//! All transitions take `write_gate` first and hold it until they commit, including across the
//! assessor call, so two transitions never interleave. The data itself sits behind an `RwLock`
//! that is only write-locked for the commit, which keeps snapshots and census reads available
//! while a model call is outstanding. Every assessor call is bounded by the configured timeout.

use std::future::Future;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use resq_types::WardType;
use serde::Serialize;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use crate::assessment::{AssessmentError, AssessmentResult, Assessor};
use crate::config::CoreConfig;
use crate::error::{DispatchError, DispatchResult};
use crate::hospital::{CensusTotals, Hospital, HospitalRegistry};
use crate::matching;
use crate::mission::{Mission, MissionStatus, Vitals};
use crate::patient::{PatientDirectory, PatientRecord};
use crate::transitions::{ensure_allowed, MissionAction};
use crate::validation::{validate_clinical_notes, validate_vitals};

/// Last successful triage, held for display until it is used or superseded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TriageReport {
    pub patient: PatientRecord,
    pub assessment: AssessmentResult,
    pub assessed_at: DateTime<Utc>,
}

/// Point-in-time copy of the mission and its surrounding state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MissionSnapshot {
    pub mission: Mission,
    pub declined_hospitals: Vec<String>,
    pub triage: Option<TriageReport>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HospitalCensus {
    pub hospitals: Vec<Hospital>,
    pub totals: CensusTotals,
    /// 1 while a transfer occupies the mission record, else 0.
    pub active_inbound: u32,
}

/// A ranked admission option for the current triage.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Candidate {
    pub hospital: Hospital,
    pub available_beds: u32,
    /// Already declined this mission attempt; admission cannot be requested again.
    pub refused: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateList {
    pub ward: WardType,
    /// Nearest first. Empty means no capacity in the network.
    pub candidates: Vec<Candidate>,
}

#[derive(Debug)]
struct SharedState {
    registry: HospitalRegistry,
    mission: Mission,
    declined: Vec<String>,
    triage: Option<TriageReport>,
}

pub struct DispatchCenter {
    cfg: Arc<CoreConfig>,
    assessor: Arc<dyn Assessor>,
    patients: PatientDirectory,
    write_gate: Mutex<()>,
    state: RwLock<SharedState>,
}

impl DispatchCenter {
    pub fn new(
        cfg: Arc<CoreConfig>,
        registry: HospitalRegistry,
        patients: PatientDirectory,
        assessor: Arc<dyn Assessor>,
    ) -> Self {
        let mission = Mission::idle(cfg.ambulance_location());
        Self {
            cfg,
            assessor,
            patients,
            write_gate: Mutex::new(()),
            state: RwLock::new(SharedState {
                registry,
                mission,
                declined: Vec::new(),
                triage: None,
            }),
        }
    }

    /// Builds a centre from configuration, loading the hospital seed it names.
    pub fn from_config(cfg: Arc<CoreConfig>, assessor: Arc<dyn Assessor>) -> DispatchResult<Self> {
        let registry = cfg.load_registry()?;
        tracing::info!(
            hospitals = registry.list_all().len(),
            seed = ?cfg.hospitals_file(),
            "hospital registry loaded"
        );
        Ok(Self::new(cfg, registry, PatientDirectory::demo(), assessor))
    }

    pub async fn get_mission_snapshot(&self) -> MissionSnapshot {
        let state = self.state.read().await;
        MissionSnapshot {
            mission: state.mission.clone(),
            declined_hospitals: state.declined.clone(),
            triage: state.triage.clone(),
        }
    }

    pub async fn get_hospital_census(&self) -> HospitalCensus {
        let state = self.state.read().await;
        HospitalCensus {
            hospitals: state.registry.list_all().to_vec(),
            totals: state.registry.census(),
            active_inbound: u32::from(state.mission.is_in_flight()),
        }
    }

    /// EMR record for a scanned patient ID.
    ///
    /// # Errors
    ///
    /// Returns `DispatchError::PatientNotFound` for an unknown ID.
    pub fn lookup_patient(&self, patient_id: &str) -> DispatchResult<PatientRecord> {
        self.patients
            .lookup(patient_id)
            .cloned()
            .ok_or_else(|| DispatchError::PatientNotFound(patient_id.trim().to_owned()))
    }

    /// Triage the patient from crew notes.
    ///
    /// On success the report is cached for admission and the declined set is cleared. On any
    /// failure nothing changes and the crew may simply retry.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` for blank or oversized notes
    /// - `IllegalTransition` unless the mission is IDLE
    /// - `Assessment` when the assessor fails, returns an unparseable answer or times out
    pub async fn submit_triage(
        &self,
        clinical_notes: &str,
        patient_id: Option<&str>,
    ) -> DispatchResult<TriageReport> {
        let notes = validate_clinical_notes(clinical_notes)?;

        let _gate = self.write_gate.lock().await;
        ensure_allowed(
            self.state.read().await.mission.status,
            MissionAction::SubmitTriage,
        )
        .inspect_err(|e| tracing::warn!("triage rejected: {e}"))?;

        let patient = self.resolve_patient(patient_id);
        let context = patient.assessment_context();

        let assessment = self
            .time_boxed(self.assessor.assess(&context, notes.as_str()))
            .await
            .inspect_err(|e| tracing::error!("triage assessment failed: {e}"))?;

        let report = TriageReport {
            patient,
            assessment,
            assessed_at: Utc::now(),
        };

        let mut state = self.state.write().await;
        // Refusals reset only once a new assessment exists; a failed retry keeps them.
        state.declined.clear();
        state.triage = Some(report.clone());
        tracing::info!(
            severity = report.assessment.severity.value(),
            ward = %report.assessment.ward_need,
            patient = %report.patient.name,
            "triage assessment recorded"
        );

        Ok(report)
    }

    /// Hospitals able to take the triaged patient, nearest first, with refusals marked.
    ///
    /// # Errors
    ///
    /// Returns `DispatchError::NoTriage` before any assessment has succeeded.
    pub async fn candidates(&self) -> DispatchResult<CandidateList> {
        let state = self.state.read().await;
        let triage = state.triage.as_ref().ok_or(DispatchError::NoTriage)?;
        let ward = triage.assessment.ward_need;

        let candidates = matching::find_candidates(&state.registry, ward)
            .into_iter()
            .map(|h| Candidate {
                hospital: h.clone(),
                available_beds: h.beds(ward),
                refused: state.declined.iter().any(|d| d == &h.name),
            })
            .collect();

        Ok(CandidateList { ward, candidates })
    }

    /// EMS asks `hospital_name` to take the triaged patient; the mission becomes PENDING.
    ///
    /// # Errors
    ///
    /// `IllegalTransition` outside IDLE, `NoTriage`, `HospitalDeclined` for a hospital that
    /// already refused, `HospitalNotFound`, or `BedsExhausted` when the ward has no bed now.
    pub async fn request_admission(&self, hospital_name: &str) -> DispatchResult<Mission> {
        let _gate = self.write_gate.lock().await;
        let mut state = self.state.write().await;

        ensure_allowed(state.mission.status, MissionAction::RequestAdmission)
            .inspect_err(|e| tracing::warn!("admission request rejected: {e}"))?;

        let triage = state.triage.clone().ok_or(DispatchError::NoTriage)?;
        if state.declined.iter().any(|d| d == hospital_name) {
            return Err(DispatchError::HospitalDeclined(hospital_name.to_owned()));
        }

        let ward = triage.assessment.ward_need;
        let hospital = state.registry.get(hospital_name)?;
        if hospital.beds(ward) == 0 {
            tracing::warn!(hospital = hospital_name, %ward, "admission requested without capacity");
            return Err(DispatchError::BedsExhausted {
                hospital: hospital_name.to_owned(),
                ward,
            });
        }
        let hospital_name = hospital.name.clone();

        let mission_id = Uuid::new_v4();
        state.mission.begin_request(
            mission_id,
            hospital_name,
            triage.patient,
            triage.assessment,
            Utc::now(),
        );
        tracing::info!(%mission_id, hospital = hospital_name_of(&state.mission), "admission requested");

        Ok(state.mission.clone())
    }

    /// Medical Command accepts the transfer and one bed is committed.
    ///
    /// If the ward filled up since the request, the mission stays PENDING so Command can divert.
    ///
    /// # Errors
    ///
    /// Returns `IllegalTransition` outside PENDING and `BedsExhausted` when no bed is left.
    pub async fn authorize_current(&self) -> DispatchResult<Mission> {
        let _gate = self.write_gate.lock().await;
        let mut guard = self.state.write().await;
        let state = &mut *guard;

        ensure_allowed(state.mission.status, MissionAction::Authorize)
            .inspect_err(|e| tracing::warn!("authorisation rejected: {e}"))?;

        let remaining = matching::authorize(&mut state.registry, &state.mission)
            .inspect_err(|e| tracing::warn!(mission_id = ?state.mission.id, "authorisation failed: {e}"))?;

        state.mission.mark_authorized(Utc::now());
        tracing::info!(
            mission_id = ?state.mission.id,
            hospital = hospital_name_of(&state.mission),
            remaining,
            "admission authorised"
        );

        Ok(state.mission.clone())
    }

    /// Medical Command refuses the transfer; the hospital joins the declined set.
    pub async fn divert_current(&self) -> DispatchResult<Mission> {
        let _gate = self.write_gate.lock().await;
        let mut state = self.state.write().await;

        ensure_allowed(state.mission.status, MissionAction::Divert)
            .inspect_err(|e| tracing::warn!("diversion rejected: {e}"))?;

        let target = state
            .mission
            .target_hospital
            .clone()
            .ok_or(DispatchError::IncompleteMission("target hospital"))?;
        if !state.declined.contains(&target) {
            state.declined.push(target.clone());
        }
        state.mission.mark_declined();
        tracing::info!(mission_id = ?state.mission.id, hospital = %target, "unit diverted");

        Ok(state.mission.clone())
    }

    pub async fn acknowledge_diversion(&self) -> DispatchResult<Mission> {
        let _gate = self.write_gate.lock().await;
        let mut state = self.state.write().await;

        ensure_allowed(state.mission.status, MissionAction::AcknowledgeDiversion)
            .inspect_err(|e| tracing::warn!("diversion acknowledgement rejected: {e}"))?;

        state.mission.clear_diversion();
        tracing::info!(declined = ?state.declined, "diversion acknowledged");

        Ok(state.mission.clone())
    }

    /// Replace live vitals and request a re-evaluation.
    ///
    /// The vitals are committed before the assessor runs. If re-evaluation fails the previous
    /// telemetry alert is kept and the error is returned.
    pub async fn transmit_vitals(&self, vitals: Vitals) -> DispatchResult<Mission> {
        validate_vitals(&vitals)?;

        let _gate = self.write_gate.lock().await;
        let prior_reason = {
            let mut state = self.state.write().await;
            ensure_allowed(state.mission.status, MissionAction::TransmitVitals)
                .inspect_err(|e| tracing::warn!("vitals rejected: {e}"))?;
            let prior_reason = state
                .mission
                .assessment
                .as_ref()
                .map(|a| a.reason.as_str().to_owned())
                .ok_or(DispatchError::IncompleteMission("assessment"))?;
            state.mission.replace_vitals(vitals.clone());
            prior_reason
        };

        let alert = self
            .time_boxed(self.assessor.reassess(&prior_reason, &vitals))
            .await
            .inspect_err(|e| tracing::error!("re-evaluation failed: {e}"))?;

        let mut state = self.state.write().await;
        state.mission.set_telemetry_alert(alert);
        tracing::info!(
            mission_id = ?state.mission.id,
            alert = %state.mission.telemetry_alert,
            "telemetry re-evaluated"
        );

        Ok(state.mission.clone())
    }

    /// Patient delivered; the shared state returns to a clean IDLE.
    pub async fn complete_handover(&self) -> DispatchResult<Mission> {
        let _gate = self.write_gate.lock().await;
        let mut state = self.state.write().await;

        ensure_allowed(state.mission.status, MissionAction::CompleteHandover)
            .inspect_err(|e| tracing::warn!("handover rejected: {e}"))?;

        let mission_id = state.mission.id;
        state.mission.reset();
        state.declined.clear();
        state.triage = None;
        tracing::info!(?mission_id, "handover complete");

        Ok(state.mission.clone())
    }

    fn resolve_patient(&self, patient_id: Option<&str>) -> PatientRecord {
        match patient_id.map(str::trim).filter(|id| !id.is_empty()) {
            Some(id) => match self.patients.lookup(id) {
                Some(record) => record.clone(),
                None => {
                    tracing::warn!(patient_id = id, "patient ID not found; triaging as unidentified");
                    PatientRecord::unidentified()
                }
            },
            None => PatientRecord::unidentified(),
        }
    }

    async fn time_boxed<T>(
        &self,
        call: impl Future<Output = Result<T, AssessmentError>>,
    ) -> Result<T, AssessmentError> {
        let limit = self.cfg.assessment_timeout();
        match tokio::time::timeout(limit, call).await {
            Ok(result) => result,
            Err(_) => Err(AssessmentError::Timeout(limit)),
        }
    }
}

fn hospital_name_of(mission: &Mission) -> &str {
    mission.target_hospital.as_deref().unwrap_or("-")
}
