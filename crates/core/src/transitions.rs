//! Mission state machine.
//!
//! Every action has exactly one legal source state:
//!
//! | Action               | From     | To       |
//! |----------------------|----------|----------|
//! | submit triage        | IDLE     | IDLE     |
//! | request admission    | IDLE     | PENDING  |
//! | authorise            | PENDING  | ACTIVE   |
//! | divert               | PENDING  | DECLINED |
//! | acknowledge diversion| DECLINED | IDLE     |
//! | transmit vitals      | ACTIVE   | ACTIVE   |
//! | complete handover    | ACTIVE   | IDLE     |
//!
//! [`ensure_allowed`] is checked before any side effect; the `Mission` mutators below assume the
//! check has passed and only rearrange fields.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::assessment::AssessmentResult;
use crate::error::{DispatchError, DispatchResult};
use crate::mission::{Mission, MissionStatus, Vitals};
use crate::patient::PatientRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MissionAction {
    SubmitTriage,
    RequestAdmission,
    Authorize,
    Divert,
    AcknowledgeDiversion,
    TransmitVitals,
    CompleteHandover,
}

impl MissionAction {
    /// The only status this action may be taken from.
    pub fn source(&self) -> MissionStatus {
        match self {
            MissionAction::SubmitTriage | MissionAction::RequestAdmission => MissionStatus::Idle,
            MissionAction::Authorize | MissionAction::Divert => MissionStatus::Pending,
            MissionAction::AcknowledgeDiversion => MissionStatus::Declined,
            MissionAction::TransmitVitals | MissionAction::CompleteHandover => {
                MissionStatus::Active
            }
        }
    }

    /// Status after the action commits.
    pub fn target(&self) -> MissionStatus {
        match self {
            MissionAction::SubmitTriage
            | MissionAction::AcknowledgeDiversion
            | MissionAction::CompleteHandover => MissionStatus::Idle,
            MissionAction::RequestAdmission => MissionStatus::Pending,
            MissionAction::Authorize | MissionAction::TransmitVitals => MissionStatus::Active,
            MissionAction::Divert => MissionStatus::Declined,
        }
    }
}

impl fmt::Display for MissionAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MissionAction::SubmitTriage => "submit triage",
            MissionAction::RequestAdmission => "request admission",
            MissionAction::Authorize => "authorize admission",
            MissionAction::Divert => "divert unit",
            MissionAction::AcknowledgeDiversion => "acknowledge diversion",
            MissionAction::TransmitVitals => "transmit vitals",
            MissionAction::CompleteHandover => "complete handover",
        };
        f.write_str(label)
    }
}

/// Rejects `action` unless the mission is in its source state.
pub fn ensure_allowed(status: MissionStatus, action: MissionAction) -> DispatchResult<()> {
    if status == action.source() {
        Ok(())
    } else {
        Err(DispatchError::IllegalTransition { status, action })
    }
}

impl Mission {
    pub(crate) fn begin_request(
        &mut self,
        id: Uuid,
        hospital: String,
        patient: PatientRecord,
        assessment: AssessmentResult,
        now: DateTime<Utc>,
    ) {
        self.id = Some(id);
        self.status = MissionAction::RequestAdmission.target();
        self.target_hospital = Some(hospital);
        self.patient = Some(patient);
        self.assessment = Some(assessment);
        self.requested_at = Some(now);
        self.authorized_at = None;
    }

    pub(crate) fn mark_authorized(&mut self, now: DateTime<Utc>) {
        self.status = MissionAction::Authorize.target();
        self.authorized_at = Some(now);
    }

    pub(crate) fn mark_declined(&mut self) {
        self.status = MissionAction::Divert.target();
    }

    /// Back to IDLE after a diversion; the unit must pick another hospital.
    pub(crate) fn clear_diversion(&mut self) {
        self.status = MissionAction::AcknowledgeDiversion.target();
        self.id = None;
        self.target_hospital = None;
        self.requested_at = None;
    }

    pub(crate) fn replace_vitals(&mut self, vitals: Vitals) {
        self.vitals = vitals;
    }

    pub(crate) fn set_telemetry_alert(&mut self, alert: String) {
        self.telemetry_alert = alert;
    }

    /// Full reset after handover; the unit location is kept.
    pub(crate) fn reset(&mut self) {
        *self = Mission::idle(self.ambulance_location);
    }
}
