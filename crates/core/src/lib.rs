//! # ResQ Core
//!
//! Core coordination logic for ambulance-to-hospital transfers:
//! - Hospital registry with guarded bed allocation
//! - The single shared mission record and its state machine
//! - Candidate matching by ward type, capacity and distance
//! - The assessment collaborator interface and strict response parsing
//!
//! **No API concerns**: HTTP servers, request/response types and concrete model clients belong
//! in `api-rest`, `api-shared` and `resq-gemini`.

pub mod assessment;
pub mod config;
pub mod constants;
pub mod dispatch;
pub mod error;
pub mod hospital;
pub mod matching;
pub mod mission;
pub mod patient;
pub mod transitions;
pub mod validation;

pub use assessment::{AssessmentError, AssessmentResult, Assessor, HeuristicAssessor};
pub use config::CoreConfig;
pub use dispatch::{
    Candidate, CandidateList, DispatchCenter, HospitalCensus, MissionSnapshot, TriageReport,
};
pub use error::{DispatchError, DispatchResult, ErrorKind};
pub use hospital::{CensusTotals, Hospital, HospitalRegistry};
pub use mission::{Location, Mission, MissionStatus, Vitals};
pub use patient::{PatientDirectory, PatientRecord};
pub use transitions::MissionAction;

pub use resq_types::{NonEmptyText, Severity, WardType};
