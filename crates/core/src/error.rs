use crate::assessment::AssessmentError;
use crate::mission::MissionStatus;
use crate::transitions::MissionAction;
use resq_types::WardType;

/// Coarse classification of a [`DispatchError`], used by the API layers to pick a status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    AssessmentFailure,
    InvariantViolation,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "validation_error",
            ErrorKind::NotFound => "not_found",
            ErrorKind::AssessmentFailure => "assessment_failure",
            ErrorKind::InvariantViolation => "invariant_violation",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("failed to read hospital registry file: {0}")]
    RegistryFileRead(std::io::Error),
    #[error("failed to parse hospital registry file: {0}")]
    RegistryFileParse(serde_yaml::Error),

    #[error("hospital not found: {0}")]
    HospitalNotFound(String),
    #[error("patient not found: {0}")]
    PatientNotFound(String),

    #[error("assessment failed: {0}")]
    Assessment(#[from] AssessmentError),

    #[error("{hospital} has no {ward} beds available")]
    BedsExhausted { hospital: String, ward: WardType },
    #[error("{0} has already declined this transfer")]
    HospitalDeclined(String),
    #[error("no triage assessment is available; submit clinical notes first")]
    NoTriage,
    #[error("mission has no {0} recorded")]
    IncompleteMission(&'static str),
    #[error("cannot {action} while mission is {status}")]
    IllegalTransition {
        status: MissionStatus,
        action: MissionAction,
    },
}

impl DispatchError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DispatchError::InvalidInput(_)
            | DispatchError::RegistryFileRead(_)
            | DispatchError::RegistryFileParse(_) => ErrorKind::Validation,
            DispatchError::HospitalNotFound(_) | DispatchError::PatientNotFound(_) => {
                ErrorKind::NotFound
            }
            DispatchError::Assessment(_) => ErrorKind::AssessmentFailure,
            DispatchError::BedsExhausted { .. }
            | DispatchError::HospitalDeclined(_)
            | DispatchError::NoTriage
            | DispatchError::IncompleteMission(_)
            | DispatchError::IllegalTransition { .. } => ErrorKind::InvariantViolation,
        }
    }
}

pub type DispatchResult<T> = std::result::Result<T, DispatchError>;
