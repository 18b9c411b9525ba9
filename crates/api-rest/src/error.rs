//! Mapping from dispatch errors to HTTP responses.

use api_shared::ErrorRes;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use resq_core::{AssessmentError, DispatchError, ErrorKind};

/// Handler error: a dispatch failure rendered as `{"error", "message"}`.
#[derive(Debug)]
pub struct ApiError(pub DispatchError);

impl From<DispatchError> for ApiError {
    fn from(err: DispatchError) -> Self {
        Self(err)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match (&self.0, self.0.kind()) {
            (DispatchError::Assessment(AssessmentError::Timeout(_)), _) => {
                StatusCode::GATEWAY_TIMEOUT
            }
            (_, ErrorKind::Validation) => StatusCode::BAD_REQUEST,
            (_, ErrorKind::NotFound) => StatusCode::NOT_FOUND,
            (_, ErrorKind::AssessmentFailure) => StatusCode::BAD_GATEWAY,
            (_, ErrorKind::InvariantViolation) => StatusCode::CONFLICT,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("{}", self.0);
        }
        let body = ErrorRes {
            error: self.0.kind().as_str().to_string(),
            message: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use resq_core::{MissionAction, MissionStatus};
    use std::time::Duration;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (DispatchError::InvalidInput("x".into()), StatusCode::BAD_REQUEST),
            (DispatchError::HospitalNotFound("x".into()), StatusCode::NOT_FOUND),
            (
                DispatchError::Assessment(AssessmentError::EmptyResponse),
                StatusCode::BAD_GATEWAY,
            ),
            (
                DispatchError::Assessment(AssessmentError::Timeout(Duration::from_secs(1))),
                StatusCode::GATEWAY_TIMEOUT,
            ),
            (
                DispatchError::IllegalTransition {
                    status: MissionStatus::Idle,
                    action: MissionAction::Divert,
                },
                StatusCode::CONFLICT,
            ),
            (DispatchError::NoTriage, StatusCode::CONFLICT),
        ];
        for (err, expected) in cases {
            assert_eq!(ApiError(err).status(), expected);
        }
    }
}
