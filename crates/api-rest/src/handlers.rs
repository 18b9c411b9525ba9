//! Route handlers for the EMS unit and Medical Command roles.
//!
//! Handlers translate JSON bodies to dispatch-centre calls and back; all guards and state
//! changes happen in `resq_core::DispatchCenter`.

use api_shared::{
    AdmissionReq, CandidatesRes, CensusRes, ErrorRes, HealthRes, HealthService, Mission,
    MissionSnapshotRes, Patient, TriageReq, TriageRes, Vitals,
};
use axum::extract::{Path, State};
use axum::Json;

use crate::error::ApiError;
use crate::AppState;

type ApiResult<T> = Result<Json<T>, ApiError>;

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for the REST API
#[axum::debug_handler]
pub async fn health() -> Json<HealthRes> {
    Json(HealthService::check_health())
}

#[utoipa::path(
    get,
    path = "/mission",
    responses(
        (status = 200, description = "Current mission, declined hospitals and cached triage", body = MissionSnapshotRes)
    )
)]
/// Snapshot of the shared mission record.
///
/// Both role views poll this to decide what to render.
#[axum::debug_handler]
pub async fn get_mission(State(state): State<AppState>) -> Json<MissionSnapshotRes> {
    Json(state.dispatch.get_mission_snapshot().await.into())
}

#[utoipa::path(
    get,
    path = "/hospitals",
    responses(
        (status = 200, description = "Live bed census", body = CensusRes)
    )
)]
#[axum::debug_handler]
pub async fn get_census(State(state): State<AppState>) -> Json<CensusRes> {
    Json(state.dispatch.get_hospital_census().await.into())
}

#[utoipa::path(
    get,
    path = "/patients/{id}",
    params(("id" = String, Path, description = "Scanned patient identifier")),
    responses(
        (status = 200, description = "EMR record", body = Patient),
        (status = 404, description = "Patient not found", body = ErrorRes)
    )
)]
#[axum::debug_handler]
pub async fn lookup_patient(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Patient> {
    Ok(Json(state.dispatch.lookup_patient(&id)?.into()))
}

#[utoipa::path(
    post,
    path = "/ems/triage",
    request_body = TriageReq,
    responses(
        (status = 200, description = "Assessment recorded", body = TriageRes),
        (status = 400, description = "Clinical notes missing", body = ErrorRes),
        (status = 409, description = "A mission is already in flight", body = ErrorRes),
        (status = 502, description = "Assessment service failed", body = ErrorRes),
        (status = 504, description = "Assessment service timed out", body = ErrorRes)
    )
)]
/// Run clinical triage on crew notes.
///
/// # Errors
/// Returns `400` for blank notes and `502`/`504` when the assessor fails; the mission is left
/// unchanged in both cases and the request can be retried.
#[axum::debug_handler]
pub async fn submit_triage(
    State(state): State<AppState>,
    Json(req): Json<TriageReq>,
) -> ApiResult<TriageRes> {
    let report = state
        .dispatch
        .submit_triage(&req.clinical_notes, req.patient_id.as_deref())
        .await?;
    Ok(Json(report.into()))
}

#[utoipa::path(
    get,
    path = "/ems/candidates",
    responses(
        (status = 200, description = "Hospitals with capacity, nearest first", body = CandidatesRes),
        (status = 409, description = "No triage assessment available", body = ErrorRes)
    )
)]
#[axum::debug_handler]
pub async fn get_candidates(State(state): State<AppState>) -> ApiResult<CandidatesRes> {
    Ok(Json(state.dispatch.candidates().await?.into()))
}

#[utoipa::path(
    post,
    path = "/ems/admission",
    request_body = AdmissionReq,
    responses(
        (status = 200, description = "Admission requested; mission is PENDING", body = Mission),
        (status = 404, description = "Unknown hospital", body = ErrorRes),
        (status = 409, description = "Hospital full, declined, or mission not IDLE", body = ErrorRes)
    )
)]
#[axum::debug_handler]
pub async fn request_admission(
    State(state): State<AppState>,
    Json(req): Json<AdmissionReq>,
) -> ApiResult<Mission> {
    Ok(Json(state.dispatch.request_admission(&req.hospital).await?.into()))
}

#[utoipa::path(
    post,
    path = "/ems/diversion/acknowledge",
    responses(
        (status = 200, description = "Diversion acknowledged; mission is IDLE", body = Mission),
        (status = 409, description = "Mission is not DECLINED", body = ErrorRes)
    )
)]
#[axum::debug_handler]
pub async fn acknowledge_diversion(State(state): State<AppState>) -> ApiResult<Mission> {
    Ok(Json(state.dispatch.acknowledge_diversion().await?.into()))
}

#[utoipa::path(
    post,
    path = "/command/authorize",
    responses(
        (status = 200, description = "Admission authorised; mission is ACTIVE", body = Mission),
        (status = 409, description = "Mission not PENDING or ward full", body = ErrorRes)
    )
)]
#[axum::debug_handler]
pub async fn authorize(State(state): State<AppState>) -> ApiResult<Mission> {
    Ok(Json(state.dispatch.authorize_current().await?.into()))
}

#[utoipa::path(
    post,
    path = "/command/divert",
    responses(
        (status = 200, description = "Unit diverted; mission is DECLINED", body = Mission),
        (status = 409, description = "Mission is not PENDING", body = ErrorRes)
    )
)]
#[axum::debug_handler]
pub async fn divert(State(state): State<AppState>) -> ApiResult<Mission> {
    Ok(Json(state.dispatch.divert_current().await?.into()))
}

#[utoipa::path(
    post,
    path = "/mission/vitals",
    request_body = Vitals,
    responses(
        (status = 200, description = "Vitals stored and re-evaluated", body = Mission),
        (status = 400, description = "Implausible vitals", body = ErrorRes),
        (status = 409, description = "Mission is not ACTIVE", body = ErrorRes),
        (status = 502, description = "Re-evaluation failed; vitals were still stored", body = ErrorRes)
    )
)]
#[axum::debug_handler]
pub async fn transmit_vitals(
    State(state): State<AppState>,
    Json(vitals): Json<Vitals>,
) -> ApiResult<Mission> {
    Ok(Json(state.dispatch.transmit_vitals(vitals.into()).await?.into()))
}

#[utoipa::path(
    post,
    path = "/mission/handover",
    responses(
        (status = 200, description = "Handover complete; mission reset to IDLE", body = Mission),
        (status = 409, description = "Mission is not ACTIVE", body = ErrorRes)
    )
)]
#[axum::debug_handler]
pub async fn complete_handover(State(state): State<AppState>) -> ApiResult<Mission> {
    Ok(Json(state.dispatch.complete_handover().await?.into()))
}
