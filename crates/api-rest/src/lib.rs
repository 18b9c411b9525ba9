//! # API REST
//!
//! REST API implementation for ResQ.
//!
//! Handles:
//! - HTTP endpoints with axum for the EMS unit and Medical Command roles
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON serialization, CORS)
//!
//! Uses `api-shared` for common types and utilities.

#![warn(rust_2018_idioms)]

pub mod error;
pub mod handlers;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use resq_core::{DispatchCenter, WardType};
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub use error::ApiError;

use api_shared::{
    AdmissionReq, Assessment, Candidate, CandidatesRes, CensusRes, ErrorRes, HealthRes, Hospital,
    Location, Mission, MissionSnapshotRes, MissionState, Patient, TriageReq, TriageRes, Vitals,
};

/// Application state shared across REST API handlers.
#[derive(Clone)]
pub struct AppState {
    pub dispatch: Arc<DispatchCenter>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health,
        handlers::get_mission,
        handlers::get_census,
        handlers::lookup_patient,
        handlers::submit_triage,
        handlers::get_candidates,
        handlers::request_admission,
        handlers::acknowledge_diversion,
        handlers::authorize,
        handlers::divert,
        handlers::transmit_vitals,
        handlers::complete_handover,
    ),
    components(schemas(
        HealthRes,
        ErrorRes,
        MissionState,
        Hospital,
        CensusRes,
        Patient,
        Assessment,
        WardType,
        TriageReq,
        TriageRes,
        Candidate,
        CandidatesRes,
        AdmissionReq,
        Vitals,
        Location,
        Mission,
        MissionSnapshotRes,
    )),
    tags(
        (name = "resq", description = "Ambulance-to-hospital admission coordination")
    )
)]
pub struct ApiDoc;

/// Builds the REST router over a shared dispatch centre.
pub fn router(dispatch: Arc<DispatchCenter>) -> Router {
    let state = AppState { dispatch };

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/health", get(handlers::health))
        .route("/mission", get(handlers::get_mission))
        .route("/hospitals", get(handlers::get_census))
        .route("/patients/:id", get(handlers::lookup_patient))
        .route("/ems/triage", post(handlers::submit_triage))
        .route("/ems/candidates", get(handlers::get_candidates))
        .route("/ems/admission", post(handlers::request_admission))
        .route(
            "/ems/diversion/acknowledge",
            post(handlers::acknowledge_diversion),
        )
        .route("/command/authorize", post(handlers::authorize))
        .route("/command/divert", post(handlers::divert))
        .route("/mission/vitals", post(handlers::transmit_vitals))
        .route("/mission/handover", post(handlers::complete_handover))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Binds `addr` and serves the router until Ctrl-C.
pub async fn serve(addr: &str, dispatch: Arc<DispatchCenter>) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("-- Starting ResQ REST API on {}", listener.local_addr()?);
    axum::serve(listener, router(dispatch))
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("failed to install Ctrl-C handler: {e}");
            }
            tracing::info!("shutdown signal received");
        })
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use resq_core::{CoreConfig, HeuristicAssessor, HospitalRegistry, PatientDirectory};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn app() -> Router {
        let dispatch = DispatchCenter::new(
            Arc::new(CoreConfig::default()),
            HospitalRegistry::demo_network(),
            PatientDirectory::demo(),
            Arc::new(HeuristicAssessor::new()),
        );
        router(Arc::new(dispatch))
    }

    async fn call(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = call(&app(), "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ok"], true);
    }

    #[tokio::test]
    async fn test_openapi_document_lists_routes() {
        let (status, body) = call(&app(), "GET", "/api-docs/openapi.json", None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["paths"]["/ems/triage"].is_object());
        assert!(body["paths"]["/patients/{id}"].is_object());
    }

    #[tokio::test]
    async fn test_full_mission_over_http() {
        let app = app();

        let (status, triage) = call(
            &app,
            "POST",
            "/ems/triage",
            Some(json!({"clinical_notes": "Suspected stroke, facial droop", "patient_id": "P-101"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(triage["assessment"]["ward_need"], "ICU");
        assert_eq!(triage["patient"]["name"], "Alex Mercer");

        let (status, list) = call(&app, "GET", "/ems/candidates", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(list["candidates"][0]["hospital"]["name"], "City General Trauma");

        let (status, mission) = call(
            &app,
            "POST",
            "/ems/admission",
            Some(json!({"hospital": "City General Trauma"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(mission["status"], "PENDING");

        let (status, mission) = call(&app, "POST", "/command/authorize", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(mission["status"], "ACTIVE");

        let (_, census) = call(&app, "GET", "/hospitals", None).await;
        assert_eq!(census["hospitals"][0]["icu_beds"], 1);
        assert_eq!(census["active_inbound"], 1);

        let (status, mission) = call(
            &app,
            "POST",
            "/mission/vitals",
            Some(json!({"blood_pressure": "85/50", "heart_rate": 140, "spo2": 86})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(mission["telemetry_alert"]
            .as_str()
            .unwrap()
            .starts_with("CRITICAL"));

        let (status, mission) = call(&app, "POST", "/mission/handover", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(mission["status"], "IDLE");
        assert_eq!(mission["telemetry_alert"], "Stable");
    }

    #[tokio::test]
    async fn test_divert_then_acknowledge() {
        let app = app();
        call(
            &app,
            "POST",
            "/ems/triage",
            Some(json!({"clinical_notes": "Minor laceration to forearm"})),
        )
        .await;
        call(
            &app,
            "POST",
            "/ems/admission",
            Some(json!({"hospital": "Suburban Clinic"})),
        )
        .await;

        let (status, mission) = call(&app, "POST", "/command/divert", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(mission["status"], "DECLINED");

        let (status, mission) = call(&app, "POST", "/ems/diversion/acknowledge", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(mission["status"], "IDLE");

        let (_, snapshot) = call(&app, "GET", "/mission", None).await;
        assert_eq!(snapshot["declined_hospitals"][0], "Suburban Clinic");

        let (_, list) = call(&app, "GET", "/ems/candidates", None).await;
        let refused = list["candidates"]
            .as_array()
            .unwrap()
            .iter()
            .find(|c| c["hospital"]["name"] == "Suburban Clinic")
            .unwrap();
        assert_eq!(refused["refused"], true);
    }

    #[tokio::test]
    async fn test_error_bodies_and_status_codes() {
        let app = app();

        let (status, body) = call(
            &app,
            "POST",
            "/ems/triage",
            Some(json!({"clinical_notes": "   "})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "validation_error");

        let (status, body) = call(&app, "GET", "/patients/P-999", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "not_found");

        let (status, body) = call(&app, "POST", "/command/authorize", None).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "invariant_violation");

        let (status, _) = call(&app, "GET", "/ems/candidates", None).await;
        assert_eq!(status, StatusCode::CONFLICT);
    }
}
