//! # API REST
//!
//! REST API implementation for the patient data server.
//!
//! Handles:
//! - HTTP endpoints with axum, one per store operation plus `/health`
//! - Translating [`PatientError`] into status codes and JSON error bodies
//! - OpenAPI/Swagger documentation
//! - CORS
//!
//! The store itself lives in `patient-core`; response bodies live in `api-shared`.

#![warn(rust_2018_idioms)]

pub mod error;

use axum::{
    body::Bytes,
    extract::{Path as AxumPath, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use api_shared::{
    ErrorRes, HealthRes, HealthService, PatientMessageRes, PATIENT_ADDED, PATIENT_DELETED,
    PATIENT_UPDATED,
};
use patient_core::{PatientError, PatientStore, Record};

pub use error::ApiError;

/// Application state for the REST API server
///
/// Holds the single patient store shared by every request handler.
#[derive(Clone, Debug)]
pub struct AppState {
    pub store: Arc<PatientStore>,
}

impl AppState {
    pub fn new(store: Arc<PatientStore>) -> Self {
        Self { store }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health,
        create_patient,
        list_patients,
        get_patient,
        get_patient_by_request_id,
        update_patient,
        delete_patient,
    ),
    components(schemas(PatientMessageRes, ErrorRes, HealthRes))
)]
pub struct ApiDoc;

/// Builds the router with every endpoint, Swagger UI and CORS attached.
///
/// Unmatched paths answer 404 with `{"error": "Not found"}`.
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/patients", get(list_patients).post(create_patient))
        .route(
            "/api/patients/:id",
            get(get_patient).put(update_patient).delete(delete_patient),
        )
        .route(
            "/api/patients/request/:request_id",
            get(get_patient_by_request_id),
        )
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .fallback(route_not_found)
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Binds `addr` and serves the REST API until the process is stopped.
///
/// # Errors
/// Returns an error if the address cannot be bound or the HTTP server fails while running.
pub async fn serve(addr: SocketAddr, state: AppState) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("++ Patient REST API listening on {}", listener.local_addr()?);
    axum::serve(listener, create_app(state)).await?;
    Ok(())
}

/// Parses an `{id:int}` path segment.
///
/// Only plain ASCII digits that fit in an `i64` are accepted; anything else is treated as an
/// unknown route and never reaches the store.
fn parse_patient_id(raw: &str) -> Result<i64, ApiError> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ApiError::RouteNotFound);
    }
    raw.parse::<i64>().map_err(|_| ApiError::RouteNotFound)
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint
///
/// Reports service status, the current UTC time and the number of stored patients.
#[axum::debug_handler]
async fn health(State(state): State<AppState>) -> Json<HealthRes> {
    Json(HealthService::check_health(&state.store))
}

#[utoipa::path(
    post,
    path = "/api/patients",
    responses(
        (status = 201, description = "Patient created", body = PatientMessageRes),
        (status = 400, description = "Body is not a JSON object", body = ErrorRes)
    )
)]
/// Create a new patient record
///
/// Accepts any JSON object. Missing `createdAt`/`lastUpdate` are stamped with the current time and
/// a missing `id` is assigned by the configured id policy.
///
/// # Errors
/// Returns `400 Bad Request` if:
/// - the body is not valid JSON, or
/// - the body is valid JSON but not an object.
#[axum::debug_handler]
async fn create_patient(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<PatientMessageRes>), ApiError> {
    let record = state.store.insert_json(&body).map_err(|e| {
        tracing::warn!("Create patient rejected: {}", e);
        ApiError::from(e)
    })?;

    tracing::info!(id = ?record.id(), "patient created");
    Ok((
        StatusCode::CREATED,
        Json(PatientMessageRes::new(PATIENT_ADDED, record)),
    ))
}

#[utoipa::path(
    get,
    path = "/api/patients",
    responses(
        (status = 200, description = "Every patient record in insertion order")
    )
)]
/// List all patient records
#[axum::debug_handler]
async fn list_patients(State(state): State<AppState>) -> Json<Vec<Record>> {
    Json(state.store.list())
}

#[utoipa::path(
    get,
    path = "/api/patients/{id}",
    params(("id" = i64, Path, description = "Patient id")),
    responses(
        (status = 200, description = "Patient record"),
        (status = 404, description = "Patient not found", body = ErrorRes)
    )
)]
/// Fetch the first patient whose `id` matches
#[axum::debug_handler]
async fn get_patient(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<String>,
) -> Result<Json<Record>, ApiError> {
    let id = parse_patient_id(&id)?;
    Ok(Json(state.store.find_by_id(id)?))
}

#[utoipa::path(
    get,
    path = "/api/patients/request/{request_id}",
    params(("request_id" = String, Path, description = "Opaque request identifier")),
    responses(
        (status = 200, description = "Patient record"),
        (status = 404, description = "Patient not found", body = ErrorRes)
    )
)]
/// Fetch the first patient whose `requestId` matches
#[axum::debug_handler]
async fn get_patient_by_request_id(
    State(state): State<AppState>,
    AxumPath(request_id): AxumPath<String>,
) -> Result<Json<Record>, ApiError> {
    Ok(Json(state.store.find_by_request_id(&request_id)?))
}

#[utoipa::path(
    put,
    path = "/api/patients/{id}",
    params(("id" = i64, Path, description = "Patient id")),
    responses(
        (status = 200, description = "Patient updated", body = PatientMessageRes),
        (status = 400, description = "Body is not a JSON object", body = ErrorRes),
        (status = 404, description = "Patient not found", body = ErrorRes)
    )
)]
/// Partially update a patient record
///
/// Keys in the body overwrite or extend the stored record; other keys are untouched. `lastUpdate`
/// is always restamped by the server.
///
/// # Errors
/// - `404 Not Found` if no record has this id (checked before the body is parsed).
/// - `400 Bad Request` if the body is not a JSON object.
#[axum::debug_handler]
async fn update_patient(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<String>,
    body: Bytes,
) -> Result<Json<PatientMessageRes>, ApiError> {
    let id = parse_patient_id(&id)?;
    let record = state.store.update_json(id, &body).map_err(|e| {
        if matches!(e, PatientError::InvalidFormat(_)) {
            tracing::warn!("Update patient {} rejected: {}", id, e);
        }
        ApiError::update_failed(e)
    })?;

    tracing::info!(id, "patient updated");
    Ok(Json(PatientMessageRes::new(PATIENT_UPDATED, record)))
}

#[utoipa::path(
    delete,
    path = "/api/patients/{id}",
    params(("id" = i64, Path, description = "Patient id")),
    responses(
        (status = 200, description = "Patient deleted", body = PatientMessageRes),
        (status = 404, description = "Patient not found", body = ErrorRes)
    )
)]
/// Delete a patient record
///
/// Returns the record as it was at removal.
#[axum::debug_handler]
async fn delete_patient(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<String>,
) -> Result<Json<PatientMessageRes>, ApiError> {
    let id = parse_patient_id(&id)?;
    let removed = state.store.delete(id)?;

    tracing::info!(id, "patient deleted");
    Ok(Json(PatientMessageRes::new(PATIENT_DELETED, removed)))
}

async fn route_not_found() -> ApiError {
    ApiError::RouteNotFound
}
