//! HTTP error mapping.
//!
//! Every store failure is translated one-to-one into a status code and a JSON [`ErrorRes`] body.
//! Nothing here is fatal to the server.

use api_shared::{ErrorRes, INVALID_DATA_FORMAT, PATIENT_NOT_FOUND, ROUTE_NOT_FOUND, UPDATE_FAILED};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use patient_core::PatientError;

/// Errors returned by REST handlers.
#[derive(Debug)]
pub enum ApiError {
    /// Body could not be turned into a record. `error` is the fixed label for the operation and
    /// `details` the underlying cause.
    BadRequest {
        error: &'static str,
        details: String,
    },
    /// No record matches the requested key.
    PatientNotFound,
    /// The path does not name a known route (including non-integer ids).
    RouteNotFound,
}

impl ApiError {
    /// Maps a store error raised while applying an update.
    ///
    /// Identical to the `From` conversion except that malformed bodies are labelled
    /// `Update failed` instead of `Invalid data format`.
    pub fn update_failed(err: PatientError) -> Self {
        match err {
            PatientError::InvalidFormat(details) => ApiError::BadRequest {
                error: UPDATE_FAILED,
                details,
            },
            other => other.into(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::PatientNotFound | ApiError::RouteNotFound => StatusCode::NOT_FOUND,
        }
    }

    fn body(&self) -> ErrorRes {
        match self {
            ApiError::BadRequest { error, details } => ErrorRes::with_details(error, details),
            ApiError::PatientNotFound => ErrorRes::new(PATIENT_NOT_FOUND),
            ApiError::RouteNotFound => ErrorRes::new(ROUTE_NOT_FOUND),
        }
    }
}

impl From<PatientError> for ApiError {
    fn from(err: PatientError) -> Self {
        match err {
            PatientError::InvalidFormat(details) => ApiError::BadRequest {
                error: INVALID_DATA_FORMAT,
                details,
            },
            PatientError::NotFound => ApiError::PatientNotFound,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self.body())).into_response()
    }
}
