//! Response bodies shared by every transport.
//!
//! Record payloads are free-form JSON objects, so they are documented as `Object` in the
//! OpenAPI schema.

use patient_core::Record;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const PATIENT_ADDED: &str = "Patient data added successfully";
pub const PATIENT_UPDATED: &str = "Patient data updated successfully";
pub const PATIENT_DELETED: &str = "Patient data deleted successfully";

pub const PATIENT_NOT_FOUND: &str = "Patient not found";
pub const INVALID_DATA_FORMAT: &str = "Invalid data format";
pub const UPDATE_FAILED: &str = "Update failed";
pub const ROUTE_NOT_FOUND: &str = "Not found";

pub const HEALTHY: &str = "healthy";

/// Confirmation wrapper returned by create, update and delete.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PatientMessageRes {
    pub message: String,
    /// The record after the operation (or, for delete, as it was removed).
    #[schema(value_type = Object)]
    pub data: Record,
}

impl PatientMessageRes {
    pub fn new(message: &str, data: Record) -> Self {
        Self {
            message: message.to_string(),
            data,
        }
    }
}

/// Error body. `details` carries the underlying cause for malformed requests.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorRes {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorRes {
    pub fn new(error: &str) -> Self {
        Self {
            error: error.to_string(),
            details: None,
        }
    }

    pub fn with_details(error: &str, details: impl Into<String>) -> Self {
        Self {
            error: error.to_string(),
            details: Some(details.into()),
        }
    }
}

/// Health snapshot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub status: String,
    pub timestamp: String,
    pub total_patients: usize,
}
