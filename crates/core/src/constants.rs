//! Constants used throughout the patient core crate.
//!
//! Field names are the wire keys the store inspects; every other key in a record is opaque.

/// Primary key field.
pub const ID_FIELD: &str = "id";

/// Secondary lookup key field.
pub const REQUEST_ID_FIELD: &str = "requestId";

/// Creation timestamp field, stamped on insert when absent.
pub const CREATED_AT_FIELD: &str = "createdAt";

/// Modification timestamp field, stamped on insert when absent and on every update.
pub const LAST_UPDATE_FIELD: &str = "lastUpdate";

/// Default REST listen address when `PATIENT_REST_ADDR` is not set.
pub const DEFAULT_REST_ADDR: &str = "0.0.0.0:3000";

/// Environment variable holding the REST listen address.
pub const REST_ADDR_ENV: &str = "PATIENT_REST_ADDR";

/// Environment variable selecting the id assignment policy.
pub const ID_POLICY_ENV: &str = "PATIENT_ID_POLICY";
