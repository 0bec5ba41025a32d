//! # API Shared
//!
//! Shared definitions for the patient data APIs.
//!
//! Contains:
//! - Response bodies (`wire` module), with OpenAPI schemas
//! - Fixed response messages
//! - `HealthService`
//!
//! Used by `api-rest` and the workspace runner binary.

pub mod health;
pub mod wire;

pub use health::HealthService;
pub use wire::*;
