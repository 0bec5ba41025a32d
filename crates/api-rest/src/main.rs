//! Standalone REST API server binary.
//!
//! ## Purpose
//! Runs the REST API server on its own, with the log filter scoped to this crate.
//!
//! ## Intended use
//! Useful for development and debugging. The workspace's main `patient-data-run` binary is the
//! deployment entry point.

use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::AppState;
use patient_core::{
    constants::{ID_POLICY_ENV, REST_ADDR_ENV},
    id_policy_from_env_value, rest_addr_from_env_value, CoreConfig, PatientStore,
};

/// Main entry point for the patient REST API server
///
/// # Environment Variables
/// - `PATIENT_REST_ADDR`: Server address (default: "0.0.0.0:3000")
/// - `PATIENT_ID_POLICY`: `count` (default) or `monotonic`
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - an environment variable holds an invalid value,
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("api_rest=debug".parse()?)
                .add_directive("patient_core=debug".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr = rest_addr_from_env_value(std::env::var(REST_ADDR_ENV).ok())?;
    let id_policy = id_policy_from_env_value(std::env::var(ID_POLICY_ENV).ok())?;

    tracing::info!("-- Starting patient REST API on {} (id policy: {})", addr, id_policy);

    let store = Arc::new(PatientStore::new(CoreConfig::new(id_policy)));
    api_rest::serve(addr, AppState::new(store)).await
}
