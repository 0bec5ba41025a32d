use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::AppState;
use patient_core::{
    constants::{ID_POLICY_ENV, REST_ADDR_ENV},
    id_policy_from_env_value, rest_addr_from_env_value, CoreConfig, PatientStore,
};

/// Main entry point for the patient data server
///
/// Resolves configuration once, builds the single in-memory patient store and serves the REST
/// API until interrupted. Records are not persisted; they are lost when the process exits.
///
/// # Environment Variables
/// - `PATIENT_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
/// - `PATIENT_ID_POLICY`: id assignment for records posted without one, `count` (default) or
///   `monotonic`
/// - `RUST_LOG`: standard tracing filter, merged with the crate-level `info` defaults
///
/// # Returns
/// * `Ok(())` - If the server stops cleanly after Ctrl-C
/// * `Err(anyhow::Error)` - If configuration, binding or the server itself fails
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("patient_data_run=info".parse()?)
                .add_directive("api_rest=info".parse()?)
                .add_directive("patient_core=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rest_addr = rest_addr_from_env_value(std::env::var(REST_ADDR_ENV).ok())?;
    let id_policy = id_policy_from_env_value(std::env::var(ID_POLICY_ENV).ok())?;

    tracing::info!("++ Starting patient data server on {}", rest_addr);
    tracing::info!("++ Id policy: {}", id_policy);

    let store = Arc::new(PatientStore::new(CoreConfig::new(id_policy)));
    let state = AppState::new(store);

    tokio::select! {
        result = api_rest::serve(rest_addr, state) => result?,
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("-- Shutting down patient data server");
        }
    }

    Ok(())
}
