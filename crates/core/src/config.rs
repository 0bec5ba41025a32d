//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into the store. Request
//! handling never reads process-wide environment variables.

use crate::constants::DEFAULT_REST_ADDR;
use crate::error::ConfigError;
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;

/// Rule used to assign `id` to records inserted without one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum IdPolicy {
    /// `id = number_of_records_currently_stored + 1`.
    ///
    /// After a delete the next assigned id can equal an id still in the store. Kept as the
    /// default because existing clients rely on contiguous ids.
    #[default]
    Count,
    /// One greater than the highest integer id the store has ever held. Ids are never reused.
    Monotonic,
}

impl FromStr for IdPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "count" => Ok(IdPolicy::Count),
            "monotonic" => Ok(IdPolicy::Monotonic),
            _ => Err(ConfigError::InvalidIdPolicy(s.to_string())),
        }
    }
}

impl fmt::Display for IdPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdPolicy::Count => write!(f, "count"),
            IdPolicy::Monotonic => write!(f, "monotonic"),
        }
    }
}

/// Core configuration resolved at startup.
#[derive(Clone, Debug, Default)]
pub struct CoreConfig {
    id_policy: IdPolicy,
}

impl CoreConfig {
    pub fn new(id_policy: IdPolicy) -> Self {
        Self { id_policy }
    }

    pub fn id_policy(&self) -> IdPolicy {
        self.id_policy
    }
}

/// Parse the id policy from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns [`IdPolicy::Count`].
pub fn id_policy_from_env_value(value: Option<String>) -> Result<IdPolicy, ConfigError> {
    let value = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());
    let parsed = value.map(|v| v.parse::<IdPolicy>()).transpose()?;

    Ok(parsed.unwrap_or_default())
}

/// Parse the REST listen address from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns [`DEFAULT_REST_ADDR`].
pub fn rest_addr_from_env_value(value: Option<String>) -> Result<SocketAddr, ConfigError> {
    let value = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_REST_ADDR.to_string());

    value
        .parse::<SocketAddr>()
        .map_err(|source| ConfigError::InvalidAddress { value, source })
}
