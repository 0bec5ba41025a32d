//! Error types for patient record operations.

/// Errors raised by the patient record store.
#[derive(Debug, thiserror::Error)]
pub enum PatientError {
    /// The supplied body could not be parsed into a JSON object.
    ///
    /// The contained string is the underlying parse failure, surfaced to callers verbatim.
    #[error("invalid data format: {0}")]
    InvalidFormat(String),
    /// No record matches the requested `id` or `requestId`.
    #[error("patient not found")]
    NotFound,
}

impl From<serde_json::Error> for PatientError {
    fn from(err: serde_json::Error) -> Self {
        PatientError::InvalidFormat(err.to_string())
    }
}

pub type PatientResult<T> = std::result::Result<T, PatientError>;

/// Errors raised while resolving startup configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid id policy '{0}' (expected 'count' or 'monotonic')")]
    InvalidIdPolicy(String),
    #[error("invalid listen address '{value}': {source}")]
    InvalidAddress {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },
}
