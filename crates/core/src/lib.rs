//! # Patient Core
//!
//! Core business logic for the patient data server.
//!
//! This crate contains the in-memory patient record store and the pieces it is built from:
//! - [`Record`]: a schema-less JSON object with typed accessors for the fields the store inspects
//! - [`PatientStore`]: the ordered collection and its insert/list/find/update/delete operations
//! - [`CoreConfig`] and [`IdPolicy`]: startup configuration
//! - [`Clock`]: the timestamp source
//!
//! **No API concerns**: HTTP servers, routing and response shapes belong in `api-rest` and
//! `api-shared`.

pub mod clock;
pub mod config;
pub mod constants;
pub mod error;
pub mod record;
pub mod store;

pub use clock::{format_timestamp, timestamp_now, Clock, SystemClock};
pub use config::{id_policy_from_env_value, rest_addr_from_env_value, CoreConfig, IdPolicy};
pub use error::{ConfigError, PatientError, PatientResult};
pub use record::Record;
pub use store::PatientStore;
