//! Error types shared across the crate.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the action creator, the connector and the utilities.
///
/// Every variant is a contract violation at the call site. Nothing is retried.
#[derive(Debug, Error)]
pub enum Error {
    /// Untyped updater that is neither a mapping nor a function.
    #[error("setState must be passed an object or function, got {found}")]
    InvalidUpdater { found: String },

    /// Initial local state that is not a mapping.
    #[error("Component state must be a mapping, got {found}")]
    NotAMapping { found: String },

    #[error("{0}")]
    AssertionFailed(String),

    #[error("Unexpected comparator key \"{0}\"")]
    UnknownComparator(String),

    /// No store registered in the context under the configured binding.
    #[error("No store bound under \"{0}\"")]
    StoreNotBound(String),

    #[error("Invalid connector options: {0}")]
    InvalidOptions(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Errors that can occur when loading connector configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Short human-readable name of a JSON value's kind, used in error messages.
pub(crate) fn kind_of(value: &serde_json::Value) -> String {
    use serde_json::Value;

    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => format!("boolean {b}"),
        Value::Number(n) => format!("number {n}"),
        Value::String(s) => format!("string {s:?}"),
        Value::Array(a) => format!("array of {} items", a.len()),
        Value::Object(_) => "object".to_string(),
    }
}
