//! Error types for usher.

use thiserror::Error;

/// Main error type for usher operations.
#[derive(Error, Debug)]
pub enum UsherError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("building resolution error: {0}")]
    Resolve(#[from] ResolveError),

    #[error("assignment error: {0}")]
    Assign(#[from] AssignError),

    #[error("upstream error: {0}")]
    Upstream(#[from] UpstreamError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Configuration-related errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),

    #[error("missing required field: {0}")]
    MissingField(String),

    #[error("no user cache directory available")]
    CacheDir,
}

/// Malformed input at a parse site.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("'{value}' cannot be converted to a timestamp: {source}")]
    Timestamp {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("'{value}' cannot be converted to an integer: {source}")]
    Number {
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },
}

/// Building disambiguation cannot proceed.
#[derive(Error, Debug)]
pub enum ResolveError {
    /// The top search hit is not confidently distinguishable from the rest.
    #[error("{hits} buildings found")]
    Ambiguous { hits: u64 },

    #[error("no search results to score")]
    EmptyInput,

    #[error("index error: {0}")]
    Index(String),

    #[error("query error: {0}")]
    Query(String),
}

/// The assignment pass has no spatial anchor to rank candidates by.
#[derive(Error, Debug)]
pub enum AssignError {
    #[error("no preferred floor/section configured and no neighboring booking to anchor on")]
    NoPreferenceConfigured,
}

/// A collaborator call failed.
#[derive(Error, Debug)]
pub enum UpstreamError {
    #[error("paging failed: {0}")]
    Paging(String),

    #[error("free/busy lookup for {calendar}: {reason}")]
    FreeBusy { calendar: String, reason: String },

    #[error("calendar write failed: {0}")]
    Write(String),
}

/// Result type alias for usher operations.
pub type Result<T> = std::result::Result<T, UsherError>;
