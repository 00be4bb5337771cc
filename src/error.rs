//! Error types for the server browser
//!
//! This module defines the error hierarchy for the whole crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.
//! Every variant maps onto an [`ErrorKind`] so callers can decide whether a
//! failed fetch is worth another manual attempt.

use thiserror::Error;

/// The main error type for the server browser
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Missing required config field: {field}")]
    MissingConfigField { field: String },

    #[error("Invalid config value for '{field}': {message}")]
    InvalidConfigValue { field: String, message: String },

    #[error("Missing credential: {source_name}")]
    MissingCredential { source_name: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // Transport Errors
    // ============================================================================
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Request timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("Rate limiter did not admit the request within {waited_ms}ms")]
    RateLimited { waited_ms: u64 },

    // ============================================================================
    // Payload Errors
    // ============================================================================
    #[error("Malformed listing payload: {message}")]
    MalformedPayload { message: String },

    // ============================================================================
    // Runtime Errors
    // ============================================================================
    #[error("Aggregator task is no longer running")]
    AggregatorClosed,

    #[error("Fetch at offset {offset} failed ({kind}): {message}")]
    FetchFailed {
        kind: ErrorKind,
        offset: u32,
        message: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),

    #[error("{message}: {source}")]
    Context {
        message: String,
        source: Box<Error>,
    },
}

/// Coarse classification of an [`Error`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad or missing configuration; a fetch is never attempted
    Configuration,
    /// Network failure, timeout or non-success status
    Transport,
    /// The response was not a well-formed page
    MalformedPayload,
    /// Local runtime failure (closed channels, I/O)
    Internal,
}

impl ErrorKind {
    /// Configuration errors should be surfaced once and never retried in a loop
    pub fn is_configuration(self) -> bool {
        matches!(self, Self::Configuration)
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Configuration => "configuration",
            Self::Transport => "transport",
            Self::MalformedPayload => "malformed_payload",
            Self::Internal => "internal",
        };
        f.write_str(name)
    }
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingConfigField {
            field: field.into(),
        }
    }

    /// Create an invalid value error
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfigValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a missing credential error
    pub fn missing_credential(source_name: impl Into<String>) -> Self {
        Self::MissingCredential {
            source_name: source_name.into(),
        }
    }

    /// Create an HTTP status error
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            body: body.into(),
        }
    }

    /// Create a malformed payload error
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedPayload {
            message: message.into(),
        }
    }

    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Config { .. }
            | Error::MissingConfigField { .. }
            | Error::InvalidConfigValue { .. }
            | Error::MissingCredential { .. }
            | Error::YamlParse(_)
            | Error::InvalidUrl(_) => ErrorKind::Configuration,
            Error::Http(_)
            | Error::HttpStatus { .. }
            | Error::Timeout { .. }
            | Error::RateLimited { .. } => ErrorKind::Transport,
            Error::MalformedPayload { .. } | Error::JsonParse(_) => ErrorKind::MalformedPayload,
            Error::FetchFailed { kind, .. } => *kind,
            Error::Context { source, .. } => source.kind(),
            Error::AggregatorClosed | Error::Io(_) | Error::Other(_) => ErrorKind::Internal,
        }
    }

    /// Whether another `request_more()` may succeed without changing configuration
    pub fn is_retryable(&self) -> bool {
        match self.kind() {
            ErrorKind::Transport | ErrorKind::MalformedPayload => true,
            ErrorKind::Configuration | ErrorKind::Internal => false,
        }
    }
}

/// Result type alias for the server browser
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| Error::Context {
            message: message.into(),
            source: Box::new(e.into()),
        })
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| Error::Context {
            message: f(),
            source: Box::new(e.into()),
        })
    }
}
