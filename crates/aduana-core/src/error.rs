//! Error types for the aduana-core library.

use thiserror::Error;

/// Main error type for the aduana library.
#[derive(Error, Debug)]
pub enum AduanaError {
    /// Record ingestion error.
    #[error("ingestion error: {0}")]
    Ingest(#[from] IngestError),

    /// Advisory service error.
    #[error("advisory error: {0}")]
    Advisory(#[from] AdvisoryError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors raised while turning untrusted JSON into an invoice record.
///
/// Any of these makes the record structurally invalid; the engine reports
/// it as a single structural finding instead of running the rule catalog.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum IngestError {
    /// The document is not a JSON object.
    #[error("invoice must be a JSON object, found {0}")]
    NotAnObject(&'static str),

    /// The object matches neither the flexible nor the fixed record shape.
    #[error("unrecognized invoice layout: expected `Fields`/`Table` or `numero_factura`")]
    UnknownShape,

    /// A field has a value that cannot be represented.
    #[error("invalid value for {field}: {reason}")]
    InvalidField { field: String, reason: String },

    /// The object could not be decoded into the expected shape.
    #[error("malformed invoice: {0}")]
    Malformed(String),
}

/// Errors reported by an advisory service.
///
/// These never leave the advisory port: they are turned into an
/// unknown verdict with an explanatory message.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AdvisoryError {
    /// No advisory service is configured.
    #[error("advisory service is disabled")]
    Disabled,

    /// The API key environment variable is not set.
    #[error("environment variable {0} is not set")]
    MissingApiKey(String),

    /// The request could not be sent or timed out.
    #[error("transport failure: {0}")]
    Transport(String),

    /// The service answered with a non-success status.
    #[error("service returned HTTP {0}")]
    Status(u16),

    /// The reply was not the JSON document we asked for.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// The reply parsed but lacked required keys.
    #[error("response is missing keys: {}", .0.join(", "))]
    MissingKeys(Vec<String>),
}

/// Result type for the aduana library.
pub type Result<T> = std::result::Result<T, AduanaError>;
