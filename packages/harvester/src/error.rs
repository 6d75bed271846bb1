//! Error types for the harvester.
//!
//! `HarvesterError` covers every failure the library can surface. Only the
//! catalog validation variants are fatal to a whole run; everything else is
//! caught at the entry boundary by the orchestrator and turned into a report
//! line.

use std::fmt;

use thiserror::Error;

/// What made the last attempt of a retried request fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryCause {
    /// Timeout, refused connection or aborted transfer.
    Network,

    /// HTTP 429 or 5xx from the remote service.
    RemoteService { status: u16 },
}

impl fmt::Display for RetryCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Network => write!(f, "network failure"),
            Self::RemoteService { status } => write!(f, "remote service error (HTTP {status})"),
        }
    }
}

/// Main error type for the harvester library.
#[derive(Debug, Error)]
pub enum HarvesterError {
    /// Invalid law identifier format.
    #[error("Invalid law ID: '{0}'. Expected lowercase ASCII letters, digits, '-' or '.' (e.g., fz-152-2006)")]
    InvalidLawId(String),

    /// Invalid date format.
    #[error("Invalid date format: '{0}'. Expected YYYY-MM-DD (e.g., 2006-07-27)")]
    InvalidDate(String),

    /// HTTP client could not be built or the request could not be constructed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Network-level failure on a single attempt (timeout, connect, abort).
    #[error("Network error for {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Remote service answered 429 or 5xx on a single attempt.
    #[error("Remote service error for {url}: HTTP {status}")]
    RemoteService { url: String, status: u16 },

    /// Remote service answered with a status that is not worth retrying.
    #[error("Unexpected HTTP status for {url}: {status}")]
    HttpStatus { url: String, status: u16 },

    /// All attempts of a request failed.
    #[error("Giving up on {url} after {attempts} attempts: {cause} ({message})")]
    RetriesExhausted {
        url: String,
        attempts: u32,
        cause: RetryCause,
        message: String,
    },

    /// Response body could not be decoded with the selected encoding.
    #[error("Failed to decode response from {url} as {encoding}")]
    Encoding { url: String, encoding: &'static str },

    /// Rendered markup could not be converted into text.
    #[error("Failed to render markup: {0}")]
    Markup(String),

    /// Required law IDs are missing from the loaded catalog.
    #[error("Catalog validation failed: missing required law IDs: {}", .missing.join(", "))]
    MissingRequiredLaws { missing: Vec<String> },

    /// The same law ID is declared twice in the catalog.
    #[error("Catalog validation failed: duplicate law ID '{0}'")]
    DuplicateLawId(String),

    /// A catalog entry carries a date that is neither `YYYY-MM-DD` nor `DD.MM.YYYY`.
    #[error("Catalog validation failed: invalid effective_date '{value}' for nd {nd}")]
    InvalidCatalogDate { nd: String, value: String },

    /// Seed record could not be written.
    #[error("Failed to persist seed record for {law_id}: {source}")]
    Persistence {
        law_id: String,
        #[source]
        source: std::io::Error,
    },

    /// Invalid configuration value (usually from the environment).
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML (de)serialization error.
    #[error("YAML parsing failed: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

impl HarvesterError {
    /// Whether this error means the catalog itself is unusable.
    ///
    /// These are the only errors that abort a run and map to a dedicated exit status.
    #[must_use]
    pub fn is_catalog_validation(&self) -> bool {
        matches!(
            self,
            Self::MissingRequiredLaws { .. }
                | Self::DuplicateLawId(_)
                | Self::InvalidLawId(_)
                | Self::InvalidCatalogDate { .. }
        )
    }
}

/// Result type alias for harvester operations.
pub type Result<T> = std::result::Result<T, HarvesterError>;
