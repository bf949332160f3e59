//! Error types for the KP report pipeline.
//!
//! Every variant names the domain (or pipeline stage) it came from so that a
//! failure surfaced at the HTTP boundary can be traced back to the step that
//! produced it.

use std::path::PathBuf;

use crate::models::Domain;

/// Result type for pipeline operations
pub type KpResult<T> = Result<T, KpError>;

/// Error type for the ingestion, rendering and consolidation stages.
#[derive(Debug, thiserror::Error)]
pub enum KpError {
    /// HTTP/network failure or non-2xx answer from the astrology service.
    #[error("Upstream fetch failed for {domain}: {message}")]
    UpstreamFetch { domain: Domain, message: String },

    /// Document is missing its status marker, its payload, or has the wrong shape.
    #[error("Invalid upstream data for {domain}: {message}")]
    InvalidUpstreamData { domain: Domain, message: String },

    /// A stage input (JSON document or rendered report) does not exist.
    #[error("Missing input file for {domain}: {}", path.display())]
    MissingInputFile { domain: Domain, path: PathBuf },

    /// A stage input exists but holds no content.
    #[error("Empty input file for {domain}: {}", path.display())]
    EmptyInputFile { domain: Domain, path: PathBuf },

    /// A sentinel or marker line could not be decomposed. Logged and skipped.
    #[error("Unparseable line {line_number} in {domain} report: {line}")]
    UnparseableLine {
        domain: Domain,
        line_number: usize,
        line: String,
    },

    /// Wraps any failure surfaced to the orchestrator's caller.
    #[error("Consolidation failed during {stage}: {source}")]
    ConsolidationFailure {
        stage: String,
        #[source]
        source: Box<KpError>,
    },

    /// Filesystem failure while reading or writing a pipeline file.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed JSON in an upstream document.
    #[error("Malformed JSON for {domain}: {source}")]
    Json {
        domain: Domain,
        #[source]
        source: serde_json::Error,
    },

    /// Configuration or initialization error.
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl KpError {
    /// Create an upstream fetch error.
    pub fn fetch(domain: Domain, message: impl Into<String>) -> Self {
        Self::UpstreamFetch {
            domain,
            message: message.into(),
        }
    }

    /// Create an invalid-data error.
    pub fn invalid_data(domain: Domain, message: impl Into<String>) -> Self {
        Self::InvalidUpstreamData {
            domain,
            message: message.into(),
        }
    }

    /// Create an I/O error bound to a path.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Wrap this error as a consolidation failure of the given stage.
    ///
    /// Already-wrapped errors are returned unchanged so the innermost stage is kept.
    pub fn in_stage(self, stage: impl Into<String>) -> Self {
        match self {
            Self::ConsolidationFailure { .. } => self,
            other => Self::ConsolidationFailure {
                stage: stage.into(),
                source: Box::new(other),
            },
        }
    }

    /// The domain this error is attributed to, if any.
    pub fn domain(&self) -> Option<Domain> {
        match self {
            Self::UpstreamFetch { domain, .. }
            | Self::InvalidUpstreamData { domain, .. }
            | Self::MissingInputFile { domain, .. }
            | Self::EmptyInputFile { domain, .. }
            | Self::UnparseableLine { domain, .. }
            | Self::Json { domain, .. } => Some(*domain),
            Self::ConsolidationFailure { source, .. } => source.domain(),
            Self::Io { .. } | Self::Configuration(_) => None,
        }
    }

    /// Whether this error aborts a run. Line-level anomalies never do.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::UnparseableLine { .. })
    }
}
