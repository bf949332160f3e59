//! HTTP error handling and response types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::KpError;
use crate::models::Domain;
use crate::services::FetchOutcome;

/// API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Always "error"
    pub status: String,
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

/// Application error type for HTTP handlers.
#[derive(Debug)]
pub enum AppError {
    /// Invalid request (validation error)
    BadRequest(String),
    /// Not every upstream document could be downloaded
    PartialFetch(Vec<FetchOutcome>),
    /// The analysis run over downloaded documents failed
    RunFailed {
        run_id: String,
        message: String,
        domain: Option<Domain>,
    },
    /// Internal server error
    Internal(String),
    /// Pipeline error
    Pipeline(KpError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, ApiError::new("BAD_REQUEST", msg)),
            AppError::PartialFetch(outcomes) => {
                let succeeded = outcomes.iter().filter(|o| o.is_success()).count();
                let error = ApiError::new(
                    "UPSTREAM_FETCH_FAILED",
                    format!("Only {}/{} files created", succeeded, outcomes.len()),
                )
                .with_details(serde_json::to_value(&outcomes).unwrap_or_default());
                (StatusCode::BAD_REQUEST, error)
            }
            AppError::RunFailed {
                run_id,
                message,
                domain,
            } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::new("ANALYSIS_FAILED", message)
                    .with_details(serde_json::json!({ "run_id": run_id, "domain": domain })),
            ),
            AppError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::new("INTERNAL_ERROR", msg),
            ),
            AppError::Pipeline(e) => {
                let code = match e {
                    KpError::Configuration(_) => "CONFIGURATION_ERROR",
                    _ => "PIPELINE_ERROR",
                };
                let mut error = ApiError::new(code, e.to_string());
                if let Some(domain) = e.domain() {
                    error = error.with_details(serde_json::json!({ "domain": domain }));
                }
                (StatusCode::INTERNAL_SERVER_ERROR, error)
            }
        };

        (status, Json(error)).into_response()
    }
}

impl From<KpError> for AppError {
    fn from(err: KpError) -> Self {
        AppError::Pipeline(err)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}
