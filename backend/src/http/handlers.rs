//! HTTP handlers for the REST API.

use axum::{extract::State, Json};
use log::{error, info};

use super::dto::{GenerateParamsRequest, GenerateParamsResponse, HealthResponse};
use super::error::AppError;
use super::state::AppState;
use crate::services::{fetch_all, run_analysis, AnalysisRequest, ChartParams};

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        data_dir: state.config.data_dir.display().to_string(),
    }))
}

// =============================================================================
// Report generation
// =============================================================================

/// POST /generate-params
///
/// Resolve the UTC offset, download all seven documents, then run the
/// analysis over them.
pub async fn generate_params(
    State(state): State<AppState>,
    Json(request): Json<GenerateParamsRequest>,
) -> HandlerResult<GenerateParamsResponse> {
    let missing = request.missing_fields();
    if !missing.is_empty() {
        return Err(AppError::BadRequest(format!(
            "Missing required fields: {}",
            missing.join(", ")
        )));
    }
    let (Some(dob), Some(tob), Some(lat), Some(lon)) =
        (request.dob, request.tob, request.lat, request.lon)
    else {
        return Err(AppError::BadRequest("Missing required fields".to_string()));
    };

    let client = state.upstream()?;

    let tz = match request.tz {
        Some(tz) => tz,
        None => {
            let resolver = state.timezone.clone();
            tokio::task::spawn_blocking(move || resolver.utc_offset_hours(lat, lon))
                .await
                .map_err(|e| AppError::Internal(format!("Task join error: {}", e)))?
                .map_err(|e| AppError::BadRequest(e.to_string()))?
        }
    };
    let params = ChartParams {
        dob: dob.trim().to_string(),
        tob: tob.trim().to_string(),
        lat,
        lon,
        tz,
    };

    let _guard = state.run_lock.lock().await;
    info!(
        "Generating KP analysis for {} {} at ({}, {}) tz {}",
        params.dob, params.tob, params.lat, params.lon, params.tz
    );

    let data_dir = state.config.data_dir.clone();
    let outcomes = fetch_all(client.as_ref(), &params, &data_dir).await;
    if outcomes.iter().any(|o| !o.is_success()) {
        return Err(AppError::PartialFetch(outcomes));
    }

    let analysis = AnalysisRequest::new(data_dir, state.config.consolidation_mode);
    let result = tokio::task::spawn_blocking(move || run_analysis(&analysis))
        .await
        .map_err(|e| AppError::Internal(format!("Task join error: {}", e)))?;

    match result.output_file {
        Some(output_file) if result.is_success() => Ok(Json(GenerateParamsResponse {
            status: "success".to_string(),
            message: "Full analysis completed".to_string(),
            run_id: result.run_id,
            output_file,
            generated_files: result.generated_files,
        })),
        _ => {
            error!("Analysis run {} failed: {}", result.run_id, result.message);
            Err(AppError::RunFailed {
                run_id: result.run_id,
                message: result.message,
                domain: result.failed_domain,
            })
        }
    }
}
