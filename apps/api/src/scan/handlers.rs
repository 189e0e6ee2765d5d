//! Axum route handlers for the Scan API.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::scan::ScanRow;
use crate::scan::models::AnalysisResult;
use crate::scan::orchestrator::{ScanRequest, TracingProgress};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateScanRequest {
    pub owner_id: String,
    pub cv_text: String,
    pub job_description: String,
    #[serde(default)]
    pub source_file_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ScanHistoryQuery {
    pub owner_id: String,
}

#[derive(Debug, Serialize)]
pub struct ScanHistoryResponse {
    pub scans: Vec<ScanRow>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/scans
///
/// Full scan: extract facts → score → feedback → save.
/// Returns the AnalysisResult even if saving it to history failed.
pub async fn handle_create_scan(
    State(state): State<AppState>,
    Json(request): Json<CreateScanRequest>,
) -> Result<Json<AnalysisResult>, AppError> {
    if request.owner_id.trim().is_empty() {
        return Err(AppError::Validation("owner_id cannot be empty".to_string()));
    }
    if request.cv_text.trim().is_empty() {
        return Err(AppError::Validation("cv_text cannot be empty".to_string()));
    }
    if request.job_description.trim().is_empty() {
        return Err(AppError::Validation(
            "job_description cannot be empty".to_string(),
        ));
    }

    let scan = ScanRequest {
        owner_id: request.owner_id,
        cv_text: request.cv_text,
        job_description: request.job_description,
        source_file_name: request.source_file_name,
    };

    let result = state.analyzer.analyze(&scan, &TracingProgress).await?;

    Ok(Json(result))
}

/// GET /api/v1/scans?owner_id=...
///
/// Returns the owner's saved scans, newest first, exactly as they were stored.
pub async fn handle_list_scans(
    State(state): State<AppState>,
    Query(query): Query<ScanHistoryQuery>,
) -> Result<Json<ScanHistoryResponse>, AppError> {
    if query.owner_id.trim().is_empty() {
        return Err(AppError::Validation("owner_id cannot be empty".to_string()));
    }

    let scans = state
        .store
        .list_scans(&query.owner_id, state.config.history_limit)
        .await?;

    Ok(Json(ScanHistoryResponse { scans }))
}
