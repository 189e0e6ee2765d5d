use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::scan::models::AnalysisResult;

/// A saved scan as stored in `scans`. Rows are inserted once and never updated;
/// `result` is the `AnalysisResult` exactly as it was returned to the caller.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ScanRow {
    pub id: Uuid,
    pub owner_id: String,
    pub job_title: String,
    pub source_file_name: String,
    pub overall_score: i32,
    pub result: Json<AnalysisResult>,
    pub created_at: DateTime<Utc>,
}
