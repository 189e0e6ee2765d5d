//! Scan persistence. History is best-effort: the orchestrator logs and swallows write
//! failures, so a saved scan is a convenience copy, never the authoritative result.
//!
//! CRITICAL: This is append-only. Never UPDATE existing rows.

use async_trait::async_trait;
use sqlx::PgPool;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::models::scan::ScanRow;
use crate::scan::models::AnalysisResult;

/// Longest job-title snippet stored alongside a scan, in characters.
pub const JOB_TITLE_MAX_CHARS: usize = 100;
/// File name recorded when the CV was pasted rather than uploaded.
pub const DEFAULT_SOURCE_FILE_NAME: &str = "pasted-text";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Failed to serialize scan result: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Scan write did not finish within {timeout_secs}s")]
    Timeout { timeout_secs: u64 },
}

/// A scan ready to be written.
#[derive(Debug, Clone)]
pub struct NewScan {
    pub owner_id: String,
    pub job_title: String,
    pub source_file_name: String,
    pub result: AnalysisResult,
}

#[async_trait]
pub trait ScanStore: Send + Sync {
    async fn save_scan(&self, scan: &NewScan) -> Result<Uuid, StoreError>;

    /// The owner's scans, newest first.
    async fn list_scans(&self, owner_id: &str, limit: i64) -> Result<Vec<ScanRow>, StoreError>;
}

/// First line of the job description, trimmed and cut to `JOB_TITLE_MAX_CHARS`.
pub fn job_title_snippet(job_description: &str) -> String {
    job_description
        .trim_start()
        .lines()
        .next()
        .unwrap_or("")
        .trim()
        .chars()
        .take(JOB_TITLE_MAX_CHARS)
        .collect()
}

pub struct PgScanStore {
    pool: PgPool,
}

impl PgScanStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ScanStore for PgScanStore {
    async fn save_scan(&self, scan: &NewScan) -> Result<Uuid, StoreError> {
        let id = Uuid::new_v4();
        let result = serde_json::to_value(&scan.result)?;

        sqlx::query(
            r#"
            INSERT INTO scans (id, owner_id, job_title, source_file_name, overall_score, result)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(id)
        .bind(&scan.owner_id)
        .bind(&scan.job_title)
        .bind(&scan.source_file_name)
        .bind(scan.result.overall_score as i32)
        .bind(&result)
        .execute(&self.pool)
        .await?;

        info!("Saved scan {} for owner {}", id, scan.owner_id);
        Ok(id)
    }

    async fn list_scans(&self, owner_id: &str, limit: i64) -> Result<Vec<ScanRow>, StoreError> {
        let rows = sqlx::query_as::<_, ScanRow>(
            r#"
            SELECT id, owner_id, job_title, source_file_name, overall_score, result, created_at
            FROM scans
            WHERE owner_id = $1
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(owner_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
