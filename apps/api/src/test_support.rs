//! In-memory collaborators for unit tests: a scripted text oracle and a scan store.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::types::Json;
use uuid::Uuid;

use crate::llm_client::{LlmError, TextOracle};
use crate::models::scan::ScanRow;
use crate::scan::orchestrator::{AnalysisState, ProgressReporter};
use crate::scan::store::{NewScan, ScanStore, StoreError};

#[derive(Debug, Clone)]
enum Reply {
    Text(String),
    Fail,
}

/// A recorded oracle call.
#[derive(Debug, Clone)]
pub struct OracleCall {
    pub prompt: String,
    pub temperature: f32,
}

/// Replies are chosen by the first marker contained in the prompt, falling back to the
/// catch-all reply. Unscripted prompts fail with a 500.
#[derive(Default)]
pub struct ScriptedOracle {
    rules: Vec<(String, Reply)>,
    fallback: Option<Reply>,
    delay: Option<Duration>,
    calls: Mutex<Vec<OracleCall>>,
}

impl ScriptedOracle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply_when(mut self, marker: &str, text: &str) -> Self {
        self.rules
            .push((marker.to_string(), Reply::Text(text.to_string())));
        self
    }

    pub fn fail_when(mut self, marker: &str) -> Self {
        self.rules.push((marker.to_string(), Reply::Fail));
        self
    }

    pub fn reply_always(mut self, text: &str) -> Self {
        self.fallback = Some(Reply::Text(text.to_string()));
        self
    }

    pub fn fail_always(mut self) -> Self {
        self.fallback = Some(Reply::Fail);
        self
    }

    /// Every call sleeps this long before replying.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> Vec<OracleCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextOracle for ScriptedOracle {
    async fn complete(&self, prompt: &str, temperature: f32) -> Result<String, LlmError> {
        self.calls.lock().unwrap().push(OracleCall {
            prompt: prompt.to_string(),
            temperature,
        });

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let reply = self
            .rules
            .iter()
            .find(|(marker, _)| prompt.contains(marker.as_str()))
            .map(|(_, reply)| reply.clone())
            .or_else(|| self.fallback.clone())
            .unwrap_or(Reply::Fail);

        match reply {
            Reply::Text(text) => Ok(text),
            Reply::Fail => Err(LlmError::Api {
                status: 500,
                message: "scripted failure".to_string(),
            }),
        }
    }
}

/// Append-only in-memory store. `failing()` makes every write fail; `stalled()` makes
/// every write sleep before it lands.
#[derive(Default)]
pub struct MemoryStore {
    rows: Mutex<Vec<ScanRow>>,
    fail_writes: bool,
    write_delay: Option<Duration>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail_writes: true,
            ..Self::default()
        }
    }

    pub fn stalled(delay: Duration) -> Self {
        Self {
            write_delay: Some(delay),
            ..Self::default()
        }
    }

    pub fn rows(&self) -> Vec<ScanRow> {
        self.rows.lock().unwrap().clone()
    }
}

#[async_trait]
impl ScanStore for MemoryStore {
    async fn save_scan(&self, scan: &NewScan) -> Result<Uuid, StoreError> {
        if let Some(delay) = self.write_delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_writes {
            return Err(StoreError::Database(sqlx::Error::PoolTimedOut));
        }
        let id = Uuid::new_v4();
        self.rows.lock().unwrap().push(ScanRow {
            id,
            owner_id: scan.owner_id.clone(),
            job_title: scan.job_title.clone(),
            source_file_name: scan.source_file_name.clone(),
            overall_score: scan.result.overall_score as i32,
            result: Json(scan.result.clone()),
            created_at: Utc::now(),
        });
        Ok(id)
    }

    async fn list_scans(&self, owner_id: &str, limit: i64) -> Result<Vec<ScanRow>, StoreError> {
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .iter()
            .rev()
            .filter(|r| r.owner_id == owner_id)
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }
}

/// Discards every transition.
pub struct NoopProgress;

impl ProgressReporter for NoopProgress {
    fn report(&self, _state: &AnalysisState) {}
}

/// Keeps every state a run passed through, in order.
#[derive(Default)]
pub struct RecordingProgress {
    states: Mutex<Vec<AnalysisState>>,
}

impl RecordingProgress {
    pub fn states(&self) -> Vec<AnalysisState> {
        self.states.lock().unwrap().clone()
    }
}

impl ProgressReporter for RecordingProgress {
    fn report(&self, state: &AnalysisState) {
        self.states.lock().unwrap().push(state.clone());
    }
}
