//! Scan orchestration — runs one analysis from raw text to a persisted result.
//!
//! Flow: extract_facts (CV ∥ job) → score → generate_feedback → save_scan → result.
//!
//! Progress is an explicit state machine:
//! Idle → ExtractingFacts → Scoring → GeneratingFeedback → Persisting → Done,
//! with Failed reachable from any in-flight state. Each transition is reported to a
//! `ProgressReporter` with a human-readable label.
//!
//! Persistence is best-effort: a failed or stalled save is logged and the computed
//! result is still returned unchanged. A save is abandoned after `PERSIST_TIMEOUT`.

use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info, warn};

use crate::llm_client::TextOracle;
use crate::scan::error::ScanError;
use crate::scan::facts::extract_facts;
use crate::scan::feedback::generate_feedback;
use crate::scan::models::AnalysisResult;
use crate::scan::scoring::score;
use crate::scan::store::{
    job_title_snippet, NewScan, ScanStore, StoreError, DEFAULT_SOURCE_FILE_NAME,
};

/// Upper bound on the history write. The result never waits longer than this on storage.
pub const PERSIST_TIMEOUT: Duration = Duration::from_secs(10);

// ────────────────────────────────────────────────────────────────────────────
// State machine
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisState {
    Idle,
    ExtractingFacts,
    Scoring,
    GeneratingFeedback,
    Persisting,
    Done,
    Failed { error: String },
}

impl AnalysisState {
    /// Label shown to the user while the run is in this state.
    pub fn label(&self) -> &'static str {
        match self {
            AnalysisState::Idle => "Ready to analyze",
            AnalysisState::ExtractingFacts => "Reading your CV and the job description...",
            AnalysisState::Scoring => "Calculating your match score...",
            AnalysisState::GeneratingFeedback => "Writing recruiter feedback...",
            AnalysisState::Persisting => "Saving your scan...",
            AnalysisState::Done => "Analysis complete",
            AnalysisState::Failed { .. } => "Analysis failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, AnalysisState::Done | AnalysisState::Failed { .. })
    }

    /// Whether `next` is a legal successor of this state.
    pub fn can_advance_to(&self, next: &AnalysisState) -> bool {
        use AnalysisState::*;
        match (self, next) {
            (Idle, ExtractingFacts)
            | (ExtractingFacts, Scoring)
            | (Scoring, GeneratingFeedback)
            | (GeneratingFeedback, Persisting)
            | (Persisting, Done) => true,
            (from, Failed { .. }) => !matches!(from, Idle) && !from.is_terminal(),
            _ => false,
        }
    }
}

/// Receives every state transition of a run.
pub trait ProgressReporter: Send + Sync {
    fn report(&self, state: &AnalysisState);
}

/// Logs each transition's label at info.
pub struct TracingProgress;

impl ProgressReporter for TracingProgress {
    fn report(&self, state: &AnalysisState) {
        info!("Scan progress: {}", state.label());
    }
}

/// The state of one in-flight run. Owned by `ScanAnalyzer::analyze`, never shared.
struct AnalysisRun<'a> {
    state: AnalysisState,
    progress: &'a dyn ProgressReporter,
}

impl<'a> AnalysisRun<'a> {
    fn new(progress: &'a dyn ProgressReporter) -> Self {
        Self {
            state: AnalysisState::Idle,
            progress,
        }
    }

    /// Moves to `next` and reports it. An illegal transition is logged and ignored:
    /// the run keeps its current state and nothing is reported.
    fn advance(&mut self, next: AnalysisState) -> bool {
        if !self.state.can_advance_to(&next) {
            error!("Illegal scan transition {:?} -> {:?}", self.state, next);
            return false;
        }
        self.state = next;
        self.progress.report(&self.state);
        true
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Orchestrator
// ────────────────────────────────────────────────────────────────────────────

/// Inputs for one analysis run. The CV arrives as already-extracted plain text.
#[derive(Debug, Clone)]
pub struct ScanRequest {
    pub owner_id: String,
    pub cv_text: String,
    pub job_description: String,
    pub source_file_name: Option<String>,
}

pub struct ScanAnalyzer {
    oracle: Arc<dyn TextOracle>,
    store: Arc<dyn ScanStore>,
    oracle_timeout: Duration,
}

impl ScanAnalyzer {
    pub fn new(
        oracle: Arc<dyn TextOracle>,
        store: Arc<dyn ScanStore>,
        oracle_timeout: Duration,
    ) -> Self {
        Self {
            oracle,
            store,
            oracle_timeout,
        }
    }

    /// Runs one analysis. Any extraction or feedback failure aborts the run and is
    /// returned as-is; a persistence failure is not a failure of the run.
    pub async fn analyze(
        &self,
        request: &ScanRequest,
        progress: &dyn ProgressReporter,
    ) -> Result<AnalysisResult, ScanError> {
        let mut run = AnalysisRun::new(progress);

        match self.run_stages(&mut run, request).await {
            Ok(result) => Ok(result),
            Err(e) => {
                error!(
                    "Scan failed for owner {} during {}: {e}",
                    request.owner_id,
                    e.stage()
                );
                run.advance(AnalysisState::Failed {
                    error: e.to_string(),
                });
                Err(e)
            }
        }
    }

    async fn run_stages(
        &self,
        run: &mut AnalysisRun<'_>,
        request: &ScanRequest,
    ) -> Result<AnalysisResult, ScanError> {
        // Step 1: Extract facts (two concurrent oracle calls)
        run.advance(AnalysisState::ExtractingFacts);
        info!("Extracting facts for owner {}", request.owner_id);
        let (cv_facts, job_facts) = extract_facts(
            self.oracle.as_ref(),
            &request.cv_text,
            &request.job_description,
            self.oracle_timeout,
        )
        .await?;

        // Step 2: Deterministic score
        run.advance(AnalysisState::Scoring);
        let report = score(&cv_facts, &job_facts);
        info!(
            "Score: {}/100 for owner {} (hard={} soft={} exp={} impact={} edu={})",
            report.overall_score,
            request.owner_id,
            report.score_breakdown.hard_skills.score,
            report.score_breakdown.soft_skills.score,
            report.score_breakdown.experience.score,
            report.score_breakdown.impact.score,
            report.score_breakdown.education.score,
        );

        // Step 3: Feedback, seeded with the final score
        run.advance(AnalysisState::GeneratingFeedback);
        let feedback = generate_feedback(
            self.oracle.as_ref(),
            report.overall_score,
            &report.score_breakdown.hard_skills.missing,
            self.oracle_timeout,
        )
        .await?;

        let result = AnalysisResult {
            overall_score: report.overall_score,
            score_breakdown: report.score_breakdown,
            feedback,
            job_timeline: cv_facts.job_timeline,
        };

        // Step 4: Persist (best-effort)
        run.advance(AnalysisState::Persisting);
        self.persist(request, &result).await;

        run.advance(AnalysisState::Done);
        Ok(result)
    }

    async fn persist(&self, request: &ScanRequest, result: &AnalysisResult) {
        let scan = NewScan {
            owner_id: request.owner_id.clone(),
            job_title: job_title_snippet(&request.job_description),
            source_file_name: request
                .source_file_name
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .unwrap_or(DEFAULT_SOURCE_FILE_NAME)
                .to_string(),
            result: result.clone(),
        };

        let write = self.store.save_scan(&scan);
        let saved = match tokio::time::timeout(PERSIST_TIMEOUT, write).await {
            Ok(saved) => saved,
            Err(_) => Err(StoreError::Timeout {
                timeout_secs: PERSIST_TIMEOUT.as_secs(),
            }),
        };

        if let Err(e) = saved {
            warn!(
                "Failed to save scan for owner {} (result still returned): {e}",
                request.owner_id
            );
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
