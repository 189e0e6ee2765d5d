use std::sync::Arc;

use crate::config::Config;
use crate::scan::orchestrator::ScanAnalyzer;
use crate::scan::store::ScanStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Runs the full scan pipeline. Holds its own oracle and store handles.
    pub analyzer: Arc<ScanAnalyzer>,
    /// Scan history. Default: PgScanStore; tests swap in an in-memory store.
    pub store: Arc<dyn ScanStore>,
    pub config: Config,
}
