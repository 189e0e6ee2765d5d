// CV ↔ job scan pipeline.
// Implements: fact extraction, keyword matching, deterministic scoring, recruiter
// feedback, orchestration and scan history.
// All oracle calls go through the llm_client::TextOracle trait.

pub mod error;
pub mod facts;
pub mod feedback;
pub mod handlers;
pub mod keyword_match;
pub mod models;
pub mod oracle;
pub mod orchestrator;
pub mod prompts;
pub mod scoring;
pub mod store;
