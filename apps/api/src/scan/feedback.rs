//! Qualitative Feedback — recruiter-style commentary seeded with the final score.
//!
//! Advisory only: nothing here feeds back into the score. A failure is still fatal to
//! the run, because a scan is always presented with its narrative.

use std::time::Duration;

use serde_json::{Map, Value};
use tracing::info;

use crate::llm_client::TextOracle;
use crate::scan::error::{ResponseDefect, ScanError, Stage};
use crate::scan::models::QualitativeFeedback;
use crate::scan::oracle::{ask, required_string, string_list};
use crate::scan::prompts::feedback_prompt;

/// More varied wording is acceptable for unscored commentary.
pub const FEEDBACK_TEMPERATURE: f32 = 0.7;
/// How many missing hard skills are passed to the oracle.
pub const TOP_MISSING_SKILLS: usize = 5;

pub async fn generate_feedback(
    oracle: &dyn TextOracle,
    overall_score: u32,
    missing_hard_skills: &[String],
    timeout: Duration,
) -> Result<QualitativeFeedback, ScanError> {
    let top_missing = &missing_hard_skills[..missing_hard_skills.len().min(TOP_MISSING_SKILLS)];
    let prompt = feedback_prompt(overall_score, top_missing);

    let reply = ask(oracle, Stage::Feedback, &prompt, FEEDBACK_TEMPERATURE, timeout).await?;
    let feedback = parse_feedback(&reply.object)
        .map_err(|reason| ScanError::unusable(Stage::Feedback, reason, &reply.raw))?;

    info!(
        "Feedback generated with {} suggested questions",
        feedback.suggested_questions.len()
    );
    Ok(feedback)
}

pub fn parse_feedback(object: &Map<String, Value>) -> Result<QualitativeFeedback, ResponseDefect> {
    Ok(QualitativeFeedback {
        gut_reaction: required_string(object, "gutReaction")?,
        summary: required_string(object, "summary")?,
        suggested_questions: string_list(object, "suggestedQuestions")?,
    })
}
