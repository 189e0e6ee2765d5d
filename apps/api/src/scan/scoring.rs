//! Deterministic Scorer — combines extracted facts into a 0–100 score with a breakdown.
//!
//! Pure: no I/O, no randomness, no clock. Identical facts always produce an identical
//! report, which is what makes a stored score auditable.
//!
//! Rounding order matters for reproducing historical scores:
//! each dimension is rounded UP on its own, then the five integers are summed and
//! clamped to 100. Never sum unrounded values.

use crate::scan::keyword_match::match_keywords;
use crate::scan::models::{
    EducationDimension, ExperienceDimension, ExtractedCvFacts, ExtractedJobFacts,
    ImpactDimension, KeywordMatchResult, ScoreBreakdown, ScoreReport, SkillDimension,
};

// ────────────────────────────────────────────────────────────────────────────
// Fixed weights and normalization targets
// ────────────────────────────────────────────────────────────────────────────

pub const HARD_SKILLS_WEIGHT: f64 = 0.40;
pub const SOFT_SKILLS_WEIGHT: f64 = 0.10;
pub const EXPERIENCE_WEIGHT: f64 = 0.25;
pub const IMPACT_WEIGHT: f64 = 0.15;
pub const EDUCATION_WEIGHT: f64 = 0.10;

/// Action verbs needed for full action-verb credit.
pub const ACTION_VERB_TARGET: u32 = 5;
/// Quantified results needed for full quantified-result credit.
pub const QUANTIFIED_RESULT_TARGET: u32 = 3;

pub const MAX_OVERALL_SCORE: u32 = 100;

/// Tolerance for float noise before taking a ceiling (e.g. 15.000000000000002 → 15).
const CEIL_EPSILON: f64 = 1e-9;

/// Maximum sub-score of a dimension: weight × 100.
pub fn max_points(weight: f64) -> u32 {
    (weight * 100.0).round() as u32
}

fn ceil_div(numerator: u64, denominator: u64) -> u64 {
    numerator.div_ceil(denominator)
}

fn ceil_tolerant(value: f64) -> u32 {
    if !value.is_finite() || value <= 0.0 {
        return 0;
    }
    (value - CEIL_EPSILON).ceil().max(0.0) as u32
}

// ────────────────────────────────────────────────────────────────────────────
// Scoring
// ────────────────────────────────────────────────────────────────────────────

/// Scores candidate facts against job facts.
pub fn score(cv: &ExtractedCvFacts, job: &ExtractedJobFacts) -> ScoreReport {
    let hard_skills = skill_dimension(
        match_keywords(&job.required_hard_skills, &cv.hard_skills),
        HARD_SKILLS_WEIGHT,
    );
    let soft_skills = skill_dimension(
        match_keywords(&job.required_soft_skills, &cv.soft_skills),
        SOFT_SKILLS_WEIGHT,
    );
    let experience = experience_dimension(cv.total_years_experience, job.required_years_experience);
    let impact = impact_dimension(cv.action_verb_count, cv.quantified_result_count);
    let education = EducationDimension {
        score: if cv.highest_education_level >= job.required_education_level {
            max_points(EDUCATION_WEIGHT)
        } else {
            0
        },
        weight: EDUCATION_WEIGHT,
        max_score: max_points(EDUCATION_WEIGHT),
        required_level: job.required_education_level,
        candidate_level: cv.highest_education_level,
    };

    let score_breakdown = ScoreBreakdown {
        hard_skills,
        soft_skills,
        experience,
        impact,
        education,
    };

    let overall_score = score_breakdown
        .sub_scores()
        .iter()
        .sum::<u32>()
        .min(MAX_OVERALL_SCORE);

    ScoreReport {
        overall_score,
        score_breakdown,
    }
}

/// Ratio of matched required keywords, rounded up. No requirements means full credit.
fn skill_dimension(result: KeywordMatchResult, weight: f64) -> SkillDimension {
    let max_score = max_points(weight);
    let required = (result.matched.len() + result.missing.len()) as u64;

    let score = if required == 0 {
        max_score
    } else {
        ceil_div(result.matched.len() as u64 * max_score as u64, required) as u32
    };

    SkillDimension {
        score,
        weight,
        max_score,
        matched: result.matched,
        missing: result.missing,
    }
}

/// min(1, candidate / required) of the weight, rounded up. Zero required years means
/// full credit.
fn experience_dimension(candidate_years: f64, required_years: f64) -> ExperienceDimension {
    let max_score = max_points(EXPERIENCE_WEIGHT);
    let candidate = if candidate_years.is_finite() {
        candidate_years.max(0.0)
    } else {
        0.0
    };

    let score = if !required_years.is_finite() || required_years <= 0.0 {
        max_score
    } else if candidate >= required_years {
        max_score
    } else {
        // candidate × points / required keeps whole-year inputs exact.
        let raw = candidate * max_score as f64 / required_years;
        ceil_tolerant(raw).min(max_score)
    };

    ExperienceDimension {
        score,
        weight: EXPERIENCE_WEIGHT,
        max_score,
        required_years,
        candidate_years,
    }
}

/// Half credit each for action verbs (target 5) and quantified results (target 3).
fn impact_dimension(action_verbs: u32, quantified_results: u32) -> ImpactDimension {
    let max_score = max_points(IMPACT_WEIGHT);
    let verbs = action_verbs.min(ACTION_VERB_TARGET) as u64;
    let results = quantified_results.min(QUANTIFIED_RESULT_TARGET) as u64;
    let verb_target = ACTION_VERB_TARGET as u64;
    let result_target = QUANTIFIED_RESULT_TARGET as u64;

    // (0.5·v/V + 0.5·q/Q)·points == points·(v·Q + q·V) / (2·V·Q), kept in integers.
    let numerator = max_score as u64 * (verbs * result_target + results * verb_target);
    let denominator = 2 * verb_target * result_target;

    ImpactDimension {
        score: ceil_div(numerator, denominator) as u32,
        weight: IMPACT_WEIGHT,
        max_score,
        action_verb_count: action_verbs,
        action_verb_target: ACTION_VERB_TARGET,
        quantified_result_count: quantified_results,
        quantified_result_target: QUANTIFIED_RESULT_TARGET,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
