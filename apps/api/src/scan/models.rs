//! Data model for one analysis run. Every value here is built once and never mutated;
//! a re-analysis produces a fresh `AnalysisResult`.
//!
//! JSON field names are camelCase: the same names the oracle schemas use and the shape
//! persisted scan records are read back in.

use serde::{Deserialize, Serialize};

// ────────────────────────────────────────────────────────────────────────────
// Extracted facts
// ────────────────────────────────────────────────────────────────────────────

/// Highest completed education. Declaration order is the ordinal used for comparison:
/// None < HighSchool < Bachelors < Masters < PhD.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum EducationLevel {
    #[default]
    None,
    HighSchool,
    Bachelors,
    Masters,
    PhD,
}

impl EducationLevel {
    /// Parses an oracle label, tolerating case, punctuation and common aliases
    /// ("Bachelor's degree", "master", "High School", "Doctorate").
    pub fn from_label(label: &str) -> Option<Self> {
        let key: String = label
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();

        match key.as_str() {
            "" | "none" | "na" | "noformaleducation" => Some(Self::None),
            "highschool" | "secondary" | "ged" => Some(Self::HighSchool),
            "bachelors" | "bachelor" | "bachelorsdegree" | "bachelordegree" | "ba" | "bs"
            | "bsc" => Some(Self::Bachelors),
            "masters" | "master" | "mastersdegree" | "masterdegree" | "ms" | "msc" | "ma"
            | "mba" => Some(Self::Masters),
            "phd" | "doctorate" | "doctoral" | "doctoraldegree" => Some(Self::PhD),
            _ => None,
        }
    }
}

/// One role from the candidate's work history, in CV order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEntry {
    pub role: String,
    pub company: String,
    pub start: String,
    /// `None` for a current position.
    pub end: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedCvFacts {
    pub hard_skills: Vec<String>,
    pub soft_skills: Vec<String>,
    pub total_years_experience: f64,
    pub highest_education_level: EducationLevel,
    pub action_verb_count: u32,
    pub quantified_result_count: u32,
    pub job_timeline: Vec<TimelineEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedJobFacts {
    pub required_hard_skills: Vec<String>,
    pub required_soft_skills: Vec<String>,
    pub required_years_experience: f64,
    pub required_education_level: EducationLevel,
}

// ────────────────────────────────────────────────────────────────────────────
// Matching and scoring
// ────────────────────────────────────────────────────────────────────────────

/// Partition of one category's required keywords. Order carries no meaning.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordMatchResult {
    pub matched: Vec<String>,
    pub missing: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillDimension {
    pub score: u32,
    pub weight: f64,
    pub max_score: u32,
    pub matched: Vec<String>,
    pub missing: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceDimension {
    pub score: u32,
    pub weight: f64,
    pub max_score: u32,
    pub required_years: f64,
    pub candidate_years: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImpactDimension {
    pub score: u32,
    pub weight: f64,
    pub max_score: u32,
    pub action_verb_count: u32,
    pub action_verb_target: u32,
    pub quantified_result_count: u32,
    pub quantified_result_target: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EducationDimension {
    pub score: u32,
    pub weight: f64,
    pub max_score: u32,
    pub required_level: EducationLevel,
    pub candidate_level: EducationLevel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    pub hard_skills: SkillDimension,
    pub soft_skills: SkillDimension,
    pub experience: ExperienceDimension,
    pub impact: ImpactDimension,
    pub education: EducationDimension,
}

impl ScoreBreakdown {
    /// Dimension sub-scores in a fixed order: hard, soft, experience, impact, education.
    pub fn sub_scores(&self) -> [u32; 5] {
        [
            self.hard_skills.score,
            self.soft_skills.score,
            self.experience.score,
            self.impact.score,
            self.education.score,
        ]
    }

    #[cfg(test)]
    pub fn weights(&self) -> [f64; 5] {
        [
            self.hard_skills.weight,
            self.soft_skills.weight,
            self.experience.weight,
            self.impact.weight,
            self.education.weight,
        ]
    }
}

/// Output of the deterministic scorer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreReport {
    pub overall_score: u32,
    pub score_breakdown: ScoreBreakdown,
}

// ────────────────────────────────────────────────────────────────────────────
// Feedback and final result
// ────────────────────────────────────────────────────────────────────────────

/// Advisory recruiter commentary. Never feeds back into the score.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualitativeFeedback {
    pub gut_reaction: String,
    pub summary: String,
    pub suggested_questions: Vec<String>,
}

/// The complete, immutable outcome of one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub overall_score: u32,
    pub score_breakdown: ScoreBreakdown,
    pub feedback: QualitativeFeedback,
    pub job_timeline: Vec<TimelineEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_education_ordinal_order() {
        use EducationLevel::*;
        assert!(None < HighSchool);
        assert!(HighSchool < Bachelors);
        assert!(Bachelors < Masters);
        assert!(Masters < PhD);
    }

    #[test]
    fn test_education_default_is_lowest() {
        assert_eq!(EducationLevel::default(), EducationLevel::None);
    }

    #[test]
    fn test_education_from_label_aliases() {
        assert_eq!(
            EducationLevel::from_label("Bachelor's degree"),
            Some(EducationLevel::Bachelors)
        );
        assert_eq!(
            EducationLevel::from_label("High School"),
            Some(EducationLevel::HighSchool)
        );
        assert_eq!(
            EducationLevel::from_label("MASTERS"),
            Some(EducationLevel::Masters)
        );
        assert_eq!(
            EducationLevel::from_label("Ph.D."),
            Some(EducationLevel::PhD)
        );
        assert_eq!(
            EducationLevel::from_label("Doctorate"),
            Some(EducationLevel::PhD)
        );
        assert_eq!(EducationLevel::from_label("none"), Some(EducationLevel::None));
        assert_eq!(EducationLevel::from_label("bootcamp certificate"), Option::None);
    }

    #[test]
    fn test_education_serde_uses_variant_names() {
        let json = serde_json::to_string(&EducationLevel::PhD).unwrap();
        assert_eq!(json, r#""PhD""#);
        let level: EducationLevel = serde_json::from_str(r#""HighSchool""#).unwrap();
        assert_eq!(level, EducationLevel::HighSchool);
    }

    #[test]
    fn test_timeline_entry_serializes_camel_case() {
        let entry = TimelineEntry {
            role: "Data Analyst".to_string(),
            company: "Acme".to_string(),
            start: "2019-03".to_string(),
            end: None,
        };
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["role"], "Data Analyst");
        assert!(value["end"].is_null());
    }

    #[test]
    fn test_feedback_serializes_camel_case() {
        let feedback = QualitativeFeedback {
            gut_reaction: "Promising".to_string(),
            summary: "Solid analyst.".to_string(),
            suggested_questions: vec!["Why SQL?".to_string()],
        };
        let value = serde_json::to_value(&feedback).unwrap();
        assert_eq!(value["gutReaction"], "Promising");
        assert_eq!(value["suggestedQuestions"][0], "Why SQL?");
    }
}
