//! Fact Extraction — turns CV text and job text into comparable facts.
//!
//! Two independent oracle calls run concurrently at temperature 0. Each response is
//! validated field by field against its schema; absent fields take documented defaults,
//! but a malformed response fails the whole stage. Nothing is guessed.

use std::time::Duration;

use serde_json::{Map, Value};
use tracing::info;

use crate::llm_client::TextOracle;
use crate::scan::error::{ResponseDefect, ScanError, Stage};
use crate::scan::models::{EducationLevel, ExtractedCvFacts, ExtractedJobFacts, TimelineEntry};
use crate::scan::oracle::{ask, count, opt_string, string_list, years};
use crate::scan::prompts::{cv_extraction_prompt, job_extraction_prompt};

/// Extraction favours repeatable output over variety.
pub const EXTRACTION_TEMPERATURE: f32 = 0.0;

/// Extracts CV and job facts. Both calls are in flight at once; either failing fails
/// the stage.
pub async fn extract_facts(
    oracle: &dyn TextOracle,
    cv_text: &str,
    job_text: &str,
    timeout: Duration,
) -> Result<(ExtractedCvFacts, ExtractedJobFacts), ScanError> {
    let cv_prompt = cv_extraction_prompt(cv_text);
    let job_prompt = job_extraction_prompt(job_text);

    let (cv_reply, job_reply) = tokio::try_join!(
        ask(oracle, Stage::CvExtraction, &cv_prompt, EXTRACTION_TEMPERATURE, timeout),
        ask(oracle, Stage::JobExtraction, &job_prompt, EXTRACTION_TEMPERATURE, timeout),
    )?;

    let cv_facts = parse_cv_facts(&cv_reply.object)
        .map_err(|reason| ScanError::unusable(Stage::CvExtraction, reason, &cv_reply.raw))?;
    let job_facts = parse_job_facts(&job_reply.object)
        .map_err(|reason| ScanError::unusable(Stage::JobExtraction, reason, &job_reply.raw))?;

    info!(
        "Extracted facts: cv hard={} soft={} years={} | job hard={} soft={} years={}",
        cv_facts.hard_skills.len(),
        cv_facts.soft_skills.len(),
        cv_facts.total_years_experience,
        job_facts.required_hard_skills.len(),
        job_facts.required_soft_skills.len(),
        job_facts.required_years_experience,
    );

    Ok((cv_facts, job_facts))
}

pub fn parse_cv_facts(object: &Map<String, Value>) -> Result<ExtractedCvFacts, ResponseDefect> {
    Ok(ExtractedCvFacts {
        hard_skills: string_list(object, "hardSkills")?,
        soft_skills: string_list(object, "softSkills")?,
        total_years_experience: years(object, "totalYearsExperience")?,
        highest_education_level: education(object, "highestEducationLevel")?,
        action_verb_count: count(object, "actionVerbCount")?,
        quantified_result_count: count(object, "quantifiedResultCount")?,
        job_timeline: timeline(object, "jobTimeline")?,
    })
}

pub fn parse_job_facts(object: &Map<String, Value>) -> Result<ExtractedJobFacts, ResponseDefect> {
    Ok(ExtractedJobFacts {
        required_hard_skills: string_list(object, "requiredHardSkills")?,
        required_soft_skills: string_list(object, "requiredSoftSkills")?,
        required_years_experience: years(object, "requiredYearsExperience")?,
        required_education_level: education(object, "requiredEducationLevel")?,
    })
}

fn education(object: &Map<String, Value>, field: &str) -> Result<EducationLevel, ResponseDefect> {
    match opt_string(object, field)? {
        None => Ok(EducationLevel::default()),
        Some(label) => EducationLevel::from_label(&label).ok_or(ResponseDefect::SchemaMismatch {
            field: field.to_string(),
            expected: "one of None, HighSchool, Bachelors, Masters, PhD",
        }),
    }
}

fn timeline(object: &Map<String, Value>, field: &str) -> Result<Vec<TimelineEntry>, ResponseDefect> {
    let Some(value) = object.get(field).filter(|v| !v.is_null()) else {
        return Ok(Vec::new());
    };
    let items = value.as_array().ok_or(ResponseDefect::SchemaMismatch {
        field: field.to_string(),
        expected: "an array of roles",
    })?;

    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let entry = item.as_object().ok_or(ResponseDefect::SchemaMismatch {
                field: format!("{field}[{i}]"),
                expected: "an object",
            })?;
            let end = opt_string(entry, "end")?.filter(|s| !s.is_empty());
            Ok(TimelineEntry {
                role: opt_string(entry, "role")?.unwrap_or_default(),
                company: opt_string(entry, "company")?.unwrap_or_default(),
                start: opt_string(entry, "start")?.unwrap_or_default(),
                end,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::ScriptedOracle;
    use serde_json::json;

    const TIMEOUT: Duration = Duration::from_secs(30);

    const CV_REPLY: &str = r#"Here is the extraction:
```json
{
  "hardSkills": ["ms sql server", "Python 3", "Excel"],
  "softSkills": ["communication"],
  "totalYearsExperience": 3,
  "highestEducationLevel": "Bachelor's",
  "actionVerbCount": 6,
  "quantifiedResultCount": 2,
  "jobTimeline": [
    {"role": "Data Analyst", "company": "Acme", "start": "2021-01", "end": null},
    {"role": "Intern", "company": "Globex", "start": "2020-06", "end": "2020-12"}
  ]
}
```"#;

    const JOB_REPLY: &str = r#"{"requiredHardSkills": ["SQL", "Python", "AWS"],
        "requiredSoftSkills": ["Communication"],
        "requiredYearsExperience": 5,
        "requiredEducationLevel": "Masters"}"#;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("not an object"),
        }
    }

    #[test]
    fn test_parse_cv_facts_full() {
        let json = crate::llm_client::json_extract::extract_json_object(CV_REPLY).unwrap();
        let facts = parse_cv_facts(&object(serde_json::from_str(json).unwrap())).unwrap();
        assert_eq!(facts.hard_skills, vec!["ms sql server", "Python 3", "Excel"]);
        assert_eq!(facts.total_years_experience, 3.0);
        assert_eq!(facts.highest_education_level, EducationLevel::Bachelors);
        assert_eq!(facts.action_verb_count, 6);
        assert_eq!(facts.quantified_result_count, 2);
        assert_eq!(facts.job_timeline.len(), 2);
        assert_eq!(facts.job_timeline[0].end, None);
        assert_eq!(facts.job_timeline[1].end.as_deref(), Some("2020-12"));
        assert_eq!(facts.job_timeline[1].company, "Globex");
    }

    #[test]
    fn test_parse_cv_facts_defaults_for_absent_fields() {
        let facts = parse_cv_facts(&object(json!({"hardSkills": ["Rust"]}))).unwrap();
        assert_eq!(facts.hard_skills, vec!["Rust"]);
        assert!(facts.soft_skills.is_empty());
        assert_eq!(facts.total_years_experience, 0.0);
        assert_eq!(facts.highest_education_level, EducationLevel::None);
        assert_eq!(facts.action_verb_count, 0);
        assert_eq!(facts.quantified_result_count, 0);
        assert!(facts.job_timeline.is_empty());
    }

    #[test]
    fn test_parse_job_facts_defaults_for_nulls() {
        let facts = parse_job_facts(&object(json!({
            "requiredHardSkills": null,
            "requiredYearsExperience": null,
            "requiredEducationLevel": null
        })))
        .unwrap();
        assert_eq!(facts, ExtractedJobFacts::default());
    }

    #[test]
    fn test_wrong_field_type_is_schema_mismatch() {
        let err = parse_cv_facts(&object(json!({"hardSkills": "SQL, Python"}))).unwrap_err();
        match err {
            ResponseDefect::SchemaMismatch { field, .. } => assert_eq!(field, "hardSkills"),
            other => panic!("unexpected defect {other:?}"),
        }
    }

    #[test]
    fn test_unknown_education_label_is_schema_mismatch() {
        let err =
            parse_job_facts(&object(json!({"requiredEducationLevel": "Wizardry"}))).unwrap_err();
        assert!(matches!(err, ResponseDefect::SchemaMismatch { .. }));
    }

    #[test]
    fn test_malformed_timeline_entry_is_schema_mismatch() {
        let err = parse_cv_facts(&object(json!({"jobTimeline": ["Data Analyst at Acme"]})))
            .unwrap_err();
        match err {
            ResponseDefect::SchemaMismatch { field, .. } => assert_eq!(field, "jobTimeline[0]"),
            other => panic!("unexpected defect {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_extract_facts_issues_two_deterministic_calls() {
        let oracle = ScriptedOracle::new()
            .reply_when("CANDIDATE CV:", CV_REPLY)
            .reply_when("JOB DESCRIPTION:", JOB_REPLY);

        let (cv, job) = extract_facts(&oracle, "cv body", "job body", TIMEOUT)
            .await
            .unwrap();
        assert_eq!(cv.hard_skills.len(), 3);
        assert_eq!(job.required_hard_skills, vec!["SQL", "Python", "AWS"]);
        assert_eq!(job.required_education_level, EducationLevel::Masters);

        let calls = oracle.calls();
        assert_eq!(calls.len(), 2);
        assert!(calls.iter().all(|c| c.temperature == EXTRACTION_TEMPERATURE));
        assert!(calls.iter().any(|c| c.prompt.ends_with("cv body")));
        assert!(calls.iter().any(|c| c.prompt.ends_with("job body")));
    }

    #[tokio::test(start_paused = true)]
    async fn test_extract_facts_calls_run_concurrently() {
        let oracle = ScriptedOracle::new()
            .reply_when("CANDIDATE CV:", CV_REPLY)
            .reply_when("JOB DESCRIPTION:", JOB_REPLY)
            .with_delay(Duration::from_secs(10));

        let start = tokio::time::Instant::now();
        extract_facts(&oracle, "cv", "job", TIMEOUT).await.unwrap();
        // Sequential calls would take 20s of (paused) time.
        assert!(start.elapsed() < Duration::from_secs(15));
    }

    #[tokio::test]
    async fn test_unusable_job_reply_fails_stage_with_raw_text() {
        let oracle = ScriptedOracle::new()
            .reply_when("CANDIDATE CV:", CV_REPLY)
            .reply_when("JOB DESCRIPTION:", "Sorry, that posting is too short.");

        let err = extract_facts(&oracle, "cv", "job", TIMEOUT).await.unwrap_err();
        match err {
            ScanError::UnusableResponse { stage, raw, .. } => {
                assert_eq!(stage, Stage::JobExtraction);
                assert_eq!(raw, "Sorry, that posting is too short.");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_schema_mismatch_carries_raw_text() {
        let bad = r#"{"hardSkills": [1, 2, 3]}"#;
        let oracle = ScriptedOracle::new()
            .reply_when("CANDIDATE CV:", bad)
            .reply_when("JOB DESCRIPTION:", JOB_REPLY);

        let err = extract_facts(&oracle, "cv", "job", TIMEOUT).await.unwrap_err();
        match err {
            ScanError::UnusableResponse {
                stage,
                reason: ResponseDefect::SchemaMismatch { field, .. },
                raw,
            } => {
                assert_eq!(stage, Stage::CvExtraction);
                assert_eq!(field, "hardSkills");
                assert_eq!(raw, bad);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_oracle_failure_fails_stage() {
        let oracle = ScriptedOracle::new()
            .fail_when("CANDIDATE CV:")
            .reply_when("JOB DESCRIPTION:", JOB_REPLY);

        let err = extract_facts(&oracle, "cv", "job", TIMEOUT).await.unwrap_err();
        assert!(matches!(
            err,
            ScanError::OracleCall {
                stage: Stage::CvExtraction,
                ..
            }
        ));
    }
}
