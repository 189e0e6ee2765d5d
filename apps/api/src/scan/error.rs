use std::fmt;

use thiserror::Error;

use crate::llm_client::json_extract::ExtractionError;
use crate::llm_client::LlmError;

/// Which oracle-backed stage a failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    CvExtraction,
    JobExtraction,
    Feedback,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::CvExtraction => "cv_extraction",
            Stage::JobExtraction => "job_extraction",
            Stage::Feedback => "feedback",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why an oracle response could not be used.
#[derive(Debug, Error)]
pub enum ResponseDefect {
    #[error("no JSON object found: {0}")]
    NoJsonObject(#[from] ExtractionError),

    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("field '{field}' should be {expected}")]
    SchemaMismatch {
        field: String,
        expected: &'static str,
    },
}

/// Every way an analysis run can fail. Any of these aborts the run; no partial or
/// defaulted score is ever returned in their place.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("oracle call failed during {stage}: {source}")]
    OracleCall {
        stage: Stage,
        #[source]
        source: LlmError,
    },

    #[error("oracle timed out during {stage} after {timeout_secs}s")]
    OracleTimeout { stage: Stage, timeout_secs: u64 },

    /// The raw text is carried verbatim for diagnostics and never corrected.
    #[error("the AI returned an unusable response during {stage}: {reason}")]
    UnusableResponse {
        stage: Stage,
        reason: ResponseDefect,
        raw: String,
    },
}

impl ScanError {
    pub fn stage(&self) -> Stage {
        match self {
            ScanError::OracleCall { stage, .. }
            | ScanError::OracleTimeout { stage, .. }
            | ScanError::UnusableResponse { stage, .. } => *stage,
        }
    }

    pub(crate) fn unusable(stage: Stage, reason: impl Into<ResponseDefect>, raw: &str) -> Self {
        ScanError::UnusableResponse {
            stage,
            reason: reason.into(),
            raw: raw.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unusable_response_message_is_user_facing() {
        let err = ScanError::unusable(
            Stage::CvExtraction,
            ExtractionError::MissingOpenBrace,
            "I cannot help with that.",
        );
        let message = err.to_string();
        assert!(message.starts_with("the AI returned an unusable response"));
        assert!(message.contains("cv_extraction"));
        match err {
            ScanError::UnusableResponse { raw, .. } => assert_eq!(raw, "I cannot help with that."),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_parse_failure_maps_to_invalid_json() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{nope}").unwrap_err();
        let err = ScanError::unusable(Stage::Feedback, parse_err, "{nope}");
        assert!(matches!(
            err,
            ScanError::UnusableResponse {
                reason: ResponseDefect::InvalidJson(_),
                ..
            }
        ));
        assert_eq!(err.stage(), Stage::Feedback);
    }

    #[test]
    fn test_timeout_reports_stage_and_duration() {
        let err = ScanError::OracleTimeout {
            stage: Stage::JobExtraction,
            timeout_secs: 45,
        };
        assert_eq!(
            err.to_string(),
            "oracle timed out during job_extraction after 45s"
        );
    }
}
