//! One oracle round-trip: call under a caller-side timeout, recover the JSON object,
//! strict-parse it, and hand back an untyped value for field-by-field validation.
//!
//! Also holds the small field readers the stages use to validate that value against
//! their fixed schemas.

use std::time::Duration;

use serde_json::{Map, Value};
use tracing::{debug, error};

use crate::llm_client::json_extract::extract_json_object;
use crate::llm_client::TextOracle;
use crate::scan::error::{ResponseDefect, ScanError, Stage};

/// A parsed oracle response together with the raw text it came from.
pub struct OracleReply {
    pub raw: String,
    pub object: Map<String, Value>,
}

/// Calls the oracle once. Expiry, call failure, extraction failure and parse failure
/// each fail the stage; there are no retries.
pub async fn ask(
    oracle: &dyn TextOracle,
    stage: Stage,
    prompt: &str,
    temperature: f32,
    timeout: Duration,
) -> Result<OracleReply, ScanError> {
    debug!("Oracle call for {stage} (temperature={temperature})");

    let raw = match tokio::time::timeout(timeout, oracle.complete(prompt, temperature)).await {
        Ok(Ok(text)) => text,
        Ok(Err(source)) => {
            error!("Oracle call failed during {stage}: {source}");
            return Err(ScanError::OracleCall { stage, source });
        }
        Err(_) => {
            error!("Oracle timed out during {stage} after {timeout:?}");
            return Err(ScanError::OracleTimeout {
                stage,
                timeout_secs: timeout.as_secs(),
            });
        }
    };

    let object = parse_object(&raw).map_err(|reason| {
        error!("Unusable oracle response during {stage}: {reason}");
        ScanError::unusable(stage, reason, &raw)
    })?;

    Ok(OracleReply { raw, object })
}

fn parse_object(raw: &str) -> Result<Map<String, Value>, ResponseDefect> {
    let slice = extract_json_object(raw)?;
    match serde_json::from_str::<Value>(slice)? {
        Value::Object(map) => Ok(map),
        // Unreachable in practice: the slice starts with '{'.
        _ => Err(ResponseDefect::SchemaMismatch {
            field: "<root>".to_string(),
            expected: "an object",
        }),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Field readers. Absent or null fields yield the documented default; a present
// field of the wrong JSON type is a schema mismatch.
// ────────────────────────────────────────────────────────────────────────────

fn mismatch(field: &str, expected: &'static str) -> ResponseDefect {
    ResponseDefect::SchemaMismatch {
        field: field.to_string(),
        expected,
    }
}

fn present<'a>(object: &'a Map<String, Value>, field: &str) -> Option<&'a Value> {
    object.get(field).filter(|v| !v.is_null())
}

/// List of non-blank, trimmed strings. Default: empty.
pub fn string_list(object: &Map<String, Value>, field: &str) -> Result<Vec<String>, ResponseDefect> {
    let Some(value) = present(object, field) else {
        return Ok(Vec::new());
    };
    let items = value
        .as_array()
        .ok_or_else(|| mismatch(field, "an array of strings"))?;

    let mut out = Vec::with_capacity(items.len());
    for item in items {
        let s = item
            .as_str()
            .ok_or_else(|| mismatch(field, "an array of strings"))?;
        let s = s.trim();
        if !s.is_empty() {
            out.push(s.to_string());
        }
    }
    Ok(out)
}

/// Non-negative count; fractions truncate, negatives clamp to 0. Default: 0.
pub fn count(object: &Map<String, Value>, field: &str) -> Result<u32, ResponseDefect> {
    let Some(value) = present(object, field) else {
        return Ok(0);
    };
    let n = value
        .as_f64()
        .filter(|n| n.is_finite())
        .ok_or_else(|| mismatch(field, "a number"))?;
    Ok(n.max(0.0).min(u32::MAX as f64) as u32)
}

/// Non-negative number of years. Default: 0.
pub fn years(object: &Map<String, Value>, field: &str) -> Result<f64, ResponseDefect> {
    let Some(value) = present(object, field) else {
        return Ok(0.0);
    };
    let n = value
        .as_f64()
        .filter(|n| n.is_finite())
        .ok_or_else(|| mismatch(field, "a number"))?;
    Ok(n.max(0.0))
}

/// Optional string, trimmed. Default: `None`.
pub fn opt_string(object: &Map<String, Value>, field: &str) -> Result<Option<String>, ResponseDefect> {
    match present(object, field) {
        None => Ok(None),
        Some(value) => value
            .as_str()
            .map(|s| Some(s.trim().to_string()))
            .ok_or_else(|| mismatch(field, "a string")),
    }
}

/// Required non-blank string.
pub fn required_string(object: &Map<String, Value>, field: &str) -> Result<String, ResponseDefect> {
    opt_string(object, field)?
        .filter(|s| !s.is_empty())
        .ok_or_else(|| mismatch(field, "a non-empty string"))
}
