//! Recovers a JSON object embedded in free-form LLM output.
//!
//! The oracle is asked for JSON only, but in practice it wraps the payload in prose or
//! markdown fences. We take everything from the first `{` to the last `}` inclusive.
//! The slice is NOT validated here — callers must strict-parse it right away.
//!
//! Known limitation: braces in the surrounding prose, or several independent objects in
//! one response, produce a slice that fails the subsequent parse. No disambiguation is
//! attempted.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractionError {
    #[error("response is empty")]
    Empty,

    #[error("response contains no opening brace")]
    MissingOpenBrace,

    #[error("response contains no closing brace")]
    MissingCloseBrace,

    #[error("last closing brace precedes the first opening brace")]
    MisorderedBraces,
}

/// Returns the substring spanning the first `{` through the last `}` of `text`.
pub fn extract_json_object(text: &str) -> Result<&str, ExtractionError> {
    if text.trim().is_empty() {
        return Err(ExtractionError::Empty);
    }

    let start = text.find('{').ok_or(ExtractionError::MissingOpenBrace)?;
    let end = text.rfind('}').ok_or(ExtractionError::MissingCloseBrace)?;

    if end < start {
        return Err(ExtractionError::MisorderedBraces);
    }

    // Both braces are single-byte ASCII, so `end + 1` is a char boundary.
    Ok(&text[start..=end])
}
