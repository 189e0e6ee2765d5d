//! Keyword Matcher — tolerant equivalence between required and candidate skill lists.
//!
//! A required keyword is matched when any candidate keyword (both lowercased and trimmed):
//! - equals it exactly,
//! - equals it after stripping one trailing "s" from each side,
//! - contains it, or its singular/plural form, as a substring,
//! - is contained in it, directly or in singular form.
//!
//! Substring containment catches "SQL" vs "MS SQL Server" and "report" vs "reporting",
//! and it also lets short acronyms match inside unrelated words ("bi" in "mobile").
//! That false-positive rate is a known limitation. Tightening the rule would change
//! previously issued scores, so it is kept as is.

use std::collections::HashSet;

use crate::scan::models::KeywordMatchResult;

/// Lowercased, whitespace-trimmed comparison form.
fn normalize(keyword: &str) -> String {
    keyword.trim().to_lowercase()
}

/// Naive singular: drops one trailing "s".
fn singular(keyword: &str) -> &str {
    keyword.strip_suffix('s').unwrap_or(keyword)
}

/// Substring test that never treats an empty needle as contained.
fn contains_term(haystack: &str, needle: &str) -> bool {
    !needle.is_empty() && haystack.contains(needle)
}

/// Whether normalized `required` is equivalent to normalized `candidate`.
fn is_equivalent(required: &str, candidate: &str) -> bool {
    let required_singular = singular(required);
    let candidate_singular = singular(candidate);
    let required_plural = format!("{required_singular}s");

    required == candidate
        || (!required_singular.is_empty() && required_singular == candidate_singular)
        || contains_term(candidate, required)
        || contains_term(candidate, required_singular)
        || contains_term(candidate, &required_plural)
        || contains_term(required, candidate)
        || contains_term(required, candidate_singular)
}

/// Partitions `required` into matched and missing keywords against `candidate`.
///
/// Required keywords are deduplicated on their normalized form; the first spelling seen
/// (trimmed) is the one reported. Blank entries on either side are ignored.
pub fn match_keywords<R, C>(required: &[R], candidate: &[C]) -> KeywordMatchResult
where
    R: AsRef<str>,
    C: AsRef<str>,
{
    let candidates: Vec<String> = candidate
        .iter()
        .map(|c| normalize(c.as_ref()))
        .filter(|c| !c.is_empty())
        .collect();

    let mut seen = HashSet::new();
    let mut result = KeywordMatchResult::default();

    for keyword in required {
        let display = keyword.as_ref().trim();
        let normalized = normalize(display);
        if normalized.is_empty() || !seen.insert(normalized.clone()) {
            continue;
        }

        if candidates.iter().any(|c| is_equivalent(&normalized, c)) {
            result.matched.push(display.to_string());
        } else {
            result.missing.push(display.to_string());
        }
    }

    result
}
