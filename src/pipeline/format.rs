//! Envelope unwrapping for generation responses.
//!
//! The API wraps the actual payload in a fixed JSON envelope:
//!
//! ```json
//! { "candidates": [ { "content": { "parts": [ { "text": "…" } ] } } ] }
//! ```
//!
//! [`format`] validates that shape level by level and returns the inner text
//! verbatim. For the feedback pass the text is markdown; for the extraction
//! pass it is itself a JSON-encoded string the orchestrator parses a second
//! time. That double encoding is a property of the remote API and is
//! preserved exactly — this function never attempts the second parse.
//!
//! Shape errors are always raised, never defaulted: a silent empty result
//! here would be indistinguishable from a model that returned nothing.

use crate::error::CoachError;
use serde_json::Value;

/// Extract `candidates[0].content.parts[0].text` from a raw response body.
///
/// # Errors
/// * [`CoachError::EnvelopeNotJson`] — body is not JSON (including `""`,
///   which is what a soft-failed gateway call produces).
/// * [`CoachError::MissingCandidates`] — `candidates` missing, not an
///   array, or empty.
/// * [`CoachError::MissingParts`] — `content.parts` missing, not an array,
///   or empty.
/// * [`CoachError::MissingText`] — first part has no `text`, or `text` is
///   not a string (a JSON-object `text` is malformed, not coerced).
pub fn format(raw: &str) -> Result<String, CoachError> {
    let envelope: Value =
        serde_json::from_str(raw).map_err(|e| CoachError::EnvelopeNotJson {
            detail: e.to_string(),
        })?;

    let candidates = envelope
        .get("candidates")
        .and_then(Value::as_array)
        .filter(|c| !c.is_empty())
        .ok_or(CoachError::MissingCandidates)?;

    let parts = candidates[0]
        .get("content")
        .and_then(|c| c.get("parts"))
        .and_then(Value::as_array)
        .filter(|p| !p.is_empty())
        .ok_or(CoachError::MissingParts)?;

    let text = parts[0]
        .get("text")
        .and_then(Value::as_str)
        .ok_or(CoachError::MissingText)?;

    Ok(text.to_string())
}
