//! Error types for the cv-coach library.
//!
//! The taxonomy mirrors where a failure can still be acted upon:
//!
//! * Upload-side errors (`UnsupportedMediaType`, `UploadRejected`,
//!   `UploadFailed`) are fatal to the interaction — the caller should show a
//!   generic message and let the user retry.
//!
//! * Envelope errors (`EnvelopeNotJson`, `MissingCandidates`, `MissingParts`,
//!   `MissingText`) mean the generation API answered with an unexpected
//!   shape. They are raised loudly by [`crate::pipeline::format`] — never
//!   silently swallowed — so that a contract drift in the remote API is
//!   visible immediately.
//!
//! Deliberately absent: a variant for the structured-extraction JSON parse.
//! That failure is absorbed inside [`crate::review::Reviewer`] and replaced
//! with an all-empty [`crate::output::StructuredCv`], so it never crosses
//! the library boundary. Transport failures in `generate` are likewise not
//! errors at all — the gateway soft-fails to an empty string.

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the cv-coach library.
#[derive(Debug, Error)]
pub enum CoachError {
    // ── Upload errors ─────────────────────────────────────────────────────
    /// The uploaded payload does not declare `application/pdf`.
    #[error("Unsupported media type '{media_type}': only application/pdf is accepted")]
    UnsupportedMediaType { media_type: String },

    /// The upload endpoint answered with a non-success HTTP status.
    #[error("Upload rejected: HTTP {status} — {reason}")]
    UploadRejected { status: u16, reason: String },

    /// The upload request never completed (DNS, connect, TLS, …).
    #[error("Upload failed: {reason}\nCheck your internet connection and API key.")]
    UploadFailed { reason: String },

    /// The upload succeeded but the response body was not the expected
    /// `{"file":{"uri":…}}` document.
    #[error("Upload response did not contain a file URI: {detail}")]
    UploadResponseInvalid { detail: String },

    // ── Envelope errors ───────────────────────────────────────────────────
    /// The generation response body was not valid JSON at all.
    ///
    /// This is also what an empty body parses to, which is how a soft-failed
    /// gateway call ("" from `generate`) surfaces to the caller.
    #[error("Generation response is not valid JSON: {detail}")]
    EnvelopeNotJson { detail: String },

    /// The envelope's `candidates` field is missing, not an array, or empty.
    #[error("Invalid response format: missing or empty 'candidates' array")]
    MissingCandidates,

    /// The first candidate's `content.parts` is missing, not an array, or empty.
    #[error("Invalid response format: missing or empty 'content.parts' array")]
    MissingParts,

    /// The first part's `text` field is absent or not a string.
    #[error("Invalid response format: missing 'text' field in the first part")]
    MissingText,

    // ── Store errors ──────────────────────────────────────────────────────
    /// Could not write or remove the persisted store file.
    #[error("Failed to persist store at '{}': {source}", .path.display())]
    StorePersistFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl CoachError {
    /// True for envelope-shape errors, i.e. the format-error family.
    ///
    /// Callers surfacing errors to users can map this whole family to a
    /// single generic "try again later" message without leaking API detail.
    pub fn is_format_error(&self) -> bool {
        matches!(
            self,
            CoachError::EnvelopeNotJson { .. }
                | CoachError::MissingCandidates
                | CoachError::MissingParts
                | CoachError::MissingText
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_media_type_display() {
        let e = CoachError::UnsupportedMediaType {
            media_type: "image/png".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("image/png"), "got: {msg}");
        assert!(msg.contains("application/pdf"));
    }

    #[test]
    fn upload_rejected_display() {
        let e = CoachError::UploadRejected {
            status: 403,
            reason: "API key invalid".into(),
        };
        assert!(e.to_string().contains("403"));
        assert!(e.to_string().contains("API key invalid"));
    }

    #[test]
    fn format_error_family() {
        assert!(CoachError::MissingCandidates.is_format_error());
        assert!(CoachError::MissingParts.is_format_error());
        assert!(CoachError::MissingText.is_format_error());
        assert!(CoachError::EnvelopeNotJson { detail: "EOF".into() }.is_format_error());
        assert!(!CoachError::UnsupportedMediaType {
            media_type: "text/plain".into()
        }
        .is_format_error());
    }

    #[test]
    fn store_persist_display() {
        let e = CoachError::StorePersistFailed {
            path: PathBuf::from("/tmp/cvcoach.json"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(e.to_string().contains("cvcoach.json"));
    }
}
