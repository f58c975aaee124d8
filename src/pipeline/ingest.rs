//! Ingest: validate an uploaded payload and exchange it for a file handle.
//!
//! Validation happens strictly before any network I/O — a payload with the
//! wrong media type is rejected locally and the upload endpoint is never
//! contacted. The declared media type is what gets checked (matching the
//! browser behaviour of trusting the file object's type), not the bytes.

use crate::error::CoachError;
use crate::output::FileHandle;
use crate::pipeline::gateway::{Gateway, PDF_MIME_TYPE};
use tracing::{debug, info};

/// A file as handed over by the caller: raw bytes plus the declared media type.
#[derive(Debug, Clone)]
pub struct UploadPayload {
    pub bytes: Vec<u8>,
    pub media_type: String,
}

impl UploadPayload {
    pub fn new(bytes: Vec<u8>, media_type: impl Into<String>) -> Self {
        UploadPayload {
            bytes,
            media_type: media_type.into(),
        }
    }

    /// Convenience constructor for payloads already known to be PDFs.
    pub fn pdf(bytes: Vec<u8>) -> Self {
        Self::new(bytes, PDF_MIME_TYPE)
    }
}

/// Validate the payload and upload it, returning the remote file handle.
///
/// # Errors
/// * [`CoachError::UnsupportedMediaType`] — declared type is not
///   `application/pdf`; no network call is made.
/// * [`CoachError::UploadFailed`] / [`CoachError::UploadRejected`] /
///   [`CoachError::UploadResponseInvalid`] — propagated from the gateway.
pub async fn ingest(
    gateway: &dyn Gateway,
    payload: &UploadPayload,
) -> Result<FileHandle, CoachError> {
    if payload.media_type != PDF_MIME_TYPE {
        debug!("Rejecting upload with media type '{}'", payload.media_type);
        return Err(CoachError::UnsupportedMediaType {
            media_type: payload.media_type.clone(),
        });
    }

    let handle = gateway.upload(&payload.bytes, &payload.media_type).await?;
    info!("Ingested PDF ({} bytes) as {}", payload.bytes.len(), handle);
    Ok(handle)
}
