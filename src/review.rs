//! The orchestrator: feedback pass, extraction pass, and the composed
//! review sequence.
//!
//! ## Two passes, two failure policies
//!
//! * [`Reviewer::request_feedback`] is the load-bearing step. A malformed
//!   envelope (which is also how a soft-failed gateway call surfaces)
//!   propagates as an error and aborts the interaction.
//!
//! * [`Reviewer::extract_structured_data`] **never fails**. Whatever the
//!   model returns — malformed JSON, truncated output, prose instead of
//!   JSON — is degraded to the all-empty [`StructuredCv`] so consumers
//!   always have a renderable record. The feedback already on screen is
//!   worth more than a hard error over the decorative dashboard data.
//!
//! The two generation calls are strictly sequential: extraction embeds the
//! feedback text in its prompt and is only issued once non-empty feedback
//! exists. There is no internal locking — overlapping `review` calls from
//! one caller race on whatever store the caller writes to, last write wins.

use crate::config::GatewayConfig;
use crate::error::CoachError;
use crate::output::{FileHandle, ReviewOutput, StructuredCv};
use crate::pipeline::format::format;
use crate::pipeline::gateway::{Gateway, GeminiGateway};
use crate::pipeline::ingest::{ingest, UploadPayload};
use crate::prompts;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Drives the feedback and extraction passes against a [`Gateway`].
pub struct Reviewer {
    gateway: Arc<dyn Gateway>,
}

impl Reviewer {
    /// Wrap an existing gateway (or a test double).
    pub fn new(gateway: Arc<dyn Gateway>) -> Self {
        Reviewer { gateway }
    }

    /// Construct a reviewer over the hosted Gemini API.
    pub fn with_config(config: GatewayConfig) -> Self {
        Reviewer {
            gateway: Arc::new(GeminiGateway::new(config)),
        }
    }

    /// Validate and upload a PDF payload, returning its file handle.
    pub async fn ingest(&self, payload: &UploadPayload) -> Result<FileHandle, CoachError> {
        ingest(self.gateway.as_ref(), payload).await
    }

    /// Request free-form markdown feedback for an uploaded CV.
    ///
    /// # Errors
    /// Envelope errors from the formatter propagate untouched; there is no
    /// local recovery at this step.
    pub async fn request_feedback(&self, handle: &FileHandle) -> Result<String, CoachError> {
        info!("Requesting feedback for {handle}");
        let raw = self
            .gateway
            .generate(prompts::FEEDBACK_PROMPT, Some(handle))
            .await;
        let feedback = format(&raw)?;
        debug!("Feedback received ({} chars)", feedback.len());
        Ok(feedback)
    }

    /// Request the structured-extraction pass.
    ///
    /// This operation cannot fail: envelope errors and JSON parse errors
    /// are logged and replaced with [`StructuredCv::default()`].
    pub async fn extract_structured_data(
        &self,
        handle: &FileHandle,
        feedback: &str,
    ) -> StructuredCv {
        info!("Extracting structured data for {handle}");
        let raw = self
            .gateway
            .generate(&prompts::extraction_prompt(feedback), Some(handle))
            .await;

        let text = match format(&raw) {
            Ok(t) => t,
            Err(e) => {
                warn!("Extraction response malformed, using empty record: {e}");
                return StructuredCv::default();
            }
        };

        parse_structured(&text)
    }

    /// Run the full sequence: upload → feedback → extraction.
    ///
    /// Failures in the upload or feedback step abort and propagate;
    /// extraction always settles, with the default record at worst. The
    /// extraction call is skipped entirely when the model produced empty
    /// feedback text, since the extraction prompt would have nothing to
    /// work from.
    pub async fn review(&self, payload: &UploadPayload) -> Result<ReviewOutput, CoachError> {
        info!("Starting review ({} bytes)", payload.bytes.len());

        let handle = self.ingest(payload).await?;
        let feedback = self.request_feedback(&handle).await?;

        let cv = if feedback.is_empty() {
            debug!("Empty feedback text; skipping extraction pass");
            StructuredCv::default()
        } else {
            self.extract_structured_data(&handle, &feedback).await
        };

        info!("Review settled (feedback: {} chars)", feedback.len());
        Ok(ReviewOutput {
            handle,
            feedback,
            cv,
        })
    }
}

/// Parse the extraction pass's inner text as a [`StructuredCv`].
///
/// Never fails: malformed JSON yields the default record with a logged
/// warning. Fields the model omitted default individually, so a partially
/// valid record keeps whatever was extracted.
fn parse_structured(text: &str) -> StructuredCv {
    match serde_json::from_str(text) {
        Ok(cv) => cv,
        Err(e) => {
            warn!("Failed to parse structured CV data, using empty record: {e}");
            StructuredCv::default()
        }
    }
}
