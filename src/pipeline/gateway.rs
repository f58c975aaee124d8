//! The gateway: the only component that talks to the remote generation API.
//!
//! Two verbs, two deliberately different failure modes:
//!
//! * [`Gateway::upload`] **hard-fails** — a rejected upload is actionable
//!   (bad key, bad file) and the interaction cannot continue without a
//!   handle, so the error propagates.
//!
//! * [`Gateway::generate`] **soft-fails** — on any transport error or
//!   non-2xx status it logs and returns an empty string. Downstream code is
//!   written against "always a string, never an exception"; the empty string
//!   then trips the formatter's envelope validation, which is where the
//!   failure becomes loud. Do not unify these two modes.
//!
//! No retry, no explicit timeout (platform default), no caching — repeated
//! identical prompts re-hit the remote service.

use crate::config::GatewayConfig;
use crate::error::CoachError;
use crate::output::FileHandle;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// MIME type attached to every file-data part. Only PDFs are ever uploaded.
pub const PDF_MIME_TYPE: &str = "application/pdf";

/// Boundary trait for the remote generation API.
///
/// Object-safe so orchestrator tests can substitute a scripted double —
/// the same seam the conversion pipeline would use for middleware
/// (caching, rate-limiting) in production.
#[async_trait]
pub trait Gateway: Send + Sync {
    /// Upload raw PDF bytes; returns the opaque file handle on success.
    async fn upload(&self, bytes: &[u8], media_type: &str) -> Result<FileHandle, CoachError>;

    /// Send a prompt (optionally referencing an uploaded file) and return
    /// the raw response body. Returns `""` on any transport/HTTP failure.
    async fn generate(&self, prompt: &str, file: Option<&FileHandle>) -> String;
}

// ── Wire types ───────────────────────────────────────────────────────────

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, PartialEq)]
pub(crate) struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    file_data: Option<FileData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub(crate) struct FileData {
    file_uri: String,
    mime_type: &'static str,
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerationConfig {
    temperature: f32,
    top_k: u32,
    top_p: f32,
    max_output_tokens: u32,
    response_mime_type: &'static str,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    file: UploadedFile,
}

#[derive(Debug, Deserialize)]
struct UploadedFile {
    uri: String,
}

/// Assemble the generation request envelope.
///
/// Layout (in order): optional system-instruction block, a user content
/// carrying the file reference tagged as PDF media (when present), and a
/// second user content carrying the prompt text. Generation parameters come
/// straight from the config; the response MIME type is always plain text —
/// even for the extraction pass, whose JSON arrives as text inside the
/// envelope.
pub(crate) fn build_generate_request(
    config: &GatewayConfig,
    prompt: &str,
    file: Option<&FileHandle>,
) -> GenerateRequest {
    let mut contents = Vec::with_capacity(2);

    if let Some(handle) = file {
        contents.push(Content {
            role: Some("user"),
            parts: vec![Part {
                file_data: Some(FileData {
                    file_uri: handle.as_str().to_string(),
                    mime_type: PDF_MIME_TYPE,
                }),
                text: None,
            }],
        });
    }

    contents.push(Content {
        role: Some("user"),
        parts: vec![Part {
            file_data: None,
            text: Some(prompt.to_string()),
        }],
    });

    GenerateRequest {
        system_instruction: config.system_instruction.as_ref().map(|text| Content {
            role: None,
            parts: vec![Part {
                file_data: None,
                text: Some(text.clone()),
            }],
        }),
        contents,
        generation_config: GenerationConfig {
            temperature: config.temperature,
            top_k: config.top_k,
            top_p: config.top_p,
            max_output_tokens: config.max_output_tokens,
            response_mime_type: "text/plain",
        },
    }
}

// ── HTTP implementation ──────────────────────────────────────────────────

/// [`Gateway`] implementation over the hosted Gemini HTTP API.
pub struct GeminiGateway {
    http: reqwest::Client,
    config: GatewayConfig,
}

impl GeminiGateway {
    pub fn new(config: GatewayConfig) -> Self {
        GeminiGateway {
            http: reqwest::Client::new(),
            config,
        }
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }
}

#[async_trait]
impl Gateway for GeminiGateway {
    async fn upload(&self, bytes: &[u8], media_type: &str) -> Result<FileHandle, CoachError> {
        debug!("Uploading {} bytes to file endpoint", bytes.len());

        let response = self
            .http
            .post(self.config.upload_url())
            .header("X-Goog-Upload-Command", "upload, finalize")
            .header("X-Goog-Upload-Protocol", "raw")
            .header("Content-Type", media_type.to_string())
            .body(bytes.to_vec())
            .send()
            .await
            .map_err(|e| CoachError::UploadFailed {
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let reason = response
                .text()
                .await
                .ok()
                .filter(|body| !body.is_empty())
                .unwrap_or_else(|| {
                    status.canonical_reason().unwrap_or("unknown").to_string()
                });
            return Err(CoachError::UploadRejected {
                status: status.as_u16(),
                reason,
            });
        }

        let body = response.text().await.map_err(|e| CoachError::UploadFailed {
            reason: e.to_string(),
        })?;
        let parsed: UploadResponse =
            serde_json::from_str(&body).map_err(|e| CoachError::UploadResponseInvalid {
                detail: e.to_string(),
            })?;

        debug!("Upload complete: {}", parsed.file.uri);
        Ok(FileHandle::new(parsed.file.uri))
    }

    async fn generate(&self, prompt: &str, file: Option<&FileHandle>) -> String {
        let request = build_generate_request(&self.config, prompt, file);

        let response = match self
            .http
            .post(self.config.generate_url())
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => {
                warn!("Generation request failed: {e}");
                return String::new();
            }
        };

        if !response.status().is_success() {
            warn!("Generation endpoint returned HTTP {}", response.status());
            return String::new();
        }

        match response.text().await {
            Ok(body) => body,
            Err(e) => {
                warn!("Failed to read generation response body: {e}");
                String::new()
            }
        }
    }
}
