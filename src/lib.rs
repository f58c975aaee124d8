//! # cv-coach
//!
//! CV review and structured extraction using the hosted Gemini API.
//!
//! ## What this crate does
//!
//! Given a PDF CV, the library uploads it, asks a language model for
//! free-form reviewer feedback, then runs a second structured-extraction
//! pass that shapes the same content into a typed record suitable for
//! dashboards. All "intelligence" lives on the remote API; this crate is
//! the integration layer — validation, prompt construction, envelope
//! parsing with defensive defaults, and a small persisted store for the
//! last result.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF bytes
//!  │
//!  ├─ 1. Ingest    validate media type, upload raw bytes → FileHandle
//!  ├─ 2. Feedback  prompt + file reference → markdown review text
//!  ├─ 3. Extract   feedback-embedding prompt → StructuredCv (never fails)
//!  └─ 4. Store     persist {feedback, cvData} to a single JSON file
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use cv_coach::{CacheUpdate, CvStore, GatewayConfig, Reviewer, UploadPayload};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = GatewayConfig::from_env()?; // reads GEMINI_API_KEY
//!     let reviewer = Reviewer::with_config(config);
//!
//!     let bytes = std::fs::read("cv.pdf")?;
//!     let output = reviewer.review(&UploadPayload::pdf(bytes)).await?;
//!     println!("{}", output.feedback);
//!
//!     let mut store = CvStore::open("cvcoach.json");
//!     store
//!         .update(CacheUpdate::feedback(output.feedback).with_cv_data(output.cv))
//!         .await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Failure model
//!
//! Upload and feedback failures are loud ([`CoachError`]); a transport
//! failure inside the gateway soft-fails to an empty string that the
//! envelope formatter then rejects. The extraction pass never fails — it
//! degrades to an all-empty [`StructuredCv`]. See [`error`] for the
//! rationale behind the asymmetry.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod prompts;
pub mod review;
pub mod store;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{GatewayConfig, GatewayConfigBuilder, DEFAULT_API_BASE, DEFAULT_MODEL};
pub use error::CoachError;
pub use output::{EducationEntry, ExperienceEntry, FileHandle, ReviewOutput, SkillEntry, StructuredCv};
pub use pipeline::gateway::{Gateway, GeminiGateway};
pub use pipeline::ingest::UploadPayload;
pub use review::Reviewer;
pub use store::{CacheRecord, CacheUpdate, CvStore};
