//! Pipeline stages for the review workflow.
//!
//! Each submodule implements exactly one transformation step. Keeping
//! stages separate makes each independently testable and lets the gateway
//! be swapped (a scripted double in tests, a different provider later)
//! without touching the others.
//!
//! ## Data Flow
//!
//! ```text
//! ingest ──▶ gateway ──▶ format
//! (validate   (HTTP to     (unwrap
//!  + upload)   the API)     envelope)
//! ```
//!
//! 1. [`ingest`]  — validate the payload's media type, upload raw bytes,
//!    obtain the opaque file handle
//! 2. [`gateway`] — build the request envelope and POST it; the only stage
//!    with network I/O
//! 3. [`format`]  — validate the response envelope and extract the inner
//!    text payload

pub mod format;
pub mod gateway;
pub mod ingest;
