//! Live end-to-end tests against the hosted Gemini API.
//!
//! These make real API calls and are gated behind the `E2E_ENABLED`
//! environment variable so they never run in CI unless explicitly
//! requested. A real `GEMINI_API_KEY` and a sample PDF are required.
//!
//! Run with:
//!   E2E_ENABLED=1 GEMINI_API_KEY=… cargo test --test e2e -- --nocapture

use cv_coach::{GatewayConfig, Reviewer, UploadPayload};
use std::path::PathBuf;

fn sample_pdf() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("test_cases/sample_cv.pdf")
}

/// Skip unless E2E_ENABLED is set, the API key exists, and the PDF is present.
macro_rules! e2e_skip_unless_ready {
    () => {{
        if std::env::var("E2E_ENABLED").is_err() {
            println!("SKIP — set E2E_ENABLED=1 to run e2e tests");
            return;
        }
        if std::env::var("GEMINI_API_KEY").is_err() {
            println!("SKIP — GEMINI_API_KEY not set");
            return;
        }
        let p = sample_pdf();
        if !p.exists() {
            println!("SKIP — test file not found: {}", p.display());
            return;
        }
        p
    }};
}

#[tokio::test]
async fn test_live_full_review() {
    let path = e2e_skip_unless_ready!();

    let config = GatewayConfig::from_env().expect("config from env");
    let reviewer = Reviewer::with_config(config);

    let bytes = std::fs::read(&path).expect("read sample PDF");
    let out = reviewer
        .review(&UploadPayload::pdf(bytes))
        .await
        .expect("live review should succeed");

    assert!(
        !out.feedback.trim().is_empty(),
        "live feedback must be non-empty"
    );
    println!(
        "feedback: {} chars; extracted name: {:?}",
        out.feedback.len(),
        out.cv.name
    );
}
