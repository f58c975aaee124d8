//! Integration tests for the full review workflow.
//!
//! All tests here run offline: the gateway is a scripted in-memory double
//! injected through the `Gateway` trait, and the store writes to a tempdir.

use async_trait::async_trait;
use cv_coach::{
    CacheRecord, CacheUpdate, CoachError, CvStore, FileHandle, Gateway, Reviewer, StructuredCv,
    UploadPayload,
};
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

// ── Test helpers ─────────────────────────────────────────────────────────────

/// Wrap text in the generation API's response envelope.
fn envelope(text: &str) -> String {
    json!({"candidates": [{"content": {"parts": [{"text": text}]}}]}).to_string()
}

const JOHN_DOE_JSON: &str = r#"{"name":"John Doe","title":"","summary":"","experience":[],"skills":[],"education":[],"achievements":[]}"#;

fn john_doe() -> StructuredCv {
    StructuredCv {
        name: "John Doe".into(),
        ..StructuredCv::default()
    }
}

/// Scripted gateway: fixed handle, ordered `generate` responses, and a log
/// of every prompt it was asked, for asserting call order and content.
struct ScriptedGateway {
    handle: &'static str,
    responses: Vec<String>,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedGateway {
    fn new(handle: &'static str, responses: Vec<String>) -> Arc<Self> {
        Arc::new(ScriptedGateway {
            handle,
            responses,
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl Gateway for ScriptedGateway {
    async fn upload(&self, _bytes: &[u8], _media_type: &str) -> Result<FileHandle, CoachError> {
        Ok(FileHandle::new(self.handle))
    }

    async fn generate(&self, prompt: &str, _file: Option<&FileHandle>) -> String {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.responses.get(n).cloned().unwrap_or_default()
    }
}

// ── End-to-end scenario ──────────────────────────────────────────────────────

/// The canonical happy path: upload → feedback → extraction → store.
#[tokio::test]
async fn end_to_end_review_and_store() {
    let gateway = ScriptedGateway::new(
        "file-uri",
        vec![envelope("json"), envelope(JOHN_DOE_JSON)],
    );
    let reviewer = Reviewer::new(gateway.clone());

    // Upload a "valid PDF"
    let handle = reviewer
        .ingest(&UploadPayload::pdf(b"%PDF-1.4 test".to_vec()))
        .await
        .expect("ingest should succeed");
    assert_eq!(handle.as_str(), "file-uri");

    // Feedback pass
    let feedback = reviewer
        .request_feedback(&handle)
        .await
        .expect("feedback should succeed");
    assert_eq!(feedback, "json");

    // Extraction pass
    let cv = reviewer.extract_structured_data(&handle, &feedback).await;
    assert_eq!(cv, john_doe());

    // Extraction prompt embeds the feedback text and came second
    let prompts = gateway.prompts.lock().unwrap();
    assert_eq!(prompts.len(), 2);
    assert!(prompts[1].contains("json"), "extraction prompt must embed feedback");

    // Both results land in the store; read() after both updates sees both
    let dir = tempfile::tempdir().unwrap();
    let mut store = CvStore::open(dir.path().join("cv.json"));
    store.update(CacheUpdate::feedback(feedback.as_str())).await.unwrap();
    store.update(CacheUpdate::cv_data(cv)).await.unwrap();

    let record = store.read().await;
    assert_eq!(
        record,
        CacheRecord {
            feedback: "json".into(),
            cv_data: Some(john_doe()),
        }
    );
}

#[tokio::test]
async fn composite_review_settles_in_one_call() {
    let gateway = ScriptedGateway::new(
        "files/xyz",
        vec![envelope("## Review\nLooks good."), envelope(JOHN_DOE_JSON)],
    );
    let reviewer = Reviewer::new(gateway);

    let out = reviewer
        .review(&UploadPayload::pdf(b"%PDF".to_vec()))
        .await
        .unwrap();

    assert_eq!(out.handle.as_str(), "files/xyz");
    assert_eq!(out.feedback, "## Review\nLooks good.");
    assert_eq!(out.cv, john_doe());
}

// ── Failure propagation ──────────────────────────────────────────────────────

#[tokio::test]
async fn gateway_soft_fail_becomes_format_error_at_feedback() {
    // generate returns "" (the soft-fail sentinel); request_feedback must
    // surface that as an envelope error, not a panic or an empty result.
    let gateway = ScriptedGateway::new("file-uri", vec![String::new()]);
    let reviewer = Reviewer::new(gateway);

    let err = reviewer
        .request_feedback(&FileHandle::new("file-uri"))
        .await
        .unwrap_err();
    assert!(err.is_format_error(), "got: {err}");
}

#[tokio::test]
async fn upload_rejection_aborts_before_any_generation() {
    struct RejectingGateway {
        generates: AtomicUsize,
    }

    #[async_trait]
    impl Gateway for RejectingGateway {
        async fn upload(&self, _b: &[u8], _m: &str) -> Result<FileHandle, CoachError> {
            Err(CoachError::UploadRejected {
                status: 400,
                reason: "bad request".into(),
            })
        }
        async fn generate(&self, _p: &str, _f: Option<&FileHandle>) -> String {
            self.generates.fetch_add(1, Ordering::SeqCst);
            String::new()
        }
    }

    let gateway = Arc::new(RejectingGateway {
        generates: AtomicUsize::new(0),
    });
    let reviewer = Reviewer::new(gateway.clone());

    let err = reviewer
        .review(&UploadPayload::pdf(b"%PDF".to_vec()))
        .await
        .unwrap_err();
    assert!(matches!(err, CoachError::UploadRejected { status: 400, .. }));
    assert_eq!(gateway.generates.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn extraction_failure_still_settles_with_default_record() {
    let gateway = ScriptedGateway::new(
        "file-uri",
        vec![
            envelope("Real feedback."),
            envelope("```json\n{oops"), // model ignored the no-fences instruction AND broke the JSON
        ],
    );
    let reviewer = Reviewer::new(gateway);

    let out = reviewer
        .review(&UploadPayload::pdf(b"%PDF".to_vec()))
        .await
        .expect("extraction failures must not abort the sequence");

    assert_eq!(out.feedback, "Real feedback.");
    assert_eq!(out.cv, StructuredCv::default());
}

#[tokio::test]
async fn non_pdf_payload_never_reaches_the_gateway() {
    let gateway = ScriptedGateway::new("file-uri", vec![]);
    let reviewer = Reviewer::new(gateway.clone());

    let err = reviewer
        .ingest(&UploadPayload::new(vec![0xFF, 0xD8], "image/jpeg"))
        .await
        .unwrap_err();
    assert!(matches!(err, CoachError::UnsupportedMediaType { .. }));
    assert_eq!(gateway.calls.load(Ordering::SeqCst), 0);
}

// ── Store behaviour under the workflow ───────────────────────────────────────

#[tokio::test]
async fn failed_review_leaves_store_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cv.json");

    let mut store = CvStore::open(&path);
    store.update(CacheUpdate::feedback("previous run")).await.unwrap();

    // Feedback pass fails; the caller must not write anything.
    let gateway = ScriptedGateway::new("file-uri", vec!["garbage".to_string()]);
    let reviewer = Reviewer::new(gateway);
    assert!(reviewer
        .review(&UploadPayload::pdf(b"%PDF".to_vec()))
        .await
        .is_err());

    let mut reopened = CvStore::open(&path);
    assert_eq!(reopened.read().await.feedback, "previous run");
}

#[tokio::test]
async fn clear_then_read_returns_defaults_and_removes_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cv.json");
    let mut store = CvStore::open(&path);

    store
        .update(CacheUpdate::feedback("X").with_cv_data(john_doe()))
        .await
        .unwrap();
    store.update(CacheUpdate::feedback("Y")).await.unwrap();

    store.clear().await.unwrap();
    assert!(!path.exists(), "persisted entry must be gone, not reset");
    assert_eq!(store.read().await, CacheRecord::default());
}
