//! Result types: the structured CV record and review output.
//!
//! Every field of [`StructuredCv`] carries `#[serde(default)]` so that a
//! record parsed from model output is always fully populated — arrays come
//! back empty rather than absent, and downstream rendering never has to
//! handle a missing field. Unknown fields the model invents (it is asked for
//! `improvementAreas` and `overallScore` in the extraction prompt, which are
//! not part of the record) are silently ignored.

use serde::{Deserialize, Serialize};

/// Opaque reference to an uploaded file, valid only against the remote
/// generation API. Not persisted locally; it has no lifecycle of its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileHandle(String);

impl FileHandle {
    pub fn new(uri: impl Into<String>) -> Self {
        FileHandle(uri.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for FileHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for FileHandle {
    fn from(uri: String) -> Self {
        FileHandle(uri)
    }
}

/// One job entry in the extracted CV.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperienceEntry {
    pub position: String,
    pub company: String,
    pub duration: String,
    pub responsibilities: Vec<String>,
}

/// One skill with a 0–100 self-assessed proficiency.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillEntry {
    pub skill: String,
    pub proficiency: u8,
}

/// One education entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EducationEntry {
    pub degree: String,
    pub school: String,
    pub year: String,
}

/// The normalized, schema-shaped record extracted from free-text feedback.
///
/// [`StructuredCv::default()`] is the canonical "extraction failed" record:
/// every string empty, every array empty. The orchestrator substitutes it
/// whenever the model's JSON cannot be parsed, so consumers always receive
/// a renderable record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StructuredCv {
    pub name: String,
    pub title: String,
    pub summary: String,
    pub experience: Vec<ExperienceEntry>,
    pub skills: Vec<SkillEntry>,
    pub education: Vec<EducationEntry>,
    pub achievements: Vec<String>,
}

impl StructuredCv {
    /// True when nothing was extracted — the default record.
    pub fn is_empty(&self) -> bool {
        self == &StructuredCv::default()
    }
}

/// Everything produced by one full review interaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewOutput {
    /// Handle of the uploaded CV, reusable for follow-up calls.
    pub handle: FileHandle,
    /// Free-text markdown feedback. Empty string means "no feedback yet".
    pub feedback: String,
    /// Extracted record; the all-empty default when extraction degraded.
    pub cv: StructuredCv,
}
