//! Core domain types shared across intake, analysis and rendering.

use serde::Serialize;
use std::fmt;

/// Where a [`SourceDocument`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    Pasted,
    Uploaded,
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Origin::Pasted => write!(f, "pasted"),
            Origin::Uploaded => write!(f, "uploaded"),
        }
    }
}

/// The code under analysis. Content is always decoded UTF-8 text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDocument {
    content: String,
    origin: Origin,
    filename: Option<String>,
}

impl SourceDocument {
    pub fn pasted(content: impl Into<String>) -> Self {
        Self { content: content.into(), origin: Origin::Pasted, filename: None }
    }

    pub fn uploaded(content: impl Into<String>, filename: impl Into<String>) -> Self {
        Self { content: content.into(), origin: Origin::Uploaded, filename: Some(filename.into()) }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn origin(&self) -> Origin {
        self.origin
    }

    pub fn filename(&self) -> Option<&str> {
        self.filename.as_deref()
    }

    /// Strip disallowed markup, consuming the raw document.
    pub fn sanitize(self) -> SanitizedInput {
        SanitizedInput { text: crate::sanitize::strip_script_tags(&self.content) }
    }
}

/// Document content after script stripping. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanitizedInput {
    text: String,
}

impl SanitizedInput {
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// A file received from the web layer, fully buffered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// What the upload form hands to the core: an optional file and/or pasted text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Submission {
    pub file: Option<Upload>,
    pub text: Option<String>,
}

/// One ordered fragment of the service reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisChunk {
    pub index: usize,
    pub text: String,
}

/// Terminal state of an analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ReportStatus {
    Complete,
    /// Some chunks arrived, then the stream failed or ended early.
    Incomplete { reason: String },
}

/// Final sanitized HTML plus how the stream ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedReport {
    pub html: String,
    pub status: ReportStatus,
    pub chunk_count: usize,
}

impl RenderedReport {
    pub fn is_complete(&self) -> bool {
        self.status == ReportStatus::Complete
    }
}
