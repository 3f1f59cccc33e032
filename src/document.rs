//! The uploaded document and its identity within the platform.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// An uploaded presentation document awaiting conversion.
///
/// Identity fields (pod, meeting, document id, display name) travel with
/// every progress notification and every structured log line so operators
/// can correlate events across services. The page count starts out unknown
/// and is recorded by the orchestrator once the page-counting collaborator
/// has run; nothing else ever writes it.
///
/// `Clone` exists so page tasks can carry the document's identity across
/// `tokio::spawn` without sharing mutable state — each clone is read-only
/// from the task's point of view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pod_id: String,
    meeting_id: String,
    id: String,
    name: String,
    downloadable: bool,
    file: PathBuf,
    page_count: Option<u32>,
}

impl Document {
    /// Describe an uploaded file. The page count is unknown until the
    /// conversion run has counted it.
    pub fn new(
        pod_id: impl Into<String>,
        meeting_id: impl Into<String>,
        id: impl Into<String>,
        name: impl Into<String>,
        downloadable: bool,
        file: impl Into<PathBuf>,
    ) -> Self {
        Self {
            pod_id: pod_id.into(),
            meeting_id: meeting_id.into(),
            id: id.into(),
            name: name.into(),
            downloadable,
            file: file.into(),
            page_count: None,
        }
    }

    /// Owning pod within the meeting.
    pub fn pod_id(&self) -> &str {
        &self.pod_id
    }

    /// Owning meeting (session).
    pub fn meeting_id(&self) -> &str {
        &self.meeting_id
    }

    /// Platform-wide document id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Display name shown to users (typically the upload filename).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether meeting participants may download the original file.
    pub fn is_downloadable(&self) -> bool {
        self.downloadable
    }

    /// Absolute path to the uploaded source file.
    pub fn file(&self) -> &Path {
        &self.file
    }

    /// Total page count, once determined.
    pub fn page_count(&self) -> Option<u32> {
        self.page_count
    }

    /// Record the page count determined by the counting collaborator.
    /// Crate-private: only the orchestration run writes it.
    pub(crate) fn set_page_count(&mut self, pages: u32) {
        self.page_count = Some(pages);
    }
}
