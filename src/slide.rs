//! Per-page slides and their lifecycle.
//!
//! A [`Slide`] is the unit of conversion work for one page. It is created
//! `Pending` once the page count is known and transitions exactly once into
//! one of two terminal states:
//!
//! ```text
//! Pending ──▶ Converted(artifact)   task finished within budget
//!        └──▶ Blank(placeholder)    failure / timeout / cancellation
//! ```
//!
//! The scheduler is the only writer: a successful page task's artifact is
//! applied on the orchestrating side of the await, and the fallback pass
//! sweeps up everything still `Pending`. A slide is never recreated and
//! never moves out of a terminal state, which is what guarantees the
//! completed count delivered to the notifier equals the page count.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Handle to a produced artifact: where it lives and how big it is.
///
/// The size is carried so the scheduler can enforce the configured maximum
/// artifact size without re-statting the file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactHandle {
    path: PathBuf,
    size_bytes: u64,
}

impl ArtifactHandle {
    pub fn new(path: impl Into<PathBuf>, size_bytes: u64) -> Self {
        Self {
            path: path.into(),
            size_bytes,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }
}

/// Lifecycle state of a slide. `Converted` and `Blank` are terminal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SlideState {
    /// Initial state; no artifact yet.
    Pending,
    /// The page converted successfully within budget.
    Converted(ArtifactHandle),
    /// The page was substituted with the blank placeholder.
    Blank(ArtifactHandle),
}

/// One page's conversion work and its eventual artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Slide {
    page: u32,
    state: SlideState,
}

impl Slide {
    /// A pending slide for the given 1-based page index.
    pub(crate) fn new(page: u32) -> Self {
        Self {
            page,
            state: SlideState::Pending,
        }
    }

    /// 1-based page index; artifact order matches document order.
    pub fn page_number(&self) -> u32 {
        self.page
    }

    pub fn state(&self) -> &SlideState {
        &self.state
    }

    /// The artifact handle, present only in a terminal state.
    pub fn artifact(&self) -> Option<&ArtifactHandle> {
        match &self.state {
            SlideState::Pending => None,
            SlideState::Converted(a) | SlideState::Blank(a) => Some(a),
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.state, SlideState::Pending)
    }

    /// True once the slide has reached a terminal state.
    pub fn is_done(&self) -> bool {
        !self.is_pending()
    }

    /// Transition `Pending → Converted`. A slide transitions exactly once;
    /// calling this on a terminal slide is a scheduler bug.
    pub(crate) fn mark_converted(&mut self, artifact: ArtifactHandle) {
        debug_assert!(self.is_pending(), "slide {} already terminal", self.page);
        self.state = SlideState::Converted(artifact);
    }

    /// Transition `Pending → Blank` with the placeholder artifact.
    pub(crate) fn mark_blank(&mut self, placeholder: ArtifactHandle) {
        debug_assert!(self.is_pending(), "slide {} already terminal", self.page);
        self.state = SlideState::Blank(placeholder);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_slide_is_pending() {
        let slide = Slide::new(1);
        assert!(slide.is_pending());
        assert!(!slide.is_done());
        assert_eq!(slide.artifact(), None);
    }

    #[test]
    fn converted_is_terminal_with_artifact() {
        let mut slide = Slide::new(4);
        slide.mark_converted(ArtifactHandle::new("/var/slides/4.svg", 1024));
        assert!(slide.is_done());
        assert_eq!(slide.artifact().unwrap().size_bytes(), 1024);
        assert!(matches!(slide.state(), SlideState::Converted(_)));
    }

    #[test]
    fn blank_is_terminal_with_placeholder() {
        let mut slide = Slide::new(2);
        slide.mark_blank(ArtifactHandle::new("/opt/blank.svg", 128));
        assert!(slide.is_done());
        assert!(matches!(slide.state(), SlideState::Blank(_)));
        assert_eq!(
            slide.artifact().unwrap().path(),
            Path::new("/opt/blank.svg")
        );
    }

    #[test]
    fn slide_serialises_with_state() {
        let mut slide = Slide::new(9);
        slide.mark_converted(ArtifactHandle::new("/var/slides/9.svg", 2048));
        let json = serde_json::to_string(&slide).unwrap();
        assert!(json.contains("Converted"));
        let back: Slide = serde_json::from_str(&json).unwrap();
        assert_eq!(back.page_number(), 9);
    }
}
