//! Progress-notifier trait for conversion lifecycle events.
//!
//! Inject an `Arc<dyn ProgressNotifier>` into the
//! [`crate::convert::ConversionServiceBuilder`] to publish events as the
//! pipeline moves through its stages.
//!
//! # Why a capability trait instead of channels?
//!
//! The trait approach is the least-invasive integration point: callers can
//! forward events to a message bus, a WebSocket session, a database record,
//! or a terminal display — without the library knowing anything about the
//! transport or wire format. The trait defines triggering conditions and
//! payload fields only. It is `Send + Sync` because the scheduler may call
//! it from the orchestrating task while page tasks run concurrently.
//!
//! # Example
//!
//! ```rust
//! use slideforge::{Document, ProgressNotifier};
//! use std::sync::atomic::{AtomicU32, Ordering};
//!
//! #[derive(Default)]
//! struct CountingNotifier {
//!     slides_seen: AtomicU32,
//! }
//!
//! impl ProgressNotifier for CountingNotifier {
//!     fn on_slide_generated(&self, completed: u32, document: &Document) {
//!         self.slides_seen.store(completed, Ordering::SeqCst);
//!         eprintln!("{}: {} slides done", document.name(), completed);
//!     }
//! }
//! ```

use crate::document::Document;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Auxiliary artifact stages, in the order the pipeline runs them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArtifactStage {
    Thumbnails,
    TextFiles,
    VectorImages,
    RasterImages,
}

impl fmt::Display for ArtifactStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ArtifactStage::Thumbnails => "thumbnails",
            ArtifactStage::TextFiles => "text_files",
            ArtifactStage::VectorImages => "vector_images",
            ArtifactStage::RasterImages => "raster_images",
        };
        f.write_str(s)
    }
}

/// Called by the pipeline as a conversion run progresses.
///
/// All methods have default no-op implementations so implementors only
/// override what they care about. Every method receives the [`Document`] so
/// the transport can address the owning pod and meeting.
pub trait ProgressNotifier: Send + Sync {
    /// The page-counting mechanism itself failed; the run is over.
    fn on_page_count_failed(&self, document: &Document) {
        let _ = document;
    }

    /// The document exceeds the maximum page count; the run is over.
    fn on_page_count_exceeded(&self, document: &Document, actual: u32, max: u32) {
        let _ = (document, actual, max);
    }

    /// A disproportionately large page was detected; the run is over.
    fn on_big_page_detected(&self, document: &Document, page: u32, size_bytes: u64) {
        let _ = (document, page, size_bytes);
    }

    /// An auxiliary artifact stage is about to start.
    fn on_stage_starting(&self, stage: ArtifactStage, document: &Document) {
        let _ = (stage, document);
    }

    /// A slide reached a terminal state. `completed` is the running count of
    /// terminal slides; it reaches the document's page count by the end of
    /// the scheduling pass regardless of how many pages degraded.
    fn on_slide_generated(&self, completed: u32, document: &Document) {
        let _ = (completed, document);
    }

    /// Every stage finished; the artifact set is complete.
    fn on_conversion_completed(&self, document: &Document) {
        let _ = document;
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressNotifier;

impl ProgressNotifier for NoopProgressNotifier {}

/// Convenience alias matching the type held by the conversion service.
pub type Notifier = Arc<dyn ProgressNotifier>;
