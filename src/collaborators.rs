//! External collaborator contracts.
//!
//! The core orchestrates; it never parses documents or encodes artifacts
//! itself. Everything that touches the actual file format lives behind one
//! of these seams and is injected as an `Arc<dyn Trait>` at service
//! construction. The traits are deliberately thin: the exact algorithms
//! (what tool counts pages, how a page becomes a vector slide) are the
//! implementor's concern.
//!
//! The four auxiliary generators are fire-and-forget: the pipeline never
//! consults a return value, so stage failures (retry, rollback, logging)
//! are wholly the collaborator's responsibility.

use crate::document::Document;
use crate::error::{PageCountError, PageFailure};
use crate::slide::ArtifactHandle;
use async_trait::async_trait;
use std::path::Path;

/// Determines the total page count of an uploaded document.
#[async_trait]
pub trait PageCounter: Send + Sync {
    /// Count the pages, or fail the run. `CountExceeded` carries the actual
    /// and maximum counts for the terminal notification.
    async fn count_pages(&self, document: &Document) -> Result<u32, PageCountError>;
}

/// Extracts a single page from a multi-page container into its own file.
///
/// Used by the big-page guard to measure pages in isolation.
#[async_trait]
pub trait PageExtractor: Send + Sync {
    async fn extract_page(&self, source: &Path, dest: &Path, page: u32) -> std::io::Result<()>;
}

/// Converts one page into its target slide artifact and persists it.
#[async_trait]
pub trait PageConverter: Send + Sync {
    /// Produce the artifact for `page` (1-based). Implementations return
    /// [`PageFailure::ConverterFailed`] on error; the scheduler handles
    /// timeouts and size limits itself.
    async fn convert_page(
        &self,
        document: &Document,
        page: u32,
    ) -> Result<ArtifactHandle, PageFailure>;
}

/// Generates per-page thumbnail images.
#[async_trait]
pub trait ThumbnailCreator: Send + Sync {
    async fn create_thumbnails(&self, document: &Document);
}

/// Generates per-page searchable text files.
#[async_trait]
pub trait TextFileCreator: Send + Sync {
    async fn create_text_files(&self, document: &Document);
}

/// Generates per-page vector images.
#[async_trait]
pub trait VectorImageCreator: Send + Sync {
    async fn create_vector_images(&self, document: &Document);
}

/// Generates per-page raster images.
#[async_trait]
pub trait RasterImageCreator: Send + Sync {
    async fn create_raster_images(&self, document: &Document);
}
