//! # slideforge
//!
//! Convert an uploaded multi-page document into a complete set of per-page
//! presentation artifacts for a conferencing platform.
//!
//! ## What this crate is (and is not)
//!
//! This is the **orchestration core** of a document conversion service: it
//! validates page counts, rejects pathological uploads, schedules per-page
//! conversion under a bounded worker pool with a per-page time budget,
//! degrades failed pages to a blank placeholder, sequences the auxiliary
//! artifact stages, and publishes progress events. It deliberately does
//! **not** parse documents, rasterise pages, or encode artifacts — those
//! live behind the collaborator traits in [`collaborators`] and are
//! injected at service construction.
//!
//! ## Pipeline Overview
//!
//! ```text
//! Document
//!  │
//!  ├─ 1. Count      external page counter; fatal on failure or overflow
//!  ├─ 2. Guard      probe oversized uploads page by page; fatal on a big page
//!  ├─ 3. Slides     one task per page, bounded pool, per-page budget,
//!  │                blank-placeholder fallback — every page ends terminal
//!  ├─ 4. Artifacts  thumbnails, text files, optional vector/raster images
//!  └─ 5. Done       on_conversion_completed — always, however many pages degraded
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! # use slideforge::*;
//! # use std::sync::Arc;
//! # async fn run(
//! #     counter: Arc<dyn PageCounter>,
//! #     extractor: Arc<dyn PageExtractor>,
//! #     converter: Arc<dyn PageConverter>,
//! #     thumbs: Arc<dyn ThumbnailCreator>,
//! #     text: Arc<dyn TextFileCreator>,
//! #     vector: Arc<dyn VectorImageCreator>,
//! #     raster: Arc<dyn RasterImageCreator>,
//! # ) -> Result<(), ConversionError> {
//! let config = ConversionConfig::builder()
//!     .pool_size(8)
//!     .blank_slide("/opt/platform/blank.svg")
//!     .build()?;
//!
//! let service = ConversionService::builder(config)
//!     .page_counter(counter)
//!     .page_extractor(extractor)
//!     .page_converter(converter)
//!     .thumbnail_creator(thumbs)
//!     .text_file_creator(text)
//!     .vector_image_creator(vector)
//!     .raster_image_creator(raster)
//!     .build()?;
//!
//! let doc = Document::new("pod-a", "mtg-1", "doc-1", "deck.pdf", true, "/uploads/deck.pdf");
//! let output = service.convert(doc).await?;
//! println!("{} slides, {} blank", output.stats.total_pages, output.stats.blank_pages);
//! # Ok(())
//! # }
//! ```
//!
//! ## Failure model
//!
//! | Condition | Effect |
//! |-----------|--------|
//! | Count failed / exceeded | Terminal notification, run aborts |
//! | Big page detected | Terminal notification, run aborts |
//! | Page failed / timed out / oversize | Page degrades to blank, run continues |
//! | Auxiliary stage failure | Collaborator's concern, never observed here |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod collaborators;
pub mod config;
pub mod convert;
pub mod document;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod slide;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use collaborators::{
    PageConverter, PageCounter, PageExtractor, RasterImageCreator, TextFileCreator,
    ThumbnailCreator, VectorImageCreator,
};
pub use config::{ConversionConfig, ConversionConfigBuilder};
pub use convert::{ConversionService, ConversionServiceBuilder};
pub use document::Document;
pub use error::{ConversionError, PageCountError, PageFailure};
pub use output::{ConversionOutput, ConversionStats};
pub use progress::{ArtifactStage, Notifier, NoopProgressNotifier, ProgressNotifier};
pub use slide::{ArtifactHandle, Slide, SlideState};
