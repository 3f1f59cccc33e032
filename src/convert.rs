//! The conversion service: top-level orchestration of a document run.
//!
//! [`ConversionService`] wires the pipeline stages together and is the only
//! type most integrators touch. It owns the worker pool (a semaphore sized
//! at construction, living as long as the service — many documents share
//! it) and holds every collaborator behind its trait seam.
//!
//! A run walks the stages in order, and each fatal condition short-circuits
//! everything after it:
//!
//! ```text
//! count pages ──▶ big-page guard ──▶ slide scheduler ──▶ artifact pipeline ──▶ completed
//!   │ fatal          │ fatal             (degrades,          (fire-and-forget)
//!   ▼                ▼                    never fatal)
//!  notify + Err     notify + Err
//! ```
//!
//! Degraded pages never fail a run: however many pages fell back to the
//! blank placeholder, the run ends with `on_conversion_completed` and an
//! `Ok` output. There is no distinct partial-success signal.

use crate::collaborators::{
    PageConverter, PageCounter, PageExtractor, RasterImageCreator, TextFileCreator,
    ThumbnailCreator, VectorImageCreator,
};
use crate::config::ConversionConfig;
use crate::document::Document;
use crate::error::{ConversionError, PageCountError};
use crate::output::{ConversionOutput, ConversionStats};
use crate::pipeline::artifacts::ArtifactPipeline;
use crate::pipeline::guard::BigPageGuard;
use crate::pipeline::scheduler::ConversionScheduler;
use crate::progress::{Notifier, NoopProgressNotifier};
use crate::slide::SlideState;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tracing::{error, info, warn};

/// Converts uploaded documents into complete per-page artifact sets.
///
/// Construct once per service instance via [`ConversionService::builder`];
/// the worker pool is created at build time and shared by every run.
///
/// # Example
/// ```rust,no_run
/// # use slideforge::*;
/// # use std::sync::Arc;
/// # async fn example(
/// #     counter: Arc<dyn PageCounter>,
/// #     extractor: Arc<dyn PageExtractor>,
/// #     converter: Arc<dyn PageConverter>,
/// #     thumbs: Arc<dyn ThumbnailCreator>,
/// #     text: Arc<dyn TextFileCreator>,
/// #     vector: Arc<dyn VectorImageCreator>,
/// #     raster: Arc<dyn RasterImageCreator>,
/// # ) -> Result<(), ConversionError> {
/// let service = ConversionService::builder(ConversionConfig::default())
///     .page_counter(counter)
///     .page_extractor(extractor)
///     .page_converter(converter)
///     .thumbnail_creator(thumbs)
///     .text_file_creator(text)
///     .vector_image_creator(vector)
///     .raster_image_creator(raster)
///     .build()?;
///
/// let doc = Document::new("pod-a", "mtg-1", "doc-1", "deck.pdf", true, "/uploads/deck.pdf");
/// let output = service.convert(doc).await?;
/// assert_eq!(output.stats.converted_pages + output.stats.blank_pages, output.stats.total_pages);
/// # Ok(())
/// # }
/// ```
pub struct ConversionService {
    config: ConversionConfig,
    pool: Arc<Semaphore>,
    counter: Arc<dyn PageCounter>,
    extractor: Arc<dyn PageExtractor>,
    converter: Arc<dyn PageConverter>,
    thumbnails: Arc<dyn ThumbnailCreator>,
    text_files: Arc<dyn TextFileCreator>,
    vector_images: Arc<dyn VectorImageCreator>,
    raster_images: Arc<dyn RasterImageCreator>,
    notifier: Notifier,
}

impl std::fmt::Debug for ConversionService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConversionService")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ConversionService {
    /// Start building a service around `config`.
    pub fn builder(config: ConversionConfig) -> ConversionServiceBuilder {
        ConversionServiceBuilder {
            config,
            counter: None,
            extractor: None,
            converter: None,
            thumbnails: None,
            text_files: None,
            vector_images: None,
            raster_images: None,
            notifier: None,
        }
    }

    /// Convert `document` into its full artifact set.
    ///
    /// # Errors
    /// Returns `Err(ConversionError)` only for fatal conditions — count
    /// failure, count exceeded, big page detected — after the matching
    /// terminal notification has been sent. Individual page failures are
    /// not errors; they appear as `Blank` slides in the output.
    pub async fn convert(&self, mut document: Document) -> Result<ConversionOutput, ConversionError> {
        let total_start = Instant::now();
        info!(
            pod_id = document.pod_id(),
            meeting_id = document.meeting_id(),
            doc_id = document.id(),
            filename = document.name(),
            "starting document conversion"
        );

        // ── Step 1: Determine page count ─────────────────────────────────
        let pages = self.count_pages(&document).await?;
        document.set_page_count(pages);
        info!(doc_id = document.id(), pages, "page count determined");

        // ── Step 2: Big-page guard for oversized uploads ─────────────────
        self.guard_big_pages(&document).await?;

        // ── Step 3: Slide conversion (feature-flagged) ───────────────────
        let slide_start = Instant::now();
        let slides = if self.config.slides_enabled {
            let scheduler = ConversionScheduler::new(
                Arc::clone(&self.pool),
                Arc::clone(&self.converter),
                Arc::clone(&self.notifier),
                &self.config,
            );
            scheduler.generate_slides(&document).await
        } else {
            Vec::new()
        };
        let slide_duration_ms = slide_start.elapsed().as_millis() as u64;

        // ── Step 4: Auxiliary artifact stages ────────────────────────────
        let pipeline = ArtifactPipeline::new(
            Arc::clone(&self.thumbnails),
            Arc::clone(&self.text_files),
            Arc::clone(&self.vector_images),
            Arc::clone(&self.raster_images),
            Arc::clone(&self.notifier),
            &self.config,
        );
        pipeline.run(&document).await;

        // ── Step 5: Terminal completion signal ───────────────────────────
        self.notifier.on_conversion_completed(&document);

        let converted = slides
            .iter()
            .filter(|s| matches!(s.state(), SlideState::Converted(_)))
            .count() as u32;
        let blank = slides
            .iter()
            .filter(|s| matches!(s.state(), SlideState::Blank(_)))
            .count() as u32;

        let stats = ConversionStats {
            total_pages: pages,
            converted_pages: converted,
            blank_pages: blank,
            total_duration_ms: total_start.elapsed().as_millis() as u64,
            slide_duration_ms,
        };

        info!(
            pod_id = document.pod_id(),
            meeting_id = document.meeting_id(),
            doc_id = document.id(),
            filename = document.name(),
            total_pages = stats.total_pages,
            converted_pages = stats.converted_pages,
            blank_pages = stats.blank_pages,
            duration_ms = stats.total_duration_ms,
            "document conversion completed"
        );

        Ok(ConversionOutput {
            document,
            slides,
            stats,
        })
    }

    /// Run the counting collaborator, mapping both failure kinds onto their
    /// terminal notification + fatal error. A zero page count is treated as
    /// a counting failure: nothing downstream can work with it.
    async fn count_pages(&self, document: &Document) -> Result<u32, ConversionError> {
        match self.counter.count_pages(document).await {
            Ok(0) => {
                error!(
                    pod_id = document.pod_id(),
                    meeting_id = document.meeting_id(),
                    doc_id = document.id(),
                    filename = document.name(),
                    "page counter reported zero pages"
                );
                self.notifier.on_page_count_failed(document);
                Err(ConversionError::PageCountFailed {
                    name: document.name().to_string(),
                    detail: "document has no pages".into(),
                })
            }
            Ok(pages) => Ok(pages),
            Err(PageCountError::CountFailed { detail }) => {
                error!(
                    pod_id = document.pod_id(),
                    meeting_id = document.meeting_id(),
                    doc_id = document.id(),
                    filename = document.name(),
                    detail,
                    "failed to determine number of pages"
                );
                self.notifier.on_page_count_failed(document);
                Err(ConversionError::PageCountFailed {
                    name: document.name().to_string(),
                    detail,
                })
            }
            Err(PageCountError::CountExceeded { actual, max }) => {
                warn!(
                    pod_id = document.pod_id(),
                    meeting_id = document.meeting_id(),
                    doc_id = document.id(),
                    filename = document.name(),
                    page_count = actual,
                    max_pages = max,
                    "number of pages exceeded"
                );
                self.notifier.on_page_count_exceeded(document, actual, max);
                Err(ConversionError::PageCountExceeded {
                    name: document.name().to_string(),
                    actual,
                    max,
                })
            }
        }
    }

    /// Probe oversized uploads page by page. Only documents whose file size
    /// exceeds the big-document threshold are probed; an unreadable file
    /// measures as zero and skips the probe.
    async fn guard_big_pages(&self, document: &Document) -> Result<(), ConversionError> {
        let file_len = tokio::fs::metadata(document.file())
            .await
            .map(|m| m.len())
            .unwrap_or(0);

        if file_len <= self.config.big_doc_bytes {
            return Ok(());
        }

        let guard = BigPageGuard::new(Arc::clone(&self.extractor), &self.config);
        if let Err(e) = guard.check(document).await {
            if let ConversionError::BigPageDetected {
                page, size_bytes, ..
            } = &e
            {
                error!(
                    pod_id = document.pod_id(),
                    meeting_id = document.meeting_id(),
                    doc_id = document.id(),
                    filename = document.name(),
                    file_size = file_len,
                    big_page = page,
                    big_page_size = size_bytes,
                    "document contains a big page"
                );
                self.notifier.on_big_page_detected(document, *page, *size_bytes);
            }
            return Err(e);
        }

        Ok(())
    }
}

/// Builder for [`ConversionService`]. Every collaborator is required; the
/// notifier defaults to [`NoopProgressNotifier`].
pub struct ConversionServiceBuilder {
    config: ConversionConfig,
    counter: Option<Arc<dyn PageCounter>>,
    extractor: Option<Arc<dyn PageExtractor>>,
    converter: Option<Arc<dyn PageConverter>>,
    thumbnails: Option<Arc<dyn ThumbnailCreator>>,
    text_files: Option<Arc<dyn TextFileCreator>>,
    vector_images: Option<Arc<dyn VectorImageCreator>>,
    raster_images: Option<Arc<dyn RasterImageCreator>>,
    notifier: Option<Notifier>,
}

impl ConversionServiceBuilder {
    pub fn page_counter(mut self, counter: Arc<dyn PageCounter>) -> Self {
        self.counter = Some(counter);
        self
    }

    pub fn page_extractor(mut self, extractor: Arc<dyn PageExtractor>) -> Self {
        self.extractor = Some(extractor);
        self
    }

    pub fn page_converter(mut self, converter: Arc<dyn PageConverter>) -> Self {
        self.converter = Some(converter);
        self
    }

    pub fn thumbnail_creator(mut self, creator: Arc<dyn ThumbnailCreator>) -> Self {
        self.thumbnails = Some(creator);
        self
    }

    pub fn text_file_creator(mut self, creator: Arc<dyn TextFileCreator>) -> Self {
        self.text_files = Some(creator);
        self
    }

    pub fn vector_image_creator(mut self, creator: Arc<dyn VectorImageCreator>) -> Self {
        self.vector_images = Some(creator);
        self
    }

    pub fn raster_image_creator(mut self, creator: Arc<dyn RasterImageCreator>) -> Self {
        self.raster_images = Some(creator);
        self
    }

    pub fn notifier(mut self, notifier: Notifier) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Build the service, creating the shared worker pool.
    ///
    /// # Errors
    /// `ConversionError::InvalidConfig` when a collaborator is missing.
    pub fn build(self) -> Result<ConversionService, ConversionError> {
        fn require<T: ?Sized>(
            slot: Option<Arc<T>>,
            what: &str,
        ) -> Result<Arc<T>, ConversionError> {
            slot.ok_or_else(|| ConversionError::InvalidConfig(format!("{what} is required")))
        }

        let pool = Arc::new(Semaphore::new(self.config.pool_size));

        Ok(ConversionService {
            pool,
            counter: require(self.counter, "page_counter")?,
            extractor: require(self.extractor, "page_extractor")?,
            converter: require(self.converter, "page_converter")?,
            thumbnails: require(self.thumbnails, "thumbnail_creator")?,
            text_files: require(self.text_files, "text_file_creator")?,
            vector_images: require(self.vector_images, "vector_image_creator")?,
            raster_images: require(self.raster_images, "raster_image_creator")?,
            notifier: self
                .notifier
                .unwrap_or_else(|| Arc::new(NoopProgressNotifier)),
            config: self.config,
        })
    }
}
