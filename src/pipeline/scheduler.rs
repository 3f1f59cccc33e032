//! Conversion scheduler: one task per page under a bounded worker pool and
//! a per-page time budget, with a blank-slide fallback pass.
//!
//! ## Scheduling model
//!
//! The pool is a [`Semaphore`] owned by the service instance; each page task
//! is spawned onto the runtime and holds a permit while it converts. The
//! scheduler submits one page, then immediately waits on that page's task
//! with a fresh budget taken at the moment of waiting. Waiting is therefore
//! serialized: at most one task is awaited at a time even when the pool has
//! spare capacity. Submit-all-then-harvest would give true overlap; the
//! serialized wait is the deliberately chosen behavior here (see DESIGN.md)
//! because it preserves in-order progress updates and a full independent
//! budget per page.
//!
//! ## Guarantee
//!
//! Every slide reaches a terminal state. Whatever happens to a page task —
//! converter error, oversize artifact, panic, timeout — the slide stays
//! `Pending` through the wait loop and the fallback pass substitutes the
//! configured placeholder, so the completed counter always reaches the
//! page count and downstream consumers always get a full artifact set.

use crate::collaborators::PageConverter;
use crate::config::ConversionConfig;
use crate::document::Document;
use crate::error::PageFailure;
use crate::progress::Notifier;
use crate::slide::{ArtifactHandle, Slide};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// Drives page-conversion tasks and guarantees a terminal state per page.
pub struct ConversionScheduler {
    pool: Arc<Semaphore>,
    converter: Arc<dyn PageConverter>,
    notifier: Notifier,
    budget: Duration,
    blank_slide: PathBuf,
    max_artifact_bytes: u64,
}

impl ConversionScheduler {
    /// `pool` is shared with the owning service; its lifetime is the
    /// service's, not this run's.
    pub fn new(
        pool: Arc<Semaphore>,
        converter: Arc<dyn PageConverter>,
        notifier: Notifier,
        config: &ConversionConfig,
    ) -> Self {
        Self {
            pool,
            converter,
            notifier,
            budget: config.conversion_budget,
            blank_slide: config.blank_slide.clone(),
            max_artifact_bytes: config.max_artifact_bytes,
        }
    }

    /// Convert every page of `document`, in ascending page order.
    ///
    /// Returns exactly `page_count` slides, each in a terminal state.
    /// Emits `on_slide_generated` with the running completed counter for
    /// every terminal transition, successes first (in page order), then
    /// blanks from the fallback pass.
    pub async fn generate_slides(&self, document: &Document) -> Vec<Slide> {
        let pages = document.page_count().unwrap_or(0);
        let mut slides: Vec<Slide> = (1..=pages).map(Slide::new).collect();
        let mut completed: u32 = 0;

        let pass_start = Instant::now();

        for slide in &mut slides {
            let page = slide.page_number();
            let page_start = Instant::now();

            let task = self.submit(document, page);
            let abort = task.abort_handle();

            // Fresh budget per page, taken at the moment of waiting.
            match tokio::time::timeout(self.budget, task).await {
                Ok(Ok(Ok(artifact))) => {
                    slide.mark_converted(artifact);
                    completed += 1;
                    self.notifier.on_slide_generated(completed, document);
                }
                Ok(Ok(Err(failure))) => {
                    error!(
                        pod_id = document.pod_id(),
                        meeting_id = document.meeting_id(),
                        doc_id = document.id(),
                        filename = document.name(),
                        page,
                        error = %failure,
                        "page conversion failed"
                    );
                }
                Ok(Err(join_err)) => {
                    let failure = PageFailure::Aborted {
                        page,
                        detail: join_err.to_string(),
                    };
                    error!(
                        pod_id = document.pod_id(),
                        meeting_id = document.meeting_id(),
                        doc_id = document.id(),
                        filename = document.name(),
                        page,
                        error = %failure,
                        "page conversion task aborted"
                    );
                }
                Err(_elapsed) => {
                    // Advisory: the task is asked to stop, but the converter
                    // it delegates to is not guaranteed to.
                    abort.abort();
                    let failure = PageFailure::TimedOut {
                        page,
                        budget_ms: self.budget.as_millis() as u64,
                    };
                    error!(
                        pod_id = document.pod_id(),
                        meeting_id = document.meeting_id(),
                        doc_id = document.id(),
                        filename = document.name(),
                        page,
                        error = %failure,
                        "page conversion timed out"
                    );
                }
            }

            info!(
                doc_id = document.id(),
                page,
                duration_ms = page_start.elapsed().as_millis() as u64,
                "page conversion attempt finished"
            );
        }

        self.fill_blanks(document, &mut slides, &mut completed).await;

        info!(
            pod_id = document.pod_id(),
            meeting_id = document.meeting_id(),
            doc_id = document.id(),
            filename = document.name(),
            total_pages = pages,
            converted = completed,
            duration_ms = pass_start.elapsed().as_millis() as u64,
            "slide generation pass finished"
        );

        slides
    }

    /// Spawn one page task. The permit is acquired inside the task so the
    /// budget covers queueing on the pool, matching a submit-then-wait
    /// executor. The outcome travels through the join handle; nothing
    /// panics across this boundary.
    fn submit(
        &self,
        document: &Document,
        page: u32,
    ) -> JoinHandle<Result<ArtifactHandle, PageFailure>> {
        let pool = Arc::clone(&self.pool);
        let converter = Arc::clone(&self.converter);
        let doc = document.clone();
        let max_bytes = self.max_artifact_bytes;

        tokio::spawn(async move {
            let _permit = pool.acquire_owned().await.map_err(|_| PageFailure::Aborted {
                page,
                detail: "worker pool closed".into(),
            })?;

            let artifact = converter.convert_page(&doc, page).await?;

            if artifact.size_bytes() > max_bytes {
                return Err(PageFailure::ArtifactTooLarge {
                    page,
                    size_bytes: artifact.size_bytes(),
                    max_bytes,
                });
            }

            Ok(artifact)
        })
    }

    /// Second pass: every slide still `Pending` gets the placeholder, and
    /// the completed counter keeps climbing so it ends at the page count.
    async fn fill_blanks(&self, document: &Document, slides: &mut [Slide], completed: &mut u32) {
        let placeholder_size = tokio::fs::metadata(&self.blank_slide)
            .await
            .map(|m| m.len())
            .unwrap_or(0);

        for slide in slides.iter_mut() {
            if slide.is_pending() {
                warn!(
                    pod_id = document.pod_id(),
                    meeting_id = document.meeting_id(),
                    doc_id = document.id(),
                    filename = document.name(),
                    page = slide.page_number(),
                    "substituting blank slide"
                );
                slide.mark_blank(ArtifactHandle::new(self.blank_slide.clone(), placeholder_size));
                *completed += 1;
                self.notifier.on_slide_generated(*completed, document);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::{NoopProgressNotifier, ProgressNotifier};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;

    struct OkConverter;

    #[async_trait]
    impl PageConverter for OkConverter {
        async fn convert_page(
            &self,
            _document: &Document,
            page: u32,
        ) -> Result<ArtifactHandle, PageFailure> {
            Ok(ArtifactHandle::new(format!("/var/slides/{page}.svg"), 1000))
        }
    }

    struct FailingConverter;

    #[async_trait]
    impl PageConverter for FailingConverter {
        async fn convert_page(
            &self,
            _document: &Document,
            page: u32,
        ) -> Result<ArtifactHandle, PageFailure> {
            Err(PageFailure::ConverterFailed {
                page,
                detail: "render glitch".into(),
            })
        }
    }

    struct StallingConverter;

    #[async_trait]
    impl PageConverter for StallingConverter {
        async fn convert_page(
            &self,
            _document: &Document,
            _page: u32,
        ) -> Result<ArtifactHandle, PageFailure> {
            // Never completes within any sane test budget.
            tokio::time::sleep(Duration::from_secs(3600)).await;
            unreachable!()
        }
    }

    struct OversizeConverter;

    #[async_trait]
    impl PageConverter for OversizeConverter {
        async fn convert_page(
            &self,
            _document: &Document,
            page: u32,
        ) -> Result<ArtifactHandle, PageFailure> {
            Ok(ArtifactHandle::new(
                format!("/var/slides/{page}.svg"),
                9_000_000,
            ))
        }
    }

    #[derive(Default)]
    struct RecordingNotifier {
        updates: Mutex<Vec<u32>>,
        last: AtomicU32,
    }

    impl ProgressNotifier for RecordingNotifier {
        fn on_slide_generated(&self, completed: u32, _document: &Document) {
            self.updates.lock().unwrap().push(completed);
            self.last.store(completed, Ordering::SeqCst);
        }
    }

    fn doc(pages: u32) -> Document {
        let mut d = Document::new("pod-a", "mtg-1", "doc-1", "deck.pdf", true, "/tmp/deck.pdf");
        d.set_page_count(pages);
        d
    }

    fn scheduler_with(
        converter: Arc<dyn PageConverter>,
        notifier: Notifier,
        budget: Duration,
    ) -> ConversionScheduler {
        let config = ConversionConfig::builder()
            .pool_size(2)
            .conversion_budget(budget)
            .blank_slide("/opt/platform/blank.svg")
            .build()
            .unwrap();
        ConversionScheduler::new(Arc::new(Semaphore::new(2)), converter, notifier, &config)
    }

    #[tokio::test]
    async fn every_page_converts_and_counter_reaches_total() {
        let notifier = Arc::new(RecordingNotifier::default());
        let scheduler = scheduler_with(
            Arc::new(OkConverter),
            notifier.clone(),
            Duration::from_secs(5),
        );

        let slides = scheduler.generate_slides(&doc(4)).await;

        assert_eq!(slides.len(), 4);
        assert!(slides.iter().all(|s| s.is_done()));
        assert_eq!(*notifier.updates.lock().unwrap(), vec![1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn failures_degrade_to_blank_and_still_reach_total() {
        let notifier = Arc::new(RecordingNotifier::default());
        let scheduler = scheduler_with(
            Arc::new(FailingConverter),
            notifier.clone(),
            Duration::from_secs(5),
        );

        let slides = scheduler.generate_slides(&doc(3)).await;

        assert!(slides
            .iter()
            .all(|s| matches!(s.state(), crate::slide::SlideState::Blank(_))));
        assert_eq!(notifier.last.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_degrades_to_blank_with_one_increment() {
        let notifier = Arc::new(RecordingNotifier::default());
        let scheduler = scheduler_with(
            Arc::new(StallingConverter),
            notifier.clone(),
            Duration::from_millis(100),
        );

        let slides = scheduler.generate_slides(&doc(1)).await;

        assert_eq!(slides.len(), 1);
        assert!(matches!(
            slides[0].state(),
            crate::slide::SlideState::Blank(_)
        ));
        // Exactly one increment, attributed to the fallback pass.
        assert_eq!(*notifier.updates.lock().unwrap(), vec![1]);
    }

    #[tokio::test]
    async fn oversize_artifacts_count_as_failures() {
        let scheduler = scheduler_with(
            Arc::new(OversizeConverter),
            Arc::new(NoopProgressNotifier),
            Duration::from_secs(5),
        );

        let slides = scheduler.generate_slides(&doc(2)).await;

        assert!(slides
            .iter()
            .all(|s| matches!(s.state(), crate::slide::SlideState::Blank(_))));
    }

    #[tokio::test]
    async fn slides_are_in_ascending_page_order() {
        let scheduler = scheduler_with(
            Arc::new(OkConverter),
            Arc::new(NoopProgressNotifier),
            Duration::from_secs(5),
        );

        let slides = scheduler.generate_slides(&doc(6)).await;
        let pages: Vec<u32> = slides.iter().map(|s| s.page_number()).collect();
        assert_eq!(pages, vec![1, 2, 3, 4, 5, 6]);
    }

    #[tokio::test]
    async fn rerun_yields_same_page_index_set() {
        let notifier = Arc::new(NoopProgressNotifier);
        let bad = scheduler_with(
            Arc::new(FailingConverter),
            notifier.clone(),
            Duration::from_secs(5),
        );
        let good = scheduler_with(Arc::new(OkConverter), notifier, Duration::from_secs(5));

        let d = doc(5);
        let first: Vec<u32> = bad
            .generate_slides(&d)
            .await
            .iter()
            .map(|s| s.page_number())
            .collect();
        let second: Vec<u32> = good
            .generate_slides(&d)
            .await
            .iter()
            .map(|s| s.page_number())
            .collect();

        assert_eq!(first, second);
        assert_eq!(first, vec![1, 2, 3, 4, 5]);
    }
}
