//! Big-page guard: reject documents whose largest single page would
//! overwhelm the downstream converters.
//!
//! ## Why probe pages individually?
//!
//! A 90 MB upload can be 900 ordinary pages or 3 pages of enormous embedded
//! scans. The total file size cannot tell them apart, but a single page
//! extracted on its own can: each page from 1 up to (but not including) the
//! last is extracted into a scratch file, measured, and discarded. The first
//! page over the ceiling fails the run before any conversion resources are
//! spent on it.
//!
//! Two quirks of the probe are load-bearing and deliberately kept:
//!
//! * The final page is never measured individually (the loop bound is
//!   exclusive). A violating last page slips through to conversion, where
//!   the per-page budget and artifact size limit still contain it.
//! * Single-page documents are compared, whole, against the *document*
//!   ceiling rather than the per-page ceiling.
//!
//! Extraction I/O errors are swallowed: the page measures as zero for that
//! iteration, producing a missed check rather than a spurious violation.

use crate::collaborators::PageExtractor;
use crate::config::ConversionConfig;
use crate::document::Document;
use crate::error::ConversionError;
use std::sync::Arc;
use tracing::{debug, warn};

/// Detects any page whose extracted size exceeds the configured ceiling.
pub struct BigPageGuard {
    extractor: Arc<dyn PageExtractor>,
    big_doc_bytes: u64,
    max_page_bytes: u64,
}

impl BigPageGuard {
    pub fn new(extractor: Arc<dyn PageExtractor>, config: &ConversionConfig) -> Self {
        Self {
            extractor,
            big_doc_bytes: config.big_doc_bytes,
            max_page_bytes: config.max_page_bytes,
        }
    }

    /// Probe the document. Returns `Ok(())` when no page violates the
    /// ceiling, `Err(ConversionError::BigPageDetected)` on the first
    /// violation. Requires the page count to be known.
    pub async fn check(&self, document: &Document) -> Result<(), ConversionError> {
        let pages = document.page_count().unwrap_or(0);

        if pages > 1 {
            self.probe_pages(document, pages).await
        } else {
            self.check_whole_file(document).await
        }
    }

    /// Extract and measure pages 1..pages (final page excluded).
    async fn probe_pages(&self, document: &Document, pages: u32) -> Result<(), ConversionError> {
        let scratch = tempfile::tempdir()
            .map_err(|e| ConversionError::Internal(format!("scratch dir: {e}")))?;

        for page in 1..pages {
            let dest = scratch.path().join(format!("page-{page}.part"));

            let page_size = match self.extractor.extract_page(document.file(), &dest, page).await {
                Ok(()) => tokio::fs::metadata(&dest)
                    .await
                    .map(|m| m.len())
                    .unwrap_or(0),
                Err(e) => {
                    // Swallowed: a failed probe is a missed check, not a violation.
                    warn!(
                        doc_id = document.id(),
                        filename = document.name(),
                        page,
                        error = %e,
                        "page extraction failed during big-page probe"
                    );
                    0
                }
            };

            let _ = tokio::fs::remove_file(&dest).await;

            debug!(
                doc_id = document.id(),
                page, page_size, "big-page probe measurement"
            );

            if page_size > self.max_page_bytes {
                return Err(ConversionError::BigPageDetected {
                    name: document.name().to_string(),
                    page,
                    size_bytes: page_size,
                });
            }
        }

        Ok(())
    }

    /// Single-page documents: the whole file is the page. Compared against
    /// the document ceiling, not the per-page ceiling.
    async fn check_whole_file(&self, document: &Document) -> Result<(), ConversionError> {
        let size = tokio::fs::metadata(document.file())
            .await
            .map(|m| m.len())
            .map_err(|e| ConversionError::SourceUnreadable {
                path: document.file().to_path_buf(),
                source: e,
            })?;

        if size > self.big_doc_bytes {
            return Err(ConversionError::BigPageDetected {
                name: document.name().to_string(),
                page: 1,
                size_bytes: size,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::path::Path;

    /// Extractor that writes a fixed number of bytes per page.
    struct SizedExtractor {
        sizes: HashMap<u32, u64>,
    }

    #[async_trait]
    impl PageExtractor for SizedExtractor {
        async fn extract_page(
            &self,
            _source: &Path,
            dest: &Path,
            page: u32,
        ) -> std::io::Result<()> {
            let size = *self.sizes.get(&page).unwrap_or(&0) as usize;
            tokio::fs::write(dest, vec![0u8; size]).await
        }
    }

    /// Extractor that always fails with an I/O error.
    struct FailingExtractor;

    #[async_trait]
    impl PageExtractor for FailingExtractor {
        async fn extract_page(
            &self,
            _source: &Path,
            _dest: &Path,
            _page: u32,
        ) -> std::io::Result<()> {
            Err(std::io::Error::other("extraction tool crashed"))
        }
    }

    fn doc_with_pages(file: &Path, pages: u32) -> Document {
        let mut doc = Document::new("pod-a", "mtg-1", "doc-1", "deck.pdf", true, file);
        doc.set_page_count(pages);
        doc
    }

    fn config(big_doc: u64, max_page: u64) -> ConversionConfig {
        ConversionConfig::builder()
            .big_doc_bytes(big_doc)
            .max_page_bytes(max_page)
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn multi_page_within_ceiling_passes() {
        let sizes = HashMap::from([(1, 100_000), (2, 200_000), (3, 150_000), (4, 300_000)]);
        let guard = BigPageGuard::new(
            Arc::new(SizedExtractor { sizes }),
            &config(1_000_000, 500_000),
        );
        let doc = doc_with_pages(Path::new("/nonexistent/deck.pdf"), 5);
        assert!(guard.check(&doc).await.is_ok());
    }

    #[tokio::test]
    async fn violating_page_fails_with_index_and_size() {
        let sizes = HashMap::from([(1, 100_000), (2, 800_000), (3, 100_000)]);
        let guard = BigPageGuard::new(
            Arc::new(SizedExtractor { sizes }),
            &config(1_000_000, 500_000),
        );
        let doc = doc_with_pages(Path::new("/nonexistent/deck.pdf"), 4);
        match guard.check(&doc).await {
            Err(ConversionError::BigPageDetected {
                page, size_bytes, ..
            }) => {
                assert_eq!(page, 2);
                assert_eq!(size_bytes, 800_000);
            }
            other => panic!("expected BigPageDetected, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn final_page_is_not_probed() {
        // Page 5 is enormous, but the probe loop stops before the last page.
        let sizes = HashMap::from([
            (1, 100_000),
            (2, 200_000),
            (3, 150_000),
            (4, 300_000),
            (5, 9_000_000),
        ]);
        let guard = BigPageGuard::new(
            Arc::new(SizedExtractor { sizes }),
            &config(1_000_000, 500_000),
        );
        let doc = doc_with_pages(Path::new("/nonexistent/deck.pdf"), 5);
        assert!(guard.check(&doc).await.is_ok());
    }

    #[tokio::test]
    async fn single_page_compared_against_document_ceiling() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("deck.pdf");
        tokio::fs::write(&file, vec![0u8; 2_000_000]).await.unwrap();

        let guard = BigPageGuard::new(Arc::new(FailingExtractor), &config(1_000_000, 500_000));
        let doc = doc_with_pages(&file, 1);
        match guard.check(&doc).await {
            Err(ConversionError::BigPageDetected {
                page, size_bytes, ..
            }) => {
                assert_eq!(page, 1);
                assert_eq!(size_bytes, 2_000_000);
            }
            other => panic!("expected BigPageDetected, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn single_page_under_document_ceiling_passes() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("deck.pdf");
        tokio::fs::write(&file, vec![0u8; 400_000]).await.unwrap();

        let guard = BigPageGuard::new(Arc::new(FailingExtractor), &config(1_000_000, 500_000));
        let doc = doc_with_pages(&file, 1);
        assert!(guard.check(&doc).await.is_ok());
    }

    #[tokio::test]
    async fn extraction_errors_are_swallowed() {
        // Known weak point: a failing extractor means every probe measures
        // zero, so even a pathological document passes the guard.
        let guard = BigPageGuard::new(Arc::new(FailingExtractor), &config(1_000_000, 500_000));
        let doc = doc_with_pages(Path::new("/nonexistent/deck.pdf"), 6);
        assert!(guard.check(&doc).await.is_ok());
    }
}
