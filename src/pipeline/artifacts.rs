//! Auxiliary artifact pipeline: thumbnails, text, vector and raster images.
//!
//! Runs after slide conversion (or immediately when slide conversion is
//! disabled by configuration). The order is fixed — thumbnails, text files,
//! vector images, raster images — and each stage announces itself through
//! the notifier before delegating entirely to its collaborator. The
//! pipeline never inspects or validates a collaborator's output; retry and
//! rollback are the collaborator's concern. The two accessibility stages
//! (thumbnails, text) always run; the image stages are feature-flagged.

use crate::collaborators::{
    RasterImageCreator, TextFileCreator, ThumbnailCreator, VectorImageCreator,
};
use crate::config::ConversionConfig;
use crate::document::Document;
use crate::progress::{ArtifactStage, Notifier};
use std::sync::Arc;
use tracing::debug;

/// Sequences the conditional post-processing stages.
pub struct ArtifactPipeline {
    thumbnails: Arc<dyn ThumbnailCreator>,
    text_files: Arc<dyn TextFileCreator>,
    vector_images: Arc<dyn VectorImageCreator>,
    raster_images: Arc<dyn RasterImageCreator>,
    notifier: Notifier,
    vector_enabled: bool,
    raster_enabled: bool,
}

impl ArtifactPipeline {
    pub fn new(
        thumbnails: Arc<dyn ThumbnailCreator>,
        text_files: Arc<dyn TextFileCreator>,
        vector_images: Arc<dyn VectorImageCreator>,
        raster_images: Arc<dyn RasterImageCreator>,
        notifier: Notifier,
        config: &ConversionConfig,
    ) -> Self {
        Self {
            thumbnails,
            text_files,
            vector_images,
            raster_images,
            notifier,
            vector_enabled: config.vector_images_enabled,
            raster_enabled: config.raster_images_enabled,
        }
    }

    /// Run the stages in fixed order for `document`.
    pub async fn run(&self, document: &Document) {
        self.announce(ArtifactStage::Thumbnails, document);
        self.thumbnails.create_thumbnails(document).await;

        self.announce(ArtifactStage::TextFiles, document);
        self.text_files.create_text_files(document).await;

        if self.vector_enabled {
            self.announce(ArtifactStage::VectorImages, document);
            self.vector_images.create_vector_images(document).await;
        }

        if self.raster_enabled {
            self.announce(ArtifactStage::RasterImages, document);
            self.raster_images.create_raster_images(document).await;
        }
    }

    fn announce(&self, stage: ArtifactStage, document: &Document) {
        debug!(doc_id = document.id(), %stage, "starting artifact stage");
        self.notifier.on_stage_starting(stage, document);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::ProgressNotifier;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Records the order in which stages actually execute.
    #[derive(Default)]
    struct StageLog {
        ran: Mutex<Vec<&'static str>>,
        announced: Mutex<Vec<ArtifactStage>>,
    }

    impl StageLog {
        fn record(&self, what: &'static str) {
            self.ran.lock().unwrap().push(what);
        }
    }

    impl ProgressNotifier for StageLog {
        fn on_stage_starting(&self, stage: ArtifactStage, _document: &Document) {
            self.announced.lock().unwrap().push(stage);
        }
    }

    struct LoggingCreators(Arc<StageLog>);

    #[async_trait]
    impl ThumbnailCreator for LoggingCreators {
        async fn create_thumbnails(&self, _document: &Document) {
            self.0.record("thumbnails");
        }
    }

    #[async_trait]
    impl TextFileCreator for LoggingCreators {
        async fn create_text_files(&self, _document: &Document) {
            self.0.record("text_files");
        }
    }

    #[async_trait]
    impl VectorImageCreator for LoggingCreators {
        async fn create_vector_images(&self, _document: &Document) {
            self.0.record("vector_images");
        }
    }

    #[async_trait]
    impl RasterImageCreator for LoggingCreators {
        async fn create_raster_images(&self, _document: &Document) {
            self.0.record("raster_images");
        }
    }

    fn doc() -> Document {
        Document::new("pod-a", "mtg-1", "doc-1", "deck.pdf", true, "/tmp/deck.pdf")
    }

    fn pipeline(log: Arc<StageLog>, vector: bool, raster: bool) -> ArtifactPipeline {
        let config = ConversionConfig::builder()
            .vector_images_enabled(vector)
            .raster_images_enabled(raster)
            .build()
            .unwrap();
        let creators = Arc::new(LoggingCreators(log.clone()));
        ArtifactPipeline::new(
            creators.clone(),
            creators.clone(),
            creators.clone(),
            creators,
            log,
            &config,
        )
    }

    #[tokio::test]
    async fn all_stages_run_in_fixed_order_when_enabled() {
        let log = Arc::new(StageLog::default());
        pipeline(log.clone(), true, true).run(&doc()).await;

        assert_eq!(
            *log.ran.lock().unwrap(),
            vec!["thumbnails", "text_files", "vector_images", "raster_images"]
        );
        assert_eq!(
            *log.announced.lock().unwrap(),
            vec![
                ArtifactStage::Thumbnails,
                ArtifactStage::TextFiles,
                ArtifactStage::VectorImages,
                ArtifactStage::RasterImages,
            ]
        );
    }

    #[tokio::test]
    async fn image_stages_are_skipped_when_disabled() {
        let log = Arc::new(StageLog::default());
        pipeline(log.clone(), false, false).run(&doc()).await;

        assert_eq!(
            *log.ran.lock().unwrap(),
            vec!["thumbnails", "text_files"]
        );
        assert_eq!(
            *log.announced.lock().unwrap(),
            vec![ArtifactStage::Thumbnails, ArtifactStage::TextFiles]
        );
    }

    #[tokio::test]
    async fn every_stage_is_announced_before_it_runs() {
        let log = Arc::new(StageLog::default());
        pipeline(log.clone(), true, false).run(&doc()).await;

        let announced = log.announced.lock().unwrap().len();
        let ran = log.ran.lock().unwrap().len();
        assert_eq!(announced, ran);
        assert_eq!(announced, 3);
    }
}
