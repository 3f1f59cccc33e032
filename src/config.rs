//! Configuration for the conversion service.
//!
//! All behaviour is controlled through [`ConversionConfig`], built via its
//! [`ConversionConfigBuilder`] and assembled once at service construction.
//! The struct is an immutable value object passed down through the pipeline:
//! no stage mutates it, which makes runs reproducible and lets two runs be
//! diffed by diffing their configs.
//!
//! # Design choice: builder over constructor
//! A nine-field constructor is unreadable and breaks on every new field.
//! The builder lets callers set only what they care about and rely on
//! well-documented defaults for the rest.

use crate::error::ConversionError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Configuration for document-to-slides conversion.
///
/// Built via [`ConversionConfig::builder()`] or
/// [`ConversionConfig::default()`].
///
/// # Example
/// ```rust
/// use slideforge::ConversionConfig;
/// use std::time::Duration;
///
/// let config = ConversionConfig::builder()
///     .pool_size(8)
///     .conversion_budget(Duration::from_secs(120))
///     .blank_slide("/opt/platform/blank.svg")
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionConfig {
    /// Size of the shared worker pool for page-conversion tasks. Default: 4.
    ///
    /// The pool is created once per service instance and lives as long as
    /// the service does, not per document run. Page conversion is typically
    /// CPU- and subprocess-bound, so a pool near the machine's core count is
    /// a reasonable starting point.
    pub pool_size: usize,

    /// Wall-clock budget for converting a single page. Default: 5 minutes.
    ///
    /// Each page gets a full fresh budget taken at the moment the scheduler
    /// starts waiting on it. A page that blows the budget is abandoned and
    /// degrades to the blank placeholder; the run itself never fails for it.
    pub conversion_budget: Duration,

    /// Whole-document size threshold in bytes. Default: 100 MB.
    ///
    /// Documents above this size get the big-page probe before any
    /// conversion starts. It doubles as the size ceiling for single-page
    /// documents, which are compared against this value rather than
    /// [`max_page_bytes`](Self::max_page_bytes).
    pub big_doc_bytes: u64,

    /// Per-page extracted-size ceiling in bytes. Default: 2 MB.
    ///
    /// A single page that measures above this once isolated indicates a
    /// pathological document (embedded raster scans, absurd vector detail)
    /// that would be unsafe or too slow to convert.
    pub max_page_bytes: u64,

    /// Path to the pre-supplied placeholder artifact substituted for any
    /// page whose conversion did not complete. Required: the builder
    /// rejects an empty path.
    pub blank_slide: PathBuf,

    /// Maximum size in bytes of a converted slide artifact. Default: 5 MB.
    ///
    /// Oversize results count as page failures and degrade to the
    /// placeholder, keeping the artifact set bounded for clients on slow
    /// links.
    pub max_artifact_bytes: u64,

    /// Generate vector slides. Default: true. When off, the slide-conversion
    /// stage (and its progress updates) is skipped entirely and the run goes
    /// straight to the auxiliary artifact stages.
    pub slides_enabled: bool,

    /// Generate per-page vector images. Default: true.
    pub vector_images_enabled: bool,

    /// Generate per-page raster images. Default: false.
    pub raster_images_enabled: bool,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            pool_size: 4,
            conversion_budget: Duration::from_secs(5 * 60),
            big_doc_bytes: 100 * 1024 * 1024,
            max_page_bytes: 2_000_000,
            blank_slide: PathBuf::from("blank-slide.svg"),
            max_artifact_bytes: 5_000_000,
            slides_enabled: true,
            vector_images_enabled: true,
            raster_images_enabled: false,
        }
    }
}

impl ConversionConfig {
    /// Create a new builder for `ConversionConfig`.
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ConversionConfig`].
#[derive(Debug)]
pub struct ConversionConfigBuilder {
    config: ConversionConfig,
}

impl ConversionConfigBuilder {
    pub fn pool_size(mut self, n: usize) -> Self {
        self.config.pool_size = n;
        self
    }

    pub fn conversion_budget(mut self, budget: Duration) -> Self {
        self.config.conversion_budget = budget;
        self
    }

    pub fn big_doc_bytes(mut self, bytes: u64) -> Self {
        self.config.big_doc_bytes = bytes;
        self
    }

    pub fn max_page_bytes(mut self, bytes: u64) -> Self {
        self.config.max_page_bytes = bytes;
        self
    }

    pub fn blank_slide(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.blank_slide = path.into();
        self
    }

    pub fn max_artifact_bytes(mut self, bytes: u64) -> Self {
        self.config.max_artifact_bytes = bytes;
        self
    }

    pub fn slides_enabled(mut self, v: bool) -> Self {
        self.config.slides_enabled = v;
        self
    }

    pub fn vector_images_enabled(mut self, v: bool) -> Self {
        self.config.vector_images_enabled = v;
        self
    }

    pub fn raster_images_enabled(mut self, v: bool) -> Self {
        self.config.raster_images_enabled = v;
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ConversionConfig, ConversionError> {
        let c = &self.config;
        if c.pool_size == 0 {
            return Err(ConversionError::InvalidConfig(
                "pool_size must be ≥ 1".into(),
            ));
        }
        if c.conversion_budget.is_zero() {
            return Err(ConversionError::InvalidConfig(
                "conversion_budget must be non-zero".into(),
            ));
        }
        if c.blank_slide.as_os_str().is_empty() {
            return Err(ConversionError::InvalidConfig(
                "blank_slide path must not be empty".into(),
            ));
        }
        Ok(self.config)
    }
}
