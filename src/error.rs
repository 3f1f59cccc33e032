//! Error types for the slideforge library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`ConversionError`] — **Fatal**: the run cannot proceed at all (page
//!   count could not be determined, page count over the limit, a
//!   pathologically large page detected, invalid configuration). Returned as
//!   `Err(ConversionError)` from [`crate::convert::ConversionService::convert`]
//!   after the matching terminal notification has been sent.
//!
//! * [`PageFailure`] — **Non-fatal**: a single page's conversion failed,
//!   timed out, or produced an oversize artifact. The run continues and the
//!   page degrades to the configured blank placeholder, so downstream
//!   consumers always receive a complete, fixed-size artifact set.
//!
//! The separation keeps the scheduler simple: anything that crosses the
//! page-task boundary is a `PageFailure`, anything returned from the service
//! is a `ConversionError`, and the two never mix.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the slideforge library.
///
/// Page-level failures use [`PageFailure`] and never abort a run.
#[derive(Debug, Error)]
pub enum ConversionError {
    // ── Page counting ─────────────────────────────────────────────────────
    /// The counting mechanism itself errored; the document is unusable.
    #[error("failed to determine page count for '{name}': {detail}")]
    PageCountFailed { name: String, detail: String },

    /// The document has more pages than the platform allows.
    #[error("document '{name}' has {actual} pages, exceeding the maximum of {max}")]
    PageCountExceeded { name: String, actual: u32, max: u32 },

    // ── Big-page guard ────────────────────────────────────────────────────
    /// A single page, extracted on its own, exceeds the configured ceiling.
    #[error("page {page} of '{name}' measures {size_bytes} bytes, too large to convert safely")]
    BigPageDetected {
        name: String,
        page: u32,
        size_bytes: u64,
    },

    // ── I/O ───────────────────────────────────────────────────────────────
    /// The uploaded file could not be read (size probe before the guard).
    #[error("cannot read uploaded file '{path}': {source}")]
    SourceUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config ────────────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error (scratch dir creation, runtime faults).
    #[error("internal error: {0}")]
    Internal(String),
}

/// A non-fatal failure for a single page.
///
/// Observed by the scheduler through the page task's join handle; the slide
/// stays `Pending` and is substituted with a blank placeholder in the
/// fallback pass. Converter implementations return
/// [`PageFailure::ConverterFailed`]; the remaining variants are produced by
/// the scheduler itself.
#[derive(Debug, Clone, Error, serde::Serialize, serde::Deserialize)]
pub enum PageFailure {
    /// The external converter reported an error for this page.
    #[error("page {page}: converter failed: {detail}")]
    ConverterFailed { page: u32, detail: String },

    /// The converted artifact exceeds the configured maximum size.
    #[error("page {page}: artifact is {size_bytes} bytes, over the {max_bytes} byte limit")]
    ArtifactTooLarge {
        page: u32,
        size_bytes: u64,
        max_bytes: u64,
    },

    /// Conversion did not finish within the per-page budget.
    #[error("page {page}: conversion timed out after {budget_ms}ms")]
    TimedOut { page: u32, budget_ms: u64 },

    /// The page task was cancelled or panicked.
    #[error("page {page}: conversion task aborted: {detail}")]
    Aborted { page: u32, detail: String },
}

/// Failure kinds for the external page-counting collaborator.
///
/// Both kinds are terminal for the run; the orchestrator maps them onto
/// [`ConversionError::PageCountFailed`] / [`ConversionError::PageCountExceeded`]
/// after notifying.
#[derive(Debug, Clone, Error)]
pub enum PageCountError {
    /// Counting itself errored (corrupt file, tool failure).
    #[error("page counting failed: {detail}")]
    CountFailed { detail: String },

    /// The count succeeded but exceeds the configured maximum.
    #[error("page count {actual} exceeds maximum {max}")]
    CountExceeded { actual: u32, max: u32 },
}
