//! Pipeline stages for document-to-slides conversion.
//!
//! Each submodule implements exactly one stage. Keeping stages separate
//! makes each independently testable and lets us swap a collaborator
//! (e.g. a different page extractor) without touching the other stages.
//!
//! ## Data Flow
//!
//! ```text
//! count ──▶ guard ──▶ scheduler ──▶ artifacts ──▶ completed
//! (pages)  (big-page  (slides +     (thumbnails,
//!           probe)     blanks)       text, images)
//! ```
//!
//! 1. [`guard`]     — probe oversized documents page by page before any
//!    conversion starts; violations abort the run
//! 2. [`scheduler`] — drive one conversion task per page under the worker
//!    pool and the per-page budget, then sweep up blanks
//! 3. [`artifacts`] — run the conditional auxiliary stages in fixed order

pub mod artifacts;
pub mod guard;
pub mod scheduler;
