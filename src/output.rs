//! Result types returned by a conversion run.

use crate::document::Document;
use crate::slide::Slide;
use serde::{Deserialize, Serialize};

/// Summary counters and timings for a completed run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionStats {
    /// Total pages in the document.
    pub total_pages: u32,
    /// Pages that converted successfully within budget.
    pub converted_pages: u32,
    /// Pages substituted with the blank placeholder.
    pub blank_pages: u32,
    /// Wall-clock duration of the whole run in milliseconds.
    pub total_duration_ms: u64,
    /// Wall-clock duration of the slide-conversion pass in milliseconds.
    /// Zero when slide conversion is disabled.
    pub slide_duration_ms: u64,
}

/// Everything a completed run produced.
///
/// A run that completes always carries exactly `total_pages` terminal
/// slides (empty when slide conversion is disabled by configuration);
/// degraded pages appear as `Blank` slides rather than being missing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionOutput {
    /// The document, with its page count filled in.
    pub document: Document,
    /// Per-page slides in page order.
    pub slides: Vec<Slide>,
    /// Summary counters and timings.
    pub stats: ConversionStats,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_serialise() {
        let stats = ConversionStats {
            total_pages: 10,
            converted_pages: 8,
            blank_pages: 2,
            total_duration_ms: 1234,
            slide_duration_ms: 900,
        };
        let json = serde_json::to_string(&stats).unwrap();
        assert!(json.contains("\"blank_pages\":2"));
    }
}
