//! Panel Verdict module
//!
//! Combines an external bubble detector, an external text recognizer and
//! the text classifier into one action per panel: `process`,
//! `skip_sfx_only` or `skip_no_bubble`.
//!
//! # Passes
//!
//! 1. Every detected bubble is cropped and recognized; its text is
//!    classified with `in_bubble = true`
//! 2. Only when pass 1 found no dialogue, or no bubble exists, the panel is
//!    scanned again with bubbles blanked out and the text is classified
//!    with `in_bubble = false`
//!
//! # Example
//!
//! ```rust,no_run
//! use webtoon_cut::{AggregatorOptions, NoBubbles, TextTypeClassifier, VerdictAggregator};
//! # use webtoon_cut::{CollaboratorError, RecognizedText, TextRecognizer};
//! # struct Ocr;
//! # impl TextRecognizer for Ocr {
//! #     fn recognize(&self, _: &image::GrayImage) -> Result<String, CollaboratorError> { Ok(String::new()) }
//! #     fn recognize_all(&self, _: &image::RgbImage) -> Result<Vec<RecognizedText>, CollaboratorError> { Ok(vec![]) }
//! # }
//! use std::path::Path;
//!
//! let aggregator = VerdictAggregator::new(TextTypeClassifier::new().unwrap(), AggregatorOptions::default());
//! let verdict = aggregator
//!     .analyze_path(Path::new("page_cut_01.png"), &NoBubbles, &Ocr)
//!     .unwrap();
//! println!("{}", verdict.action);
//! ```

// Submodules
mod aggregate;
mod collaborators;
mod types;

// Re-export public API
pub use aggregate::VerdictAggregator;
pub use collaborators::{BubbleDetector, NoBubbles, TextRecognizer};
pub use types::{
    AggregatorOptions, AggregatorOptionsBuilder, BoundingBox, BubbleRegion, ClassifiedSnippet,
    CollaboratorError, DetectionMethod, PanelAction, PanelVerdict, RecognizedText, Result,
    TextCounts, TextSnippet, VerdictError, DEFAULT_BUBBLE_CONFIDENCE_THRESHOLD,
    DEFAULT_FLOATING_MIN_CONFIDENCE, DEFAULT_OCR_PADDING,
};
