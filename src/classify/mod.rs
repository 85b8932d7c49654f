//! Region Text Classification module
//!
//! Classifies recognized text snippets as dialogue, sound effects (SFX),
//! meta information or background noise. The verdict decides whether a
//! panel needs the paid bubble-removal edit.
//!
//! # Policy
//!
//! - Inside a detected bubble, anything that is not SFX or meta is dialogue
//!   (recall first: a missed line is lost content)
//! - Floating text must show dialogue structure, a particle/ending or a
//!   laugh token, before it counts (precision first: signage and ambient
//!   lettering should not trigger an edit)
//!
//! # Example
//!
//! ```rust
//! use webtoon_cut::{TextCategory, TextTypeClassifier};
//!
//! let classifier = TextTypeClassifier::new().unwrap();
//!
//! assert_eq!(classifier.classify("쿵쿵", true).category, TextCategory::Sfx);
//! assert_eq!(classifier.classify("안녕하세요", true).category, TextCategory::Dialogue);
//! assert_eq!(classifier.classify("SALE", false).category, TextCategory::BackgroundNoise);
//! ```

// Submodules
mod classifier;
mod patterns;
mod types;

// Re-export public API
pub use classifier::TextTypeClassifier;
pub use patterns::{is_repetition, PatternTables};
pub use types::{
    ClassificationVerdict, ClassifierError, ClassifierOptions, ClassifierOptionsBuilder, Result,
    TextCategory, VerdictReason, DEFAULT_CONTAINMENT_FACTOR,
};
