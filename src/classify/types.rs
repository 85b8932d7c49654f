//! Classification module core types
//!
//! Contains verdict records, classifier options and error types.

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================
// Constants
// ============================================================

/// Confidence of an empty verdict
pub const EMPTY_CONFIDENCE: f32 = 1.0;

/// Confidence of a meta-information verdict
pub const META_CONFIDENCE: f32 = 0.9;

/// Confidence of a sound-effect verdict
pub const SFX_CONFIDENCE: f32 = 0.95;

/// Confidence of an in-bubble dialogue verdict
pub const BUBBLE_DIALOGUE_CONFIDENCE: f32 = 0.8;

/// Confidence of a floating background-noise verdict
pub const BACKGROUND_NOISE_CONFIDENCE: f32 = 0.6;

/// Floating dialogue verdicts are not scored
pub const UNSCORED_CONFIDENCE: f32 = 0.0;

/// A contained SFX word only counts when the text is shorter than
/// `factor * word length`
pub const DEFAULT_CONTAINMENT_FACTOR: usize = 3;

// ============================================================
// Error Types
// ============================================================

/// Classifier construction error types
#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("Invalid pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

pub type Result<T> = std::result::Result<T, ClassifierError>;

// ============================================================
// Core Data Structures
// ============================================================

/// Text category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextCategory {
    /// Onomatopoeia / sound effect
    Sfx,
    /// Credits, episode markers, commerce
    Meta,
    /// Spoken line
    Dialogue,
    /// Floating text without dialogue structure
    BackgroundNoise,
    /// Nothing but whitespace
    Empty,
}

impl TextCategory {
    /// Snake-case name
    pub fn as_str(&self) -> &'static str {
        match self {
            TextCategory::Sfx => "sfx",
            TextCategory::Meta => "meta",
            TextCategory::Dialogue => "dialogue",
            TextCategory::BackgroundNoise => "background_noise",
            TextCategory::Empty => "empty",
        }
    }
}

impl std::fmt::Display for TextCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which rule produced a verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerdictReason {
    /// Empty or whitespace-only text
    EmptyText,
    /// Meta-information pattern
    MetaInfo,
    /// SFX dictionary or pattern
    SfxDictionary,
    /// Inside a bubble and not SFX/meta
    BubbleDefault,
    /// Floating text with a laugh token
    FloatingLaugh,
    /// Floating text with particles or sentence endings
    FloatingStructure,
    /// Floating text without dialogue evidence
    FloatingNoise,
}

/// Classifier output for one text snippet
///
/// `is_dialogue` always equals `category == Dialogue`; verdicts are only
/// built through the constructors below.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClassificationVerdict {
    /// Category
    pub category: TextCategory,
    /// Whether the snippet counts as dialogue
    pub is_dialogue: bool,
    /// Confidence in `[0, 1]`
    pub confidence: f32,
    /// Deciding rule
    pub reason: VerdictReason,
}

impl ClassificationVerdict {
    fn new(category: TextCategory, confidence: f32, reason: VerdictReason) -> Self {
        Self {
            category,
            is_dialogue: category == TextCategory::Dialogue,
            confidence: confidence.clamp(0.0, 1.0),
            reason,
        }
    }

    pub fn empty() -> Self {
        Self::new(TextCategory::Empty, EMPTY_CONFIDENCE, VerdictReason::EmptyText)
    }

    pub fn meta() -> Self {
        Self::new(TextCategory::Meta, META_CONFIDENCE, VerdictReason::MetaInfo)
    }

    pub fn sfx() -> Self {
        Self::new(TextCategory::Sfx, SFX_CONFIDENCE, VerdictReason::SfxDictionary)
    }

    pub fn bubble_dialogue() -> Self {
        Self::new(
            TextCategory::Dialogue,
            BUBBLE_DIALOGUE_CONFIDENCE,
            VerdictReason::BubbleDefault,
        )
    }

    /// Floating dialogue, by laugh token or sentence structure
    pub fn floating_dialogue(reason: VerdictReason) -> Self {
        Self::new(TextCategory::Dialogue, UNSCORED_CONFIDENCE, reason)
    }

    pub fn background_noise() -> Self {
        Self::new(
            TextCategory::BackgroundNoise,
            BACKGROUND_NOISE_CONFIDENCE,
            VerdictReason::FloatingNoise,
        )
    }
}

// ============================================================
// Options
// ============================================================

/// Classifier options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierOptions {
    /// Containment guard factor for dictionary words inside longer text
    pub containment_factor: usize,
    /// Additional sound-effect words
    pub extra_sfx_words: Vec<String>,
    /// Additional meta-information regexes (case-insensitive)
    pub extra_meta_patterns: Vec<String>,
}

impl Default for ClassifierOptions {
    fn default() -> Self {
        Self {
            containment_factor: DEFAULT_CONTAINMENT_FACTOR,
            extra_sfx_words: Vec::new(),
            extra_meta_patterns: Vec::new(),
        }
    }
}

impl ClassifierOptions {
    /// Create a new options builder
    pub fn builder() -> ClassifierOptionsBuilder {
        ClassifierOptionsBuilder::default()
    }
}

/// Builder for ClassifierOptions
#[derive(Debug, Default)]
pub struct ClassifierOptionsBuilder {
    options: ClassifierOptions,
}

impl ClassifierOptionsBuilder {
    /// Set containment factor (at least 1)
    #[must_use]
    pub fn containment_factor(mut self, factor: usize) -> Self {
        self.options.containment_factor = factor.max(1);
        self
    }

    /// Add a sound-effect word
    #[must_use]
    pub fn sfx_word(mut self, word: impl Into<String>) -> Self {
        self.options.extra_sfx_words.push(word.into());
        self
    }

    /// Add a meta-information pattern
    #[must_use]
    pub fn meta_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.options.extra_meta_patterns.push(pattern.into());
        self
    }

    /// Build the options
    #[must_use]
    pub fn build(self) -> ClassifierOptions {
        self.options
    }
}
