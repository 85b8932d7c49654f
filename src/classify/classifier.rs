//! Text type classifier
//!
//! Decides whether one recognized string is dialogue, a sound effect,
//! meta information or background noise. Rules are tried in order and the
//! first match wins:
//!
//! 1. empty text
//! 2. meta pattern on the original text
//! 3. SFX dictionary / containment / pattern on the normalized text
//! 4. inside a bubble: dialogue
//! 5. floating: laugh token, then dialogue hint, else background noise

use super::patterns::PatternTables;
use super::types::{ClassificationVerdict, ClassifierOptions, Result, VerdictReason};

/// Rule-based text classifier
///
/// Holds compiled tables only; safe to share between threads.
#[derive(Debug, Clone)]
pub struct TextTypeClassifier {
    tables: PatternTables,
}

impl TextTypeClassifier {
    /// Classifier with the built-in tables
    pub fn new() -> Result<Self> {
        Self::with_options(&ClassifierOptions::default())
    }

    /// Classifier with extra words/patterns and a custom containment factor
    pub fn with_options(options: &ClassifierOptions) -> Result<Self> {
        Ok(Self {
            tables: PatternTables::new(options)?,
        })
    }

    /// Underlying tables
    pub fn tables(&self) -> &PatternTables {
        &self.tables
    }

    /// Classify one snippet
    pub fn classify(&self, text: &str, in_bubble: bool) -> ClassificationVerdict {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return ClassificationVerdict::empty();
        }

        if self.tables.is_meta(text) {
            return ClassificationVerdict::meta();
        }

        let normalized = self.tables.normalize(text);

        if self.is_sfx_normalized(&normalized) {
            return ClassificationVerdict::sfx();
        }

        if in_bubble {
            return ClassificationVerdict::bubble_dialogue();
        }

        if self.tables.has_laugh(&normalized) {
            ClassificationVerdict::floating_dialogue(VerdictReason::FloatingLaugh)
        } else if self.tables.has_dialogue_hint(text) && normalized.chars().count() > 1 {
            ClassificationVerdict::floating_dialogue(VerdictReason::FloatingStructure)
        } else {
            ClassificationVerdict::background_noise()
        }
    }

    /// Whether the text reads as a sound effect
    pub fn is_sfx(&self, text: &str) -> bool {
        if text.trim().is_empty() {
            return false;
        }
        self.is_sfx_normalized(&self.tables.normalize(text))
    }

    /// Whether the text carries particles or a sentence ending
    pub fn is_dialogue_hint(&self, text: &str) -> bool {
        !text.is_empty() && self.tables.has_dialogue_hint(text)
    }

    fn is_sfx_normalized(&self, normalized: &str) -> bool {
        // Non-empty input that normalizes away was punctuation only
        normalized.is_empty()
            || self.tables.is_sfx_word(normalized)
            || self.tables.contains_sfx_word(normalized)
            || self.tables.matches_sfx_pattern(normalized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::TextCategory;

    fn classifier() -> TextTypeClassifier {
        TextTypeClassifier::new().unwrap()
    }

    // TC-CLS-001: 空文字列
    #[test]
    fn test_empty_text() {
        let c = classifier();
        for (text, in_bubble) in [("", true), ("   ", false), ("\n\t", true)] {
            let v = c.classify(text, in_bubble);
            assert_eq!(v.category, TextCategory::Empty);
            assert_eq!(v.confidence, 1.0);
            assert_eq!(v.reason, VerdictReason::EmptyText);
        }
    }

    // TC-CLS-002: 繰り返し効果音は吹き出し内外を問わず SFX
    #[test]
    fn test_doubled_token_is_sfx() {
        let c = classifier();
        for in_bubble in [true, false] {
            let v = c.classify("쿵쿵", in_bubble);
            assert_eq!(v.category, TextCategory::Sfx);
            assert_eq!(v.confidence, 0.95);
            assert!(!v.is_dialogue);
        }
    }

    // TC-CLS-003: 吹き出し内は既定で台詞
    #[test]
    fn test_bubble_default_dialogue() {
        let v = classifier().classify("안녕하세요", true);
        assert_eq!(v.category, TextCategory::Dialogue);
        assert_eq!(v.confidence, 0.8);
        assert_eq!(v.reason, VerdictReason::BubbleDefault);
        assert!(v.is_dialogue);
    }

    // TC-CLS-004: 吹き出し外は語尾/助詞がある場合のみ台詞
    #[test]
    fn test_floating_dialogue_by_structure() {
        let v = classifier().classify("안녕하세요", false);
        assert_eq!(v.category, TextCategory::Dialogue);
        assert_eq!(v.reason, VerdictReason::FloatingStructure);
    }

    #[test]
    fn test_floating_noise_without_structure() {
        let v = classifier().classify("SALE", false);
        assert_eq!(v.category, TextCategory::BackgroundNoise);
        assert_eq!(v.confidence, 0.6);
        assert_eq!(v.reason, VerdictReason::FloatingNoise);

        // Same text inside a bubble is dialogue
        let v = classifier().classify("SALE", true);
        assert_eq!(v.category, TextCategory::Dialogue);
    }

    #[test]
    fn test_floating_single_char_hint_is_noise() {
        // "가" matches the particle class but is a single character
        let v = classifier().classify("가", false);
        assert_eq!(v.category, TextCategory::BackgroundNoise);
    }

    #[test]
    fn test_floating_laugh() {
        let v = classifier().classify("ㅋㅋ진짜", false);
        assert_eq!(v.category, TextCategory::Dialogue);
        assert_eq!(v.reason, VerdictReason::FloatingLaugh);
    }

    #[test]
    fn test_consonant_laugh_alone_is_sfx() {
        let v = classifier().classify("ㅋㅋㅋㅋ", false);
        assert_eq!(v.category, TextCategory::Sfx);
    }

    #[test]
    fn test_meta_beats_sfx() {
        let c = classifier();
        let v = c.classify("제3화 쾅", true);
        assert_eq!(v.category, TextCategory::Meta);
        assert_eq!(v.confidence, 0.9);

        let v = c.classify("글·그림 김작가", false);
        assert_eq!(v.category, TextCategory::Meta);
    }

    #[test]
    fn test_dictionary_sfx_with_punctuation() {
        let c = classifier();
        assert_eq!(c.classify("쾅!!", true).category, TextCategory::Sfx);
        assert_eq!(c.classify(" 와장창... ", true).category, TextCategory::Sfx);
        assert_eq!(c.classify("♪", false).category, TextCategory::Sfx);
    }

    #[test]
    fn test_punctuation_only_is_sfx() {
        let c = classifier();
        assert_eq!(c.classify("?!", true).category, TextCategory::Sfx);
        assert_eq!(c.classify("...", true).category, TextCategory::Sfx);
        assert!(c.is_sfx("!!!"));
    }

    #[test]
    fn test_long_sentence_with_sfx_word_is_dialogue() {
        let v = classifier().classify("문이 덜컹하고 열렸어요", true);
        assert_eq!(v.category, TextCategory::Dialogue);
    }

    #[test]
    fn test_is_sfx_and_hint_helpers() {
        let c = classifier();
        assert!(!c.is_sfx(""));
        assert!(c.is_sfx("쿵쿵"));
        assert!(!c.is_sfx("안녕하세요"));
        assert!(c.is_dialogue_hint("뭐해"));
        assert!(!c.is_dialogue_hint(""));
    }

    #[test]
    fn test_custom_sfx_word() {
        let opts = ClassifierOptions::builder().sfx_word("두근").build();
        let c = TextTypeClassifier::with_options(&opts).unwrap();
        assert_eq!(c.classify("두근", true).category, TextCategory::Sfx);
        assert_eq!(classifier().classify("두근", true).category, TextCategory::Dialogue);
    }

    #[test]
    fn test_classifier_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<TextTypeClassifier>();
    }
}
