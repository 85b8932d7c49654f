//! Built-in lookup tables for text classification
//!
//! Sound-effect dictionary and patterns, meta-information patterns and
//! Korean dialogue hints (particles and sentence endings). Tables are
//! compiled once and never mutated.

use super::types::{ClassifierError, ClassifierOptions, Result};
use regex::{Regex, RegexBuilder};
use std::collections::HashSet;

// ============================================================
// Built-in Tables
// ============================================================

/// Curated onomatopoeia and exclamations
const SFX_WORDS: &[&str] = &[
    // impact / explosion
    "쾅", "콰광", "펑", "빵", "뻥", "꽝", "탕", "팡", "퍽", "툭", "턱",
    "쿵", "꿍", "둥", "탁", "딱", "착", "짝", "뚝", "똑", "톡",
    "와장창", "우당탕", "우르르", "와르르", "쨍그랑", "찌그덕",
    // movement / speed
    "뚜벅", "뚜벅뚜벅", "타박타박", "터덜터덜",
    "덜컹", "덜컹덜컹", "끼익", "삐걱", "스르륵", "슥",
    "획", "휙", "쓱", "훅", "푹", "팍", "쑥", "쌩", "슉",
    "철컥", "찰칵", "딸깍", "달그락", "덜그럭",
    "다그닥", "다그닥다그닥", "따그닥",
    "질끈", "움찔", "멈칫", "꾸욱", "꾹",
    // nature / animals
    "휘잉", "휭", "쏴", "주르륵", "콸콸", "멍멍", "야옹",
    // machines / misc
    "부릉", "빵빵", "지지직", "치지직", "반짝", "번쩍",
    "악", "앗", "헉", "헐", "쳇", "흥", "칫", "크윽", "으윽",
    "짜잔", "두둥", "빠밤", "?", "!", "?!", "...", "♪", "♬", "♩",
];

/// SFX patterns matched against normalized text
const SFX_PATTERNS: &[&str] = &[
    // consonant-only (ㅋㅋㅋ, ㅎㅎ)
    r"^[ㄱ-ㅎ]+$",
    // punctuation only
    r"^[!?~.]+$",
    // musical notes
    r"[♪♬♩]",
];

/// Meta-information patterns matched against the original text
const META_PATTERNS: &[&str] = &[
    r"(스토리|작화|글|그림)[\s·:]+",
    r"제\d+화",
    r"Episode",
    r"\d+화",
    r"배달|주문|배송",
    r"\d+원",
];

/// Particles and sentence endings, matched against the original text
const DIALOGUE_HINTS: &[&str] = &[
    r"[은는이가을를에의로서와과랑하고]",
    r"(다|요|까|죠|네|게|지|야|해|봐|서|면|고|니|나|군|걸)[\s!?~.]*$",
];

/// Laugh tokens that mark floating text as dialogue
const LAUGH_TOKENS: &[&str] = &["ㅋㅋ", "ㅎㅎ"];

/// Characters removed by normalization
const NORMALIZE_STRIP: &str = r"[!?~.\s]";

/// Longest repeated unit treated as SFX (쿵쿵 = 1, 다그닥다그닥 style pairs = 2)
const MAX_REPEAT_UNIT: usize = 2;

// ============================================================
// Pattern Tables
// ============================================================

/// Compiled, immutable classification tables
#[derive(Debug, Clone)]
pub struct PatternTables {
    sfx_words: HashSet<String>,
    /// Multi-character words eligible for the containment check
    containable_words: Vec<String>,
    containment_factor: usize,
    sfx_patterns: Vec<Regex>,
    meta_patterns: Vec<Regex>,
    dialogue_hints: Vec<Regex>,
    strip: Regex,
}

impl PatternTables {
    /// Compile the built-in tables plus any extras from `options`
    pub fn new(options: &ClassifierOptions) -> Result<Self> {
        let sfx_words: HashSet<String> = SFX_WORDS
            .iter()
            .map(|w| w.to_string())
            .chain(options.extra_sfx_words.iter().map(|w| w.trim().to_string()))
            .filter(|w| !w.is_empty())
            .collect();

        let mut containable_words: Vec<String> = sfx_words
            .iter()
            .filter(|w| w.chars().count() > 1)
            .cloned()
            .collect();
        containable_words.sort();

        let meta_patterns = META_PATTERNS
            .iter()
            .copied()
            .chain(options.extra_meta_patterns.iter().map(String::as_str))
            .map(|p| compile(p, true))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            sfx_words,
            containable_words,
            containment_factor: options.containment_factor.max(1),
            sfx_patterns: compile_all(SFX_PATTERNS)?,
            meta_patterns,
            dialogue_hints: compile_all(DIALOGUE_HINTS)?,
            strip: compile(NORMALIZE_STRIP, false)?,
        })
    }

    /// Trim, then drop sentence punctuation and all whitespace
    pub fn normalize(&self, text: &str) -> String {
        self.strip.replace_all(text.trim(), "").into_owned()
    }

    /// Exact dictionary hit
    pub fn is_sfx_word(&self, normalized: &str) -> bool {
        self.sfx_words.contains(normalized)
    }

    /// A multi-character dictionary word inside a short enough text
    pub fn contains_sfx_word(&self, normalized: &str) -> bool {
        let len = normalized.chars().count();
        self.containable_words.iter().any(|word| {
            len < word.chars().count() * self.containment_factor && normalized.contains(word.as_str())
        })
    }

    /// Any SFX pattern, including unit repetition
    pub fn matches_sfx_pattern(&self, normalized: &str) -> bool {
        is_repetition(normalized, MAX_REPEAT_UNIT)
            || self.sfx_patterns.iter().any(|re| re.is_match(normalized))
    }

    /// Meta-information pattern on the original text
    pub fn is_meta(&self, text: &str) -> bool {
        self.meta_patterns.iter().any(|re| re.is_match(text))
    }

    /// Particle or sentence-ending hint on the original text
    pub fn has_dialogue_hint(&self, text: &str) -> bool {
        self.dialogue_hints.iter().any(|re| re.is_match(text))
    }

    /// Laugh token in normalized text
    pub fn has_laugh(&self, normalized: &str) -> bool {
        LAUGH_TOKENS.iter().any(|t| normalized.contains(t))
    }

    /// Number of dictionary words
    pub fn sfx_word_count(&self) -> usize {
        self.sfx_words.len()
    }
}

/// Whether `text` is a unit of 1..=`max_unit` characters repeated at least twice
pub fn is_repetition(text: &str, max_unit: usize) -> bool {
    let chars: Vec<char> = text.chars().collect();
    (1..=max_unit).any(|unit| {
        chars.len() >= unit * 2
            && chars.len() % unit == 0
            && chars.iter().enumerate().all(|(i, c)| *c == chars[i % unit])
    })
}

fn compile(pattern: &str, case_insensitive: bool) -> Result<Regex> {
    RegexBuilder::new(pattern)
        .case_insensitive(case_insensitive)
        .build()
        .map_err(|source| ClassifierError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })
}

fn compile_all(patterns: &[&str]) -> Result<Vec<Regex>> {
    patterns.iter().map(|p| compile(p, false)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tables() -> PatternTables {
        PatternTables::new(&ClassifierOptions::default()).unwrap()
    }

    #[test]
    fn test_normalize() {
        let t = tables();
        assert_eq!(t.normalize("  쿵쿵!!  "), "쿵쿵");
        assert_eq!(t.normalize("뭐 라고?~"), "뭐라고");
        assert_eq!(t.normalize("..."), "");
    }

    #[test]
    fn test_repetition() {
        assert!(is_repetition("쿵쿵", 2));
        assert!(is_repetition("쾅쾅쾅", 2));
        assert!(is_repetition("두둥두둥", 2));
        assert!(is_repetition("abab", 2));
        assert!(!is_repetition("ab", 2));
        assert!(!is_repetition("쿵", 2));
        assert!(!is_repetition("두둥두", 2));
        assert!(!is_repetition("", 2));
        // Three-character units are out of range
        assert!(!is_repetition("다그닥다그닥", 2));
        assert!(is_repetition("다그닥다그닥", 3));
    }

    #[test]
    fn test_dictionary() {
        let t = tables();
        assert!(t.is_sfx_word("쾅"));
        assert!(t.is_sfx_word("와장창"));
        assert!(!t.is_sfx_word("안녕"));
        assert!(t.sfx_word_count() > 90);
    }

    #[test]
    fn test_containment_guard() {
        let t = tables();
        // "덜컹" (2 chars) inside a 4-char text: 4 < 6
        assert!(t.contains_sfx_word("덜컹거려"));
        // Same word inside a long sentence is not SFX
        assert!(!t.contains_sfx_word("문이덜컹하고열렸어요"));
        // Single-character words never count for containment
        assert!(!t.contains_sfx_word("쿵이야"));
    }

    #[test]
    fn test_containment_factor_is_tunable() {
        let opts = ClassifierOptions::builder().containment_factor(6).build();
        let t = PatternTables::new(&opts).unwrap();
        assert!(t.contains_sfx_word("문이덜컹하고열렸어요"));
    }

    #[test]
    fn test_sfx_patterns() {
        let t = tables();
        assert!(t.matches_sfx_pattern("ㅋㅋㅋ"));
        assert!(t.matches_sfx_pattern("♪라라"));
        assert!(t.matches_sfx_pattern("쿵쿵"));
        assert!(!t.matches_sfx_pattern("안녕하세요"));
    }

    #[test]
    fn test_meta_patterns() {
        let t = tables();
        assert!(t.is_meta("스토리: 홍길동"));
        assert!(t.is_meta("제12화"));
        assert!(t.is_meta("episode 3"));
        assert!(t.is_meta("3000원"));
        assert!(t.is_meta("배달 왔습니다"));
        assert!(!t.is_meta("안녕하세요"));
    }

    #[test]
    fn test_dialogue_hints() {
        let t = tables();
        assert!(t.has_dialogue_hint("안녕하세요"));
        assert!(t.has_dialogue_hint("그만둬라다!!"));
        assert!(!t.has_dialogue_hint("SALE"));
    }

    #[test]
    fn test_laugh() {
        let t = tables();
        assert!(t.has_laugh("ㅋㅋ진짜"));
        assert!(t.has_laugh("아ㅎㅎ"));
        assert!(!t.has_laugh("ㅋ"));
    }

    #[test]
    fn test_extra_words_and_patterns() {
        let opts = ClassifierOptions::builder()
            .sfx_word("두근")
            .meta_pattern(r"\d+쪽")
            .build();
        let t = PatternTables::new(&opts).unwrap();
        assert!(t.is_sfx_word("두근"));
        assert!(t.is_meta("12쪽"));
    }

    #[test]
    fn test_invalid_extra_pattern() {
        let opts = ClassifierOptions::builder().meta_pattern("(unclosed").build();
        let err = PatternTables::new(&opts).unwrap_err();
        assert!(matches!(err, ClassifierError::InvalidPattern { ref pattern, .. } if pattern == "(unclosed"));
    }
}
