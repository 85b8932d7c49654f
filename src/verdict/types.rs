//! Verdict module core types
//!
//! Contains collaborator records, panel verdicts, options and error types.

use crate::classify::{ClassificationVerdict, TextCategory};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

// ============================================================
// Constants
// ============================================================

/// Bubble detections below this confidence are ignored
pub const DEFAULT_BUBBLE_CONFIDENCE_THRESHOLD: f32 = 0.15;

/// White border added around a bubble crop before binarization
pub const DEFAULT_OCR_PADDING: u32 = 10;

/// Full-page recognizer entries below this confidence (0-100) are ignored
pub const DEFAULT_FLOATING_MIN_CONFIDENCE: f32 = 40.0;

/// Maximum OCR padding
const MAX_OCR_PADDING: u32 = 200;

// ============================================================
// Error Types
// ============================================================

/// Failure reported by an external detector or recognizer
#[derive(Debug, Error)]
pub enum CollaboratorError {
    #[error("Bubble detection failed: {0}")]
    DetectorFailed(String),

    #[error("Text recognition failed: {0}")]
    RecognizerFailed(String),

    #[error("Collaborator unavailable: {0}")]
    Unavailable(String),
}

/// Panel verdict error types
#[derive(Debug, Error)]
pub enum VerdictError {
    #[error("Image not found: {0}")]
    ImageNotFound(PathBuf),

    #[error("Invalid image: {0}")]
    InvalidImage(String),
}

pub type Result<T> = std::result::Result<T, VerdictError>;

// ============================================================
// Collaborator Records
// ============================================================

/// Axis-aligned box in pixel coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// X coordinate (left)
    pub x: u32,
    /// Y coordinate (top)
    pub y: u32,
    /// Width
    pub width: u32,
    /// Height
    pub height: u32,
}

impl BoundingBox {
    /// Create a new bounding box
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// Create from corner coordinates `(x1, y1)`-`(x2, y2)`, exclusive end
    pub fn from_corners(x1: u32, y1: u32, x2: u32, y2: u32) -> Self {
        Self {
            x: x1.min(x2),
            y: y1.min(y2),
            width: x1.abs_diff(x2),
            height: y1.abs_diff(y2),
        }
    }

    /// Get the right edge
    pub fn right(&self) -> u32 {
        self.x.saturating_add(self.width)
    }

    /// Get the bottom edge
    pub fn bottom(&self) -> u32 {
        self.y.saturating_add(self.height)
    }

    /// Whether the box covers no pixels
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Intersect with an image of the given size; `None` when nothing remains
    pub fn clamp_to(&self, width: u32, height: u32) -> Option<BoundingBox> {
        let x = self.x.min(width);
        let y = self.y.min(height);
        let clamped = BoundingBox {
            x,
            y,
            width: self.right().min(width) - x,
            height: self.bottom().min(height) - y,
        };
        (!clamped.is_empty()).then_some(clamped)
    }
}

/// One detected speech bubble
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BubbleRegion {
    /// Bubble location
    pub bbox: BoundingBox,
    /// Detector confidence (0-1)
    pub confidence: f32,
}

/// One entry of a full-page text scan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecognizedText {
    /// Recognized string
    pub text: String,
    /// Location on the scanned image
    pub bbox: BoundingBox,
    /// Recognizer confidence (0-100)
    pub confidence: f32,
}

/// Recognized text with its location context
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextSnippet {
    /// Recognized string
    pub text: String,
    /// Bubble box, or the scan entry box for floating text
    pub bbox: BoundingBox,
    /// Found inside a detected bubble
    pub in_bubble: bool,
    /// Source confidence normalized to 0-1
    pub confidence: f32,
}

/// A snippet together with its classifier verdict
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassifiedSnippet {
    #[serde(flatten)]
    pub snippet: TextSnippet,
    pub verdict: ClassificationVerdict,
}

// ============================================================
// Panel Verdict
// ============================================================

/// Panel-level action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PanelAction {
    /// Send to the paid edit service
    Process,
    /// Only sound effects; keep the original panel
    SkipSfxOnly,
    /// No bubble and no text; keep the original panel
    SkipNoBubble,
}

impl PanelAction {
    /// Decide the action from tallies and bubble presence
    pub fn decide(counts: &TextCounts, has_bubble: bool) -> Self {
        if counts.dialogue > 0 {
            PanelAction::Process
        } else if counts.sfx > 0 {
            PanelAction::SkipSfxOnly
        } else if has_bubble {
            // Bubble without readable text: trust the detector
            PanelAction::Process
        } else {
            PanelAction::SkipNoBubble
        }
    }

    /// Snake-case name
    pub fn as_str(&self) -> &'static str {
        match self {
            PanelAction::Process => "process",
            PanelAction::SkipSfxOnly => "skip_sfx_only",
            PanelAction::SkipNoBubble => "skip_no_bubble",
        }
    }

    /// Whether the panel is copied untouched
    pub fn is_skip(&self) -> bool {
        !matches!(self, PanelAction::Process)
    }
}

impl std::fmt::Display for PanelAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where the panel's evidence came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionMethod {
    /// Nothing found
    #[default]
    None,
    /// Bubble detector
    Detector,
    /// Full-page floating text scan only
    FloatingScan,
}

/// Per-category tallies
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TextCounts {
    pub dialogue: usize,
    pub sfx: usize,
    pub meta: usize,
    pub total: usize,
}

impl TextCounts {
    /// Tally verdicts
    pub fn tally<'a>(verdicts: impl IntoIterator<Item = &'a ClassificationVerdict>) -> Self {
        verdicts.into_iter().fold(Self::default(), |mut counts, v| {
            counts.total += 1;
            if v.is_dialogue {
                counts.dialogue += 1;
            }
            match v.category {
                TextCategory::Sfx => counts.sfx += 1,
                TextCategory::Meta => counts.meta += 1,
                _ => {}
            }
            counts
        })
    }
}

/// Verdict for one panel
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PanelVerdict {
    /// Decided action
    pub action: PanelAction,
    /// At least one bubble detected
    pub has_bubble: bool,
    /// At least one dialogue snippet
    pub has_dialogue: bool,
    /// Number of bubbles kept after filtering
    pub bubble_count: usize,
    /// Highest bubble confidence (0 when none)
    pub bubble_confidence: f32,
    /// Evidence source
    pub detection_method: DetectionMethod,
    /// Tallies over both passes
    pub counts: TextCounts,
    /// Whether the floating scan ran
    pub floating_scanned: bool,
    /// A collaborator call failed; action forced to `Process`
    pub degraded: bool,
    /// Classified snippets from both passes
    pub snippets: Vec<ClassifiedSnippet>,
}

impl PanelVerdict {
    /// Assemble a verdict from bubbles and the classified snippets of both passes
    pub fn assemble(
        bubbles: &[BubbleRegion],
        snippets: Vec<ClassifiedSnippet>,
        floating_scanned: bool,
        degraded: bool,
    ) -> Self {
        let counts = TextCounts::tally(snippets.iter().map(|s| &s.verdict));
        let has_bubble = !bubbles.is_empty();

        let mut action = PanelAction::decide(&counts, has_bubble);
        if degraded {
            action = PanelAction::Process;
        }

        let detection_method = if has_bubble {
            DetectionMethod::Detector
        } else if snippets.iter().any(|s| !s.snippet.in_bubble) {
            DetectionMethod::FloatingScan
        } else {
            DetectionMethod::None
        };

        Self {
            action,
            has_bubble,
            has_dialogue: counts.dialogue > 0,
            bubble_count: bubbles.len(),
            bubble_confidence: bubbles.iter().map(|b| b.confidence).fold(0.0, f32::max),
            detection_method,
            counts,
            floating_scanned,
            degraded,
            snippets,
        }
    }
}

// ============================================================
// Options
// ============================================================

/// Panel verdict aggregation options
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatorOptions {
    /// Minimum bubble detector confidence (0-1)
    pub bubble_confidence_threshold: f32,
    /// White padding around bubble crops, in pixels
    pub ocr_padding: u32,
    /// Minimum full-page scan confidence (0-100)
    pub floating_min_confidence: f32,
    /// Otsu-binarize bubble crops before recognition
    pub binarize: bool,
}

impl Default for AggregatorOptions {
    fn default() -> Self {
        Self {
            bubble_confidence_threshold: DEFAULT_BUBBLE_CONFIDENCE_THRESHOLD,
            ocr_padding: DEFAULT_OCR_PADDING,
            floating_min_confidence: DEFAULT_FLOATING_MIN_CONFIDENCE,
            binarize: true,
        }
    }
}

impl AggregatorOptions {
    /// Create a new options builder
    pub fn builder() -> AggregatorOptionsBuilder {
        AggregatorOptionsBuilder::default()
    }
}

/// Builder for AggregatorOptions
#[derive(Debug, Default)]
pub struct AggregatorOptionsBuilder {
    options: AggregatorOptions,
}

impl AggregatorOptionsBuilder {
    /// Set bubble confidence threshold (clamped to 0-1)
    #[must_use]
    pub fn bubble_confidence_threshold(mut self, threshold: f32) -> Self {
        self.options.bubble_confidence_threshold = threshold.clamp(0.0, 1.0);
        self
    }

    /// Set OCR padding (clamped to 0-200)
    #[must_use]
    pub fn ocr_padding(mut self, padding: u32) -> Self {
        self.options.ocr_padding = padding.min(MAX_OCR_PADDING);
        self
    }

    /// Set floating scan confidence floor (clamped to 0-100)
    #[must_use]
    pub fn floating_min_confidence(mut self, confidence: f32) -> Self {
        self.options.floating_min_confidence = confidence.clamp(0.0, 100.0);
        self
    }

    /// Enable or disable binarization
    #[must_use]
    pub fn binarize(mut self, binarize: bool) -> Self {
        self.options.binarize = binarize;
        self
    }

    /// Build the options
    #[must_use]
    pub fn build(self) -> AggregatorOptions {
        self.options
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::VerdictReason;

    fn snippet(in_bubble: bool, verdict: ClassificationVerdict) -> ClassifiedSnippet {
        ClassifiedSnippet {
            snippet: TextSnippet {
                text: "t".to_string(),
                bbox: BoundingBox::default(),
                in_bubble,
                confidence: 1.0,
            },
            verdict,
        }
    }

    fn bubble(confidence: f32) -> BubbleRegion {
        BubbleRegion {
            bbox: BoundingBox::new(10, 10, 50, 30),
            confidence,
        }
    }

    #[test]
    fn test_bounding_box_from_corners() {
        let b = BoundingBox::from_corners(40, 50, 10, 20);
        assert_eq!(b, BoundingBox::new(10, 20, 30, 30));
        assert_eq!(b.right(), 40);
        assert_eq!(b.bottom(), 50);
    }

    #[test]
    fn test_bounding_box_clamp() {
        let b = BoundingBox::new(80, 90, 50, 50);
        assert_eq!(b.clamp_to(100, 100), Some(BoundingBox::new(80, 90, 20, 10)));
        assert_eq!(BoundingBox::new(120, 0, 10, 10).clamp_to(100, 100), None);
        assert_eq!(BoundingBox::new(0, 0, 0, 10).clamp_to(100, 100), None);
    }

    #[test]
    fn test_action_decision_table() {
        let dialogue = TextCounts { dialogue: 1, sfx: 2, meta: 0, total: 3 };
        let sfx = TextCounts { dialogue: 0, sfx: 1, meta: 0, total: 1 };
        let nothing = TextCounts::default();

        assert_eq!(PanelAction::decide(&dialogue, false), PanelAction::Process);
        assert_eq!(PanelAction::decide(&sfx, true), PanelAction::SkipSfxOnly);
        assert_eq!(PanelAction::decide(&nothing, true), PanelAction::Process);
        assert_eq!(PanelAction::decide(&nothing, false), PanelAction::SkipNoBubble);
    }

    #[test]
    fn test_tally() {
        let verdicts = [
            ClassificationVerdict::bubble_dialogue(),
            ClassificationVerdict::floating_dialogue(VerdictReason::FloatingLaugh),
            ClassificationVerdict::sfx(),
            ClassificationVerdict::meta(),
            ClassificationVerdict::background_noise(),
        ];
        let counts = TextCounts::tally(verdicts.iter());
        assert_eq!(counts, TextCounts { dialogue: 2, sfx: 1, meta: 1, total: 5 });
    }

    #[test]
    fn test_assemble_bubble_with_dialogue() {
        let v = PanelVerdict::assemble(
            &[bubble(0.7)],
            vec![snippet(true, ClassificationVerdict::bubble_dialogue())],
            false,
            false,
        );
        assert_eq!(v.action, PanelAction::Process);
        assert!(v.has_bubble);
        assert!(v.has_dialogue);
        assert_eq!(v.bubble_count, 1);
        assert_eq!(v.bubble_confidence, 0.7);
        assert_eq!(v.detection_method, DetectionMethod::Detector);
    }

    #[test]
    fn test_assemble_floating_sfx() {
        let v = PanelVerdict::assemble(&[], vec![snippet(false, ClassificationVerdict::sfx())], true, false);
        assert_eq!(v.action, PanelAction::SkipSfxOnly);
        assert_eq!(v.detection_method, DetectionMethod::FloatingScan);
        assert_eq!(v.bubble_confidence, 0.0);
    }

    #[test]
    fn test_assemble_empty_bubble_is_processed() {
        let v = PanelVerdict::assemble(&[bubble(0.3)], Vec::new(), true, false);
        assert_eq!(v.action, PanelAction::Process);
        assert_eq!(v.counts.total, 0);
    }

    #[test]
    fn test_assemble_nothing() {
        let v = PanelVerdict::assemble(&[], Vec::new(), true, false);
        assert_eq!(v.action, PanelAction::SkipNoBubble);
        assert_eq!(v.detection_method, DetectionMethod::None);
    }

    #[test]
    fn test_degraded_forces_process() {
        let v = PanelVerdict::assemble(&[], vec![snippet(false, ClassificationVerdict::sfx())], true, true);
        assert_eq!(v.action, PanelAction::Process);
        assert!(v.degraded);
    }

    #[test]
    fn test_action_serialization() {
        assert_eq!(serde_json::to_string(&PanelAction::SkipSfxOnly).unwrap(), "\"skip_sfx_only\"");
        assert_eq!(PanelAction::SkipNoBubble.to_string(), "skip_no_bubble");
        assert!(PanelAction::SkipNoBubble.is_skip());
        assert!(!PanelAction::Process.is_skip());
    }

    #[test]
    fn test_options_builder_clamping() {
        let opts = AggregatorOptions::builder()
            .bubble_confidence_threshold(2.0)
            .ocr_padding(1000)
            .floating_min_confidence(-1.0)
            .binarize(false)
            .build();
        assert_eq!(opts.bubble_confidence_threshold, 1.0);
        assert_eq!(opts.ocr_padding, 200);
        assert_eq!(opts.floating_min_confidence, 0.0);
        assert!(!opts.binarize);
    }

    #[test]
    fn test_error_types() {
        let _e1 = CollaboratorError::DetectorFailed("model missing".to_string());
        let _e2 = CollaboratorError::RecognizerFailed("tesseract".to_string());
        let _e3 = CollaboratorError::Unavailable("offline".to_string());
        let _e4 = VerdictError::ImageNotFound(PathBuf::from("/x.png"));
        let _e5 = VerdictError::InvalidImage("bad".to_string());
    }
}
