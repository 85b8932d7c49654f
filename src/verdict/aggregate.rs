//! Two-pass panel verdict aggregation
//!
//! Primary pass: detected bubbles are cropped, prepared and recognized one
//! by one. Fallback pass: when the primary pass found no dialogue (or no
//! bubble at all), the bubbles are blanked out and the whole panel is
//! scanned for floating text.

use super::collaborators::{BubbleDetector, TextRecognizer};
use super::types::{
    AggregatorOptions, BoundingBox, BubbleRegion, ClassifiedSnippet, PanelVerdict, RecognizedText,
    Result, TextSnippet, VerdictError,
};
use crate::classify::TextTypeClassifier;
use image::{DynamicImage, GrayImage, Luma, Rgb, RgbImage};
use imageproc::contrast::otsu_level;
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;
use std::path::Path;
use tracing::{debug, warn};

const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

/// Combines bubble detection, text recognition and classification into
/// one verdict per panel
#[derive(Debug, Clone)]
pub struct VerdictAggregator {
    classifier: TextTypeClassifier,
    options: AggregatorOptions,
}

impl VerdictAggregator {
    /// Create an aggregator around a classifier
    pub fn new(classifier: TextTypeClassifier, options: AggregatorOptions) -> Self {
        Self { classifier, options }
    }

    /// Get the options
    pub fn options(&self) -> &AggregatorOptions {
        &self.options
    }

    /// Get the classifier
    pub fn classifier(&self) -> &TextTypeClassifier {
        &self.classifier
    }

    /// Load a panel image and analyze it
    pub fn analyze_path<D, R>(&self, path: &Path, detector: &D, recognizer: &R) -> Result<PanelVerdict>
    where
        D: BubbleDetector + ?Sized,
        R: TextRecognizer + ?Sized,
    {
        if !path.exists() {
            return Err(VerdictError::ImageNotFound(path.to_path_buf()));
        }
        let img = image::open(path).map_err(|e| VerdictError::InvalidImage(e.to_string()))?;
        Ok(self.analyze(&img, detector, recognizer))
    }

    /// Analyze one panel image
    ///
    /// Collaborator failures never abort the analysis; they mark the
    /// verdict as degraded, which forces `Process`.
    pub fn analyze<D, R>(&self, image: &DynamicImage, detector: &D, recognizer: &R) -> PanelVerdict
    where
        D: BubbleDetector + ?Sized,
        R: TextRecognizer + ?Sized,
    {
        let rgb = image.to_rgb8();
        let mut degraded = false;

        let bubbles = match detector.detect(&rgb) {
            Ok(found) => self.filter_bubbles(found),
            Err(e) => {
                warn!("Bubble detection failed: {}", e);
                degraded = true;
                Vec::new()
            }
        };

        let mut snippets = Vec::new();
        for bubble in &bubbles {
            let Some(crop) = self.prepare_crop(&rgb, &bubble.bbox) else {
                continue;
            };
            match recognizer.recognize(&crop) {
                Ok(raw) => {
                    let text = clean_text(&raw);
                    if text.is_empty() {
                        continue;
                    }
                    let verdict = self.classifier.classify(&text, true);
                    snippets.push(ClassifiedSnippet {
                        snippet: TextSnippet {
                            text,
                            bbox: bubble.bbox,
                            in_bubble: true,
                            confidence: bubble.confidence,
                        },
                        verdict,
                    });
                }
                Err(e) => {
                    warn!("Bubble text recognition failed: {}", e);
                    degraded = true;
                }
            }
        }

        let floating_scanned = Self::needs_floating_scan(&bubbles, &snippets);
        if floating_scanned {
            let masked = Self::mask_bubbles(&rgb, &bubbles);
            match recognizer.recognize_all(&masked) {
                Ok(entries) => snippets.extend(self.classify_floating(entries)),
                Err(e) => {
                    warn!("Floating text scan failed: {}", e);
                    degraded = true;
                }
            }
        }

        let verdict = PanelVerdict::assemble(&bubbles, snippets, floating_scanned, degraded);
        debug!(
            "Panel verdict: {} (bubbles={}, dialogue={}, sfx={}, floating_scan={})",
            verdict.action,
            verdict.bubble_count,
            verdict.counts.dialogue,
            verdict.counts.sfx,
            verdict.floating_scanned
        );
        verdict
    }

    /// Whether the floating-text fallback must run
    pub fn needs_floating_scan(bubbles: &[BubbleRegion], in_bubble: &[ClassifiedSnippet]) -> bool {
        bubbles.is_empty() || !in_bubble.iter().any(|s| s.verdict.is_dialogue)
    }

    /// Copy of `image` with every bubble region filled white
    pub fn mask_bubbles(image: &RgbImage, bubbles: &[BubbleRegion]) -> RgbImage {
        let mut masked = image.clone();
        for bubble in bubbles {
            if let Some(b) = bubble.bbox.clamp_to(image.width(), image.height()) {
                let rect = Rect::at(b.x as i32, b.y as i32).of_size(b.width, b.height);
                draw_filled_rect_mut(&mut masked, rect, WHITE);
            }
        }
        masked
    }

    /// Crop a bubble, pad it white, convert to grayscale and binarize
    ///
    /// Returns `None` when the box lies outside the image.
    pub fn prepare_crop(&self, image: &RgbImage, bbox: &BoundingBox) -> Option<GrayImage> {
        let b = bbox.clamp_to(image.width(), image.height())?;
        let roi = image::imageops::crop_imm(image, b.x, b.y, b.width, b.height).to_image();
        let gray = image::imageops::grayscale(&roi);

        let pad = self.options.ocr_padding;
        let mut padded = GrayImage::from_pixel(b.width + pad * 2, b.height + pad * 2, Luma([255]));
        image::imageops::replace(&mut padded, &gray, i64::from(pad), i64::from(pad));

        if self.options.binarize {
            let level = otsu_level(&padded);
            for p in padded.pixels_mut() {
                p.0[0] = if p.0[0] > level { 255 } else { 0 };
            }
        }
        Some(padded)
    }

    /// Drop weak detections and order the rest top to bottom
    fn filter_bubbles(&self, found: Vec<BubbleRegion>) -> Vec<BubbleRegion> {
        let threshold = self.options.bubble_confidence_threshold;
        let mut kept: Vec<BubbleRegion> = found
            .into_iter()
            .filter(|b| b.confidence >= threshold && !b.bbox.is_empty())
            .collect();
        kept.sort_by_key(|b| b.bbox.y);
        kept
    }

    fn classify_floating(&self, entries: Vec<RecognizedText>) -> Vec<ClassifiedSnippet> {
        entries
            .into_iter()
            .filter(|e| e.confidence >= self.options.floating_min_confidence)
            .filter_map(|e| {
                let text = clean_text(&e.text);
                if text.is_empty() {
                    return None;
                }
                let verdict = self.classifier.classify(&text, false);
                Some(ClassifiedSnippet {
                    snippet: TextSnippet {
                        text,
                        bbox: e.bbox,
                        in_bubble: false,
                        confidence: (e.confidence / 100.0).clamp(0.0, 1.0),
                    },
                    verdict,
                })
            })
            .collect()
    }
}

/// Trim and flatten line breaks
fn clean_text(raw: &str) -> String {
    raw.trim().replace(['\r', '\n'], " ")
}
