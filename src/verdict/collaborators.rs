//! External collaborator seams
//!
//! The bubble detector and the text recognizer are model-backed services
//! outside this crate. Implementations are supplied by the caller.

use super::types::{BubbleRegion, CollaboratorError, RecognizedText};
use image::{GrayImage, RgbImage};

/// Speech bubble detector
pub trait BubbleDetector: Send + Sync {
    /// Detect bubbles on a panel image
    ///
    /// Confidence filtering and ordering are applied by the aggregator.
    fn detect(&self, image: &RgbImage) -> Result<Vec<BubbleRegion>, CollaboratorError>;
}

/// Text recognizer
pub trait TextRecognizer: Send + Sync {
    /// Recognize the text of one prepared bubble crop
    fn recognize(&self, image: &GrayImage) -> Result<String, CollaboratorError>;

    /// Scan a whole (bubble-masked) panel, one entry per text line
    fn recognize_all(&self, image: &RgbImage) -> Result<Vec<RecognizedText>, CollaboratorError>;
}

impl<T: BubbleDetector + ?Sized> BubbleDetector for &T {
    fn detect(&self, image: &RgbImage) -> Result<Vec<BubbleRegion>, CollaboratorError> {
        (**self).detect(image)
    }
}

impl<T: BubbleDetector + ?Sized> BubbleDetector for Box<T> {
    fn detect(&self, image: &RgbImage) -> Result<Vec<BubbleRegion>, CollaboratorError> {
        (**self).detect(image)
    }
}

impl<T: TextRecognizer + ?Sized> TextRecognizer for &T {
    fn recognize(&self, image: &GrayImage) -> Result<String, CollaboratorError> {
        (**self).recognize(image)
    }

    fn recognize_all(&self, image: &RgbImage) -> Result<Vec<RecognizedText>, CollaboratorError> {
        (**self).recognize_all(image)
    }
}

impl<T: TextRecognizer + ?Sized> TextRecognizer for Box<T> {
    fn recognize(&self, image: &GrayImage) -> Result<String, CollaboratorError> {
        (**self).recognize(image)
    }

    fn recognize_all(&self, image: &RgbImage) -> Result<Vec<RecognizedText>, CollaboratorError> {
        (**self).recognize_all(image)
    }
}

/// Detector that never finds a bubble
///
/// Used when no detection model is configured; every panel then goes
/// through the floating scan.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoBubbles;

impl BubbleDetector for NoBubbles {
    fn detect(&self, _image: &RgbImage) -> Result<Vec<BubbleRegion>, CollaboratorError> {
        Ok(Vec::new())
    }
}
