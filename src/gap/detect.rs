//! Gap Detection Implementation
//!
//! Row-statistics based detection of uniform separator bands.

use super::types::{Gap, GapError, GapOptions, GapPolarity, Result, RowStats};
use image::{DynamicImage, GrayImage};
use std::path::Path;
use tracing::debug;

/// Row-scan gap detector
pub struct GapDetector;

impl GapDetector {
    /// Detect gaps in an image file
    pub fn detect_from_path(image_path: &Path, options: &GapOptions) -> Result<Vec<Gap>> {
        if !image_path.exists() {
            return Err(GapError::ImageNotFound(image_path.to_path_buf()));
        }

        let img = image::open(image_path).map_err(|e| GapError::InvalidImage(e.to_string()))?;
        Ok(Self::detect_image(&img, options))
    }

    /// Detect gaps in a decoded image of any color type
    pub fn detect_image(image: &DynamicImage, options: &GapOptions) -> Vec<Gap> {
        Self::detect(&image.to_luma8(), options)
    }

    /// Detect gaps in a grayscale image
    ///
    /// Returns gaps ordered by `start`. An image without blank rows, or with
    /// zero width, yields an empty list.
    pub fn detect(gray: &GrayImage, options: &GapOptions) -> Vec<Gap> {
        let stats = Self::row_statistics(gray);
        let gaps = Self::collect_runs(&stats, options);
        debug!(
            rows = stats.len(),
            gaps = gaps.len(),
            "gap detection complete"
        );
        gaps
    }

    /// Mean and standard deviation of every row
    pub fn row_statistics(gray: &GrayImage) -> Vec<RowStats> {
        let width = gray.width() as usize;
        if width == 0 {
            return Vec::new();
        }

        gray.rows()
            .map(|row| {
                let (sum, sum_sq) = row.fold((0.0f64, 0.0f64), |(s, sq), p| {
                    let v = p.0[0] as f64;
                    (s + v, sq + v * v)
                });
                let mean = sum / width as f64;
                let variance = (sum_sq / width as f64 - mean * mean).max(0.0);
                RowStats {
                    mean,
                    std_dev: variance.sqrt(),
                }
            })
            .collect()
    }

    /// Merge consecutive blank rows into gaps, dropping short runs
    pub fn collect_runs(stats: &[RowStats], options: &GapOptions) -> Vec<Gap> {
        let mut gaps = Vec::new();
        let mut run_start: Option<usize> = None;

        for (y, row) in stats.iter().enumerate() {
            match (options.is_blank(row), run_start) {
                (true, None) => run_start = Some(y),
                (false, Some(start)) => {
                    Self::push_run(&mut gaps, stats, start, y, options);
                    run_start = None;
                }
                _ => {}
            }
        }

        // A run touching the last row is still a gap
        if let Some(start) = run_start {
            Self::push_run(&mut gaps, stats, start, stats.len(), options);
        }

        gaps
    }

    /// Push rows `[start, end)` as a gap if tall enough
    fn push_run(gaps: &mut Vec<Gap>, stats: &[RowStats], start: usize, end: usize, options: &GapOptions) {
        let height = end - start;
        if height < options.min_gap_height as usize {
            return;
        }

        let run_mean = stats[start..end].iter().map(|s| s.mean).sum::<f64>() / height as f64;
        let polarity = if run_mean < options.dark_threshold {
            GapPolarity::Dark
        } else {
            GapPolarity::Light
        };

        gaps.push(Gap::new(start as u32, (end - 1) as u32, polarity));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    /// Build a page from `(rows, fill)` bands; `None` fills with a noisy pattern
    fn banded_page(width: u32, bands: &[(u32, Option<u8>)]) -> GrayImage {
        let height: u32 = bands.iter().map(|(h, _)| h).sum();
        let mut img = GrayImage::new(width, height);
        let mut y0 = 0;
        for &(h, fill) in bands {
            for y in y0..y0 + h {
                for x in 0..width {
                    let v = match fill {
                        Some(v) => v,
                        None => if (x / 4 + y) % 2 == 0 { 20 } else { 230 },
                    };
                    img.put_pixel(x, y, Luma([v]));
                }
            }
            y0 += h;
        }
        img
    }

    // TC-GAP-001: 白い余白の検出
    #[test]
    fn test_detects_light_gap() {
        let page = banded_page(100, &[(50, None), (20, Some(255)), (50, None)]);
        let gaps = GapDetector::detect(&page, &GapOptions::default());

        assert_eq!(gaps.len(), 1);
        assert_eq!(gaps[0].start, 50);
        assert_eq!(gaps[0].end, 69);
        assert_eq!(gaps[0].height, 20);
        assert_eq!(gaps[0].mid, 59);
        assert_eq!(gaps[0].polarity, GapPolarity::Light);
    }

    // TC-GAP-002: 黒い余白の検出
    #[test]
    fn test_detects_dark_gap() {
        let page = banded_page(80, &[(30, None), (15, Some(0)), (30, None)]);
        let gaps = GapDetector::detect(&page, &GapOptions::default());

        assert_eq!(gaps.len(), 1);
        assert_eq!(gaps[0].polarity, GapPolarity::Dark);
    }

    #[test]
    fn test_short_runs_discarded() {
        let page = banded_page(60, &[(30, None), (9, Some(255)), (30, None)]);
        assert!(GapDetector::detect(&page, &GapOptions::default()).is_empty());

        let opts = GapOptions::builder().min_gap_height(5).build();
        assert_eq!(GapDetector::detect(&page, &opts).len(), 1);
    }

    #[test]
    fn test_no_blank_rows() {
        let page = banded_page(64, &[(200, None)]);
        assert!(GapDetector::detect(&page, &GapOptions::default()).is_empty());
    }

    #[test]
    fn test_mid_grey_is_not_a_gap() {
        let page = banded_page(64, &[(20, None), (40, Some(128)), (20, None)]);
        assert!(GapDetector::detect(&page, &GapOptions::default()).is_empty());
    }

    // TC-GAP-003: 端に接する余白も出力
    #[test]
    fn test_runs_touching_edges_are_emitted() {
        let page = banded_page(50, &[(12, Some(255)), (40, None), (11, Some(0))]);
        let gaps = GapDetector::detect(&page, &GapOptions::default());

        assert_eq!(gaps.len(), 2);
        assert_eq!(gaps[0].start, 0);
        assert_eq!(gaps[0].end, 11);
        assert_eq!(gaps[1].start, 52);
        assert_eq!(gaps[1].end, 62);
        assert_eq!(gaps[1].polarity, GapPolarity::Dark);
    }

    #[test]
    fn test_adjacent_dark_and_light_rows_merge() {
        let page = banded_page(40, &[(10, None), (6, Some(0)), (6, Some(255)), (10, None)]);
        let gaps = GapDetector::detect(&page, &GapOptions::default());

        assert_eq!(gaps.len(), 1);
        assert_eq!(gaps[0].height, 12);
        // Run mean is ~127, not below the dark threshold
        assert_eq!(gaps[0].polarity, GapPolarity::Light);
    }

    #[test]
    fn test_gaps_are_ordered() {
        let page = banded_page(
            40,
            &[(10, None), (12, Some(255)), (10, None), (12, Some(0)), (10, None)],
        );
        let gaps = GapDetector::detect(&page, &GapOptions::default());
        assert_eq!(gaps.len(), 2);
        assert!(gaps[0].start < gaps[1].start);
    }

    #[test]
    fn test_row_statistics() {
        let mut img = GrayImage::new(4, 2);
        for x in 0..4 {
            img.put_pixel(x, 0, Luma([100]));
        }
        img.put_pixel(0, 1, Luma([0]));
        img.put_pixel(1, 1, Luma([0]));
        img.put_pixel(2, 1, Luma([200]));
        img.put_pixel(3, 1, Luma([200]));

        let stats = GapDetector::row_statistics(&img);
        assert_eq!(stats.len(), 2);
        assert!((stats[0].mean - 100.0).abs() < 1e-9);
        assert!(stats[0].std_dev.abs() < 1e-9);
        assert!((stats[1].mean - 100.0).abs() < 1e-9);
        assert!((stats[1].std_dev - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_width_image() {
        let img = GrayImage::new(0, 10);
        assert!(GapDetector::detect(&img, &GapOptions::default()).is_empty());
    }

    #[test]
    fn test_color_image_input() {
        let mut rgb = image::RgbImage::from_pixel(30, 60, image::Rgb([255, 255, 255]));
        for y in 0..20 {
            for x in 0..30 {
                let v = if x % 2 == 0 { 0 } else { 255 };
                rgb.put_pixel(x, y, image::Rgb([v, v, v]));
            }
        }
        let gaps = GapDetector::detect_image(&DynamicImage::ImageRgb8(rgb), &GapOptions::default());
        assert_eq!(gaps.len(), 1);
        assert_eq!(gaps[0].start, 20);
        assert_eq!(gaps[0].end, 59);
    }

    #[test]
    fn test_detect_from_missing_path() {
        let result = GapDetector::detect_from_path(Path::new("/nonexistent/page.png"), &GapOptions::default());
        assert!(matches!(result, Err(GapError::ImageNotFound(_))));
    }
}
