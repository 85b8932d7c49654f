//! Page splitting integration tests
//!
//! Synthetic pages are written to disk, split, and the panel files checked.

use image::{DynamicImage, GenericImageView, GrayImage, Luma};
use std::path::Path;
use webtoon_cut::{Config, GapDetector, GapOptions, PageSplitter, RatioSplitter, SplitError, SplitOptions};

/// White page with textured content at the given row ranges
fn page(width: u32, height: u32, blocks: &[(u32, u32)]) -> DynamicImage {
    let mut img = GrayImage::from_pixel(width, height, Luma([255]));
    for &(y0, y1) in blocks {
        for y in y0..y1 {
            for x in 0..width {
                let v = if (x * 7 + y) % 4 == 0 { 20 } else { 160 };
                img.put_pixel(x, y, Luma([v]));
            }
        }
    }
    DynamicImage::ImageLuma8(img)
}

fn save(img: &DynamicImage, dir: &Path, name: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    img.save(&path).unwrap();
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    // TC-SPI-001: 余白で区切られた 3 コマ
    #[test]
    fn test_three_panels_split_at_gutters() {
        let dir = tempdir().unwrap();
        let input = save(
            &page(100, 560, &[(0, 150), (210, 350), (410, 560)]),
            dir.path(),
            "ep01_001.png",
        );

        let splitter = PageSplitter::new(SplitOptions::builder().aspect_ratio(2.0).build());
        let result = splitter.split_file(&input, &dir.path().join("out")).unwrap();

        assert_eq!(result.boundaries, vec![0, 179, 379, 560]);
        assert_eq!(result.outputs.len(), 3);
        assert_eq!(result.oversized, 0);

        let heights: Vec<u32> = result
            .outputs
            .iter()
            .map(|p| image::open(p).unwrap().dimensions().1)
            .collect();
        assert_eq!(heights, vec![179, 200, 181]);
        assert!(result.outputs[2].ends_with("ep01_001_cut_03.png"));
    }

    // TC-SPI-002: 余白のないページは均等分割
    #[test]
    fn test_gapless_page_is_tiled() {
        let dir = tempdir().unwrap();
        let input = save(&page(100, 1000, &[(0, 1000)]), dir.path(), "solid.png");

        let result = PageSplitter::default()
            .split_file(&input, &dir.path().join("out"))
            .unwrap();

        assert_eq!(result.max_panel_height, 177);
        assert_eq!(result.boundaries, vec![0, 177, 354, 531, 708, 885, 1000]);
        assert_eq!(result.outputs.len(), 6);
        assert_eq!(result.oversized, 0);
    }

    // TC-SPI-003: 境界の不変条件
    #[test]
    fn test_boundaries_are_strictly_increasing() {
        let img = page(
            120,
            2400,
            &[(60, 300), (330, 900), (960, 1000), (1100, 2300)],
        );
        let options = SplitOptions::default();
        let gaps = GapDetector::detect_image(&img, &options.gap);
        let boundaries = RatioSplitter::split(2400, 120, &gaps, &options);

        assert!(boundaries.is_valid());
        assert!(boundaries.rows.windows(2).all(|w| w[0] < w[1]));
        assert!(*boundaries.rows.last().unwrap() <= 2400);
    }

    #[test]
    fn test_batch_split_keeps_order() {
        let dir = tempdir().unwrap();
        let a = save(&page(100, 300, &[(0, 120), (180, 300)]), dir.path(), "a.png");
        let b = save(&page(100, 150, &[(0, 150)]), dir.path(), "b.png");
        let broken = dir.path().join("broken.png");
        std::fs::write(&broken, b"garbage").unwrap();

        let out = dir.path().join("out");
        let results = PageSplitter::default().split_files(&[a, b, broken], &out);

        assert_eq!(results[0].as_ref().unwrap().outputs.len(), 2);
        assert_eq!(results[1].as_ref().unwrap().outputs.len(), 1);
        assert!(matches!(results[2], Err(SplitError::InvalidImage(_))));
        assert!(out.join("a_cut_02.png").exists());
        assert!(out.join("b_cut_01.png").exists());
    }

    #[test]
    fn test_config_drives_splitter() {
        let config = Config::from_toml_str("[split]\naspect_ratio = 2.0\nmin_gap_height = 5").unwrap();
        let options = config.split_options();
        assert_eq!(options.gap, GapOptions::builder().min_gap_height(5).build());

        let split = PageSplitter::new(options).split_image(&page(100, 560, &[(0, 150), (210, 350), (410, 560)]));
        assert_eq!(split.boundaries.rows, vec![0, 179, 379, 560]);
    }

    #[test]
    fn test_dark_gutters_detected() {
        let mut img = GrayImage::from_pixel(80, 400, Luma([0]));
        for y in (0..150).chain(250..400) {
            for x in 0..80 {
                img.put_pixel(x, y, Luma([if (x + y) % 2 == 0 { 30 } else { 220 }]));
            }
        }
        let gaps = GapDetector::detect(&img, &GapOptions::default());
        assert_eq!(gaps.len(), 1);
        assert_eq!((gaps[0].start, gaps[0].end), (150, 249));
    }
}
