//! Page splitting to panel images
//!
//! Runs gap detection and ratio splitting on decoded pages, crops the kept
//! spans and writes them as `{page}_cut_{NN}.png`.

use super::ratio::RatioSplitter;
use super::types::{PageSplit, PanelSpan, Result, SplitError, SplitOptions, SplitResult};
use crate::gap::GapDetector;
use image::{DynamicImage, GenericImageView};
use rayon::prelude::*;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Page splitter
#[derive(Debug, Clone, Default)]
pub struct PageSplitter {
    options: SplitOptions,
}

impl PageSplitter {
    /// Create a splitter with the given options
    pub fn new(options: SplitOptions) -> Self {
        Self { options }
    }

    /// Options in use
    pub fn options(&self) -> &SplitOptions {
        &self.options
    }

    /// Detect gaps and compute panels for a decoded page
    pub fn split_image(&self, image: &DynamicImage) -> PageSplit {
        let (width, height) = image.dimensions();
        let gaps = GapDetector::detect_image(image, &self.options.gap);
        let boundaries = RatioSplitter::split(height, width, &gaps, &self.options);
        let panels = boundaries.panels(self.options.min_panel_height);

        debug!(
            width,
            height,
            gaps = gaps.len(),
            panels = panels.len(),
            "page split"
        );

        PageSplit {
            page_size: (width, height),
            gaps,
            boundaries,
            panels,
        }
    }

    /// Crop every kept panel at full page width
    pub fn crop_panels(image: &DynamicImage, split: &PageSplit) -> Vec<(PanelSpan, DynamicImage)> {
        let width = image.width();
        split
            .panels
            .iter()
            .map(|span| (*span, image.crop_imm(0, span.start_y, width, span.height())))
            .collect()
    }

    /// Output file name for a panel
    pub fn panel_file_name(page_stem: &str, index: usize) -> String {
        format!("{}_cut_{:02}.png", page_stem, index)
    }

    /// Output name prefix per page: the file stem, or `{stem}_{ext}` when
    /// another page in the batch shares the stem
    pub fn page_stems(pages: &[PathBuf]) -> Vec<String> {
        let stem_of = |p: &Path| {
            p.file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "page".to_string())
        };

        let mut counts: HashMap<String, usize> = HashMap::new();
        for page in pages {
            *counts.entry(stem_of(page)).or_default() += 1;
        }

        pages
            .iter()
            .map(|page| {
                let stem = stem_of(page);
                if counts.get(&stem).copied().unwrap_or(0) < 2 {
                    return stem;
                }
                match page.extension() {
                    Some(ext) => format!("{}_{}", stem, ext.to_string_lossy().to_lowercase()),
                    None => stem,
                }
            })
            .collect()
    }

    /// Split a page file and write its panels into `output_dir`
    pub fn split_file(&self, image_path: &Path, output_dir: &Path) -> Result<SplitResult> {
        let page_stem = Self::page_stems(&[image_path.to_path_buf()])
            .pop()
            .unwrap_or_else(|| "page".to_string());
        self.split_file_as(image_path, output_dir, &page_stem)
    }

    /// Split a page file, naming its panels `{page_stem}_cut_{NN}.png`
    pub fn split_file_as(&self, image_path: &Path, output_dir: &Path, page_stem: &str) -> Result<SplitResult> {
        if !image_path.exists() {
            return Err(SplitError::ImageNotFound(image_path.to_path_buf()));
        }

        let img = image::open(image_path).map_err(|e| SplitError::InvalidImage(e.to_string()))?;
        let split = self.split_image(&img);

        std::fs::create_dir_all(output_dir)?;

        let mut outputs = Vec::with_capacity(split.panels.len());
        for (span, panel) in Self::crop_panels(&img, &split) {
            let path = output_dir.join(Self::panel_file_name(page_stem, span.index));
            panel.save(&path).map_err(|e| SplitError::SaveFailed {
                path: path.clone(),
                reason: e.to_string(),
            })?;

            if span.height() > split.boundaries.max_panel_height {
                warn!(
                    panel = %path.display(),
                    height = span.height(),
                    budget = split.boundaries.max_panel_height,
                    "panel exceeds height budget"
                );
            }
            outputs.push(path);
        }

        Ok(SplitResult {
            source: image_path.to_path_buf(),
            page_size: split.page_size,
            max_panel_height: split.boundaries.max_panel_height,
            oversized: split.oversized(),
            boundaries: split.boundaries.rows,
            outputs,
        })
    }

    /// Split many pages in parallel; results keep input order
    pub fn split_files(&self, pages: &[PathBuf], output_dir: &Path) -> Vec<Result<SplitResult>> {
        self.split_files_with(pages, output_dir, |_, _| {})
    }

    /// Like [`split_files`](Self::split_files), calling `on_page` as each page finishes
    pub fn split_files_with<F>(&self, pages: &[PathBuf], output_dir: &Path, on_page: F) -> Vec<Result<SplitResult>>
    where
        F: Fn(&Path, &Result<SplitResult>) + Sync,
    {
        let stems = Self::page_stems(pages);
        pages
            .par_iter()
            .zip(stems.par_iter())
            .map(|(page, stem)| {
                let result = self.split_file_as(page, output_dir, stem);
                on_page(page, &result);
                result
            })
            .collect()
    }
}
