//! Batch cut analysis
//!
//! Runs the panel verdict aggregator over a set of panel images and
//! summarizes how many of them actually need the paid edit.
//!
//! Panels are independent, so they are analyzed in parallel. A panel that
//! cannot be read is reported as `process`: a wasted edit call is cheaper
//! than a panel silently left with its bubbles.

use crate::verdict::{
    BubbleDetector, PanelAction, PanelVerdict, TextRecognizer, VerdictAggregator,
};
use rayon::prelude::*;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Analysis outcome for one panel image
#[derive(Debug, Clone, Serialize)]
pub struct PanelReport {
    /// File name
    pub file: String,
    /// Full path
    pub path: PathBuf,
    /// Decided action
    pub action: PanelAction,
    /// Full verdict, absent when the image could not be analyzed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verdict: Option<PanelVerdict>,
    /// Reason the image could not be analyzed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Aggregate counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct AnalysisStats {
    pub total: usize,
    pub to_process: usize,
    pub skip_sfx_only: usize,
    pub skip_no_bubble: usize,
    /// Skipped panels as a percentage of all panels
    pub filter_rate: f64,
}

impl AnalysisStats {
    /// Count actions
    pub fn from_actions(actions: impl IntoIterator<Item = PanelAction>) -> Self {
        let mut stats = actions.into_iter().fold(Self::default(), |mut s, action| {
            s.total += 1;
            match action {
                PanelAction::Process => s.to_process += 1,
                PanelAction::SkipSfxOnly => s.skip_sfx_only += 1,
                PanelAction::SkipNoBubble => s.skip_no_bubble += 1,
            }
            s
        });
        stats.filter_rate = if stats.total == 0 {
            0.0
        } else {
            (stats.skip_sfx_only + stats.skip_no_bubble) as f64 / stats.total as f64 * 100.0
        };
        stats
    }

    /// Number of skipped panels
    pub fn skipped(&self) -> usize {
        self.skip_sfx_only + self.skip_no_bubble
    }
}

/// Result of a batch analysis
#[derive(Debug, Clone, Serialize)]
pub struct CutAnalysisReport {
    /// Per-panel results in input order
    pub panels: Vec<PanelReport>,
    /// File names to send for editing
    pub to_process: Vec<String>,
    /// File names containing only sound effects
    pub skip_sfx_only: Vec<String>,
    /// File names without bubbles or text
    pub skip_no_bubble: Vec<String>,
    pub stats: AnalysisStats,
}

impl CutAnalysisReport {
    /// Build a report from per-panel results
    pub fn from_panels(panels: Vec<PanelReport>) -> Self {
        let mut to_process = Vec::new();
        let mut skip_sfx_only = Vec::new();
        let mut skip_no_bubble = Vec::new();

        for panel in &panels {
            let bucket = match panel.action {
                PanelAction::Process => &mut to_process,
                PanelAction::SkipSfxOnly => &mut skip_sfx_only,
                PanelAction::SkipNoBubble => &mut skip_no_bubble,
            };
            bucket.push(panel.file.clone());
        }

        let stats = AnalysisStats::from_actions(panels.iter().map(|p| p.action));
        Self {
            panels,
            to_process,
            skip_sfx_only,
            skip_no_bubble,
            stats,
        }
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Write the JSON report to a file
    pub fn save_json(&self, path: &Path) -> std::io::Result<()> {
        let json = self.to_json().map_err(std::io::Error::other)?;
        std::fs::write(path, json)
    }
}

/// Batch analyzer over panel images
pub struct CutAnalyzer<D, R> {
    aggregator: VerdictAggregator,
    detector: D,
    recognizer: R,
}

impl<D: BubbleDetector, R: TextRecognizer> CutAnalyzer<D, R> {
    /// Create an analyzer from an aggregator and its collaborators
    pub fn new(aggregator: VerdictAggregator, detector: D, recognizer: R) -> Self {
        Self {
            aggregator,
            detector,
            recognizer,
        }
    }

    /// Get the aggregator
    pub fn aggregator(&self) -> &VerdictAggregator {
        &self.aggregator
    }

    /// Analyze one panel image
    pub fn analyze_one(&self, path: &Path) -> PanelReport {
        let file = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        match self
            .aggregator
            .analyze_path(path, &self.detector, &self.recognizer)
        {
            Ok(verdict) => PanelReport {
                file,
                path: path.to_path_buf(),
                action: verdict.action,
                verdict: Some(verdict),
                error: None,
            },
            Err(e) => {
                warn!("Cannot analyze {}: {}", path.display(), e);
                PanelReport {
                    file,
                    path: path.to_path_buf(),
                    action: PanelAction::Process,
                    verdict: None,
                    error: Some(e.to_string()),
                }
            }
        }
    }

    /// Analyze panel images in parallel, keeping input order in the report
    pub fn analyze(&self, paths: &[PathBuf]) -> CutAnalysisReport {
        let panels: Vec<PanelReport> = paths.par_iter().map(|p| self.analyze_one(p)).collect();
        let report = CutAnalysisReport::from_panels(panels);

        info!(
            "Analyzed {} panels: {} to process, {} skipped ({:.1}%)",
            report.stats.total,
            report.stats.to_process,
            report.stats.skipped(),
            report.stats.filter_rate
        );
        report
    }
}
