//! webtoon-cut - Panel segmentation and speech-bubble pre-classification
//!
//! Splits tall scanned comic pages into panels at blank gutters under a
//! height budget, and decides per panel whether its speech bubbles need the
//! paid external edit pass.
//!
//! # Modules
//!
//! - [`gap`]: blank row run detection
//! - [`split`]: ratio-constrained panel boundaries and panel files
//! - [`classify`]: rule-based text type classification
//! - [`verdict`]: two-pass panel verdict aggregation over external collaborators
//! - [`analysis`]: batch verdicts and statistics
//! - [`config`]: TOML configuration
//!
//! # Example
//!
//! ```rust,no_run
//! use std::path::Path;
//! use webtoon_cut::{PageSplitter, SplitOptions};
//!
//! let splitter = PageSplitter::new(SplitOptions::default());
//! let result = splitter.split_file(Path::new("page_001.png"), Path::new("./cuts")).unwrap();
//! println!("{} panels", result.outputs.len());
//! ```

pub mod analysis;
pub mod classify;
pub mod cli;
pub mod config;
pub mod gap;
pub mod progress;
pub mod split;
pub mod verdict;

// Analysis
pub use analysis::{AnalysisStats, CutAnalysisReport, CutAnalyzer, PanelReport};

// Classification
pub use classify::{
    ClassificationVerdict, ClassifierError, ClassifierOptions, TextCategory, TextTypeClassifier,
    VerdictReason,
};

// CLI
pub use cli::{ClassifyArgs, Cli, Commands, GapsArgs, SplitArgs};

// Config
pub use config::{CliOverrides, Config, ConfigError};

// Gap detection
pub use gap::{Gap, GapDetector, GapError, GapOptions, GapPolarity};

// Progress tracking
pub use progress::{OutputMode, ProcessingStage, ProgressTracker, RunSummary};

// Splitting
pub use split::{
    PageSplit, PageSplitter, PanelBoundaries, PanelSpan, RatioSplitter, SplitError, SplitOptions,
    SplitResult,
};

// Verdict
pub use verdict::{
    AggregatorOptions, BoundingBox, BubbleDetector, BubbleRegion, ClassifiedSnippet,
    CollaboratorError, DetectionMethod, NoBubbles, PanelAction, PanelVerdict, RecognizedText,
    TextCounts, TextRecognizer, TextSnippet, VerdictAggregator, VerdictError,
};

/// Process exit codes
pub mod exit_codes {
    /// Success
    pub const SUCCESS: i32 = 0;
    /// General error
    pub const GENERAL_ERROR: i32 = 1;
    /// Invalid arguments
    pub const INVALID_ARGS: i32 = 2;
    /// Input file or directory not found
    pub const INPUT_NOT_FOUND: i32 = 3;
    /// Config file error
    pub const CONFIG_ERROR: i32 = 4;
}
