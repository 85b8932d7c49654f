//! Progress tracking for batch page processing
//!
//! Wraps an `indicatif` progress bar with the CLI's stage and verbosity
//! model.

use indicatif::{ProgressBar, ProgressStyle};
use std::fmt;
use std::time::Instant;

/// Processing stages for page splitting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProcessingStage {
    /// Initializing
    #[default]
    Initializing,
    /// Decoding page images
    Loading,
    /// Detecting blank row runs
    DetectingGaps,
    /// Computing panel boundaries
    Splitting,
    /// Writing panel images
    Writing,
    /// Classifying panels
    Analyzing,
    /// Completed
    Completed,
}

impl ProcessingStage {
    /// Get the English name of the stage
    pub fn name(&self) -> &'static str {
        match self {
            ProcessingStage::Initializing => "Initializing",
            ProcessingStage::Loading => "Loading",
            ProcessingStage::DetectingGaps => "DetectingGaps",
            ProcessingStage::Splitting => "Splitting",
            ProcessingStage::Writing => "Writing",
            ProcessingStage::Analyzing => "Analyzing",
            ProcessingStage::Completed => "Completed",
        }
    }

    /// Get the Japanese description of the stage
    pub fn description_ja(&self) -> &'static str {
        match self {
            ProcessingStage::Initializing => "初期化中",
            ProcessingStage::Loading => "読み込み中",
            ProcessingStage::DetectingGaps => "余白検出中",
            ProcessingStage::Splitting => "分割中",
            ProcessingStage::Writing => "書き出し中",
            ProcessingStage::Analyzing => "判定中",
            ProcessingStage::Completed => "完了",
        }
    }
}

impl fmt::Display for ProcessingStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.description_ja())
    }
}

/// Output verbosity mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// No output
    Quiet,
    /// Normal output (progress bar and summary)
    #[default]
    Normal,
    /// Verbose output (per-page results)
    Verbose,
    /// Very verbose (per-panel results)
    VeryVerbose,
}

impl OutputMode {
    /// Create OutputMode from verbosity level
    pub fn from_verbosity(level: u8) -> Self {
        match level {
            0 => OutputMode::Normal,
            1 => OutputMode::Verbose,
            _ => OutputMode::VeryVerbose,
        }
    }

    /// Create OutputMode from CLI flags; `quiet` wins
    pub fn from_flags(verbose: u8, quiet: bool) -> Self {
        if quiet {
            OutputMode::Quiet
        } else {
            Self::from_verbosity(verbose)
        }
    }

    /// Check if output should be shown at this mode
    pub fn should_show(&self, required: OutputMode) -> bool {
        use OutputMode::*;
        match (self, required) {
            (Quiet, _) => false,
            (Normal, Quiet | Normal) => true,
            (Verbose, Quiet | Normal | Verbose) => true,
            (VeryVerbose, _) => true,
            _ => false,
        }
    }
}

/// Progress bar template
const BAR_TEMPLATE: &str = "{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}";

fn bar_style() -> ProgressStyle {
    ProgressStyle::default_bar()
        .template(BAR_TEMPLATE)
        .map(|s| s.progress_chars("=>-"))
        .unwrap_or_else(|_| ProgressStyle::default_bar())
}

/// Totals printed after a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub pages: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub panels: usize,
    pub oversized: usize,
}

/// Progress tracker over a batch of pages
#[derive(Debug)]
pub struct ProgressTracker {
    /// Current processing stage
    pub current_stage: ProcessingStage,
    /// Number of pages done
    pub completed: usize,
    /// Total number of pages
    pub total: usize,
    bar: ProgressBar,
    start_time: Instant,
    output_mode: OutputMode,
}

impl Default for ProgressTracker {
    fn default() -> Self {
        Self::new(1, OutputMode::Normal)
    }
}

impl ProgressTracker {
    /// Create a new progress tracker
    pub fn new(total: usize, output_mode: OutputMode) -> Self {
        let bar = if output_mode.should_show(OutputMode::Normal) {
            let bar = ProgressBar::new(total as u64);
            bar.set_style(bar_style());
            bar
        } else {
            ProgressBar::hidden()
        };

        Self {
            current_stage: ProcessingStage::Initializing,
            completed: 0,
            total,
            bar,
            start_time: Instant::now(),
            output_mode,
        }
    }

    /// Output mode in use
    pub fn output_mode(&self) -> OutputMode {
        self.output_mode
    }

    /// Set the current processing stage
    pub fn set_stage(&mut self, stage: ProcessingStage) {
        self.current_stage = stage;
        self.bar.set_message(stage.to_string());
    }

    /// Mark one page as done
    pub fn inc(&mut self, item: &str) {
        self.completed = (self.completed + 1).min(self.total);
        self.bar.inc(1);
        if self.output_mode.should_show(OutputMode::Verbose) && !item.is_empty() {
            self.bar.println(format!("  {}", item));
        }
    }

    /// Print a line above the bar at the given verbosity
    pub fn log(&self, required: OutputMode, line: &str) {
        if self.output_mode.should_show(required) {
            self.bar.println(line);
        }
    }

    /// Finish the bar
    pub fn finish(&mut self) {
        self.current_stage = ProcessingStage::Completed;
        self.bar.finish_with_message(ProcessingStage::Completed.to_string());
    }

    /// Get elapsed time in seconds
    pub fn elapsed_secs(&self) -> f64 {
        self.start_time.elapsed().as_secs_f64()
    }

    /// Print final summary
    pub fn print_summary(summary: &RunSummary) {
        println!();
        println!("{}", "=".repeat(80));
        println!("Processing Summary");
        println!("{}", "=".repeat(80));
        println!("  Pages:        {}", summary.pages);
        println!("  Succeeded:    {}", summary.succeeded);
        println!("  Errors:       {}", summary.failed);
        println!("  Panels:       {}", summary.panels);
        if summary.oversized > 0 {
            println!("  Oversized:    {}", summary.oversized);
        }
        println!("{}", "=".repeat(80));
        println!();
    }
}
