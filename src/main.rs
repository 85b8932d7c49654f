//! webtoon-cut - Panel segmentation for scanned webtoon pages
//!
//! CLI entry point

use anyhow::{bail, Context};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use tracing::Level;
use webtoon_cut::{
    exit_codes,
    // CLI
    ClassifyArgs, Cli, Commands, GapsArgs, SplitArgs,
    // Config
    CliOverrides, Config, ConfigError,
    // Splitting
    PageSplitter, SplitOptions,
    // Classification
    TextTypeClassifier,
    // Progress tracking
    OutputMode, ProcessingStage, ProgressTracker, RunSummary,
};

fn main() {
    let cli = Cli::parse();

    let (verbose, quiet) = match &cli.command {
        Commands::Split(args) => (args.verbose, args.quiet),
        _ => (0, false),
    };
    init_logging(verbose, quiet);

    let result = match cli.command {
        Commands::Split(args) => run_split(&args),
        Commands::Gaps(args) => run_gaps(&args),
        Commands::Classify(args) => run_classify(&args),
        Commands::Info => run_info(),
    };

    std::process::exit(match result {
        Ok(()) => exit_codes::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            if e.downcast_ref::<ConfigError>().is_some() {
                exit_codes::CONFIG_ERROR
            } else {
                exit_codes::GENERAL_ERROR
            }
        }
    });
}

/// Install the stderr log subscriber
fn init_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        Level::ERROR
    } else {
        match verbose {
            0 => Level::WARN,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Explicit config file, or the usual lookup
fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    match path {
        Some(path) => Ok(Config::load_from_path(path)?),
        None => match Config::load() {
            Ok(config) => Ok(config),
            Err(e) => {
                tracing::warn!("Ignoring config file: {}", e);
                Ok(Config::default())
            }
        },
    }
}

// ============ Split Command ============

fn run_split(args: &SplitArgs) -> anyhow::Result<()> {
    // Validate input path
    if !args.input.exists() {
        eprintln!("Error: Input path does not exist: {}", args.input.display());
        std::process::exit(exit_codes::INPUT_NOT_FOUND);
    }

    let pages = collect_page_files(&args.input)?;
    if pages.is_empty() {
        eprintln!("Error: No page images found in input path");
        std::process::exit(exit_codes::INPUT_NOT_FOUND);
    }

    // CLI takes precedence over the config file
    let config = load_config(args.config.as_deref())?.merge_with_cli(&create_cli_overrides(args));
    let splitter = PageSplitter::new(config.split_options());

    if args.dry_run {
        print_execution_plan(args, &pages, splitter.options());
        return Ok(());
    }

    std::fs::create_dir_all(&args.output)
        .with_context(|| format!("Cannot create output directory {}", args.output.display()))?;

    let mode = OutputMode::from_flags(args.verbose, args.quiet);
    let mut tracker = ProgressTracker::new(pages.len(), mode);
    tracker.set_stage(ProcessingStage::Splitting);

    // Pages are split in parallel; the bar advances as each one finishes
    let tracker = Mutex::new(tracker);
    let results = splitter.split_files_with(&pages, &args.output, |page, result| {
        let line = match result {
            Ok(r) => format!(
                "{}: {} panels (boundaries {:?})",
                page.display(),
                r.outputs.len(),
                r.boundaries
            ),
            Err(_) => String::new(),
        };
        if let Ok(mut tracker) = tracker.lock() {
            tracker.inc(&line);
        }
    });
    let mut tracker = tracker.into_inner().unwrap_or_else(PoisonError::into_inner);

    let mut summary = RunSummary {
        pages: pages.len(),
        ..Default::default()
    };

    for (page, result) in pages.iter().zip(&results) {
        match result {
            Ok(result) => {
                summary.succeeded += 1;
                summary.panels += result.outputs.len();
                summary.oversized += result.oversized;
                for output in &result.outputs {
                    tracker.log(OutputMode::VeryVerbose, &format!("    {}", output.display()));
                }
            }
            Err(e) => {
                summary.failed += 1;
                eprintln!("Error processing {}: {}", page.display(), e);
            }
        }
    }

    tracker.finish();

    if !args.quiet {
        ProgressTracker::print_summary(&summary);
        println!("Total time: {:.2}s", tracker.elapsed_secs());
    }

    if summary.failed > 0 {
        bail!("{} page(s) failed to process", summary.failed);
    }
    Ok(())
}

/// Create CLI overrides from SplitArgs
///
/// Only flags the user actually passed override config file values.
fn create_cli_overrides(args: &SplitArgs) -> CliOverrides {
    CliOverrides {
        aspect_ratio: args.aspect_ratio,
        min_gap_height: args.min_gap,
        min_panel_gap_height: args.min_panel_gap,
    }
}

/// Collect page images from input path (file or directory)
fn collect_page_files(input: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let mut pages = Vec::new();

    if input.is_file() {
        if SplitArgs::is_image(input) {
            pages.push(input.to_path_buf());
        }
    } else if input.is_dir() {
        for entry in std::fs::read_dir(input)? {
            let path = entry?.path();
            if path.is_file() && SplitArgs::is_image(&path) {
                pages.push(path);
            }
        }
        pages.sort();
    }

    for (page, stem) in pages.iter().zip(PageSplitter::page_stems(&pages)) {
        let plain = page.file_stem().map(|s| s.to_string_lossy().into_owned());
        if plain.as_deref() != Some(stem.as_str()) {
            tracing::warn!("{} shares its name with another page, writing {}_cut_NN.png", page.display(), stem);
        }
    }

    Ok(pages)
}

/// Print execution plan for dry-run mode
fn print_execution_plan(args: &SplitArgs, pages: &[PathBuf], options: &SplitOptions) {
    println!("=== Dry Run - Execution Plan ===");
    println!();
    println!("Input: {}", args.input.display());
    println!("Output: {}", args.output.display());
    println!("Pages to process: {}", pages.len());
    println!();
    println!("Split Configuration:");
    println!("  Aspect ratio (h/w):   {:.3}", options.aspect_ratio);
    println!("  Panel gap height:     {}px", options.min_panel_gap_height);
    println!("  Edge margin:          {}px", options.edge_margin);
    println!("  Min panel height:     {}px", options.min_panel_height);
    println!("  Max stretch factor:   {}", options.max_stretch_factor);
    println!(
        "  Blank rows:           mean < {} or > {}, std < {}, run >= {}px",
        options.gap.dark_threshold,
        options.gap.light_threshold,
        options.gap.uniform_threshold,
        options.gap.min_gap_height
    );

    if args.verbose > 0 {
        println!();
        println!("Pages:");
        for page in pages {
            println!("  {}", page.display());
        }
    }
}

// ============ Gaps Command ============

fn run_gaps(args: &GapsArgs) -> anyhow::Result<()> {
    if !args.image.exists() {
        eprintln!("Error: Image does not exist: {}", args.image.display());
        std::process::exit(exit_codes::INPUT_NOT_FOUND);
    }

    let config = load_config(args.config.as_deref())?;
    let splitter = PageSplitter::new(config.split_options());

    let img = image::open(&args.image)
        .with_context(|| format!("Cannot decode {}", args.image.display()))?;
    let split = splitter.split_image(&img);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&split)?);
        return Ok(());
    }

    let (width, height) = split.page_size;
    println!("Image: {} ({}x{})", args.image.display(), width, height);
    println!("Max panel height: {}px", split.boundaries.max_panel_height);
    println!();
    println!("Gaps ({}):", split.gaps.len());
    for gap in &split.gaps {
        println!(
            "  {:>6}-{:<6} height {:>4}  mid {:>6}  {:?}",
            gap.start, gap.end, gap.height, gap.mid, gap.polarity
        );
    }
    println!();
    println!("Boundaries: {:?}", split.boundaries.rows);
    println!("Panels ({}):", split.panels.len());
    for panel in &split.panels {
        let marker = if panel.height() > split.boundaries.max_panel_height {
            "  (oversized)"
        } else {
            ""
        };
        println!(
            "  #{:02} {:>6}-{:<6} height {}{}",
            panel.index,
            panel.start_y,
            panel.end_y,
            panel.height(),
            marker
        );
    }

    Ok(())
}

// ============ Classify Command ============

fn run_classify(args: &ClassifyArgs) -> anyhow::Result<()> {
    let config = load_config(args.config.as_deref())?;
    let classifier = TextTypeClassifier::with_options(&config.classifier_options())?;
    let in_bubble = !args.floating;

    if args.json {
        let verdicts: Vec<serde_json::Value> = args
            .texts
            .iter()
            .map(|text| {
                serde_json::json!({
                    "text": text,
                    "in_bubble": in_bubble,
                    "verdict": classifier.classify(text, in_bubble),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&verdicts)?);
        return Ok(());
    }

    for text in &args.texts {
        let verdict = classifier.classify(text, in_bubble);
        println!(
            "{:<18} {:.2}  {:?}  {}",
            verdict.category.as_str(),
            verdict.confidence,
            verdict.reason,
            text
        );
    }

    Ok(())
}

// ============ Info Command ============

fn run_info() -> anyhow::Result<()> {
    println!("webtoon-cut v{}", env!("CARGO_PKG_VERSION"));
    println!();

    let defaults = Config::default();
    let split = defaults.split_options();
    let analysis = defaults.aggregator_options();
    let classifier = TextTypeClassifier::new()?;

    println!("Split Defaults:");
    println!("  Aspect ratio (h/w):   {:.3}", split.aspect_ratio);
    println!("  Panel gap height:     {}px", split.min_panel_gap_height);
    println!("  Edge margin:          {}px", split.edge_margin);
    println!("  Min panel height:     {}px", split.min_panel_height);
    println!("  Max stretch factor:   {}", split.max_stretch_factor);
    println!("  Min blank run:        {}px", split.gap.min_gap_height);

    println!();
    println!("Verdict Defaults:");
    println!("  Bubble confidence:    {}", analysis.bubble_confidence_threshold);
    println!("  OCR padding:          {}px", analysis.ocr_padding);
    println!("  Floating min conf.:   {}", analysis.floating_min_confidence);
    println!("  SFX dictionary:       {} words", classifier.tables().sfx_word_count());

    // Config File Locations
    println!();
    println!("Config File Locations:");
    for path in Config::search_paths() {
        let state = if path.is_file() { "found" } else { "not found" };
        println!("  {} ({})", path.display(), state);
    }

    Ok(())
}
