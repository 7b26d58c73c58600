use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use dot_align::core::{begin_frame, end_frame};
use dot_align::debug::{mask_image, overlay_image, threshold_image};
use dot_align::{load_frame, save_frame, AlignmentConfig, FrameAnalyzer, FrameReport, GrayImage};
use serde::Serialize;

#[cfg(not(feature = "tracing"))]
use dot_align::core::init_with_level;
#[cfg(feature = "tracing")]
use dot_align::core::init_tracing;
#[cfg(not(feature = "tracing"))]
use log::LevelFilter;
use log::{info, warn};

/// Check that a dark dot sits on target relative to a reference dot.
#[derive(Parser, Debug)]
#[command(name = "dot-align", version, about)]
struct Cli {
    /// JSON configuration file.
    #[arg(short, long, default_value = "dot_align.json")]
    config: PathBuf,

    /// Print one JSON report per frame instead of a summary line.
    #[arg(long)]
    json: bool,

    /// Log per-region diagnostics.
    #[arg(short, long)]
    verbose: bool,

    /// Write `<stem>_mask.png`, `<stem>_bw.png` and `<stem>_overlay.png` for
    /// every frame here.
    #[arg(long)]
    debug_dir: Option<PathBuf>,

    /// Frame image files, analysed independently in order.
    #[arg(required = true)]
    frames: Vec<PathBuf>,
}

#[derive(Serialize)]
struct FrameRecord<'a> {
    frame: String,
    #[serde(flatten)]
    report: &'a FrameReport,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let analyzer = match AlignmentConfig::load_json(&cli.config).and_then(FrameAnalyzer::new) {
        Ok(analyzer) => analyzer,
        Err(err) => {
            eprintln!("error: {}: {err}", cli.config.display());
            return ExitCode::from(2);
        }
    };
    info!("loaded config {}", cli.config.display());

    if let Some(dir) = &cli.debug_dir {
        if let Err(err) = std::fs::create_dir_all(dir) {
            eprintln!("error: {}: {err}", dir.display());
            return ExitCode::from(2);
        }
    }

    let mut failures = 0usize;
    for (index, path) in cli.frames.iter().enumerate() {
        begin_frame(index + 1);
        if let Err(err) = run_frame(&cli, &analyzer, path) {
            warn!("{}: {err}", path.display());
            eprintln!("error: {}: {err}", path.display());
            failures += 1;
        }
    }
    end_frame();

    if failures > 0 {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn run_frame(
    cli: &Cli,
    analyzer: &FrameAnalyzer,
    path: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let frame = load_frame(path)?;
    let report = analyzer.analyze(&frame.view())?;

    if cli.json {
        let record = FrameRecord {
            frame: path.display().to_string(),
            report: &report,
        };
        println!("{}", serde_json::to_string(&record)?);
    } else {
        println!("{}: {}", path.display(), report.summary_line());
    }

    if let Some(dir) = &cli.debug_dir {
        write_debug_images(dir, path, &frame, analyzer, &report)?;
    }
    Ok(())
}

fn write_debug_images(
    dir: &Path,
    frame_path: &Path,
    frame: &GrayImage,
    analyzer: &FrameAnalyzer,
    report: &FrameReport,
) -> Result<(), Box<dyn std::error::Error>> {
    let stem = frame_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "frame".to_string());
    let config = analyzer.config();

    let mask = mask_image(&frame.view(), analyzer)?;
    save_frame(&mask, dir.join(format!("{stem}_mask.png")))?;

    let bw = threshold_image(&frame.view(), config.primary.params.luminance_threshold);
    save_frame(&bw, dir.join(format!("{stem}_bw.png")))?;

    let overlay = overlay_image(&frame.view(), config, report);
    save_frame(&overlay, dir.join(format!("{stem}_overlay.png")))?;
    Ok(())
}

#[cfg(not(feature = "tracing"))]
fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    if let Err(err) = init_with_level(level) {
        eprintln!("warning: logger already installed: {err}");
    }
}

#[cfg(feature = "tracing")]
fn init_logging(verbose: bool) {
    init_tracing(verbose, false);
}
