//! High-level facade for the `dot-align-*` workspace.
//!
//! This crate provides:
//! - re-exports of the geometry/frame types and the dot detectors,
//! - the JSON configuration surface ([`AlignmentConfig`]) with load-time
//!   validation,
//! - [`FrameAnalyzer`], which runs the full per-frame pipeline,
//! - debug renderings, and (feature `image`) frame file loading.
//!
//! ## Quickstart
//!
//! ```no_run
//! use dot_align::{load_frame, AlignmentConfig, FrameAnalyzer};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AlignmentConfig::load_json("dot_align.json")?;
//! let analyzer = FrameAnalyzer::new(config)?;
//!
//! let frame = load_frame("frame.png")?;
//! let report = analyzer.analyze(&frame.view())?;
//! println!("{}", report.summary_line());
//! # Ok(())
//! # }
//! ```
//!
//! ## API map
//! - `dot_align::core`: rectangles, points, luminance frames, logger.
//! - `dot_align::detect`: masking, statistics, `DotFinder`, `TargetMatcher`.
//! - `dot_align::debug`: threshold and overlay renderings.

pub use dot_align_core as core;
pub use dot_align_detect as detect;

pub use dot_align_core::{GrayImage, GrayImageView, Rect};
pub use dot_align_detect::{
    DotFinder, DotMeasurement, DotParams, IndicatorState, MatchOutcome, TargetMatch,
    TargetMatcher, TargetParams,
};

mod analyze;
mod config;
pub mod debug;

#[cfg(feature = "image")]
mod frames;

pub use analyze::{AnalyzeError, FrameAnalyzer, FrameReport};
pub use config::{
    AlignmentConfig, ConfigError, FrameSpec, IndicatorPins, MarkerConfig, SENSOR_HEIGHT_MULTIPLE,
    SENSOR_WIDTH_MULTIPLE,
};

#[cfg(feature = "image")]
pub use frames::{gray_view, load_frame, save_frame, FrameIoError};
