//! Dark-dot detection and reference-relative target matching.
//!
//! Pipeline for one region:
//! - crop the frame to the search region,
//! - mark samples at or below the luminance threshold as dark, skipping an
//!   optional exclusion rectangle,
//! - compute the centroid and RMS dispersion of the dark samples,
//! - accept when the dark percentage sits strictly inside its band and the
//!   dispersion is strictly below its bound.
//!
//! Two such detections (primary dot and reference dot) feed a
//! [`TargetMatcher`], which checks the primary against `reference + offset`.

mod error;
mod finder;
mod mask;
mod matcher;
mod params;
mod stats;

pub use error::{DotParamsError, FindError, TargetParamsError};
pub use finder::{DotFinder, DotMeasurement};
pub use mask::{dark_mask, DarkMask};
pub use matcher::{IndicatorState, MatchOutcome, TargetMatch, TargetMatcher};
pub use params::{DotParams, TargetParams};
pub use stats::{blob_stats, BlobStats};
