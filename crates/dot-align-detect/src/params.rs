use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use crate::error::{DotParamsError, TargetParamsError};

/// Thresholds that decide whether a region holds a dot.
///
/// One bundle per marker kind; the primary and reference dots are often
/// printed or projected differently and need their own sensitivity.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DotParams {
    /// Samples at or below this luminance are dark.
    pub luminance_threshold: u8,
    /// Exclusive lower bound on the dark percentage.
    pub pct_dark_low: f64,
    /// Exclusive upper bound on the dark percentage.
    pub pct_dark_high: f64,
    /// Exclusive upper bound on the RMS spread of dark samples, in pixels.
    pub max_dispersion: f64,
}

impl Default for DotParams {
    fn default() -> Self {
        Self {
            luminance_threshold: 12,
            pct_dark_low: 2.0,
            pct_dark_high: 4.0,
            max_dispersion: 25.0,
        }
    }
}

impl DotParams {
    pub fn validate(&self) -> Result<(), DotParamsError> {
        let (low, high) = (self.pct_dark_low, self.pct_dark_high);
        if !low.is_finite() || !high.is_finite() {
            return Err(DotParamsError::NonFinitePercentage { low, high });
        }
        if low >= high {
            return Err(DotParamsError::EmptyPercentageRange { low, high });
        }
        // `!(x > 0)` also catches NaN
        if !(self.max_dispersion > 0.0) {
            return Err(DotParamsError::NonPositiveDispersion(self.max_dispersion));
        }
        Ok(())
    }

    /// All bounds are strict; hitting any bound exactly is a rejection.
    #[inline]
    pub fn accepts(&self, pct_dark: f64, dispersion: f64) -> bool {
        pct_dark > self.pct_dark_low
            && pct_dark < self.pct_dark_high
            && dispersion < self.max_dispersion
    }
}

/// Where the primary dot should sit relative to the reference dot.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TargetParams {
    /// Vector from the reference dot to the expected primary position.
    pub offset: Vector2<f64>,
    /// Acceptance radius in pixels (compared as squared distance).
    pub radius: f64,
}

impl TargetParams {
    pub fn validate(&self) -> Result<(), TargetParamsError> {
        if !self.offset.x.is_finite() || !self.offset.y.is_finite() {
            return Err(TargetParamsError::NonFiniteOffset {
                dx: self.offset.x,
                dy: self.offset.y,
            });
        }
        if !self.radius.is_finite() || self.radius < 0.0 {
            return Err(TargetParamsError::InvalidRadius(self.radius));
        }
        Ok(())
    }

    #[inline]
    pub fn radius_sq(&self) -> f64 {
        self.radius * self.radius
    }
}
