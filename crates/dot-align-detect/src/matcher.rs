//! Reference-relative target matching.
//!
//! The reference dot acts as a moving origin: the primary dot is expected at
//! `reference + offset`, which absorbs rig or camera drift between runs.

use std::fmt;

use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use crate::error::TargetParamsError;
use crate::params::TargetParams;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchOutcome {
    /// Primary or reference dot missing.
    NoDot,
    /// Both dots found but the primary is outside the tolerance radius.
    OffTarget,
    OnTarget,
}

impl fmt::Display for MatchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MatchOutcome::NoDot => "no_dot",
            MatchOutcome::OffTarget => "off_target",
            MatchOutcome::OnTarget => "on_target",
        })
    }
}

/// The two status signals an indicator layer drives.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndicatorState {
    pub dot_found: bool,
    pub success: bool,
}

impl MatchOutcome {
    #[inline]
    pub fn dot_present(self) -> bool {
        !matches!(self, MatchOutcome::NoDot)
    }

    #[inline]
    pub fn on_target(self) -> bool {
        matches!(self, MatchOutcome::OnTarget)
    }

    pub fn indicators(self) -> IndicatorState {
        IndicatorState {
            dot_found: self.dot_present(),
            success: self.on_target(),
        }
    }
}

/// Match decision plus the geometry behind it.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TargetMatch {
    pub outcome: MatchOutcome,
    /// `reference + offset`, when the reference dot was found.
    pub expected: Option<Point2<f64>>,
    /// Squared distance from primary to expected, when both were found.
    pub distance_sq: Option<f64>,
}

#[derive(Clone, Debug)]
pub struct TargetMatcher {
    params: TargetParams,
}

impl TargetMatcher {
    pub fn new(params: TargetParams) -> Result<Self, TargetParamsError> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &TargetParams {
        &self.params
    }

    /// Combine the two detections. A missing dot on either side is `NoDot`;
    /// otherwise the primary is on target iff its squared distance to the
    /// expected position is strictly below `radius^2`.
    pub fn evaluate(
        &self,
        primary: Option<Point2<f64>>,
        reference: Option<Point2<f64>>,
    ) -> TargetMatch {
        let expected = reference.map(|r| r + self.params.offset);
        let (Some(primary), Some(expected)) = (primary, expected) else {
            return TargetMatch {
                outcome: MatchOutcome::NoDot,
                expected,
                distance_sq: None,
            };
        };

        let d2 = (primary - expected).norm_squared();
        let outcome = if d2 < self.params.radius_sq() {
            MatchOutcome::OnTarget
        } else {
            MatchOutcome::OffTarget
        };

        TargetMatch {
            outcome,
            expected: Some(expected),
            distance_sq: Some(d2),
        }
    }
}
