use dot_align_core::ImageError;

/// Invalid dot threshold bundle.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum DotParamsError {
    #[error("dark percentage bounds must be finite (low={low}, high={high})")]
    NonFinitePercentage { low: f64, high: f64 },
    #[error("dark percentage bounds are inverted or empty (low={low} must be below high={high})")]
    EmptyPercentageRange { low: f64, high: f64 },
    #[error("max_dispersion must be positive (got {0})")]
    NonPositiveDispersion(f64),
}

/// Invalid target offset/tolerance.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum TargetParamsError {
    #[error("target offset must be finite (got [{dx}, {dy}])")]
    NonFiniteOffset { dx: f64, dy: f64 },
    #[error("target radius must be finite and non-negative (got {0})")]
    InvalidRadius(f64),
}

/// Errors returned by [`crate::DotFinder`].
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum FindError {
    #[error(transparent)]
    Image(#[from] ImageError),
    #[error("dark percentage denominator must be positive")]
    ZeroDenominator,
}
