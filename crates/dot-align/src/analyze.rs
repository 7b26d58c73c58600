//! Per-frame analysis: primary dot, reference dot, target match.

use dot_align_core::{GrayImageView, ImageError};
use dot_align_detect::{
    DarkMask, DotFinder, DotMeasurement, FindError, IndicatorState, MatchOutcome, TargetMatch,
    TargetMatcher,
};
use serde::Serialize;

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::config::{AlignmentConfig, ConfigError};

#[derive(thiserror::Error, Debug)]
pub enum AnalyzeError {
    #[error(
        "frame shape {width}x{height} ({samples} samples) does not match configured {expected_width}x{expected_height}"
    )]
    FrameShape {
        expected_width: usize,
        expected_height: usize,
        width: usize,
        height: usize,
        samples: usize,
    },
    #[error(transparent)]
    Image(#[from] ImageError),
    #[error("{marker} dot search failed: {source}")]
    Find {
        marker: &'static str,
        #[source]
        source: FindError,
    },
}

/// Everything decided about one frame.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct FrameReport {
    pub outcome: MatchOutcome,
    pub primary: DotMeasurement,
    pub reference: DotMeasurement,
    pub target: TargetMatch,
}

impl FrameReport {
    pub fn indicators(&self) -> IndicatorState {
        self.outcome.indicators()
    }

    /// One-line diagnostic summary for logs and the CLI.
    pub fn summary_line(&self) -> String {
        let dst = self
            .target
            .distance_sq
            .map(|d| format!("{d:.3}"))
            .unwrap_or_else(|| "-".to_string());
        format!(
            "{:<10} pct_dark:{:.4} dsp:{:.4} ref_pct_dark:{:.4} ref_dsp:{:.4} dst_sqrd:{}",
            self.outcome.to_string(),
            self.primary.pct_dark,
            self.primary.dispersion,
            self.reference.pct_dark,
            self.reference.dispersion,
            dst
        )
    }
}

/// Validated, immutable analysis pipeline.
#[derive(Clone, Debug)]
pub struct FrameAnalyzer {
    config: AlignmentConfig,
    primary: DotFinder,
    reference: DotFinder,
    matcher: TargetMatcher,
}

impl FrameAnalyzer {
    pub fn new(config: AlignmentConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let primary = DotFinder::new(config.primary.params).map_err(|source| {
            ConfigError::DotParams {
                marker: "primary",
                source,
            }
        })?;
        let reference = DotFinder::new(config.reference.params).map_err(|source| {
            ConfigError::DotParams {
                marker: "reference",
                source,
            }
        })?;
        let matcher = TargetMatcher::new(config.target)?;

        Ok(Self {
            config,
            primary,
            reference,
            matcher,
        })
    }

    pub fn config(&self) -> &AlignmentConfig {
        &self.config
    }

    /// Analyse a raw row-major luminance plane of the configured size.
    pub fn analyze_buffer(&self, data: &[u8]) -> Result<FrameReport, AnalyzeError> {
        let shape = self.config.frame;
        if data.len() != shape.sample_count() {
            return Err(self.shape_error(shape.width, shape.height, data.len()));
        }
        let frame = GrayImageView::new(shape.width, shape.height, data)?;
        self.analyze(&frame)
    }

    /// Analyse one frame.
    ///
    /// The percentage of dark samples is computed against the whole frame's
    /// sample count for both regions.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "info", skip(self, frame), fields(width = frame.width, height = frame.height))
    )]
    pub fn analyze(&self, frame: &GrayImageView<'_>) -> Result<FrameReport, AnalyzeError> {
        self.check_shape(frame)?;
        let denominator = self.config.frame.sample_count();

        let reference_region = self.config.reference.region;
        let primary = self
            .primary
            .find(
                frame,
                &self.config.primary.region,
                Some(&reference_region),
                denominator,
            )
            .map_err(|source| AnalyzeError::Find {
                marker: "primary",
                source,
            })?;
        let reference = self
            .reference
            .find(frame, &reference_region, None, denominator)
            .map_err(|source| AnalyzeError::Find {
                marker: "reference",
                source,
            })?;

        let target = self.matcher.evaluate(primary.position, reference.position);

        let report = FrameReport {
            outcome: target.outcome,
            primary,
            reference,
            target,
        };
        log::debug!("{}", report.summary_line());
        Ok(report)
    }

    /// Dark masks of the primary region (reference region excluded) and the
    /// reference region, each with its own threshold, exactly as
    /// [`FrameAnalyzer::analyze`] classifies them.
    pub fn region_masks(
        &self,
        frame: &GrayImageView<'_>,
    ) -> Result<(DarkMask, DarkMask), AnalyzeError> {
        self.check_shape(frame)?;
        let reference_region = self.config.reference.region;
        let primary = self
            .primary
            .region_mask(frame, &self.config.primary.region, Some(&reference_region))
            .map_err(|source| AnalyzeError::Find {
                marker: "primary",
                source,
            })?;
        let reference = self
            .reference
            .region_mask(frame, &reference_region, None)
            .map_err(|source| AnalyzeError::Find {
                marker: "reference",
                source,
            })?;
        Ok((primary, reference))
    }

    fn check_shape(&self, frame: &GrayImageView<'_>) -> Result<(), AnalyzeError> {
        let shape = self.config.frame;
        if frame.width != shape.width
            || frame.height != shape.height
            || frame.data.len() != shape.sample_count()
        {
            return Err(self.shape_error(frame.width, frame.height, frame.data.len()));
        }
        Ok(())
    }

    fn shape_error(&self, width: usize, height: usize, samples: usize) -> AnalyzeError {
        AnalyzeError::FrameShape {
            expected_width: self.config.frame.width,
            expected_height: self.config.frame.height,
            width,
            height,
            samples,
        }
    }
}
