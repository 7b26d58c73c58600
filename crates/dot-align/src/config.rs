//! JSON configuration for frame analysis.
//!
//! The configuration is loaded and validated once; afterwards it is only read.

use std::{fs, path::Path};

use dot_align_core::Rect;
use dot_align_detect::{DotParams, DotParamsError, TargetParams, TargetParamsError};
use serde::{Deserialize, Serialize};

/// Raw sensor captures need the width to be a multiple of this.
pub const SENSOR_WIDTH_MULTIPLE: usize = 32;
/// Raw sensor captures need the height to be a multiple of this.
pub const SENSOR_HEIGHT_MULTIPLE: usize = 16;

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("invalid frame dimensions (width={width}, height={height})")]
    FrameDimensions { width: usize, height: usize },
    #[error(
        "frame {width}x{height} cannot be captured raw: width must be a multiple of 32 and height of 16"
    )]
    SensorResolution { width: usize, height: usize },
    #[error("{marker} region {region:?} is not inside the {width}x{height} frame")]
    RegionOutsideFrame {
        marker: &'static str,
        region: Rect,
        width: usize,
        height: usize,
    },
    #[error("{marker} dot parameters: {source}")]
    DotParams {
        marker: &'static str,
        #[source]
        source: DotParamsError,
    },
    #[error(transparent)]
    Target(#[from] TargetParamsError),
}

/// Shape of the frames the analyzer accepts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameSpec {
    pub width: usize,
    pub height: usize,
    /// Enforce the raw-capture resolution constraint of the camera.
    #[serde(default)]
    pub sensor_aligned: bool,
}

impl FrameSpec {
    #[inline]
    pub fn sample_count(&self) -> usize {
        self.width * self.height
    }

    pub fn bounds(&self) -> Result<Rect, ConfigError> {
        Rect::from_size(self.width, self.height).map_err(|_| ConfigError::FrameDimensions {
            width: self.width,
            height: self.height,
        })
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.bounds()?;
        if self.sensor_aligned
            && (self.width % SENSOR_WIDTH_MULTIPLE != 0 || self.height % SENSOR_HEIGHT_MULTIPLE != 0)
        {
            return Err(ConfigError::SensorResolution {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }
}

/// Search region and thresholds for one marker kind.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MarkerConfig {
    #[serde(default)]
    pub params: DotParams,
    /// Absolute search region.
    pub region: Rect,
}

/// Output pin identifiers. Opaque here; the indicator driver owns them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndicatorPins {
    pub success_pin: u32,
    pub dot_found_pin: u32,
    pub blink_pin: u32,
}

/// Full analysis configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AlignmentConfig {
    pub frame: FrameSpec,
    /// The dot being aligned. Searched with the reference region excluded.
    pub primary: MarkerConfig,
    /// The dot that anchors the target position.
    pub reference: MarkerConfig,
    pub target: TargetParams,
    #[serde(default)]
    pub indicators: Option<IndicatorPins>,
}

impl AlignmentConfig {
    /// Load a JSON config from disk. The result is not validated yet.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Write this config to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Check everything that can be checked before the first frame.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.frame.validate()?;
        let bounds = self.frame.bounds()?;

        for (marker, cfg) in [("primary", &self.primary), ("reference", &self.reference)] {
            if !bounds.contains_rect(&cfg.region) {
                return Err(ConfigError::RegionOutsideFrame {
                    marker,
                    region: cfg.region,
                    width: self.frame.width,
                    height: self.frame.height,
                });
            }
            cfg.params
                .validate()
                .map_err(|source| ConfigError::DotParams { marker, source })?;
        }

        self.target.validate()?;
        Ok(())
    }
}
