//! Single-region dot detection.
//!
//! A region holds a dot when the share of dark samples is inside a band *and*
//! those samples are tightly clustered. The percentage alone cannot tell one
//! compact blob from scattered clutter of the same size; the dispersion bound
//! can.

use dot_align_core::{GrayImageView, Rect};
use nalgebra::Point2;
use serde::Serialize;

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::error::{DotParamsError, FindError};
use crate::mask::{dark_mask, DarkMask};
use crate::params::DotParams;
use crate::stats::{blob_stats, serialize_finite};

/// Diagnostics and decision for one region of one frame.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct DotMeasurement {
    /// Absolute search region.
    pub region: Rect,
    pub n_dark: usize,
    /// `100 * n_dark / denominator`.
    pub pct_dark: f64,
    /// RMS spread of the dark samples. `+inf` when there are none, which
    /// serializes as `null`.
    #[serde(serialize_with = "serialize_finite")]
    pub dispersion: f64,
    /// Centroid of the dark samples in region-local coordinates.
    pub local_centroid: Point2<f64>,
    /// Absolute dot position, present only when the region was accepted.
    pub position: Option<Point2<f64>>,
}

impl DotMeasurement {
    #[inline]
    pub fn is_detected(&self) -> bool {
        self.position.is_some()
    }
}

/// Dot detector for one marker kind.
#[derive(Clone, Debug)]
pub struct DotFinder {
    params: DotParams,
}

impl DotFinder {
    pub fn new(params: DotParams) -> Result<Self, DotParamsError> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &DotParams {
        &self.params
    }

    /// Dark mask of `region`, with `exclude` (absolute coordinates) removed.
    pub fn region_mask(
        &self,
        frame: &GrayImageView<'_>,
        region: &Rect,
        exclude: Option<&Rect>,
    ) -> Result<DarkMask, FindError> {
        let crop = frame.crop(region)?;
        let local_exclude = exclude.map(|r| region.relative_rect(r));
        Ok(dark_mask(
            &crop.view(),
            self.params.luminance_threshold,
            local_exclude.as_ref(),
        ))
    }

    /// Decide whether `region` of `frame` holds a dot.
    ///
    /// `denominator` is the sample count the dark percentage is taken
    /// against. The thresholds in use were tuned against the whole frame's
    /// sample count, not the region's area; pass `frame.len()` to keep them
    /// meaningful.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "debug", skip(self, frame, exclude))
    )]
    pub fn find(
        &self,
        frame: &GrayImageView<'_>,
        region: &Rect,
        exclude: Option<&Rect>,
        denominator: usize,
    ) -> Result<DotMeasurement, FindError> {
        if denominator == 0 {
            return Err(FindError::ZeroDenominator);
        }
        let mask = self.region_mask(frame, region, exclude)?;
        Ok(self.measure(&mask, region, denominator))
    }

    /// Search the whole frame, with no exclusion.
    pub fn find_in_frame(&self, frame: &GrayImageView<'_>) -> Result<DotMeasurement, FindError> {
        let bounds = frame.bounds()?;
        self.find(frame, &bounds, None, frame.len())
    }

    fn measure(&self, mask: &DarkMask, region: &Rect, denominator: usize) -> DotMeasurement {
        let n_dark = mask.count();
        let pct_dark = 100.0 * n_dark as f64 / denominator as f64;
        let stats = blob_stats(mask.dark_points());

        let accepted = self.params.accepts(pct_dark, stats.dispersion);
        let position = accepted.then(|| region.absolute_point(stats.centroid));

        log::debug!(
            "region {:?}: n_dark={} pct_dark={:.4} dsp={:.4} accepted={}",
            region,
            n_dark,
            pct_dark,
            stats.dispersion,
            accepted
        );

        DotMeasurement {
            region: *region,
            n_dark,
            pct_dark,
            dispersion: stats.dispersion,
            local_centroid: stats.centroid,
            position,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dot_align_core::GrayImage;

    const SIZE: usize = 50;

    fn bright(width: usize, height: usize) -> GrayImage {
        GrayImage::filled(width, height, 255)
    }

    fn paint(img: &mut GrayImage, left: i32, top: i32, w: i32, h: i32) {
        img.fill_rect(&Rect::new(left, left + w, top, top + h).expect("rect"), 0);
    }

    fn finder(params: DotParams) -> DotFinder {
        DotFinder::new(params).expect("valid params")
    }

    #[test]
    fn finds_three_by_three_square() {
        // 50x50 bright region at (20, 30) inside a 100x100 frame, dark 3x3
        // square centred at local (10, 10)
        let mut img = bright(100, 100);
        paint(&mut img, 29, 39, 3, 3);
        let region = Rect::new(20, 20 + SIZE as i32, 30, 30 + SIZE as i32).expect("rect");

        // 9 dark samples of 10000 => 0.09 %
        let params = DotParams {
            luminance_threshold: 12,
            pct_dark_low: 0.05,
            pct_dark_high: 0.2,
            max_dispersion: 5.0,
        };
        let m = finder(params)
            .find(&img.view(), &region, None, img.data.len())
            .expect("find");

        assert_eq!(m.n_dark, 9);
        assert!((m.pct_dark - 0.09).abs() < 1e-12);
        assert!((m.dispersion - (12.0f64 / 9.0).sqrt()).abs() < 1e-9);
        assert_eq!(m.local_centroid, Point2::new(10.0, 10.0));
        assert_eq!(m.position, Some(Point2::new(30.0, 40.0)));
        assert!(region.contains(Point2::new(30, 40)));
    }

    #[test]
    fn percentage_uses_given_denominator_not_region_area() {
        let mut img = bright(100, 100);
        paint(&mut img, 5, 5, 2, 2);
        let region = Rect::new(0, 10, 0, 10).expect("rect");
        let m = finder(DotParams::default())
            .find(&img.view(), &region, None, img.data.len())
            .expect("find");
        // 4 / 10000, not 4 / 100
        assert!((m.pct_dark - 0.04).abs() < 1e-12);
    }

    #[test]
    fn fully_dark_region_is_rejected() {
        let img = GrayImage::filled(20, 20, 0);
        let m = finder(DotParams::default())
            .find_in_frame(&img.view())
            .expect("find");
        assert_eq!(m.pct_dark, 100.0);
        assert!(!m.is_detected());
    }

    #[test]
    fn empty_region_is_rejected_not_an_error() {
        let img = bright(32, 16);
        let m = finder(DotParams::default())
            .find_in_frame(&img.view())
            .expect("find");
        assert_eq!(m.n_dark, 0);
        assert!(m.dispersion.is_infinite());
        assert_eq!(m.position, None);

        let json = serde_json::to_value(m).expect("json");
        assert!(json["dispersion"].is_null());
        assert!(json["position"].is_null());
    }

    #[test]
    fn dispersion_equal_to_bound_is_rejected() {
        // two dark samples two pixels apart: dispersion exactly 1
        let mut img = bright(10, 10);
        img.set(3, 4, 0);
        img.set(5, 4, 0);
        let base = DotParams {
            luminance_threshold: 12,
            pct_dark_low: 1.0,
            pct_dark_high: 3.0,
            max_dispersion: 1.0,
        };

        let at_bound = finder(base).find_in_frame(&img.view()).expect("find");
        assert_eq!(at_bound.dispersion, 1.0);
        assert_eq!(at_bound.pct_dark, 2.0);
        assert!(!at_bound.is_detected());

        let relaxed = DotParams {
            max_dispersion: 1.0 + 1e-9,
            ..base
        };
        let m = finder(relaxed).find_in_frame(&img.view()).expect("find");
        assert_eq!(m.position, Some(Point2::new(4.0, 4.0)));
    }

    #[test]
    fn fractional_centroid_dispersion_at_bound_is_rejected() {
        let mut img = bright(128, 128);
        for (x, y) in [(48, 23), (77, 8), (114, 76)] {
            img.set(x, y, 0);
        }
        let base = DotParams {
            luminance_threshold: 12,
            pct_dark_low: 0.01,
            pct_dark_high: 1.0,
            max_dispersion: 39.75480404233487,
        };

        let at_bound = finder(base).find_in_frame(&img.view()).expect("find");
        assert_eq!(at_bound.dispersion, base.max_dispersion);
        assert!(!at_bound.is_detected());

        let relaxed = DotParams {
            max_dispersion: 39.7549,
            ..base
        };
        let m = finder(relaxed).find_in_frame(&img.view()).expect("find");
        assert_eq!(m.position, Some(Point2::new(239.0 / 3.0, 107.0 / 3.0)));
    }

    #[test]
    fn percentage_equal_to_bound_is_rejected() {
        let mut img = bright(10, 10);
        img.set(0, 0, 0);
        img.set(1, 0, 0);
        let params = DotParams {
            luminance_threshold: 12,
            pct_dark_low: 2.0,
            pct_dark_high: 10.0,
            max_dispersion: 100.0,
        };
        assert!(!finder(params)
            .find_in_frame(&img.view())
            .expect("find")
            .is_detected());
    }

    #[test]
    fn scattered_noise_is_rejected_while_blob_is_accepted() {
        let params = DotParams {
            luminance_threshold: 12,
            pct_dark_low: 0.1,
            pct_dark_high: 1.0,
            max_dispersion: 4.0,
        };

        let mut blob = bright(64, 64);
        paint(&mut blob, 30, 30, 4, 4);
        let m = finder(params).find_in_frame(&blob.view()).expect("find");
        assert!(m.is_detected());

        let mut noise = bright(64, 64);
        for k in 0..16usize {
            noise.set((k * 13) % 64, (k * 29) % 64, 0);
        }
        let m = finder(params).find_in_frame(&noise.view()).expect("find");
        assert_eq!(m.n_dark, 16);
        assert!(!m.is_detected());
    }

    #[test]
    fn exclusion_hides_reference_dot() {
        let mut img = bright(40, 40);
        paint(&mut img, 5, 5, 3, 3);
        paint(&mut img, 30, 30, 3, 3);
        let search = Rect::new(0, 40, 0, 40).expect("rect");
        let reference = Rect::new(25, 40, 25, 40).expect("rect");
        let params = DotParams {
            luminance_threshold: 12,
            pct_dark_low: 0.1,
            pct_dark_high: 1.0,
            max_dispersion: 3.0,
        };
        let f = finder(params);

        let with_both = f
            .find(&img.view(), &search, None, img.data.len())
            .expect("find");
        assert!(!with_both.is_detected(), "both blobs counted");
        assert_eq!(with_both.n_dark, 18);

        let excluded = f
            .find(&img.view(), &search, Some(&reference), img.data.len())
            .expect("find");
        assert_eq!(excluded.n_dark, 9);
        assert_eq!(excluded.position, Some(Point2::new(6.0, 6.0)));
    }

    #[test]
    fn exclusion_is_translated_into_region_frame() {
        let mut img = bright(40, 40);
        paint(&mut img, 22, 22, 2, 2);
        let region = Rect::new(20, 30, 20, 30).expect("rect");
        let exclude = Rect::new(22, 24, 22, 24).expect("rect");
        let mask = finder(DotParams::default())
            .region_mask(&img.view(), &region, Some(&exclude))
            .expect("mask");
        assert_eq!(mask.width(), 10);
        assert_eq!(mask.count(), 0);
    }

    #[test]
    fn region_outside_frame_is_an_error() {
        let img = bright(16, 16);
        let region = Rect::new(10, 20, 0, 5).expect("rect");
        let err = finder(DotParams::default())
            .find(&img.view(), &region, None, img.data.len())
            .unwrap_err();
        assert!(matches!(err, FindError::Image(_)));
    }

    #[test]
    fn zero_denominator_is_an_error() {
        let img = bright(4, 4);
        let region = Rect::new(0, 4, 0, 4).expect("rect");
        assert_eq!(
            finder(DotParams::default())
                .find(&img.view(), &region, None, 0)
                .unwrap_err(),
            FindError::ZeroDenominator
        );
    }
}
