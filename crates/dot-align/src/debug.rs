//! Debug renderings of a frame and its analysis.
//!
//! These only read the frame, the configuration and a finished report; they
//! never feed back into classification.

use dot_align_core::{GrayImage, GrayImageView, GridPoint, Rect};
use nalgebra::Point2;

use crate::analyze::{AnalyzeError, FrameAnalyzer, FrameReport};
use crate::config::AlignmentConfig;

const MARK_ARM: i32 = 3;

/// Black/white rendering of the whole frame: `0` where the sample is at or
/// below `threshold`, `255` elsewhere.
pub fn threshold_image(frame: &GrayImageView<'_>, threshold: u8) -> GrayImage {
    GrayImage {
        width: frame.width,
        height: frame.height,
        data: frame
            .data
            .iter()
            .map(|&v| if v > threshold { 255 } else { 0 })
            .collect(),
    }
}

/// Frame-sized rendering of what the analysis counted as dark: each region's
/// mask (own threshold, reference region excluded from the primary) pasted
/// at its position, `0` for dark and `255` elsewhere.
pub fn mask_image(
    frame: &GrayImageView<'_>,
    analyzer: &FrameAnalyzer,
) -> Result<GrayImage, AnalyzeError> {
    let (primary, reference) = analyzer.region_masks(frame)?;
    let config = analyzer.config();
    let mut out = GrayImage::filled(frame.width, frame.height, 255);
    // the reference mask goes last: its region is the primary's exclusion
    paste(&mut out, &primary.to_image(), &config.primary.region);
    paste(&mut out, &reference.to_image(), &config.reference.region);
    Ok(out)
}

/// Copy of the frame with everything outside the primary search region
/// dimmed, the reference region outlined, detected dots marked with a white
/// cross and the expected primary position with a black one.
pub fn overlay_image(
    frame: &GrayImageView<'_>,
    config: &AlignmentConfig,
    report: &FrameReport,
) -> GrayImage {
    let mut out = GrayImage {
        width: frame.width,
        height: frame.height,
        data: frame.data.to_vec(),
    };
    let Ok(bounds) = frame.bounds() else {
        return out;
    };

    for p in bounds.points_outside(&config.primary.region) {
        let (x, y) = (p.x as usize, p.y as usize);
        out.set(x, y, out.get(x, y) / 4);
    }

    outline(&mut out, &bounds, &config.reference.region, 128);

    for position in [report.primary.position, report.reference.position]
        .into_iter()
        .flatten()
    {
        cross(&mut out, &bounds, position, 255);
    }
    if let Some(expected) = report.target.expected {
        cross(&mut out, &bounds, expected, 0);
    }

    out
}

// `at` lies inside `dst`: configured regions are validated against the frame
fn paste(dst: &mut GrayImage, src: &GrayImage, at: &Rect) {
    for p in at.points() {
        let local = p - at.top_left().coords;
        dst.set(
            p.x as usize,
            p.y as usize,
            src.get(local.x as usize, local.y as usize),
        );
    }
}

fn put(img: &mut GrayImage, bounds: &Rect, p: GridPoint, value: u8) {
    if bounds.contains(p) {
        img.set(p.x as usize, p.y as usize, value);
    }
}

fn cross(img: &mut GrayImage, bounds: &Rect, center: Point2<f64>, value: u8) {
    let c = GridPoint::new(center.x.round() as i32, center.y.round() as i32);
    for d in -MARK_ARM..=MARK_ARM {
        put(img, bounds, GridPoint::new(c.x + d, c.y), value);
        put(img, bounds, GridPoint::new(c.x, c.y + d), value);
    }
}

fn outline(img: &mut GrayImage, bounds: &Rect, region: &Rect, value: u8) {
    // 1px inset keeps the border inside the half-open region
    for p in region.points().filter(|p| {
        p.x == region.left()
            || p.x == region.right() - 1
            || p.y == region.top()
            || p.y == region.bottom() - 1
    }) {
        put(img, bounds, p, value);
    }
}
