//! Centroid and dispersion of a set of dark samples.

use dot_align_core::GridPoint;
use nalgebra::Point2;
use serde::{Serialize, Serializer};

/// Summary of a point set.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct BlobStats {
    pub count: usize,
    /// Mean position; `(0, 0)` for an empty set.
    pub centroid: Point2<f64>,
    /// Root-mean-square distance of the points from the centroid.
    /// `+inf` for an empty set, so no finite bound ever accepts it.
    #[serde(serialize_with = "serialize_finite")]
    pub dispersion: f64,
}

/// Count, centroid and dispersion of `points`.
///
/// The centroid comes from a first pass; the second pass sums squared
/// deviations from it directly, so the result does not suffer the
/// cancellation of the `sum(x^2) - n * mean^2` shortcut near a bound.
pub fn blob_stats<I>(points: I) -> BlobStats
where
    I: IntoIterator<Item = GridPoint>,
    I::IntoIter: Clone,
{
    let points = points.into_iter();
    let (n, sx, sy) = points.clone().fold((0usize, 0.0f64, 0.0f64), |(n, sx, sy), p| {
        (n + 1, sx + p.x as f64, sy + p.y as f64)
    });

    if n == 0 {
        return BlobStats {
            count: 0,
            centroid: Point2::origin(),
            dispersion: f64::INFINITY,
        };
    }

    let nf = n as f64;
    let centroid = Point2::new(sx / nf, sy / nf);
    let mut spread = 0.0f64;
    for p in points {
        let dx = p.x as f64 - centroid.x;
        let dy = p.y as f64 - centroid.y;
        spread += dx * dx + dy * dy;
    }

    BlobStats {
        count: n,
        centroid,
        dispersion: (spread / nf).sqrt(),
    }
}

/// Serialize a non-finite value (the empty-set dispersion) as `None`.
pub(crate) fn serialize_finite<S>(value: &f64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    value.is_finite().then_some(*value).serialize(serializer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn square(cx: i32, cy: i32, half: i32) -> Vec<GridPoint> {
        let mut v = Vec::new();
        for y in cy - half..=cy + half {
            for x in cx - half..=cx + half {
                v.push(GridPoint::new(x, y));
            }
        }
        v
    }

    #[test]
    fn empty_set_has_infinite_dispersion() {
        let s = blob_stats(std::iter::empty());
        assert_eq!(s.count, 0);
        assert_eq!(s.centroid, Point2::new(0.0, 0.0));
        assert!(s.dispersion.is_infinite() && s.dispersion > 0.0);
    }

    #[test]
    fn single_point_has_zero_dispersion() {
        let s = blob_stats([GridPoint::new(7, 3)]);
        assert_eq!(s.centroid, Point2::new(7.0, 3.0));
        assert_eq!(s.dispersion, 0.0);
    }

    #[test]
    fn three_by_three_square() {
        let s = blob_stats(square(10, 10, 1));
        assert_eq!(s.count, 9);
        assert_eq!(s.centroid, Point2::new(10.0, 10.0));
        // sqrt(12 / 9)
        assert_relative_eq!(s.dispersion, 2.0 / 3.0f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn two_points_are_one_apart_from_their_mean() {
        let s = blob_stats([GridPoint::new(0, 0), GridPoint::new(2, 0)]);
        assert_eq!(s.centroid, Point2::new(1.0, 0.0));
        assert_eq!(s.dispersion, 1.0);
    }

    #[test]
    fn scattered_points_spread_more_than_compact_ones() {
        let compact = blob_stats(square(50, 50, 2));
        let scattered = blob_stats(
            (0..25).map(|k| GridPoint::new((k * 37) % 100, (k * 53) % 100)),
        );
        assert_eq!(compact.count, scattered.count);
        assert!(scattered.dispersion > 5.0 * compact.dispersion);
    }

    #[test]
    fn dispersion_sums_deviations_from_the_centroid() {
        let pts = [
            GridPoint::new(48, 23),
            GridPoint::new(77, 8),
            GridPoint::new(114, 76),
        ];
        let n = pts.len() as f64;
        let cx = pts.iter().map(|p| p.x as f64).sum::<f64>() / n;
        let cy = pts.iter().map(|p| p.y as f64).sum::<f64>() / n;
        let mut acc = 0.0;
        for p in &pts {
            let (dx, dy) = (p.x as f64 - cx, p.y as f64 - cy);
            acc += dx * dx + dy * dy;
        }
        let definition = (acc / n).sqrt();

        let s = blob_stats(pts);
        assert_eq!(s.dispersion, definition);
        assert_eq!(s.dispersion, 39.75480404233487);
        assert_eq!(s.centroid, Point2::new(239.0 / 3.0, 107.0 / 3.0));
    }

    #[test]
    fn empty_dispersion_serializes_as_null() {
        let json = serde_json::to_value(blob_stats(std::iter::empty())).expect("json");
        assert_eq!(json["dispersion"], serde_json::Value::Null);
        let json = serde_json::to_value(blob_stats([GridPoint::new(0, 0), GridPoint::new(2, 0)]))
            .expect("json");
        assert_eq!(json["dispersion"], 1.0);
    }

    #[test]
    fn dispersion_is_never_negative() {
        for pts in [
            vec![GridPoint::new(100000, 100000); 4],
            square(-3, 8, 4),
            vec![GridPoint::new(1, 1), GridPoint::new(1, 2)],
        ] {
            assert!(blob_stats(pts).dispersion >= 0.0);
        }
    }
}
