//! Half-open pixel rectangles and the point arithmetic around them.

use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// Integer pixel coordinate (`x` = column, `y` = row).
pub type GridPoint = Point2<i32>;

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryError {
    #[error(
        "degenerate rectangle [{left}, {right}) x [{top}, {bottom}): right must exceed left and bottom must exceed top"
    )]
    Degenerate {
        left: i32,
        right: i32,
        top: i32,
        bottom: i32,
    },
    #[error("rectangle coordinate {0} is outside the supported range (-2^30, 2^30)")]
    CoordinateOutOfRange(i32),
}

/// Exclusive bound on the magnitude of a rectangle coordinate. Any
/// difference of two in-range coordinates fits in `i32`.
pub const COORD_LIMIT: i32 = 1 << 30;

/// Axis-aligned rectangle covering `[left, right) x [top, bottom)`.
///
/// A `Rect` always has positive area; both constructors and the serde
/// decoder reject anything else.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RectRepr", into = "RectRepr")]
pub struct Rect {
    left: i32,
    right: i32,
    top: i32,
    bottom: i32,
}

#[derive(Serialize, Deserialize)]
struct RectRepr {
    left: i32,
    right: i32,
    top: i32,
    bottom: i32,
}

impl TryFrom<RectRepr> for Rect {
    type Error = GeometryError;

    fn try_from(r: RectRepr) -> Result<Self, Self::Error> {
        Rect::new(r.left, r.right, r.top, r.bottom)
    }
}

impl From<Rect> for RectRepr {
    fn from(r: Rect) -> Self {
        RectRepr {
            left: r.left,
            right: r.right,
            top: r.top,
            bottom: r.bottom,
        }
    }
}

impl Rect {
    pub fn new(left: i32, right: i32, top: i32, bottom: i32) -> Result<Self, GeometryError> {
        if let Some(&c) = [left, right, top, bottom]
            .iter()
            .find(|c| c.unsigned_abs() >= COORD_LIMIT as u32)
        {
            return Err(GeometryError::CoordinateOutOfRange(c));
        }
        if right <= left || bottom <= top {
            return Err(GeometryError::Degenerate {
                left,
                right,
                top,
                bottom,
            });
        }
        Ok(Self {
            left,
            right,
            top,
            bottom,
        })
    }

    /// Rectangle anchored at the origin, e.g. the bounds of a whole frame.
    pub fn from_size(width: usize, height: usize) -> Result<Self, GeometryError> {
        Self::new(0, clamp_dim(width), 0, clamp_dim(height))
    }

    #[inline]
    pub fn left(&self) -> i32 {
        self.left
    }

    #[inline]
    pub fn right(&self) -> i32 {
        self.right
    }

    #[inline]
    pub fn top(&self) -> i32 {
        self.top
    }

    #[inline]
    pub fn bottom(&self) -> i32 {
        self.bottom
    }

    #[inline]
    pub fn width(&self) -> usize {
        (self.right - self.left) as usize
    }

    #[inline]
    pub fn height(&self) -> usize {
        (self.bottom - self.top) as usize
    }

    /// Number of grid points covered.
    #[inline]
    pub fn area(&self) -> usize {
        self.width() * self.height()
    }

    #[inline]
    pub fn top_left(&self) -> GridPoint {
        GridPoint::new(self.left, self.top)
    }

    #[inline]
    pub fn contains(&self, p: GridPoint) -> bool {
        p.x >= self.left && p.x < self.right && p.y >= self.top && p.y < self.bottom
    }

    /// `true` if every grid point of `other` is also inside `self`.
    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.left >= self.left
            && other.right <= self.right
            && other.top >= self.top
            && other.bottom <= self.bottom
    }

    /// Express an absolute point in this rectangle's local frame, where the
    /// top-left corner is `(0, 0)`.
    #[inline]
    pub fn relative_point(&self, p: Point2<f64>) -> Point2<f64> {
        p - self.top_left().cast::<f64>().coords
    }

    /// Inverse of [`Rect::relative_point`].
    #[inline]
    pub fn absolute_point(&self, local: Point2<f64>) -> Point2<f64> {
        local + self.top_left().cast::<f64>().coords
    }

    /// Translate `other` into this rectangle's local frame.
    ///
    /// The result keeps `other`'s size; it may extend past this rectangle or
    /// lie entirely outside it. Its coordinates may exceed [`COORD_LIMIT`]
    /// but always fit in `i32`.
    pub fn relative_rect(&self, other: &Rect) -> Rect {
        Rect {
            left: other.left - self.left,
            right: other.right - self.left,
            top: other.top - self.top,
            bottom: other.bottom - self.top,
        }
    }

    /// All grid points inside the rectangle, in row-major order.
    pub fn points(&self) -> impl Iterator<Item = GridPoint> + Clone {
        let Rect {
            left, right, top, ..
        } = *self;
        (top..self.bottom).flat_map(move |y| (left..right).map(move |x| GridPoint::new(x, y)))
    }

    /// Grid points inside `self` but not inside `inner`, in row-major order.
    ///
    /// `inner` does not need to be nested in `self`; the result is the exact
    /// set difference either way.
    pub fn points_outside(&self, inner: &Rect) -> impl Iterator<Item = GridPoint> + Clone {
        let inner = *inner;
        self.points().filter(move |p| !inner.contains(*p))
    }
}

fn clamp_dim(v: usize) -> i32 {
    i32::try_from(v).unwrap_or(i32::MAX)
}
