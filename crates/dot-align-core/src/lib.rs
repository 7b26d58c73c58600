//! Core types and utilities for dot alignment checks.
//!
//! This crate is intentionally small and purely geometric. It knows about
//! half-open pixel rectangles, real-valued points and 8-bit luminance frames,
//! but nothing about what a "dot" is.

mod geometry;
mod image;
mod logger;

pub use geometry::{GeometryError, GridPoint, Rect, COORD_LIMIT};
pub use image::{GrayImage, GrayImageView, ImageError};

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::{begin_frame, end_frame, init_with_level};

pub use nalgebra::{Point2, Vector2};
