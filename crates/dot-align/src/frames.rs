//! Frame files via the `image` crate.

use std::path::Path;

use dot_align_core::{GrayImage, GrayImageView};
use image::ImageReader;

#[derive(thiserror::Error, Debug)]
pub enum FrameIoError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Image(#[from] image::ImageError),
    #[error("image buffer does not match {width}x{height}")]
    Buffer { width: usize, height: usize },
}

/// Adapt an `image::GrayImage` to the core view type.
pub fn gray_view(img: &::image::GrayImage) -> GrayImageView<'_> {
    GrayImageView {
        width: img.width() as usize,
        height: img.height() as usize,
        data: img.as_raw(),
    }
}

/// Decode any supported image file into an 8-bit luminance frame.
pub fn load_frame(path: impl AsRef<Path>) -> Result<GrayImage, FrameIoError> {
    let luma = ImageReader::open(path)?.decode()?.to_luma8();
    let width = luma.width() as usize;
    let height = luma.height() as usize;
    GrayImage::new(width, height, luma.into_raw())
        .map_err(|_| FrameIoError::Buffer { width, height })
}

/// Write a luminance frame; the format follows the file extension.
pub fn save_frame(img: &GrayImage, path: impl AsRef<Path>) -> Result<(), FrameIoError> {
    let (width, height) = (img.width, img.height);
    let buffer = ::image::GrayImage::from_raw(width as u32, height as u32, img.data.clone())
        .ok_or(FrameIoError::Buffer { width, height })?;
    buffer.save(path)?;
    Ok(())
}
