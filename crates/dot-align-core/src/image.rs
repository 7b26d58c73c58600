use crate::geometry::Rect;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ImageError {
    #[error("invalid luminance buffer length (expected {expected} samples, got {got})")]
    BufferLength { expected: usize, got: usize },
    #[error("invalid frame dimensions (width={width}, height={height})")]
    Dimensions { width: usize, height: usize },
    #[error("region {region:?} is outside the {width}x{height} frame")]
    RegionOutOfBounds {
        region: Rect,
        width: usize,
        height: usize,
    },
}

/// Borrowed single-channel luminance frame.
#[derive(Clone, Copy, Debug)]
pub struct GrayImageView<'a> {
    pub width: usize,
    pub height: usize,
    pub data: &'a [u8], // row-major, len = w*h
}

/// Owned single-channel luminance frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GrayImage {
    pub width: usize,
    pub height: usize,
    pub data: Vec<u8>,
}

fn check_shape(width: usize, height: usize, len: usize) -> Result<(), ImageError> {
    if width == 0 || height == 0 {
        return Err(ImageError::Dimensions { width, height });
    }
    let expected = width
        .checked_mul(height)
        .ok_or(ImageError::Dimensions { width, height })?;
    if len != expected {
        return Err(ImageError::BufferLength { expected, got: len });
    }
    Ok(())
}

impl<'a> GrayImageView<'a> {
    /// Wrap a row-major buffer, failing if its length is not `width * height`.
    pub fn new(width: usize, height: usize, data: &'a [u8]) -> Result<Self, ImageError> {
        check_shape(width, height, data.len())?;
        Ok(Self {
            width,
            height,
            data,
        })
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.data[y * self.width + x]
    }

    #[inline]
    pub fn row(&self, y: usize) -> &'a [u8] {
        let start = y * self.width;
        &self.data[start..start + self.width]
    }

    /// Total sample count.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn bounds(&self) -> Result<Rect, ImageError> {
        Rect::from_size(self.width, self.height).map_err(|_| ImageError::Dimensions {
            width: self.width,
            height: self.height,
        })
    }

    /// Copy `region` out of the frame as a new `region.width() x region.height()`
    /// image. Regions that are not fully inside the frame are rejected.
    pub fn crop(&self, region: &Rect) -> Result<GrayImage, ImageError> {
        if !self.bounds()?.contains_rect(region) {
            return Err(ImageError::RegionOutOfBounds {
                region: *region,
                width: self.width,
                height: self.height,
            });
        }

        let x0 = region.left() as usize;
        let x1 = region.right() as usize;
        let mut data = Vec::with_capacity(region.area());
        for y in region.top() as usize..region.bottom() as usize {
            data.extend_from_slice(&self.row(y)[x0..x1]);
        }

        Ok(GrayImage {
            width: region.width(),
            height: region.height(),
            data,
        })
    }
}

impl GrayImage {
    pub fn new(width: usize, height: usize, data: Vec<u8>) -> Result<Self, ImageError> {
        check_shape(width, height, data.len())?;
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Uniform image of the given value.
    pub fn filled(width: usize, height: usize, value: u8) -> Self {
        Self {
            width,
            height,
            data: vec![value; width * height],
        }
    }

    #[inline]
    pub fn view(&self) -> GrayImageView<'_> {
        GrayImageView {
            width: self.width,
            height: self.height,
            data: &self.data,
        }
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.data[y * self.width + x]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, value: u8) {
        self.data[y * self.width + x] = value;
    }

    /// Set every sample of `region` that falls inside the image.
    pub fn fill_rect(&mut self, region: &Rect, value: u8) {
        let Ok(bounds) = Rect::from_size(self.width, self.height) else {
            return;
        };
        for p in region.points().filter(|p| bounds.contains(*p)) {
            self.set(p.x as usize, p.y as usize, value);
        }
    }
}
