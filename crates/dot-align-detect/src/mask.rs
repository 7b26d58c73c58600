//! Dark-pixel masking.

use dot_align_core::{GrayImage, GrayImageView, GridPoint, Rect};

/// Boolean mask over a (usually cropped) frame, `true` where the sample is
/// dark and not excluded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DarkMask {
    width: usize,
    height: usize,
    data: Vec<bool>,
    count: usize,
}

/// Classify every sample of `img` as dark (`<= threshold`) or not.
///
/// `exclude` is given in `img`'s own coordinates; samples inside it are never
/// dark. The dark count is produced together with the mask.
pub fn dark_mask(img: &GrayImageView<'_>, threshold: u8, exclude: Option<&Rect>) -> DarkMask {
    let width = img.width;
    let (data, count) = img.data.iter().enumerate().fold(
        (Vec::with_capacity(img.data.len()), 0usize),
        |(mut data, count), (idx, &v)| {
            let p = GridPoint::new((idx % width) as i32, (idx / width) as i32);
            let dark = v <= threshold && !exclude.is_some_and(|r| r.contains(p));
            data.push(dark);
            (data, count + usize::from(dark))
        },
    );

    DarkMask {
        width,
        height: img.height,
        data,
        count,
    }
}

impl DarkMask {
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of dark samples.
    #[inline]
    pub fn count(&self) -> usize {
        self.count
    }

    #[inline]
    pub fn is_dark(&self, x: usize, y: usize) -> bool {
        self.data[y * self.width + x]
    }

    /// Local coordinates of dark samples, row-major.
    pub fn dark_points(&self) -> impl Iterator<Item = GridPoint> + Clone + '_ {
        let width = self.width;
        self.data
            .iter()
            .enumerate()
            .filter(|&(_, &dark)| dark)
            .map(move |(idx, _)| GridPoint::new((idx % width) as i32, (idx / width) as i32))
    }

    /// Render as a luminance image: dark samples become `0`, the rest `255`.
    pub fn to_image(&self) -> GrayImage {
        GrayImage {
            width: self.width,
            height: self.height,
            data: self
                .data
                .iter()
                .map(|&dark| if dark { 0 } else { 255 })
                .collect(),
        }
    }
}
