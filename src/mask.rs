//! Grayscale mask loading, shape reconciliation, and binarization.
//!
//! Masks arrive as single-channel image files with two common encodings:
//! 8-bit intensities in `0..=255` (clean 0/255 prediction output, or color
//! label overlays converted to grayscale) and normalized floats in `[0, 1]`
//! (probability maps). [`GrayMask`] keeps the source scale intact so that
//! [`GrayMask::binarize`] can pick the right rescale convention.

use std::path::Path;

use image::DynamicImage;
use imgref::{ImgRef, ImgVec};

use crate::error::{Error, Result};

/// Recognized mask image extensions (lowercase).
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "tif", "tiff"];

/// True when the path carries a recognized mask image extension.
#[must_use]
pub fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .is_some_and(|e| IMAGE_EXTENSIONS.contains(&e.as_str()))
}

/// Single-channel intensity grid.
///
/// 8-bit and 16-bit sources keep `0..=255` sample values; float sources keep
/// their `[0, 1]` values.
#[derive(Debug, Clone)]
pub struct GrayMask {
    samples: ImgVec<f32>,
}

impl GrayMask {
    /// Build a mask from raw row-major samples.
    ///
    /// # Panics
    ///
    /// Panics if `samples.len() != width * height`.
    #[must_use]
    pub fn from_raw(samples: Vec<f32>, width: usize, height: usize) -> Self {
        assert_eq!(samples.len(), width * height);
        Self {
            samples: ImgVec::new(samples, width, height),
        }
    }

    /// Load a mask image as a single-channel intensity grid.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ImageRead`] when the file does not exist or cannot
    /// be decoded as an image.
    pub fn load(path: &Path) -> Result<Self> {
        let decoded = image::open(path).map_err(|e| Error::ImageRead {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Ok(Self::from_dynamic(&decoded))
    }

    /// Convert a decoded image to a single-channel grid, preserving the
    /// source's value scale.
    #[must_use]
    pub fn from_dynamic(image: &DynamicImage) -> Self {
        match image {
            // Float sources stay in [0, 1].
            DynamicImage::ImageRgb32F(_) | DynamicImage::ImageRgba32F(_) => {
                let luma = image.to_luma32f();
                let (width, height) = (luma.width() as usize, luma.height() as usize);
                Self {
                    samples: ImgVec::new(luma.into_raw(), width, height),
                }
            }
            // Everything else lands on the 0..=255 scale.
            _ => {
                let luma = image.to_luma8();
                let (width, height) = (luma.width() as usize, luma.height() as usize);
                let samples = luma.into_raw().into_iter().map(f32::from).collect();
                Self {
                    samples: ImgVec::new(samples, width, height),
                }
            }
        }
    }

    /// Mask width in pixels.
    #[must_use]
    pub fn width(&self) -> usize {
        self.samples.width()
    }

    /// Mask height in pixels.
    #[must_use]
    pub fn height(&self) -> usize {
        self.samples.height()
    }

    /// Dimensions as (width, height).
    #[must_use]
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width(), self.height())
    }

    /// Borrow the intensity samples.
    #[must_use]
    pub fn samples(&self) -> ImgRef<'_, f32> {
        self.samples.as_ref()
    }

    /// Largest sample value, 0.0 for an empty grid.
    #[must_use]
    pub fn max_value(&self) -> f32 {
        self.samples.as_ref().pixels().fold(0.0_f32, f32::max)
    }

    /// Resample to the given dimensions with nearest-neighbor sampling.
    ///
    /// Every output pixel copies the value of one source pixel, so no
    /// intermediate intensity values appear and label structure survives.
    /// Returns a plain clone when the dimensions already match.
    #[must_use]
    pub fn resize_nearest(&self, width: usize, height: usize) -> Self {
        if (width, height) == self.dimensions() {
            return self.clone();
        }

        let src = self.samples.as_ref();
        let (src_w, src_h) = (src.width(), src.height());
        let buf = src.buf();
        let stride = src.stride();

        let mut out = Vec::with_capacity(width * height);
        for y in 0..height {
            let sy = (y * src_h / height).min(src_h - 1);
            for x in 0..width {
                let sx = (x * src_w / width).min(src_w - 1);
                out.push(buf[sy * stride + sx]);
            }
        }

        Self {
            samples: ImgVec::new(out, width, height),
        }
    }

    /// Threshold the grid into a boolean mask.
    ///
    /// Grids whose maximum exceeds 1.5 are treated as `0..=255` encoded and
    /// divided by 255 first; grids already in `[0, 1]` (including all-zero
    /// grids) pass through unchanged. A pixel is foreground when its
    /// normalized value is `>= threshold`.
    #[must_use]
    pub fn binarize(&self, threshold: f32) -> ImgVec<bool> {
        let scale = if self.max_value() > 1.5 { 1.0 / 255.0 } else { 1.0 };
        let bits = self
            .samples
            .as_ref()
            .pixels()
            .map(|v| v * scale >= threshold)
            .collect();
        ImgVec::new(bits, self.width(), self.height())
    }
}

/// Resize the ground truth to the prediction's dimensions when they differ.
///
/// The returned mask always has the prediction's dimensions.
#[must_use]
pub fn reconcile(pred: &GrayMask, gt: GrayMask) -> GrayMask {
    if gt.dimensions() == pred.dimensions() {
        gt
    } else {
        gt.resize_nearest(pred.width(), pred.height())
    }
}
