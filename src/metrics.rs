//! Region-overlap metrics for binary masks.
//!
//! Dice and IoU over a (ground truth, prediction) pair of boolean grids,
//! stabilized with a small additive epsilon so empty masks never divide by
//! zero. Both metrics live in `(0, 1]`; for any pair, `dice >= iou` up to
//! the stabilizer.

use imgref::ImgRef;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Additive stabilizer preventing division by zero on empty masks.
pub const EPS: f64 = 1e-8;

/// Role-specific binarization thresholds.
///
/// Predictions and ground truth often come from different encoding
/// conventions: prediction maps are a clean 0/255 or 0/1 signal, while
/// ground truth drawn as a color overlay and converted to grayscale puts
/// positive pixels at low intensity. The ground-truth threshold is per-mask
/// calibration, not a derived constant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    /// Threshold for prediction masks.
    pub pred: f32,
    /// Threshold for ground-truth masks.
    pub gt: f32,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self { pred: 0.5, gt: 0.5 }
    }
}

impl Thresholds {
    /// Thresholds with explicit per-role values.
    #[must_use]
    pub fn new(pred: f32, gt: f32) -> Self {
        Self { pred, gt }
    }

    /// Calibration for color-derived ground truth, where positive pixels
    /// render at low grayscale intensity.
    #[must_use]
    pub fn low_gt() -> Self {
        Self { pred: 0.5, gt: 0.1 }
    }
}

/// Foreground pixel counts shared by the overlap metrics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Overlap {
    /// Pixels foreground in both masks.
    pub intersection: u64,
    /// Pixels foreground in either mask.
    pub union: u64,
    /// Foreground pixels in the ground truth.
    pub gt_area: u64,
    /// Foreground pixels in the prediction.
    pub pred_area: u64,
}

impl Overlap {
    /// Dice coefficient: `(2i + eps) / (|gt| + |pred| + eps)`.
    #[must_use]
    pub fn dice(&self) -> f64 {
        (2.0 * self.intersection as f64 + EPS) / ((self.gt_area + self.pred_area) as f64 + EPS)
    }

    /// Intersection over union: `(i + eps) / (u + eps)`.
    #[must_use]
    pub fn iou(&self) -> f64 {
        (self.intersection as f64 + EPS) / (self.union as f64 + EPS)
    }

    /// Both metrics as a serializable pair.
    #[must_use]
    pub fn metrics(&self) -> PairMetrics {
        PairMetrics {
            dice: self.dice(),
            iou: self.iou(),
        }
    }
}

/// Dice and IoU for one evaluated pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PairMetrics {
    /// Dice coefficient in `(0, 1]`.
    pub dice: f64,
    /// Intersection over union in `(0, 1]`.
    pub iou: f64,
}

/// Count overlap between two boolean grids of identical dimensions.
///
/// # Errors
///
/// Returns [`Error::ShapeMismatch`] when the grids differ in size. Shape
/// reconciliation runs before binarization in the evaluation pipeline, so
/// hitting this from the pipeline is a bug, not a data problem.
pub fn overlap(gt: ImgRef<'_, bool>, pred: ImgRef<'_, bool>) -> Result<Overlap> {
    if (gt.width(), gt.height()) != (pred.width(), pred.height()) {
        return Err(Error::ShapeMismatch {
            expected: (pred.width(), pred.height()),
            actual: (gt.width(), gt.height()),
        });
    }

    let mut counts = Overlap::default();
    for (g, p) in gt.pixels().zip(pred.pixels()) {
        counts.gt_area += u64::from(g);
        counts.pred_area += u64::from(p);
        counts.intersection += u64::from(g && p);
        counts.union += u64::from(g || p);
    }
    Ok(counts)
}
