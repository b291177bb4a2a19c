//! Per-dataset evaluation: pair iteration, reconciliation, metrics.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::eval::pairs::{PairOutcome, PairSource, SkipReason};
use crate::mask::reconcile;
use crate::metrics::{PairMetrics, Thresholds, overlap};
use crate::stats::{Summary, mean};

/// Metrics for one evaluated pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PairResult {
    /// Shared file name joining the pair.
    pub name: String,
    /// Dice and IoU for the pair.
    #[serde(flatten)]
    pub metrics: PairMetrics,
}

/// Everything one dataset evaluation produced.
#[derive(Debug, Clone, Default)]
pub struct DatasetEval {
    /// Per-pair results, in source order.
    pub pairs: Vec<PairResult>,
    /// Skipped prediction files, in source order.
    pub skipped: Vec<(String, SkipReason)>,
}

impl DatasetEval {
    /// Number of valid pairs evaluated.
    #[must_use]
    pub fn n_images(&self) -> usize {
        self.pairs.len()
    }

    /// Mean Dice over valid pairs, `None` when there are none.
    #[must_use]
    pub fn mean_dice(&self) -> Option<f64> {
        mean(&self.dice_values())
    }

    /// Mean IoU over valid pairs, `None` when there are none.
    #[must_use]
    pub fn mean_iou(&self) -> Option<f64> {
        mean(&self.iou_values())
    }

    /// Descriptive statistics over the per-pair Dice values.
    #[must_use]
    pub fn dice_summary(&self) -> Option<Summary> {
        Summary::compute(&self.dice_values())
    }

    /// Descriptive statistics over the per-pair IoU values.
    #[must_use]
    pub fn iou_summary(&self) -> Option<Summary> {
        Summary::compute(&self.iou_values())
    }

    fn dice_values(&self) -> Vec<f64> {
        self.pairs.iter().map(|p| p.metrics.dice).collect()
    }

    fn iou_values(&self) -> Vec<f64> {
        self.pairs.iter().map(|p| p.metrics.iou).collect()
    }
}

/// Evaluate every pair a source yields.
///
/// For each ready pair: reconcile the ground truth to the prediction's
/// dimensions, binarize each mask with its role threshold, count overlap.
/// Per-pair work is pure, so it runs on rayon; collection preserves the
/// source's order, keeping aggregates and skip lists deterministic.
pub fn evaluate_pairs(source: &dyn PairSource, thresholds: Thresholds) -> Result<DatasetEval> {
    let mut ready = Vec::new();
    let mut skipped = Vec::new();
    for outcome in source.load_pairs()? {
        match outcome {
            PairOutcome::Ready { name, pred, gt } => ready.push((name, pred, gt)),
            PairOutcome::Skipped { name, reason } => skipped.push((name, reason)),
        }
    }

    let pairs = ready
        .into_par_iter()
        .map(|(name, pred, gt)| {
            let gt = reconcile(&pred, gt);
            let pred_bin = pred.binarize(thresholds.pred);
            let gt_bin = gt.binarize(thresholds.gt);
            let counts = overlap(gt_bin.as_ref(), pred_bin.as_ref())?;
            Ok(PairResult {
                name,
                metrics: counts.metrics(),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(DatasetEval { pairs, skipped })
}
