//! Pair sources: where (prediction, ground truth, name) triples come from.
//!
//! The evaluator only sees the [`PairSource`] trait, so tests can feed
//! in-memory fixtures instead of real directories.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::mask::{GrayMask, is_image_file};

/// Why a prediction file was skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// No same-named file exists in the ground-truth directory.
    MissingGroundTruth,
    /// Either side of the pair failed to decode.
    Unreadable(String),
}

impl SkipReason {
    /// Warning text for the console trace.
    #[must_use]
    pub fn warning(&self, name: &str) -> String {
        match self {
            Self::MissingGroundTruth => format!("No GT for {name}, skipping"),
            Self::Unreadable(_) => format!("Failed to read {name}, skipping"),
        }
    }
}

/// Outcome of resolving one prediction file against the ground truth.
#[derive(Debug, Clone)]
pub enum PairOutcome {
    /// Both masks loaded; ready for metric computation.
    Ready {
        /// Shared file name joining the pair.
        name: String,
        /// Prediction mask.
        pred: GrayMask,
        /// Ground-truth mask.
        gt: GrayMask,
    },
    /// The pair is unusable and does not count toward `n_images`.
    Skipped {
        /// Prediction file name.
        name: String,
        /// Why it was skipped.
        reason: SkipReason,
    },
}

/// Source of mask pairs for one dataset.
pub trait PairSource {
    /// Produce all pair outcomes in a stable, name-sorted order.
    ///
    /// Per-pair problems must surface as [`PairOutcome::Skipped`], not as
    /// errors; an `Err` here means the source itself is unusable.
    fn load_pairs(&self) -> Result<Vec<PairOutcome>>;
}

/// Directory-backed pair source: prediction files in one folder, matched by
/// file name against a ground-truth folder.
#[derive(Debug, Clone)]
pub struct DirPairSource {
    pred_dir: PathBuf,
    gt_dir: PathBuf,
}

impl DirPairSource {
    /// Pair source over a (prediction dir, ground-truth dir) couple.
    pub fn new(pred_dir: impl Into<PathBuf>, gt_dir: impl Into<PathBuf>) -> Self {
        Self {
            pred_dir: pred_dir.into(),
            gt_dir: gt_dir.into(),
        }
    }

    /// Prediction files with recognized extensions, sorted by file name so
    /// repeated runs iterate identically.
    fn list_predictions(&self) -> Result<Vec<(String, PathBuf)>> {
        let mut files = Vec::new();
        for entry in fs::read_dir(&self.pred_dir)? {
            let path = entry?.path();
            if !path.is_file() || !is_image_file(&path) {
                continue;
            }
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                files.push((name.to_string(), path.clone()));
            }
        }
        files.sort();
        Ok(files)
    }
}

impl PairSource for DirPairSource {
    fn load_pairs(&self) -> Result<Vec<PairOutcome>> {
        for dir in [&self.pred_dir, &self.gt_dir] {
            if !dir.is_dir() {
                return Err(Error::MissingDirectory { path: dir.clone() });
            }
        }

        let files = self.list_predictions()?;
        let mut outcomes = Vec::with_capacity(files.len());
        for (name, pred_path) in files {
            let gt_path = self.gt_dir.join(&name);
            if !gt_path.exists() {
                outcomes.push(PairOutcome::Skipped {
                    name,
                    reason: SkipReason::MissingGroundTruth,
                });
                continue;
            }

            match load_pair(&pred_path, &gt_path) {
                Ok((pred, gt)) => outcomes.push(PairOutcome::Ready { name, pred, gt }),
                Err(e) => outcomes.push(PairOutcome::Skipped {
                    name,
                    reason: SkipReason::Unreadable(e.to_string()),
                }),
            }
        }
        Ok(outcomes)
    }
}

fn load_pair(pred_path: &Path, gt_path: &Path) -> Result<(GrayMask, GrayMask)> {
    let pred = GrayMask::load(pred_path)?;
    let gt = GrayMask::load(gt_path)?;
    Ok((pred, gt))
}

/// In-memory pair source for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct MemoryPairSource {
    outcomes: Vec<PairOutcome>,
}

impl MemoryPairSource {
    /// Source over pre-built outcomes, yielded in the given order.
    #[must_use]
    pub fn new(outcomes: Vec<PairOutcome>) -> Self {
        Self { outcomes }
    }

    /// Append a ready pair.
    pub fn push_ready(&mut self, name: &str, pred: GrayMask, gt: GrayMask) {
        self.outcomes.push(PairOutcome::Ready {
            name: name.to_string(),
            pred,
            gt,
        });
    }

    /// Append a skipped pair.
    pub fn push_skipped(&mut self, name: &str, reason: SkipReason) {
        self.outcomes.push(PairOutcome::Skipped {
            name: name.to_string(),
            reason,
        });
    }
}

impl PairSource for MemoryPairSource {
    fn load_pairs(&self) -> Result<Vec<PairOutcome>> {
        Ok(self.outcomes.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skip_warnings_match_console_format() {
        assert_eq!(
            SkipReason::MissingGroundTruth.warning("1.png"),
            "No GT for 1.png, skipping"
        );
        assert_eq!(
            SkipReason::Unreadable("bad header".to_string()).warning("2.png"),
            "Failed to read 2.png, skipping"
        );
    }

    #[test]
    fn test_dir_source_missing_directory() {
        let source = DirPairSource::new("/no/such/preds", "/no/such/gts");
        let err = source.load_pairs().unwrap_err();
        assert!(matches!(err, Error::MissingDirectory { .. }));
    }

    #[test]
    fn test_memory_source_preserves_order() {
        let mut source = MemoryPairSource::default();
        source.push_skipped("b.png", SkipReason::MissingGroundTruth);
        source.push_ready(
            "a.png",
            GrayMask::from_raw(vec![255.0], 1, 1),
            GrayMask::from_raw(vec![255.0], 1, 1),
        );

        let outcomes = source.load_pairs().unwrap();
        assert_eq!(outcomes.len(), 2);
        assert!(matches!(&outcomes[0], PairOutcome::Skipped { name, .. } if name == "b.png"));
        assert!(matches!(&outcomes[1], PairOutcome::Ready { name, .. } if name == "a.png"));
    }
}
