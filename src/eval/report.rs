//! Report types: per-dataset summaries, run reports, log rendering.
//!
//! A run produces one [`DatasetSummary`] per configured dataset, assembled
//! into a [`RunReport`]. The report renders as a human-readable, append-only
//! log record (historical runs accumulate in one file) and serializes to
//! JSON for structured consumers.

use std::fs;
use std::io::Write as _;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::eval::dataset::PairResult;

/// Outcome classification for one dataset in a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DatasetStatus {
    /// At least one valid pair was evaluated.
    Ok,
    /// The dataset yielded zero usable pairs. Not an error, but consumers
    /// must not read the absent means as zero.
    NoValidPairs,
    /// Prediction or ground-truth root was absent; the evaluator never ran.
    MissingPath,
}

impl DatasetStatus {
    /// Status code used in log records.
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::NoValidPairs => "NO_VALID_PAIRS",
            Self::MissingPath => "MISSING_PATH",
        }
    }
}

impl std::fmt::Display for DatasetStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Aggregated result for one dataset. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetSummary {
    /// Dataset name.
    pub dataset: String,
    /// Outcome classification.
    pub status: DatasetStatus,
    /// Count of valid pairs evaluated.
    pub n_images: usize,
    /// Mean Dice over valid pairs; `None` unless status is `Ok`.
    pub mean_dice: Option<f64>,
    /// Mean IoU over valid pairs; `None` unless status is `Ok`.
    pub mean_iou: Option<f64>,
}

impl DatasetSummary {
    /// Summary for a dataset with at least one valid pair.
    #[must_use]
    pub fn ok(dataset: &str, n_images: usize, mean_dice: f64, mean_iou: f64) -> Self {
        Self {
            dataset: dataset.to_string(),
            status: DatasetStatus::Ok,
            n_images,
            mean_dice: Some(mean_dice),
            mean_iou: Some(mean_iou),
        }
    }

    /// Summary for a dataset that produced no valid pairs (`NoValidPairs`
    /// or `MissingPath`). Means stay absent, never zero.
    #[must_use]
    pub fn without_pairs(dataset: &str, status: DatasetStatus) -> Self {
        Self {
            dataset: dataset.to_string(),
            status,
            n_images: 0,
            mean_dice: None,
            mean_iou: None,
        }
    }

    /// One log-record line for this dataset.
    #[must_use]
    pub fn log_line(&self) -> String {
        match (self.mean_dice, self.mean_iou) {
            (Some(dice), Some(iou)) => format!(
                "{}: status={}, mean_dice={:.4}, mean_iou={:.4}, n={}",
                self.dataset, self.status, dice, iou, self.n_images
            ),
            _ => format!("{}: status={}, n={}", self.dataset, self.status, self.n_images),
        }
    }
}

/// One evaluation run across all configured datasets.
///
/// Created once per invocation, stamped at creation, never mutated after
/// the run completes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// When the run started.
    #[serde(with = "chrono_serde")]
    pub timestamp: chrono::DateTime<chrono::Utc>,
    /// One summary per dataset, in configured order.
    pub summaries: Vec<DatasetSummary>,
}

impl RunReport {
    /// Empty report stamped with the current time.
    #[must_use]
    pub fn new() -> Self {
        Self {
            timestamp: chrono::Utc::now(),
            summaries: Vec::new(),
        }
    }

    /// Header line shared by the console trace and the log record.
    #[must_use]
    pub fn header(&self) -> String {
        format!(
            "=== Evaluation run @ {} ===",
            self.timestamp.format("%Y-%m-%d %H:%M:%S")
        )
    }

    /// Render the full log record: header, one line per dataset, blank
    /// separator line.
    #[must_use]
    pub fn render_log(&self) -> String {
        let mut out = String::new();
        out.push_str(&self.header());
        out.push('\n');
        for summary in &self.summaries {
            out.push_str(&summary.log_line());
            out.push('\n');
        }
        out.push('\n');
        out
    }

    /// Append this run's record to a log file, creating parent directories
    /// as needed. Earlier records are preserved.
    pub fn append_log(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let mut file = fs::OpenOptions::new().create(true).append(true).open(path)?;
        file.write_all(self.render_log().as_bytes())?;
        Ok(())
    }

    /// Write a pretty JSON report into `dir`, named by the run timestamp.
    /// Returns the written path.
    pub fn write_json(&self, dir: &Path) -> Result<PathBuf> {
        fs::create_dir_all(dir)?;
        let name = format!("eval_{}.json", self.timestamp.format("%Y%m%dT%H%M%SZ"));
        let path = dir.join(name);
        fs::write(&path, serde_json::to_string_pretty(self)?)?;
        Ok(path)
    }
}

impl Default for RunReport {
    fn default() -> Self {
        Self::new()
    }
}

/// Write per-pair metrics as CSV rows.
pub fn write_pair_csv(path: &Path, dataset: &str, pairs: &[PairResult]) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record(["dataset", "image", "dice", "iou"])?;
    for pair in pairs {
        wtr.write_record([
            dataset,
            &pair.name,
            &format!("{:.6}", pair.metrics.dice),
            &format!("{:.6}", pair.metrics.iou),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

mod chrono_serde {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S>(dt: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        dt.to_rfc3339().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&s)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}
