//! Run aggregation: drive evaluation across a named list of datasets.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::eval::dataset::{DatasetEval, evaluate_pairs};
use crate::eval::pairs::{DirPairSource, SkipReason};
use crate::eval::report::{DatasetStatus, DatasetSummary, RunReport};
use crate::metrics::Thresholds;

/// Configuration for an evaluation run.
///
/// Datasets are located by convention: predictions in
/// `<pred_base>/<dataset>`, ground truth in
/// `<gt_base>/<dataset>/<gt_subdir>`.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Root holding one prediction folder per dataset.
    pub pred_base: PathBuf,
    /// Root holding one ground-truth folder per dataset.
    pub gt_base: PathBuf,
    /// Subdirectory of `<gt_base>/<dataset>` holding the mask files; empty
    /// means the dataset folder itself.
    pub gt_subdir: String,
    /// Dataset names, evaluated in order.
    pub datasets: Vec<String>,
    /// Role-specific binarization thresholds.
    pub thresholds: Thresholds,
    /// Append-only log file; `None` disables log persistence.
    pub log_file: Option<PathBuf>,
}

impl RunConfig {
    /// Create a new configuration builder.
    #[must_use]
    pub fn builder() -> RunConfigBuilder {
        RunConfigBuilder::default()
    }

    /// Prediction root for a dataset.
    #[must_use]
    pub fn pred_root(&self, dataset: &str) -> PathBuf {
        self.pred_base.join(dataset)
    }

    /// Ground-truth root for a dataset.
    #[must_use]
    pub fn gt_root(&self, dataset: &str) -> PathBuf {
        let root = self.gt_base.join(dataset);
        if self.gt_subdir.is_empty() {
            root
        } else {
            root.join(&self.gt_subdir)
        }
    }
}

/// Builder for [`RunConfig`].
#[derive(Debug, Default)]
pub struct RunConfigBuilder {
    pred_base: Option<PathBuf>,
    gt_base: Option<PathBuf>,
    gt_subdir: Option<String>,
    datasets: Vec<String>,
    thresholds: Option<Thresholds>,
    log_file: Option<PathBuf>,
}

impl RunConfigBuilder {
    /// Set the prediction base directory.
    #[must_use]
    pub fn pred_base(mut self, path: impl Into<PathBuf>) -> Self {
        self.pred_base = Some(path.into());
        self
    }

    /// Set the ground-truth base directory.
    #[must_use]
    pub fn gt_base(mut self, path: impl Into<PathBuf>) -> Self {
        self.gt_base = Some(path.into());
        self
    }

    /// Set the ground-truth subdirectory (default `masks`).
    #[must_use]
    pub fn gt_subdir(mut self, subdir: impl Into<String>) -> Self {
        self.gt_subdir = Some(subdir.into());
        self
    }

    /// Set the dataset names to evaluate, in order.
    #[must_use]
    pub fn datasets<I, S>(mut self, datasets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.datasets = datasets.into_iter().map(Into::into).collect();
        self
    }

    /// Set the binarization thresholds.
    #[must_use]
    pub fn thresholds(mut self, thresholds: Thresholds) -> Self {
        self.thresholds = Some(thresholds);
        self
    }

    /// Set the append-only log file.
    #[must_use]
    pub fn log_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_file = Some(path.into());
        self
    }

    /// Build the configuration.
    ///
    /// # Panics
    ///
    /// Panics if `pred_base` or `gt_base` is not set.
    #[must_use]
    pub fn build(self) -> RunConfig {
        RunConfig {
            pred_base: self.pred_base.expect("pred_base is required"),
            gt_base: self.gt_base.expect("gt_base is required"),
            gt_subdir: self.gt_subdir.unwrap_or_else(|| "masks".to_string()),
            datasets: self.datasets,
            thresholds: self.thresholds.unwrap_or_default(),
            log_file: self.log_file,
        }
    }
}

/// Observer for run progress. The CLI prints a console trace; tests record
/// calls; [`SilentObserver`] ignores everything.
pub trait RunObserver {
    /// The run started; `header` is the log-record header line.
    fn run_started(&mut self, header: &str) {
        let _ = header;
    }

    /// A dataset's paths were resolved and evaluation is about to start.
    fn dataset_started(&mut self, dataset: &str, pred_root: &Path, gt_root: &Path) {
        let _ = (dataset, pred_root, gt_root);
    }

    /// A prediction file was skipped.
    fn pair_skipped(&mut self, dataset: &str, name: &str, reason: &SkipReason) {
        let _ = (dataset, name, reason);
    }

    /// A dataset finished; `eval` is `None` when the evaluator never ran
    /// (missing path).
    fn dataset_finished(&mut self, summary: &DatasetSummary, eval: Option<&DatasetEval>) {
        let _ = (summary, eval);
    }
}

/// Observer that ignores all events.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentObserver;

impl RunObserver for SilentObserver {}

/// Evaluate every configured dataset and assemble the run report.
///
/// Per-dataset and per-pair failures are contained: a missing directory
/// becomes a `MISSING_PATH` summary, zero usable pairs becomes
/// `NO_VALID_PAIRS`, and the run continues. Appends the log record when the
/// config names a log file.
///
/// # Errors
///
/// Returns [`Error::NoDatasets`] when the dataset list is empty; otherwise
/// only unrecoverable I/O failures (log persistence, directory enumeration
/// mid-run) surface as errors.
pub fn evaluate_run(config: &RunConfig, observer: &mut dyn RunObserver) -> Result<RunReport> {
    if config.datasets.is_empty() {
        return Err(Error::NoDatasets);
    }

    let mut report = RunReport::new();
    observer.run_started(&report.header());

    for dataset in &config.datasets {
        let pred_root = config.pred_root(dataset);
        let gt_root = config.gt_root(dataset);
        observer.dataset_started(dataset, &pred_root, &gt_root);

        // Directory absence is a deployment problem, not a metric failure.
        if !pred_root.is_dir() || !gt_root.is_dir() {
            let summary = DatasetSummary::without_pairs(dataset, DatasetStatus::MissingPath);
            observer.dataset_finished(&summary, None);
            report.summaries.push(summary);
            continue;
        }

        let source = DirPairSource::new(&pred_root, &gt_root);
        let eval = evaluate_pairs(&source, config.thresholds)?;
        for (name, reason) in &eval.skipped {
            observer.pair_skipped(dataset, name, reason);
        }

        let summary = match (eval.mean_dice(), eval.mean_iou()) {
            (Some(dice), Some(iou)) => DatasetSummary::ok(dataset, eval.n_images(), dice, iou),
            _ => DatasetSummary::without_pairs(dataset, DatasetStatus::NoValidPairs),
        };
        observer.dataset_finished(&summary, Some(&eval));
        report.summaries.push(summary);
    }

    if let Some(path) = &config.log_file {
        report.append_log(path)?;
    }
    Ok(report)
}
