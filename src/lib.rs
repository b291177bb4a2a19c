//! # mask-eval
//!
//! Binary segmentation mask evaluation library.
//!
//! Scores prediction masks against ground-truth masks with region-overlap
//! metrics (Dice, IoU), aggregates per-dataset means, and persists
//! append-only run logs. The segmentation model is out of scope: this crate
//! consumes only the mask images it is handed.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use mask_eval::{RunConfig, SilentObserver, evaluate_run};
//!
//! let config = RunConfig::builder()
//!     .pred_base("./result_map/PolypPVT")
//!     .gt_base("./TestDataset")
//!     .datasets(["CVC-300", "CVC-ClinicDB", "Kvasir"])
//!     .log_file("./eval_logs/eval_PolypPVT.log")
//!     .build();
//!
//! let report = evaluate_run(&config, &mut SilentObserver)?;
//! for summary in &report.summaries {
//!     println!("{}", summary.log_line());
//! }
//! ```
//!
//! ## Modules
//!
//! - [`error`]: Error types for the library
//! - [`mask`]: Mask loading, shape reconciliation, binarization
//! - [`metrics`]: Overlap metrics (Dice, IoU) and thresholds
//! - [`eval`]: Dataset evaluation and run aggregation
//! - [`stats`]: Descriptive statistics over per-pair metrics

pub mod error;
pub mod eval;
pub mod mask;
pub mod metrics;
pub mod stats;

// Re-export commonly used types
pub use error::{Error, Result};
pub use eval::{
    dataset::{DatasetEval, PairResult, evaluate_pairs},
    pairs::{DirPairSource, MemoryPairSource, PairOutcome, PairSource, SkipReason},
    report::{DatasetStatus, DatasetSummary, RunReport, write_pair_csv},
    run::{RunConfig, RunConfigBuilder, RunObserver, SilentObserver, evaluate_run},
};
pub use mask::{GrayMask, IMAGE_EXTENSIONS, reconcile};
pub use metrics::{EPS, Overlap, PairMetrics, Thresholds, overlap};
pub use stats::Summary;
