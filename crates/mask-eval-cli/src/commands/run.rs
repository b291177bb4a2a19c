//! Multi-dataset evaluation command.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use mask_eval::{
    DatasetEval, DatasetStatus, DatasetSummary, RunConfig, RunObserver, SkipReason, Thresholds,
    evaluate_run,
};

/// Observer printing the console trace.
struct ConsoleObserver {
    verbose: bool,
}

impl RunObserver for ConsoleObserver {
    fn run_started(&mut self, header: &str) {
        println!("{header}");
    }

    fn dataset_started(&mut self, dataset: &str, pred_root: &Path, gt_root: &Path) {
        println!();
        println!("Dataset: {dataset}");
        println!("  Pred: {}", pred_root.display());
        println!("  GT  : {}", gt_root.display());
    }

    fn pair_skipped(&mut self, _dataset: &str, name: &str, reason: &SkipReason) {
        eprintln!("[WARN] {}", reason.warning(name));
    }

    fn dataset_finished(&mut self, summary: &DatasetSummary, eval: Option<&DatasetEval>) {
        match summary.status {
            DatasetStatus::MissingPath => println!("  [SKIP] Missing pred or GT directory"),
            DatasetStatus::NoValidPairs => println!("  No valid image pairs found!"),
            DatasetStatus::Ok => {
                if let (Some(dice), Some(iou)) = (summary.mean_dice, summary.mean_iou) {
                    println!("  Mean Dice: {dice:.4}");
                    println!("  Mean IoU : {iou:.4}");
                    println!("  #Images  : {}", summary.n_images);
                }
                if self.verbose {
                    if let Some(stats) = eval.and_then(DatasetEval::dice_summary) {
                        println!(
                            "  Dice range: {:.4}..{:.4} (median {:.4}, std {:.4})",
                            stats.min, stats.max, stats.median, stats.std_dev
                        );
                    }
                }
            }
        }
    }
}

pub fn run(
    pred_base: PathBuf,
    gt_base: PathBuf,
    datasets: Vec<String>,
    gt_subdir: String,
    pred_threshold: f32,
    gt_threshold: f32,
    log_file: Option<PathBuf>,
    json_dir: Option<PathBuf>,
    verbose: bool,
) -> Result<()> {
    let mut builder = RunConfig::builder()
        .pred_base(pred_base)
        .gt_base(gt_base)
        .datasets(datasets)
        .gt_subdir(gt_subdir)
        .thresholds(Thresholds::new(pred_threshold, gt_threshold));
    if let Some(path) = log_file {
        builder = builder.log_file(path);
    }
    let config = builder.build();

    let mut observer = ConsoleObserver { verbose };
    let report = evaluate_run(&config, &mut observer).context("Evaluation run failed")?;

    if let Some(path) = &config.log_file {
        println!();
        println!("Saved log to: {}", path.display());
    }
    if let Some(dir) = json_dir {
        let path = report
            .write_json(&dir)
            .with_context(|| format!("Failed to write JSON report to {}", dir.display()))?;
        println!("Saved report to: {}", path.display());
    }
    Ok(())
}
