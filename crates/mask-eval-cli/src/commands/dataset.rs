//! Single-dataset evaluation command.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use mask_eval::{DirPairSource, Thresholds, evaluate_pairs, write_pair_csv};

pub fn run(
    pred: PathBuf,
    gt: PathBuf,
    pred_threshold: f32,
    gt_threshold: f32,
    csv: Option<PathBuf>,
    verbose: bool,
) -> Result<()> {
    if !pred.is_dir() {
        bail!("Missing pred folder: {}", pred.display());
    }
    if !gt.is_dir() {
        bail!("Missing GT folder: {}", gt.display());
    }

    if verbose {
        eprintln!("Pred: {}", pred.display());
        eprintln!("GT  : {}", gt.display());
    }

    let source = DirPairSource::new(&pred, &gt);
    let eval = evaluate_pairs(&source, Thresholds::new(pred_threshold, gt_threshold))
        .context("Dataset evaluation failed")?;

    for (name, reason) in &eval.skipped {
        eprintln!("[WARN] {}", reason.warning(name));
    }

    match (eval.mean_dice(), eval.mean_iou()) {
        (Some(dice), Some(iou)) => {
            println!("Mean Dice: {dice:.4}");
            println!("Mean IoU : {iou:.4}");
            println!("#Images  : {}", eval.n_images());
        }
        _ => println!("No overlapping predictions/GT to evaluate."),
    }

    if let Some(path) = csv {
        let dataset = pred
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("dataset");
        write_pair_csv(&path, dataset, &eval.pairs)
            .with_context(|| format!("Failed to write CSV to {}", path.display()))?;
        println!("Saved per-pair metrics to: {}", path.display());
    }
    Ok(())
}
