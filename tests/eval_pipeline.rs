//! End-to-end evaluation scenarios over real directories.

use std::fs;
use std::path::{Path, PathBuf};

use image::{GrayImage, Luma};
use mask_eval::{
    DatasetEval, DatasetStatus, DatasetSummary, DirPairSource, RunConfig, RunObserver, SkipReason,
    Thresholds, evaluate_pairs, evaluate_run,
};

fn write_mask(path: &Path, width: u32, height: u32, f: impl Fn(u32, u32) -> u8) {
    let img = GrayImage::from_fn(width, height, |x, y| Luma([f(x, y)]));
    img.save(path).unwrap();
}

fn solid(path: &Path, width: u32, height: u32, value: u8) {
    write_mask(path, width, height, |_, _| value);
}

#[test]
fn partial_match_skips_unmatched_predictions() {
    let tmp = tempfile::tempdir().unwrap();
    let preds = tmp.path().join("preds");
    let gts = tmp.path().join("gts");
    fs::create_dir_all(&preds).unwrap();
    fs::create_dir_all(&gts).unwrap();

    solid(&preds.join("1.png"), 8, 8, 255);
    solid(&preds.join("2.png"), 8, 8, 255);
    solid(&preds.join("3.png"), 8, 8, 255);
    solid(&gts.join("1.png"), 8, 8, 255);
    solid(&gts.join("2.png"), 8, 8, 255);

    let source = DirPairSource::new(&preds, &gts);
    let eval = evaluate_pairs(&source, Thresholds::default()).unwrap();

    assert_eq!(eval.n_images(), 2);
    assert_eq!(
        eval.skipped,
        vec![("3.png".to_string(), SkipReason::MissingGroundTruth)]
    );
    assert!((eval.mean_dice().unwrap() - 1.0).abs() < 1e-6);
    assert!((eval.mean_iou().unwrap() - 1.0).abs() < 1e-6);
}

#[test]
fn half_overlap_scores_expected_dice_and_iou() {
    let tmp = tempfile::tempdir().unwrap();
    let preds = tmp.path().join("preds");
    let gts = tmp.path().join("gts");
    fs::create_dir_all(&preds).unwrap();
    fs::create_dir_all(&gts).unwrap();

    // Prediction: left half foreground. GT: top half foreground.
    write_mask(&preds.join("a.png"), 4, 4, |x, _| if x < 2 { 255 } else { 0 });
    write_mask(&gts.join("a.png"), 4, 4, |_, y| if y < 2 { 255 } else { 0 });

    let eval = evaluate_pairs(&DirPairSource::new(&preds, &gts), Thresholds::default()).unwrap();
    let metrics = eval.pairs[0].metrics;
    // intersection 4, union 12, areas 8+8.
    assert!((metrics.dice - 0.5).abs() < 1e-6);
    assert!((metrics.iou - 4.0 / 12.0).abs() < 1e-6);
    assert!(metrics.dice >= metrics.iou);
}

#[test]
fn mismatched_shapes_are_reconciled_to_prediction_size() {
    let tmp = tempfile::tempdir().unwrap();
    let preds = tmp.path().join("preds");
    let gts = tmp.path().join("gts");
    fs::create_dir_all(&preds).unwrap();
    fs::create_dir_all(&gts).unwrap();

    solid(&preds.join("a.png"), 5, 5, 255);
    solid(&gts.join("a.png"), 10, 10, 255);

    let eval = evaluate_pairs(&DirPairSource::new(&preds, &gts), Thresholds::default()).unwrap();
    assert_eq!(eval.n_images(), 1);
    assert!((eval.pairs[0].metrics.dice - 1.0).abs() < 1e-6);
}

#[test]
fn undecodable_file_is_skipped_with_warning() {
    let tmp = tempfile::tempdir().unwrap();
    let preds = tmp.path().join("preds");
    let gts = tmp.path().join("gts");
    fs::create_dir_all(&preds).unwrap();
    fs::create_dir_all(&gts).unwrap();

    fs::write(preds.join("bad.png"), b"not an image").unwrap();
    solid(&gts.join("bad.png"), 4, 4, 255);
    solid(&preds.join("good.png"), 4, 4, 255);
    solid(&gts.join("good.png"), 4, 4, 255);

    let eval = evaluate_pairs(&DirPairSource::new(&preds, &gts), Thresholds::default()).unwrap();
    assert_eq!(eval.n_images(), 1);
    assert_eq!(eval.pairs[0].name, "good.png");
    assert_eq!(eval.skipped.len(), 1);
    assert_eq!(eval.skipped[0].0, "bad.png");
    assert!(matches!(eval.skipped[0].1, SkipReason::Unreadable(_)));
}

#[test]
fn low_gt_threshold_captures_color_derived_masks() {
    let tmp = tempfile::tempdir().unwrap();
    let preds = tmp.path().join("preds");
    let gts = tmp.path().join("gts");
    fs::create_dir_all(&preds).unwrap();
    fs::create_dir_all(&gts).unwrap();

    solid(&preds.join("a.png"), 4, 4, 255);
    // Red-overlay GT converted to grayscale: positive pixels near 40/255.
    solid(&gts.join("a.png"), 4, 4, 40);

    let low = evaluate_pairs(&DirPairSource::new(&preds, &gts), Thresholds::low_gt()).unwrap();
    assert!((low.pairs[0].metrics.dice - 1.0).abs() < 1e-6);

    let strict = evaluate_pairs(&DirPairSource::new(&preds, &gts), Thresholds::default()).unwrap();
    assert!(strict.pairs[0].metrics.dice < 1e-3);
}

#[derive(Default)]
struct RecordingObserver {
    started: Vec<String>,
    skipped: Vec<(String, String)>,
    finished: Vec<(String, DatasetStatus, bool)>,
}

impl RunObserver for RecordingObserver {
    fn dataset_started(&mut self, dataset: &str, _pred_root: &Path, _gt_root: &Path) {
        self.started.push(dataset.to_string());
    }

    fn pair_skipped(&mut self, dataset: &str, name: &str, _reason: &SkipReason) {
        self.skipped.push((dataset.to_string(), name.to_string()));
    }

    fn dataset_finished(&mut self, summary: &DatasetSummary, eval: Option<&DatasetEval>) {
        self.finished
            .push((summary.dataset.clone(), summary.status, eval.is_some()));
    }
}

fn run_layout(tmp: &Path) -> (PathBuf, PathBuf) {
    let pred_base = tmp.join("result_map");
    let gt_base = tmp.join("TestDataset");

    let ds1_pred = pred_base.join("ds1");
    let ds1_gt = gt_base.join("ds1").join("masks");
    fs::create_dir_all(&ds1_pred).unwrap();
    fs::create_dir_all(&ds1_gt).unwrap();
    solid(&ds1_pred.join("a.png"), 6, 6, 255);
    solid(&ds1_gt.join("a.png"), 6, 6, 255);
    solid(&ds1_pred.join("b.png"), 6, 6, 255);

    (pred_base, gt_base)
}

#[test]
fn run_classifies_datasets_and_appends_log() {
    let tmp = tempfile::tempdir().unwrap();
    let (pred_base, gt_base) = run_layout(tmp.path());
    let log_file = tmp.path().join("eval_logs").join("eval.log");

    let config = RunConfig::builder()
        .pred_base(&pred_base)
        .gt_base(&gt_base)
        .datasets(["ds1", "ds2"])
        .log_file(&log_file)
        .build();

    let mut observer = RecordingObserver::default();
    let report = evaluate_run(&config, &mut observer).unwrap();

    assert_eq!(report.summaries.len(), 2);
    assert_eq!(report.summaries[0].status, DatasetStatus::Ok);
    assert_eq!(report.summaries[0].n_images, 1);
    assert_eq!(report.summaries[1].status, DatasetStatus::MissingPath);
    assert_eq!(report.summaries[1].mean_dice, None);

    // The evaluator never ran for the missing dataset.
    assert_eq!(
        observer.finished,
        vec![
            ("ds1".to_string(), DatasetStatus::Ok, true),
            ("ds2".to_string(), DatasetStatus::MissingPath, false),
        ]
    );
    assert_eq!(observer.skipped, vec![("ds1".to_string(), "b.png".to_string())]);

    let log = fs::read_to_string(&log_file).unwrap();
    assert!(log.starts_with("=== Evaluation run @ "));
    assert!(log.contains("ds1: status=OK, mean_dice=1.0000, mean_iou=1.0000, n=1"));
    assert!(log.contains("ds2: status=MISSING_PATH, n=0"));
    assert!(log.ends_with("\n\n"));

    // A second run accumulates instead of overwriting.
    evaluate_run(&config, &mut RecordingObserver::default()).unwrap();
    let log = fs::read_to_string(&log_file).unwrap();
    assert_eq!(log.matches("=== Evaluation run @ ").count(), 2);
}

#[test]
fn run_reports_no_valid_pairs_for_empty_dataset() {
    let tmp = tempfile::tempdir().unwrap();
    let pred_base = tmp.path().join("preds");
    let gt_base = tmp.path().join("gts");
    let ds_pred = pred_base.join("empty");
    let ds_gt = gt_base.join("empty").join("masks");
    fs::create_dir_all(&ds_pred).unwrap();
    fs::create_dir_all(&ds_gt).unwrap();
    // Non-image files are ignored by enumeration.
    fs::write(ds_pred.join("notes.txt"), "nothing here").unwrap();

    let config = RunConfig::builder()
        .pred_base(&pred_base)
        .gt_base(&gt_base)
        .datasets(["empty"])
        .build();

    let report = evaluate_run(&config, &mut RecordingObserver::default()).unwrap();
    let summary = &report.summaries[0];
    assert_eq!(summary.status, DatasetStatus::NoValidPairs);
    assert_eq!(summary.n_images, 0);
    assert_eq!(summary.mean_dice, None);
    assert_eq!(summary.mean_iou, None);
    assert_eq!(summary.log_line(), "empty: status=NO_VALID_PAIRS, n=0");
}

#[test]
fn run_writes_json_report() {
    let tmp = tempfile::tempdir().unwrap();
    let (pred_base, gt_base) = run_layout(tmp.path());

    let config = RunConfig::builder()
        .pred_base(&pred_base)
        .gt_base(&gt_base)
        .datasets(["ds1"])
        .build();

    let report = evaluate_run(&config, &mut RecordingObserver::default()).unwrap();
    let json_path = report.write_json(&tmp.path().join("reports")).unwrap();

    let json = fs::read_to_string(&json_path).unwrap();
    assert!(json.contains("\"status\": \"OK\""));
    assert!(json.contains("\"dataset\": \"ds1\""));
}
