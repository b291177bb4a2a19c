//! mask-eval CLI - segmentation mask evaluation tool

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

/// Binary segmentation mask evaluation tool.
#[derive(Parser)]
#[command(name = "mask-eval")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a list of datasets and append a log record
    Run {
        /// Root directory holding one prediction folder per dataset
        #[arg(long)]
        pred_base: PathBuf,

        /// Root directory holding one ground-truth folder per dataset
        #[arg(long)]
        gt_base: PathBuf,

        /// Dataset names (comma separated or repeated)
        #[arg(long, value_delimiter = ',', required = true)]
        datasets: Vec<String>,

        /// Ground-truth subdirectory under <GT_BASE>/<dataset>
        #[arg(long, default_value = "masks")]
        gt_subdir: String,

        /// Binarization threshold for prediction masks
        #[arg(long, default_value_t = 0.5)]
        pred_threshold: f32,

        /// Binarization threshold for ground-truth masks
        #[arg(long, default_value_t = 0.5)]
        gt_threshold: f32,

        /// Append-only log file
        #[arg(long)]
        log_file: Option<PathBuf>,

        /// Directory for JSON run reports
        #[arg(long)]
        json_dir: Option<PathBuf>,
    },

    /// Evaluate a single prediction/ground-truth directory pair
    Dataset {
        /// Prediction mask directory
        #[arg(long)]
        pred: PathBuf,

        /// Ground-truth mask directory
        #[arg(long)]
        gt: PathBuf,

        /// Binarization threshold for prediction masks
        #[arg(long, default_value_t = 0.5)]
        pred_threshold: f32,

        /// Binarization threshold for ground-truth masks
        #[arg(long, default_value_t = 0.5)]
        gt_threshold: f32,

        /// Write per-pair metrics to a CSV file
        #[arg(long)]
        csv: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            pred_base,
            gt_base,
            datasets,
            gt_subdir,
            pred_threshold,
            gt_threshold,
            log_file,
            json_dir,
        } => commands::run::run(
            pred_base,
            gt_base,
            datasets,
            gt_subdir,
            pred_threshold,
            gt_threshold,
            log_file,
            json_dir,
            cli.verbose,
        ),
        Commands::Dataset {
            pred,
            gt,
            pred_threshold,
            gt_threshold,
            csv,
        } => commands::dataset::run(pred, gt, pred_threshold, gt_threshold, csv, cli.verbose),
    }
}
