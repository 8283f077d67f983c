//! Train the stress classifier from a CSV and write the forest artifact.

use std::path::PathBuf;

use rand::Rng;
use stress_detector::logging;
use stress_detector::ml::forest::TrainOptions;
use stress_detector::ml::metrics::precision_recall_by_class;
use stress_detector::trainer::{self, DEFAULT_DATASET_PATH, DEFAULT_MODEL_PATH, TrainSummary};

fn main() {
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let options = parse_args(std::env::args().skip(1).collect())?;
    if let Err(err) = logging::init_console() {
        eprintln!("Logging disabled: {err}");
    }
    let summary = trainer::train_from_csv(&options.dataset, &options.model_out, &options.train)
        .map_err(|err| err.to_string())?;
    print_summary(&summary);
    Ok(())
}

fn print_summary(summary: &TrainSummary) {
    println!(
        "✅ Model trained and saved as {} ({} rows, {} rejected, {} trees, seed {})",
        summary.model_path.display(),
        summary.rows_used,
        summary.rows_rejected,
        summary.n_trees,
        summary.seed
    );
    let (Some(cm), Some(acc)) = (&summary.oob, summary.oob_accuracy) else {
        return;
    };
    println!("out-of-bag accuracy: {acc:.4}");
    for (idx, stats) in precision_recall_by_class(cm).iter().enumerate() {
        println!(
            "level {:>2}  precision={:.3}  recall={:.3}  support={}",
            summary.classes[idx], stats.precision, stats.recall, stats.support
        );
    }
    println!("confusion matrix (rows=true, cols=pred):");
    for truth in 0..cm.n_classes {
        let mut row = String::new();
        for pred in 0..cm.n_classes {
            row.push_str(&format!("{:6}", cm.get(truth, pred)));
        }
        println!("{row}");
    }
}

#[derive(Debug, Clone)]
struct CliOptions {
    dataset: PathBuf,
    model_out: PathBuf,
    train: TrainOptions,
}

fn parse_args(args: Vec<String>) -> Result<CliOptions, String> {
    let mut dataset = PathBuf::from(DEFAULT_DATASET_PATH);
    let mut model_out = PathBuf::from(DEFAULT_MODEL_PATH);
    let mut train = TrainOptions::default();
    let mut seed: Option<u64> = None;

    let mut idx = 0usize;
    while idx < args.len() {
        match args[idx].as_str() {
            "-h" | "--help" => return Err(help_text()),
            "--dataset" => {
                idx += 1;
                dataset = PathBuf::from(value_for(&args, idx, "--dataset")?);
            }
            "--out" => {
                idx += 1;
                model_out = PathBuf::from(value_for(&args, idx, "--out")?);
            }
            "--trees" => {
                idx += 1;
                train.n_trees = parse_count(&args, idx, "--trees")?;
            }
            "--max-depth" => {
                idx += 1;
                train.max_depth = Some(parse_count(&args, idx, "--max-depth")?);
            }
            "--min-samples-split" => {
                idx += 1;
                train.min_samples_split = parse_count(&args, idx, "--min-samples-split")?;
            }
            "--min-samples-leaf" => {
                idx += 1;
                train.min_samples_leaf = parse_count(&args, idx, "--min-samples-leaf")?;
            }
            "--max-features" => {
                idx += 1;
                train.max_features = Some(parse_count(&args, idx, "--max-features")?);
            }
            "--seed" => {
                idx += 1;
                let value = value_for(&args, idx, "--seed")?;
                seed = Some(
                    value
                        .parse::<u64>()
                        .map_err(|_| format!("Invalid --seed value: {value}"))?,
                );
            }
            "--oob-score" => train.oob_score = true,
            unknown => return Err(format!("Unknown argument: {unknown}\n\n{}", help_text())),
        }
        idx += 1;
    }

    train.seed = seed.unwrap_or_else(|| rand::rng().random::<u64>());
    Ok(CliOptions {
        dataset,
        model_out,
        train,
    })
}

fn value_for<'a>(args: &'a [String], idx: usize, flag: &str) -> Result<&'a str, String> {
    args.get(idx)
        .map(String::as_str)
        .ok_or_else(|| format!("{flag} requires a value"))
}

fn parse_count(args: &[String], idx: usize, flag: &str) -> Result<usize, String> {
    let value = value_for(args, idx, flag)?;
    match value.parse::<usize>() {
        Ok(count) if count > 0 => Ok(count),
        _ => Err(format!("Invalid {flag} value: {value}")),
    }
}

fn help_text() -> String {
    format!(
        "stress-detector-train\n\n\
Train the stress-level random forest from a CSV dataset.\n\n\
Usage:\n  stress-detector-train [--dataset <csv>] [--out <model.json>] [options]\n\n\
Options:\n\
  --dataset <csv>            Dataset to read (default: {DEFAULT_DATASET_PATH}).\n\
  --out <path>               Artifact to write (default: {DEFAULT_MODEL_PATH}).\n\
  --trees <n>                Number of trees (default: 100).\n\
  --max-depth <n>            Depth limit (default: unlimited).\n\
  --min-samples-split <n>    Minimum rows to split a node (default: 2).\n\
  --min-samples-leaf <n>     Minimum rows per leaf (default: 1).\n\
  --max-features <n>         Features tried per split (default: floor(sqrt(5))).\n\
  --seed <u64>               Seed for reproducible training (default: random).\n\
  --oob-score                Report out-of-bag accuracy.\n"
    )
}
