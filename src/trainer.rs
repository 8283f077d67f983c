//! Offline pipeline: dataset CSV in, forest artifact out.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use crate::dataset::{DatasetError, LoadedDataset, load_dataset};
use crate::ml::forest::{ModelError, TrainDataset, TrainOptions, train_random_forest};
use crate::ml::metrics::ConfusionMatrix;
use crate::schema;

/// Dataset read when no path is given.
pub const DEFAULT_DATASET_PATH: &str = "cleaned_stress_data.csv";
/// Artifact written when no path is given.
pub const DEFAULT_MODEL_PATH: &str = "mental_stress_detector.json";

#[derive(Debug, Error)]
pub enum TrainError {
    #[error(transparent)]
    Dataset(#[from] DatasetError),
    #[error(transparent)]
    Model(#[from] ModelError),
}

/// Outcome of a successful training run.
#[derive(Debug, Clone)]
pub struct TrainSummary {
    pub model_path: PathBuf,
    pub rows_used: usize,
    pub rows_rejected: usize,
    pub classes: Vec<i64>,
    pub n_trees: usize,
    pub seed: u64,
    pub oob: Option<ConfusionMatrix>,
    pub oob_accuracy: Option<f32>,
}

/// Convert loaded CSV rows into class-indexed training data.
pub fn build_train_dataset(loaded: &LoadedDataset) -> TrainDataset {
    let classes = loaded.label_set();
    let y = loaded
        .labels
        .iter()
        .map(|label| classes.binary_search(label).unwrap_or_default())
        .collect();
    TrainDataset {
        feature_names: schema::feature_columns(),
        classes,
        x: loaded.rows.iter().map(|row| row.to_vec()).collect(),
        y,
    }
}

/// Load `dataset_path`, fit a forest and persist it to `model_path`.
///
/// Nothing is written unless loading and training both succeed.
pub fn train_from_csv(
    dataset_path: &Path,
    model_path: &Path,
    options: &TrainOptions,
) -> Result<TrainSummary, TrainError> {
    let loaded = load_dataset(dataset_path)?;
    info!(
        "Loaded {} rows from {} ({} rejected)",
        loaded.len(),
        dataset_path.display(),
        loaded.report.skipped.len()
    );
    let dataset = build_train_dataset(&loaded);
    info!(
        "Training {} trees on classes {:?} with seed {}",
        options.n_trees, dataset.classes, options.seed
    );
    let trained = train_random_forest(&dataset, options)?;
    trained.model.save_json(model_path)?;
    info!("Model written to {}", model_path.display());

    Ok(TrainSummary {
        model_path: model_path.to_path_buf(),
        rows_used: loaded.len(),
        rows_rejected: loaded.report.skipped.len(),
        classes: trained.model.classes.clone(),
        n_trees: trained.model.trees.len(),
        seed: trained.model.training.seed,
        oob_accuracy: trained.model.training.oob_accuracy,
        oob: trained.oob,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::forest::RandomForestModel;
    use crate::schema::{HabitInput, csv_header};
    use tempfile::tempdir;

    fn quick_options() -> TrainOptions {
        TrainOptions {
            n_trees: 10,
            seed: 21,
            ..TrainOptions::default()
        }
    }

    #[test]
    fn writes_a_loadable_artifact() {
        let dir = tempdir().unwrap();
        let csv = dir.path().join("data.csv");
        let out = dir.path().join("model.json");
        std::fs::write(
            &csv,
            format!(
                "{}\n8,2,1,3,3.0,1\n7.5,3,1,3,2.5,1\n5,10,0,2,1.0,4\n4.5,11,0,1,1.0,4\n6,6,1,3,2.0,,\n",
                csv_header()
            ),
        )
        .unwrap();

        let summary = train_from_csv(&csv, &out, &quick_options()).unwrap();
        assert_eq!(summary.rows_used, 4);
        assert_eq!(summary.rows_rejected, 1);
        assert_eq!(summary.classes, vec![1, 4]);

        let model = RandomForestModel::load_json(&out).unwrap();
        assert_eq!(model.feature_names, schema::feature_columns());
        let label = model.predict_label(&HabitInput::default().to_features());
        assert!(summary.classes.contains(&label));
    }

    #[test]
    fn missing_label_column_writes_nothing() {
        let dir = tempdir().unwrap();
        let csv = dir.path().join("data.csv");
        let out = dir.path().join("model.json");
        let features_only = schema::feature_columns().join(",");
        std::fs::write(&csv, format!("{features_only}\n7,4,1,3,2.5\n")).unwrap();

        let err = train_from_csv(&csv, &out, &quick_options()).unwrap_err();
        assert!(matches!(
            err,
            TrainError::Dataset(DatasetError::MissingColumn { .. })
        ));
        assert!(!out.exists());
        let leftovers = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(leftovers, 1);
    }

    #[test]
    fn missing_dataset_is_an_error() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("model.json");
        let err = train_from_csv(&dir.path().join("nope.csv"), &out, &quick_options());
        assert!(matches!(err, Err(TrainError::Dataset(DatasetError::Open { .. }))));
        assert!(!out.exists());
    }

    #[test]
    fn overwrites_a_previous_artifact() {
        let dir = tempdir().unwrap();
        let csv = dir.path().join("data.csv");
        let out = dir.path().join("model.json");
        std::fs::write(&out, b"stale").unwrap();
        let text = format!("{}\n8,2,1,3,3.0,2\n5,10,0,2,1.0,5\n", csv_header());
        std::fs::write(&csv, text).unwrap();
        train_from_csv(&csv, &out, &quick_options()).unwrap();
        assert!(RandomForestModel::load_json(&out).is_ok());
    }
}
