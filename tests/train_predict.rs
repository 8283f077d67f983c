mod support;

use std::sync::Arc;

use stress_detector::advice::{Advice, advise};
use stress_detector::config::{self, AppConfig};
use stress_detector::dataset::DatasetError;
use stress_detector::egui_app::controller::EguiController;
use stress_detector::insights::{InsightCache, InsightsOutcome};
use stress_detector::ml::forest::{RandomForestModel, TrainOptions};
use stress_detector::predictor::Predictor;
use stress_detector::schema::{self, HabitInput, LABEL_COLUMN};
use stress_detector::trainer::{TrainError, train_from_csv};
use support::env::ConfigHomeGuard;
use support::stress_csv::{sample_rows, write_csv};

fn options(seed: u64) -> TrainOptions {
    TrainOptions {
        n_trees: 25,
        seed,
        ..TrainOptions::default()
    }
}

fn calm_input() -> HabitInput {
    HabitInput {
        sleep_hours: 8.0,
        screen_hours: 1.5,
        exercises_daily: true,
        meals_per_day: 3,
        water_litres: 2.7,
    }
}

fn tense_input() -> HabitInput {
    HabitInput {
        sleep_hours: 4.0,
        screen_hours: 7.5,
        exercises_daily: false,
        meals_per_day: 2,
        water_litres: 0.7,
    }
}

#[test]
fn trained_artifact_drives_predictions_and_advice() {
    let temp = tempfile::tempdir().expect("tempdir");
    let csv = temp.path().join("cleaned_stress_data.csv");
    let model_path = temp.path().join("mental_stress_detector.json");
    write_csv(&csv, &sample_rows(), &["6,4,1,,2.0,3"]);

    let summary = train_from_csv(&csv, &model_path, &options(7)).expect("train");
    assert_eq!(summary.rows_used, 30);
    assert_eq!(summary.rows_rejected, 1);
    assert_eq!(summary.classes, vec![1, 2, 3, 4, 5]);

    let predictor = Predictor::load(&model_path).expect("load predictor");
    for input in [calm_input(), tense_input(), HabitInput::default()] {
        let label = predictor.predict(&input);
        assert!(summary.classes.contains(&label));
        assert!(matches!(advise(label), Advice::Tip(tip) if tip.level == label));
    }
    assert_eq!(predictor.predict(&calm_input()), 1);
    assert_eq!(predictor.predict(&tense_input()), 5);
}

#[test]
fn same_seed_gives_identical_artifacts() {
    let temp = tempfile::tempdir().expect("tempdir");
    let csv = temp.path().join("data.csv");
    write_csv(&csv, &sample_rows(), &[]);
    let first = temp.path().join("a.json");
    let second = temp.path().join("b.json");
    train_from_csv(&csv, &first, &options(42)).expect("train a");
    train_from_csv(&csv, &second, &options(42)).expect("train b");

    let a = RandomForestModel::load_json(&first).expect("load a");
    let b = RandomForestModel::load_json(&second).expect("load b");
    assert_eq!(a, b);
    assert_eq!(a.training.seed, 42);
}

#[test]
fn missing_label_column_leaves_no_artifact() {
    let temp = tempfile::tempdir().expect("tempdir");
    let csv = temp.path().join("data.csv");
    let model_path = temp.path().join("model.json");
    let features_only = schema::feature_columns().join(",");
    std::fs::write(&csv, format!("{features_only}\n8,2,1,3,3\n")).expect("write csv");

    let err = train_from_csv(&csv, &model_path, &options(1)).expect_err("no label column");
    assert!(matches!(
        err,
        TrainError::Dataset(DatasetError::MissingColumn { ref column, .. })
            if column == LABEL_COLUMN
    ));
    assert!(!model_path.exists());
}

#[test]
fn missing_dataset_disables_insights_only() {
    let temp = tempfile::tempdir().expect("tempdir");
    let csv = temp.path().join("data.csv");
    let model_path = temp.path().join("model.json");
    write_csv(&csv, &sample_rows(), &[]);
    train_from_csv(&csv, &model_path, &options(3)).expect("train");
    std::fs::remove_file(&csv).expect("remove dataset");

    let config = AppConfig {
        model_path: model_path.clone(),
        dataset_path: csv.clone(),
        ..AppConfig::default()
    };
    let cache = Arc::new(InsightCache::new(csv));
    let predictor = Predictor::load(&config.model_path).expect("load");
    let mut controller = EguiController::with_insights(predictor, &config, cache.clone());

    controller.predict();
    assert!(controller.ui.result.is_some());
    assert!(matches!(
        controller.insights(),
        InsightsOutcome::Unavailable { .. }
    ));
    assert!(cache.is_loaded());
}

#[test]
fn insights_summarize_the_training_csv() {
    let temp = tempfile::tempdir().expect("tempdir");
    let csv = temp.path().join("data.csv");
    write_csv(&csv, &sample_rows(), &[]);
    let cache = InsightCache::new(csv);
    let insights = cache.get().insights().expect("insights ready");

    let labels: Vec<i64> = insights.sleep_by_label.iter().map(|m| m.label).collect();
    assert_eq!(labels, vec![1, 2, 3, 4, 5]);
    assert!(insights.sleep_by_label[0].mean > insights.sleep_by_label[4].mean);
    assert!(insights.screen_by_label[0].mean < insights.screen_by_label[4].mean);
    assert_eq!(insights.exercise.total(), 30);
    assert_eq!(insights.exercise.yes, 21);
}

#[test]
fn saved_config_is_read_back_from_the_app_dir() {
    let temp = tempfile::tempdir().expect("tempdir");
    let _guard = ConfigHomeGuard::set(temp.path().to_path_buf());

    let defaults = config::load_or_default().expect("defaults");
    assert_eq!(defaults, AppConfig::default());

    let mut custom = AppConfig::default();
    custom.model_path = temp.path().join("custom.json");
    custom.form.exercise_default = false;
    config::save(&custom).expect("save");
    assert!(temp.path().join(".stress_detector").join("config.toml").is_file());
    assert_eq!(config::load_or_default().expect("reload"), custom);
}
