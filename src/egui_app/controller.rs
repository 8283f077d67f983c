//! Bridges the predictor and dataset insights to the egui UI.

use std::sync::Arc;

use tracing::{info, warn};

use crate::advice::{self, Advice};
use crate::config::AppConfig;
use crate::egui_app::state::{PredictionView, StatusBarState, StatusTone, UiState};
use crate::insights::{InsightCache, InsightsOutcome};
use crate::predictor::Predictor;

/// Maintains app state and handles user actions.
pub struct EguiController {
    pub ui: UiState,
    predictor: Predictor,
    insights: Arc<InsightCache>,
}

impl EguiController {
    pub fn new(predictor: Predictor, config: &AppConfig) -> Self {
        Self::with_insights(
            predictor,
            config,
            Arc::new(InsightCache::new(config.dataset_path.clone())),
        )
    }

    /// Build a controller sharing an existing insight cache.
    pub fn with_insights(
        predictor: Predictor,
        config: &AppConfig,
        insights: Arc<InsightCache>,
    ) -> Self {
        Self {
            ui: UiState::new(config.form),
            predictor,
            insights,
        }
    }

    /// Run the classifier on the current form values.
    pub fn predict(&mut self) {
        let input = self.ui.ranges.clamp_input(self.ui.form);
        let label = self.predictor.predict(&input);
        let advice = advice::advise(label);
        info!("Predicted stress level {label} for {input:?}");
        self.ui.status = match advice {
            Advice::Tip(tip) => {
                StatusBarState::with_tone(format!("Predicted: {}", tip.name), StatusTone::Info)
            }
            Advice::Unexpected(_) => {
                warn!("Classifier returned unexpected label {label}");
                StatusBarState::with_tone(advice::UNEXPECTED_NOTICE, StatusTone::Warning)
            }
        };
        self.ui.result = Some(PredictionView {
            input,
            label,
            advice,
            probabilities: self.predictor.predict_proba(&input),
        });
    }

    /// Drop a prediction that no longer matches the form.
    pub fn form_changed(&mut self) {
        if self
            .ui
            .result
            .as_ref()
            .is_some_and(|result| result.input != self.ui.form)
        {
            self.ui.result = None;
            self.ui.status = StatusBarState::idle();
        }
    }

    /// Restore the configured defaults.
    pub fn reset_form(&mut self) {
        self.ui.form = self.ui.ranges.default_input();
        self.ui.result = None;
        self.ui.status = StatusBarState::idle();
    }

    /// Memoized chart data; the dataset is read on first call only.
    pub fn insights(&self) -> &InsightsOutcome {
        self.insights.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::forest::{TrainDataset, TrainOptions, train_random_forest};
    use crate::schema;
    use std::path::PathBuf;
    use tempfile::tempdir;

    fn predictor() -> Predictor {
        predictor_with_classes(vec![2, 4])
    }

    fn predictor_with_classes(classes: Vec<i64>) -> Predictor {
        let x = vec![
            vec![8.0, 2.0, 1.0, 3.0, 3.0],
            vec![4.0, 12.0, 0.0, 1.0, 0.5],
        ];
        let y = (0..x.len()).map(|row| row % classes.len()).collect();
        let dataset = TrainDataset {
            feature_names: schema::feature_columns(),
            classes,
            x,
            y,
        };
        let options = TrainOptions {
            n_trees: 5,
            seed: 1,
            ..TrainOptions::default()
        };
        Predictor::from_model(train_random_forest(&dataset, &options).unwrap().model).unwrap()
    }

    fn config_with_dataset(path: PathBuf) -> AppConfig {
        AppConfig {
            dataset_path: path,
            ..AppConfig::default()
        }
    }

    #[test]
    fn predict_fills_result_and_status() {
        let dir = tempdir().unwrap();
        let config = config_with_dataset(dir.path().join("absent.csv"));
        let mut controller = EguiController::new(predictor(), &config);
        controller.predict();
        let result = controller.ui.result.clone().expect("prediction");
        assert!([2, 4].contains(&result.label));
        assert!(matches!(result.advice, Advice::Tip(tip) if tip.level == result.label));
        assert_eq!(controller.ui.status.badge_label, "Info");
    }

    #[test]
    fn out_of_range_label_shows_a_warning_instead_of_a_tip() {
        let dir = tempdir().unwrap();
        let config = config_with_dataset(dir.path().join("absent.csv"));
        let mut controller = EguiController::new(predictor_with_classes(vec![7]), &config);
        controller.predict();
        let result = controller.ui.result.clone().expect("prediction");
        assert_eq!(result.label, 7);
        assert_eq!(result.advice, Advice::Unexpected(7));
        assert_eq!(controller.ui.status.badge_label, "Warning");
        assert_eq!(controller.ui.status.text, advice::UNEXPECTED_NOTICE);
    }

    #[test]
    fn missing_dataset_does_not_block_predictions() {
        let dir = tempdir().unwrap();
        let config = config_with_dataset(dir.path().join("absent.csv"));
        let mut controller = EguiController::new(predictor(), &config);
        assert!(matches!(
            controller.insights(),
            InsightsOutcome::Unavailable { .. }
        ));
        controller.predict();
        assert!(controller.ui.result.is_some());
    }

    #[test]
    fn editing_the_form_clears_stale_results() {
        let dir = tempdir().unwrap();
        let config = config_with_dataset(dir.path().join("absent.csv"));
        let mut controller = EguiController::new(predictor(), &config);
        controller.predict();
        controller.form_changed();
        assert!(controller.ui.result.is_some());

        controller.ui.form.sleep_hours = 3.0;
        controller.form_changed();
        assert!(controller.ui.result.is_none());

        controller.reset_form();
        assert_eq!(controller.ui.form, config.form.default_input());
    }
}
