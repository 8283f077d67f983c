//! Stress-level inference over a loaded forest artifact.

use std::path::Path;
use std::sync::Arc;

use tracing::info;

use crate::ml::forest::{ModelError, RandomForestModel};
use crate::schema::{self, HabitInput};

/// Read-only handle to a trained classifier, cheap to clone.
#[derive(Debug, Clone)]
pub struct Predictor {
    model: Arc<RandomForestModel>,
}

impl Predictor {
    /// Load an artifact and check it was trained on the shared feature schema.
    pub fn load(path: &Path) -> Result<Self, ModelError> {
        let model = RandomForestModel::load_json(path)?;
        let predictor = Self::from_model(model)?;
        info!(
            "Loaded model {} ({} trees, classes {:?})",
            path.display(),
            predictor.model.trees.len(),
            predictor.model.classes
        );
        Ok(predictor)
    }

    /// Wrap an in-memory model after the schema check.
    pub fn from_model(model: RandomForestModel) -> Result<Self, ModelError> {
        let expected = schema::feature_columns();
        if model.feature_names != expected {
            return Err(ModelError::Invalid(format!(
                "Model features {:?} do not match {:?}",
                model.feature_names, expected
            )));
        }
        model.validate()?;
        Ok(Self {
            model: Arc::new(model),
        })
    }

    pub fn model(&self) -> &RandomForestModel {
        &self.model
    }

    /// Predict the stress label for one input.
    pub fn predict(&self, input: &HabitInput) -> i64 {
        self.model.predict_label(&input.to_features())
    }

    /// Per-label probabilities in ascending label order.
    pub fn predict_proba(&self, input: &HabitInput) -> Vec<(i64, f32)> {
        let proba = self.model.predict_proba(&input.to_features());
        self.model.classes.iter().copied().zip(proba).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::forest::{TrainDataset, TrainOptions, train_random_forest};

    fn trained_predictor() -> Predictor {
        let x = vec![
            vec![8.0, 2.0, 1.0, 3.0, 3.0],
            vec![7.5, 3.0, 1.0, 3.0, 2.5],
            vec![5.0, 10.0, 0.0, 2.0, 1.0],
            vec![4.0, 12.0, 0.0, 1.0, 0.5],
            vec![6.0, 7.0, 1.0, 2.0, 1.5],
        ];
        let dataset = TrainDataset {
            feature_names: schema::feature_columns(),
            classes: vec![1, 3, 5],
            x,
            y: vec![0, 0, 2, 2, 1],
        };
        let options = TrainOptions {
            n_trees: 20,
            seed: 4,
            ..TrainOptions::default()
        };
        Predictor::from_model(train_random_forest(&dataset, &options).unwrap().model).unwrap()
    }

    #[test]
    fn repeated_predictions_agree() {
        let predictor = trained_predictor();
        let input = HabitInput::default();
        let first = predictor.predict(&input);
        assert!([1, 3, 5].contains(&first));
        for _ in 0..10 {
            assert_eq!(predictor.predict(&input), first);
        }
        assert_eq!(predictor.clone().predict(&input), first);
    }

    #[test]
    fn probabilities_cover_every_label() {
        let predictor = trained_predictor();
        let proba = predictor.predict_proba(&HabitInput::default());
        let labels: Vec<i64> = proba.iter().map(|(label, _)| *label).collect();
        assert_eq!(labels, vec![1, 3, 5]);
        let total: f32 = proba.iter().map(|(_, p)| p).sum();
        assert!((total - 1.0).abs() < 1e-4);
    }

    #[test]
    fn rejects_models_with_other_features() {
        let mut model = trained_predictor().model().clone();
        model.feature_names.swap(0, 1);
        assert!(matches!(
            Predictor::from_model(model),
            Err(ModelError::Invalid(_))
        ));
    }
}
