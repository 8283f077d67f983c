use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::tree::DecisionTree;

/// Artifact format version written by this crate.
pub const MODEL_VERSION: i64 = 1;

/// Errors raised while loading, saving or validating a forest artifact.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Failed to read model {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to write model {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid model JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Unsupported model_version {found} (expected {MODEL_VERSION})")]
    UnsupportedVersion { found: i64 },
    #[error("Invalid model: {0}")]
    Invalid(String),
}

/// Hyperparameters and provenance recorded alongside the trees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingInfo {
    /// Seed that reproduces this forest.
    pub seed: u64,
    /// Rows the forest was fitted on.
    pub n_samples: usize,
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    pub max_features: usize,
    /// Out-of-bag accuracy when it was requested at training time.
    #[serde(default)]
    pub oob_accuracy: Option<f32>,
}

/// Bagged decision-tree classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForestModel {
    /// Model format version.
    pub model_version: i64,
    /// Feature column names in vector order.
    pub feature_names: Vec<String>,
    /// Class labels in ascending order; leaf distributions index into this.
    pub classes: Vec<i64>,
    pub trees: Vec<DecisionTree>,
    pub training: TrainingInfo,
}

impl RandomForestModel {
    /// Validate structural invariants of the model.
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.model_version != MODEL_VERSION {
            return Err(ModelError::UnsupportedVersion {
                found: self.model_version,
            });
        }
        if self.classes.is_empty() {
            return Err(ModelError::Invalid("Model has no classes".to_string()));
        }
        if self.classes.windows(2).any(|pair| pair[0] >= pair[1]) {
            return Err(ModelError::Invalid(
                "Classes must be strictly ascending".to_string(),
            ));
        }
        if self.feature_names.is_empty() {
            return Err(ModelError::Invalid("Model has no features".to_string()));
        }
        if self.trees.is_empty() {
            return Err(ModelError::Invalid("Model has no trees".to_string()));
        }
        for (tree_idx, tree) in self.trees.iter().enumerate() {
            tree.validate(self.classes.len(), self.feature_names.len())
                .map_err(|err| ModelError::Invalid(format!("Tree {tree_idx}: {err}")))?;
        }
        Ok(())
    }

    /// Load and validate a model from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self, ModelError> {
        let bytes = std::fs::read(path).map_err(|source| ModelError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let model: Self = serde_json::from_slice(&bytes).map_err(|source| ModelError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        model.validate()?;
        Ok(model)
    }

    /// Write the model as pretty JSON, replacing `path` atomically.
    ///
    /// The bytes go to a temporary file next to `path` first, so a failed write
    /// never leaves a truncated artifact behind.
    pub fn save_json(&self, path: &Path) -> Result<(), ModelError> {
        let write_error = |source| ModelError::Write {
            path: path.to_path_buf(),
            source,
        };
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir).map_err(write_error)?;
        let bytes = serde_json::to_vec_pretty(self).map_err(|source| ModelError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(write_error)?;
        tmp.write_all(&bytes).map_err(write_error)?;
        tmp.as_file().sync_all().map_err(write_error)?;
        tmp.persist(path).map_err(|err| write_error(err.error))?;
        Ok(())
    }

    /// Number of `f32` values per feature vector.
    pub fn feature_len(&self) -> usize {
        self.feature_names.len()
    }

    /// Average the leaf distributions of every tree.
    pub fn predict_proba(&self, features: &[f32]) -> Vec<f32> {
        let mut totals = vec![0.0f32; self.classes.len()];
        let mut voters = 0usize;
        for tree in &self.trees {
            let Some(distribution) = tree.leaf_distribution(features) else {
                continue;
            };
            for (total, &weight) in totals.iter_mut().zip(distribution) {
                *total += weight;
            }
            voters += 1;
        }
        if voters > 0 {
            for total in &mut totals {
                *total /= voters as f32;
            }
        }
        totals
    }

    /// Predict the best class index; ties resolve to the lowest index.
    pub fn predict_class_index(&self, features: &[f32]) -> usize {
        argmax(&self.predict_proba(features))
    }

    /// Predict the class label for a feature vector.
    pub fn predict_label(&self, features: &[f32]) -> i64 {
        self.classes[self.predict_class_index(features)]
    }
}

pub(crate) fn argmax(values: &[f32]) -> usize {
    let mut best_idx = 0usize;
    let mut best_val = f32::NEG_INFINITY;
    for (idx, &v) in values.iter().enumerate() {
        if v > best_val {
            best_val = v;
            best_idx = idx;
        }
    }
    best_idx
}
