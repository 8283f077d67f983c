//! Random-forest classifier built from bagged CART trees.
//!
//! Supports:
//! - Multi-class Gini splits on dense `f32` features.
//! - Seeded, reproducible training with optional out-of-bag scoring.
//! - JSON model export/load with structural validation.

mod model;
mod train;
mod tree;

pub use model::{MODEL_VERSION, ModelError, RandomForestModel, TrainingInfo};
pub use train::{ForestTraining, TrainDataset, TrainOptions, train_random_forest};
pub use tree::{DecisionTree, TreeNode};
