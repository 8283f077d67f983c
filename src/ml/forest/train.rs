use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use super::model::{MODEL_VERSION, ModelError, RandomForestModel, TrainingInfo, argmax};
use super::tree::{DecisionTree, TreeNode};
use crate::ml::metrics::{ConfusionMatrix, accuracy};

/// Forest hyperparameters. Defaults mirror the common random-forest defaults.
#[derive(Debug, Clone)]
pub struct TrainOptions {
    /// Number of trees.
    pub n_trees: usize,
    /// Maximum tree depth; `None` grows until leaves are pure.
    pub max_depth: Option<usize>,
    /// Minimum samples required to split a node.
    pub min_samples_split: usize,
    /// Minimum samples required on each side of a split.
    pub min_samples_leaf: usize,
    /// Features considered per split; `None` uses `floor(sqrt(n_features))`.
    pub max_features: Option<usize>,
    /// Draw a bootstrap sample per tree.
    pub bootstrap: bool,
    /// Seed for bootstrap draws and feature sampling.
    pub seed: u64,
    /// Evaluate each row on the trees that did not see it.
    pub oob_score: bool,
}

impl Default for TrainOptions {
    fn default() -> Self {
        Self {
            n_trees: 100,
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_features: None,
            bootstrap: true,
            seed: 0,
            oob_score: false,
        }
    }
}

/// In-memory dataset used for training.
#[derive(Debug, Clone)]
pub struct TrainDataset {
    /// Feature column names in vector order.
    pub feature_names: Vec<String>,
    /// Class labels in ascending order.
    pub classes: Vec<i64>,
    /// Feature matrix, row-major.
    pub x: Vec<Vec<f32>>,
    /// Class indices aligned with `x`.
    pub y: Vec<usize>,
}

/// Result of a training run.
#[derive(Debug, Clone)]
pub struct ForestTraining {
    pub model: RandomForestModel,
    /// Out-of-bag confusion matrix when `oob_score` was requested and at least
    /// one row was left out of some bootstrap sample.
    pub oob: Option<ConfusionMatrix>,
}

/// Fit a random forest on the full dataset.
pub fn train_random_forest(
    dataset: &TrainDataset,
    options: &TrainOptions,
) -> Result<ForestTraining, ModelError> {
    if dataset.x.len() != dataset.y.len() {
        return Err(ModelError::Invalid("Mismatched X/Y lengths".to_string()));
    }
    if dataset.x.is_empty() {
        return Err(ModelError::Invalid("Empty dataset".to_string()));
    }
    if dataset.classes.is_empty() {
        return Err(ModelError::Invalid("No classes to learn".to_string()));
    }
    if options.n_trees == 0 {
        return Err(ModelError::Invalid("Forest needs at least one tree".to_string()));
    }
    let n_features = dataset.feature_names.len();
    if n_features == 0 || n_features > u16::MAX as usize {
        return Err(ModelError::Invalid(format!(
            "Unsupported feature count {n_features}"
        )));
    }
    if dataset.x.iter().any(|row| row.len() != n_features) {
        return Err(ModelError::Invalid("Inconsistent feature row length".to_string()));
    }
    if dataset.y.iter().any(|&label| label >= dataset.classes.len()) {
        return Err(ModelError::Invalid("Class index out of range".to_string()));
    }

    let n = dataset.x.len();
    let max_features = resolve_max_features(options.max_features, n_features);
    let mut rng = StdRng::seed_from_u64(options.seed);
    let mut trees = Vec::with_capacity(options.n_trees);
    let mut oob_votes = options
        .oob_score
        .then(|| vec![vec![0.0f32; dataset.classes.len()]; n]);

    for _ in 0..options.n_trees {
        let mut tree_rng = StdRng::seed_from_u64(rng.random::<u64>());
        let mut samples: Vec<usize> = if options.bootstrap {
            (0..n).map(|_| tree_rng.random_range(0..n)).collect()
        } else {
            (0..n).collect()
        };
        let in_bag = in_bag_mask(&samples, n);

        let mut builder = TreeBuilder {
            x: &dataset.x,
            y: &dataset.y,
            n_classes: dataset.classes.len(),
            n_features,
            max_features,
            options,
            nodes: Vec::new(),
        };
        builder.grow(&mut samples, 0, &mut tree_rng);
        let tree = DecisionTree {
            nodes: builder.nodes,
        };

        if let Some(votes) = oob_votes.as_mut() {
            for (row_idx, row) in dataset.x.iter().enumerate() {
                if in_bag[row_idx] {
                    continue;
                }
                if let Some(distribution) = tree.leaf_distribution(row) {
                    for (vote, &weight) in votes[row_idx].iter_mut().zip(distribution) {
                        *vote += weight;
                    }
                }
            }
        }
        trees.push(tree);
    }

    let oob = oob_votes.and_then(|votes| oob_confusion(&votes, &dataset.y, dataset.classes.len()));
    let model = RandomForestModel {
        model_version: MODEL_VERSION,
        feature_names: dataset.feature_names.clone(),
        classes: dataset.classes.clone(),
        trees,
        training: TrainingInfo {
            seed: options.seed,
            n_samples: n,
            max_depth: options.max_depth,
            min_samples_split: options.min_samples_split,
            min_samples_leaf: options.min_samples_leaf,
            max_features,
            oob_accuracy: oob.as_ref().map(accuracy),
        },
    };
    Ok(ForestTraining { model, oob })
}

fn resolve_max_features(requested: Option<usize>, n_features: usize) -> usize {
    let value = requested.unwrap_or_else(|| (n_features as f64).sqrt().floor() as usize);
    value.clamp(1, n_features)
}

fn in_bag_mask(samples: &[usize], n: usize) -> Vec<bool> {
    let mut mask = vec![false; n];
    for &idx in samples {
        mask[idx] = true;
    }
    mask
}

fn oob_confusion(votes: &[Vec<f32>], y: &[usize], n_classes: usize) -> Option<ConfusionMatrix> {
    let mut cm = ConfusionMatrix::new(n_classes);
    let mut scored = 0usize;
    for (row_votes, &truth) in votes.iter().zip(y) {
        if row_votes.iter().all(|&v| v == 0.0) {
            continue;
        }
        cm.add(truth, argmax(row_votes));
        scored += 1;
    }
    (scored > 0).then_some(cm)
}

#[derive(Debug, Clone, Copy)]
struct Split {
    feature_index: usize,
    threshold: f32,
    /// Weighted Gini impurity of the two children.
    impurity: f64,
}

struct TreeBuilder<'a> {
    x: &'a [Vec<f32>],
    y: &'a [usize],
    n_classes: usize,
    n_features: usize,
    max_features: usize,
    options: &'a TrainOptions,
    nodes: Vec<TreeNode>,
}

impl TreeBuilder<'_> {
    /// Grow the subtree for `samples` and return its node index.
    fn grow(&mut self, samples: &mut [usize], depth: usize, rng: &mut StdRng) -> u32 {
        let node_idx = self.nodes.len() as u32;
        let counts = self.class_counts(samples);
        let is_pure = counts.iter().filter(|&&count| count > 0).count() <= 1;
        let depth_reached = self.options.max_depth.is_some_and(|max| depth >= max);
        let min_split = self
            .options
            .min_samples_split
            .max(2)
            .max(2 * self.options.min_samples_leaf.max(1));
        if is_pure || depth_reached || samples.len() < min_split {
            self.nodes.push(leaf(&counts));
            return node_idx;
        }
        let Some(split) = self.find_split(samples, rng) else {
            self.nodes.push(leaf(&counts));
            return node_idx;
        };

        // Reserve the slot so children land after their parent.
        self.nodes.push(TreeNode::Leaf {
            distribution: Vec::new(),
        });
        let mid = partition(samples, |idx| {
            self.x[idx][split.feature_index] <= split.threshold
        });
        let (left_samples, right_samples) = samples.split_at_mut(mid);
        let left = self.grow(left_samples, depth + 1, rng);
        let right = self.grow(right_samples, depth + 1, rng);
        self.nodes[node_idx as usize] = TreeNode::Split {
            feature_index: split.feature_index as u16,
            threshold: split.threshold,
            left,
            right,
        };
        node_idx
    }

    fn class_counts(&self, samples: &[usize]) -> Vec<usize> {
        let mut counts = vec![0usize; self.n_classes];
        for &idx in samples {
            counts[self.y[idx]] += 1;
        }
        counts
    }

    /// Search `max_features` random features; keep drawing past that budget
    /// only while no valid split has been found.
    fn find_split(&self, samples: &[usize], rng: &mut StdRng) -> Option<Split> {
        let mut features: Vec<usize> = (0..self.n_features).collect();
        features.shuffle(rng);
        let mut best: Option<Split> = None;
        for (visited, &feature_index) in features.iter().enumerate() {
            if visited >= self.max_features && best.is_some() {
                break;
            }
            let Some(candidate) = self.best_split_for_feature(samples, feature_index) else {
                continue;
            };
            if best.is_none_or(|current| candidate.impurity < current.impurity) {
                best = Some(candidate);
            }
        }
        best
    }

    fn best_split_for_feature(&self, samples: &[usize], feature_index: usize) -> Option<Split> {
        let mut sorted: Vec<(f32, usize)> = samples
            .iter()
            .map(|&idx| (self.x[idx][feature_index], self.y[idx]))
            .collect();
        sorted.sort_by(|a, b| a.0.total_cmp(&b.0));

        let n = sorted.len();
        let min_leaf = self.options.min_samples_leaf.max(1);
        let mut right_counts = vec![0usize; self.n_classes];
        for &(_, label) in &sorted {
            right_counts[label] += 1;
        }
        let mut left_counts = vec![0usize; self.n_classes];

        let mut best: Option<Split> = None;
        for pos in 0..n.saturating_sub(1) {
            let (value, label) = sorted[pos];
            left_counts[label] += 1;
            right_counts[label] -= 1;
            let next_value = sorted[pos + 1].0;
            if value >= next_value {
                continue;
            }
            let left_n = pos + 1;
            let right_n = n - left_n;
            if left_n < min_leaf || right_n < min_leaf {
                continue;
            }
            let impurity = (left_n as f64 * gini(&left_counts, left_n)
                + right_n as f64 * gini(&right_counts, right_n))
                / n as f64;
            if best.is_none_or(|current| impurity < current.impurity) {
                best = Some(Split {
                    feature_index,
                    threshold: midpoint(value, next_value),
                    impurity,
                });
            }
        }
        best
    }
}

fn leaf(counts: &[usize]) -> TreeNode {
    let total: usize = counts.iter().sum();
    let distribution = if total == 0 {
        vec![1.0 / counts.len() as f32; counts.len()]
    } else {
        counts
            .iter()
            .map(|&count| count as f32 / total as f32)
            .collect()
    };
    TreeNode::Leaf { distribution }
}

fn gini(counts: &[usize], total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let total = total as f64;
    1.0 - counts
        .iter()
        .map(|&count| {
            let p = count as f64 / total;
            p * p
        })
        .sum::<f64>()
}

/// Threshold strictly below `hi` so `hi` always routes right.
fn midpoint(lo: f32, hi: f32) -> f32 {
    let mid = lo + (hi - lo) / 2.0;
    if mid < hi { mid } else { lo }
}

/// Move samples matching `goes_left` to the front; returns the split point.
fn partition(samples: &mut [usize], goes_left: impl Fn(usize) -> bool) -> usize {
    let mut mid = 0usize;
    for idx in 0..samples.len() {
        if goes_left(samples[idx]) {
            samples.swap(idx, mid);
            mid += 1;
        }
    }
    mid
}
