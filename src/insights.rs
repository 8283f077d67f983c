//! Aggregate summaries of the training dataset for the optional charts.
//!
//! Loading never fails loudly: an absent or malformed dataset becomes
//! [`InsightsOutcome::Unavailable`] and the prediction flow carries on.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use tracing::{info, warn};

use crate::dataset::{LoadedDataset, load_dataset};
use crate::schema::{EXERCISE_INDEX, SCREEN_INDEX, SLEEP_INDEX};

/// Mean of one feature for one stress label.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelMean {
    pub label: i64,
    pub mean: f32,
    /// Rows contributing to the mean.
    pub count: usize,
}

/// Daily-exercise answer counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExerciseSplit {
    pub yes: usize,
    pub no: usize,
}

impl ExerciseSplit {
    pub fn total(&self) -> usize {
        self.yes + self.no
    }

    /// Share of "yes" answers in `[0, 1]`; zero when there are no rows.
    pub fn yes_fraction(&self) -> f32 {
        if self.total() == 0 {
            0.0
        } else {
            self.yes as f32 / self.total() as f32
        }
    }
}

/// Chart-ready dataset summaries.
#[derive(Debug, Clone, PartialEq)]
pub struct Insights {
    /// Mean sleep hours per label, ascending by label.
    pub sleep_by_label: Vec<LabelMean>,
    /// Mean screen hours per label, ascending by label.
    pub screen_by_label: Vec<LabelMean>,
    pub exercise: ExerciseSplit,
}

/// Either the summaries or the reason they could not be produced.
#[derive(Debug, Clone, PartialEq)]
pub enum InsightsOutcome {
    Ready(Insights),
    Unavailable { reason: String },
}

impl InsightsOutcome {
    pub fn insights(&self) -> Option<&Insights> {
        match self {
            InsightsOutcome::Ready(insights) => Some(insights),
            InsightsOutcome::Unavailable { .. } => None,
        }
    }
}

/// Summarize a loaded dataset.
pub fn summarize(dataset: &LoadedDataset) -> Insights {
    let mut exercise = ExerciseSplit::default();
    for row in &dataset.rows {
        if row[EXERCISE_INDEX] >= 0.5 {
            exercise.yes += 1;
        } else {
            exercise.no += 1;
        }
    }
    Insights {
        sleep_by_label: mean_by_label(dataset, SLEEP_INDEX),
        screen_by_label: mean_by_label(dataset, SCREEN_INDEX),
        exercise,
    }
}

fn mean_by_label(dataset: &LoadedDataset, feature_index: usize) -> Vec<LabelMean> {
    let mut sums: BTreeMap<i64, (f64, usize)> = BTreeMap::new();
    for (row, &label) in dataset.rows.iter().zip(&dataset.labels) {
        let entry = sums.entry(label).or_insert((0.0, 0));
        entry.0 += row[feature_index] as f64;
        entry.1 += 1;
    }
    sums.into_iter()
        .map(|(label, (sum, count))| LabelMean {
            label,
            mean: (sum / count as f64) as f32,
            count,
        })
        .collect()
}

/// Load and summarize the dataset at `path`.
pub fn load_insights(path: &Path) -> InsightsOutcome {
    match load_dataset(path) {
        Ok(dataset) => {
            info!("Insights ready from {} rows", dataset.len());
            InsightsOutcome::Ready(summarize(&dataset))
        }
        Err(err) => {
            warn!("Insights unavailable: {err}");
            InsightsOutcome::Unavailable {
                reason: err.to_string(),
            }
        }
    }
}

/// Loads the insights dataset at most once per process.
#[derive(Debug)]
pub struct InsightCache {
    path: PathBuf,
    outcome: OnceLock<InsightsOutcome>,
}

impl InsightCache {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            outcome: OnceLock::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the dataset has been read yet.
    pub fn is_loaded(&self) -> bool {
        self.outcome.get().is_some()
    }

    /// The memoized outcome, loading it on first use.
    pub fn get(&self) -> &InsightsOutcome {
        self.outcome.get_or_init(|| load_insights(&self.path))
    }
}
