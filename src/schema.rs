//! Feature schema shared by the trainer, the dataset reader and the input form.
//!
//! The column names are the literal headers of the training CSV. Their order is
//! the order of every feature vector handed to the classifier.

use serde::{Deserialize, Serialize};

/// CSV header of the stress label column.
pub const LABEL_COLUMN: &str = "anxiety_(scale_1–5)";
/// Smallest valid stress label.
pub const MIN_LABEL: i64 = 1;
/// Largest valid stress label.
pub const MAX_LABEL: i64 = 5;

/// Value domain of a feature column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureKind {
    /// Real-valued measurement.
    Real,
    /// Whole number.
    Integer,
    /// Yes/no flag stored as `1.0`/`0.0`.
    Binary,
}

/// One named, typed feature column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureField {
    /// Short identifier used in logs and config.
    pub key: &'static str,
    /// Literal CSV header.
    pub column: &'static str,
    pub kind: FeatureKind,
}

/// Ordered feature columns.
pub const FEATURES: [FeatureField; 5] = [
    FeatureField {
        key: "sleep",
        column: "sleep_duration_(in_hours)",
        kind: FeatureKind::Real,
    },
    FeatureField {
        key: "screen",
        column: "screen_time_per_day(in_hours)",
        kind: FeatureKind::Real,
    },
    FeatureField {
        key: "exercise",
        column: "daily_exercise_(yes/no)",
        kind: FeatureKind::Binary,
    },
    FeatureField {
        key: "meals",
        column: "number_of_meals/day",
        kind: FeatureKind::Integer,
    },
    FeatureField {
        key: "water",
        column: "water_intake_(litres)",
        kind: FeatureKind::Real,
    },
];

/// Number of values in a feature vector.
pub const FEATURE_COUNT: usize = FEATURES.len();

pub const SLEEP_INDEX: usize = 0;
pub const SCREEN_INDEX: usize = 1;
pub const EXERCISE_INDEX: usize = 2;
pub const MEALS_INDEX: usize = 3;
pub const WATER_INDEX: usize = 4;

/// Feature column headers in vector order.
pub fn feature_columns() -> Vec<String> {
    FEATURES.iter().map(|field| field.column.to_string()).collect()
}

/// Comma-joined header row: feature columns in vector order, then the label.
pub fn csv_header() -> String {
    let mut columns: Vec<&str> = FEATURES.iter().map(|field| field.column).collect();
    columns.push(LABEL_COLUMN);
    columns.join(",")
}

/// Whether `label` is a valid stress level.
pub fn is_valid_label(label: i64) -> bool {
    (MIN_LABEL..=MAX_LABEL).contains(&label)
}

/// One person's daily habits, as entered in the form.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HabitInput {
    pub sleep_hours: f32,
    pub screen_hours: f32,
    pub exercises_daily: bool,
    pub meals_per_day: u32,
    pub water_litres: f32,
}

impl Default for HabitInput {
    fn default() -> Self {
        Self {
            sleep_hours: 7.0,
            screen_hours: 4.0,
            exercises_daily: true,
            meals_per_day: 3,
            water_litres: 2.5,
        }
    }
}

impl HabitInput {
    /// Encode the input as a feature vector in schema order.
    pub fn to_features(&self) -> [f32; FEATURE_COUNT] {
        let mut features = [0.0f32; FEATURE_COUNT];
        features[SLEEP_INDEX] = self.sleep_hours;
        features[SCREEN_INDEX] = self.screen_hours;
        features[EXERCISE_INDEX] = if self.exercises_daily { 1.0 } else { 0.0 };
        features[MEALS_INDEX] = self.meals_per_day as f32;
        features[WATER_INDEX] = self.water_litres;
        features
    }
}

/// Parse a raw CSV cell for the given feature kind.
///
/// Returns `None` for empty or unparseable cells.
pub fn parse_cell(kind: FeatureKind, raw: &str) -> Option<f32> {
    let text = raw.trim();
    if text.is_empty() {
        return None;
    }
    match kind {
        FeatureKind::Real => text.parse::<f32>().ok().filter(|v| v.is_finite()),
        FeatureKind::Integer => parse_integral(text).map(|v| v as f32),
        FeatureKind::Binary => parse_binary(text).map(|flag| if flag { 1.0 } else { 0.0 }),
    }
}

/// Parse a label cell, accepting integral decimals like `3.0`.
pub fn parse_label(raw: &str) -> Option<i64> {
    let text = raw.trim();
    if text.is_empty() {
        return None;
    }
    parse_integral(text)
}

fn parse_integral(text: &str) -> Option<i64> {
    if let Ok(value) = text.parse::<i64>() {
        return Some(value);
    }
    let value = text.parse::<f64>().ok()?;
    if value.is_finite() && value.fract() == 0.0 {
        Some(value as i64)
    } else {
        None
    }
}

/// Parse a yes/no answer; words and `1`/`0` are accepted, case-insensitively.
pub fn parse_binary(text: &str) -> Option<bool> {
    match text.trim().to_ascii_lowercase().as_str() {
        "1" | "1.0" | "yes" | "y" | "true" => Some(true),
        "0" | "0.0" | "no" | "n" | "false" => Some(false),
        _ => None,
    }
}
