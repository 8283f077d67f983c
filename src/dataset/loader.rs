//! CSV loader for the labeled stress dataset.
//!
//! Rows with a missing or unparseable cell, or a label outside the valid stress
//! range, are rejected and reported instead of reaching the classifier.

use std::collections::BTreeSet;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, warn};

use crate::schema::{self, FEATURE_COUNT, FEATURES, LABEL_COLUMN};

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("Failed to open dataset {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to read dataset {path}: {source}")]
    Csv { path: PathBuf, source: csv::Error },
    #[error("Dataset {path} is missing column {column:?}")]
    MissingColumn { path: PathBuf, column: String },
    #[error("Dataset {path} has no valid rows ({skipped} rejected)")]
    NoValidRows { path: PathBuf, skipped: usize },
}

/// A row rejected by the missing-value policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRow {
    /// 1-based line number in the source file.
    pub line: u64,
    pub reason: String,
}

/// Row accounting for a dataset load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Data rows seen, excluding the header.
    pub total_rows: usize,
    pub skipped: Vec<SkippedRow>,
    /// Header columns that are not part of the schema.
    pub ignored_columns: Vec<String>,
}

impl LoadReport {
    pub fn accepted_rows(&self) -> usize {
        self.total_rows - self.skipped.len()
    }
}

/// Parsed dataset rows in schema order.
#[derive(Debug, Clone)]
pub struct LoadedDataset {
    pub source: PathBuf,
    /// Feature rows aligned with `labels`.
    pub rows: Vec<[f32; FEATURE_COUNT]>,
    pub labels: Vec<i64>,
    pub report: LoadReport,
}

impl LoadedDataset {
    /// Distinct labels in ascending order.
    pub fn label_set(&self) -> Vec<i64> {
        self.labels
            .iter()
            .copied()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Load a dataset CSV from disk.
pub fn load_dataset(path: &Path) -> Result<LoadedDataset, DatasetError> {
    let file = File::open(path).map_err(|source| DatasetError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    load_dataset_from_reader(file, path)
}

/// Load a dataset CSV from any reader; `source` is used for reporting only.
pub fn load_dataset_from_reader<R: Read>(
    reader: R,
    source: &Path,
) -> Result<LoadedDataset, DatasetError> {
    let csv_error = |err: csv::Error| DatasetError::Csv {
        path: source.to_path_buf(),
        source: err,
    };
    let mut csv = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);
    let headers = csv.headers().map_err(csv_error)?.clone();
    let column_index = |column: &str| {
        headers
            .iter()
            .position(|header| header.trim() == column)
            .ok_or_else(|| DatasetError::MissingColumn {
                path: source.to_path_buf(),
                column: column.to_string(),
            })
    };
    let label_idx = column_index(LABEL_COLUMN)?;
    let mut feature_idx = [0usize; FEATURE_COUNT];
    for (slot, field) in feature_idx.iter_mut().zip(FEATURES.iter()) {
        *slot = column_index(field.column)?;
    }

    let mut report = LoadReport {
        ignored_columns: headers
            .iter()
            .map(str::trim)
            .filter(|header| {
                *header != LABEL_COLUMN && FEATURES.iter().all(|f| f.column != *header)
            })
            .map(str::to_string)
            .collect(),
        ..LoadReport::default()
    };
    if !report.ignored_columns.is_empty() {
        warn!(
            "Ignoring columns outside the feature schema in {}: {:?}",
            source.display(),
            report.ignored_columns
        );
    }

    let mut rows = Vec::new();
    let mut labels = Vec::new();
    for record in csv.byte_records() {
        let record = record.map_err(csv_error)?;
        report.total_rows += 1;
        let line = record.position().map(|pos| pos.line()).unwrap_or(0);
        match parse_record(&record, label_idx, &feature_idx) {
            Ok((row, label)) => {
                rows.push(row);
                labels.push(label);
            }
            Err(reason) => {
                warn!("Rejecting row at line {line}: {reason}");
                report.skipped.push(SkippedRow { line, reason });
            }
        }
    }

    if rows.is_empty() {
        return Err(DatasetError::NoValidRows {
            path: source.to_path_buf(),
            skipped: report.skipped.len(),
        });
    }
    debug!(
        "Loaded {} of {} rows from {}",
        rows.len(),
        report.total_rows,
        source.display()
    );
    Ok(LoadedDataset {
        source: source.to_path_buf(),
        rows,
        labels,
        report,
    })
}

fn parse_record(
    record: &csv::ByteRecord,
    label_idx: usize,
    feature_idx: &[usize; FEATURE_COUNT],
) -> Result<([f32; FEATURE_COUNT], i64), String> {
    let raw_label = cell_text(record, label_idx, LABEL_COLUMN)?;
    let label = schema::parse_label(raw_label)
        .ok_or_else(|| format!("missing or invalid {LABEL_COLUMN} value {raw_label:?}"))?;
    if !schema::is_valid_label(label) {
        return Err(format!(
            "label {label} outside {}..={}",
            schema::MIN_LABEL,
            schema::MAX_LABEL
        ));
    }
    let mut row = [0.0f32; FEATURE_COUNT];
    for ((slot, &idx), field) in row.iter_mut().zip(feature_idx.iter()).zip(FEATURES.iter()) {
        let raw = cell_text(record, idx, field.column)?;
        *slot = schema::parse_cell(field.kind, raw)
            .ok_or_else(|| format!("missing or invalid {} value {raw:?}", field.column))?;
    }
    Ok((row, label))
}

/// Schema cells are decoded one by one; other columns are never inspected.
fn cell_text<'r>(
    record: &'r csv::ByteRecord,
    idx: usize,
    column: &str,
) -> Result<&'r str, String> {
    let bytes = record.get(idx).unwrap_or_default();
    std::str::from_utf8(bytes).map_err(|_| format!("{column} value is not valid UTF-8"))
}
