//! Training dataset access.

pub mod loader;

pub use loader::{DatasetError, LoadReport, LoadedDataset, SkippedRow, load_dataset};
