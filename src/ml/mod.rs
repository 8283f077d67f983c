//! Machine learning helpers for training and inference.
//!
//! The random forest is implemented in-crate so the artifact format is plain
//! JSON and predictions are reproducible from a recorded seed.

pub mod forest;
pub mod metrics;
