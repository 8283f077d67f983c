//! Library exports for the stress detector binaries, benchmarks and tests.
/// Advisory messages keyed by predicted stress level.
pub mod advice;
/// Application directory resolution.
pub mod app_dirs;
/// TOML-backed application settings.
pub mod config;
/// CSV dataset loading.
pub mod dataset;
/// egui front end.
pub mod egui_app;
/// Aggregate dataset summaries for the optional charts.
pub mod insights;
/// Tracing setup.
pub mod logging;
/// Classifier models and metrics.
pub mod ml;
/// Runtime inference over a trained artifact.
pub mod predictor;
/// Shared feature schema.
pub mod schema;
/// Offline training pipeline.
pub mod trainer;
