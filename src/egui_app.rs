//! egui front end: prediction form, advisory block and dataset charts.

pub mod controller;
pub mod state;
pub mod ui;
