//! Entry point for the egui-based stress detector.
#![cfg_attr(
    all(not(debug_assertions), target_os = "windows"),
    windows_subsystem = "windows"
)]
use eframe::egui;
use stress_detector::config::{self, AppConfig};
use stress_detector::egui_app::controller::EguiController;
use stress_detector::egui_app::ui::{EguiApp, LaunchError, MIN_VIEWPORT_SIZE};
use stress_detector::logging;
use stress_detector::predictor::Predictor;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    if let Err(err) = logging::init() {
        eprintln!("File logging disabled: {err}");
        let _ = logging::init_console();
    }

    let app_config = load_config();
    let app: Box<dyn eframe::App> = match Predictor::load(&app_config.model_path) {
        Ok(predictor) => Box::new(EguiApp::new(EguiController::new(predictor, &app_config))),
        Err(err) => {
            tracing::error!("Failed to load model: {err}");
            Box::new(LaunchError::new(err.to_string()))
        }
    };

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Stress Detector")
            .with_inner_size(egui::vec2(760.0, 900.0))
            .with_min_inner_size(MIN_VIEWPORT_SIZE),
        ..Default::default()
    };
    eframe::run_native("Stress Detector", native_options, Box::new(move |_cc| Ok(app)))?;
    Ok(())
}

fn load_config() -> AppConfig {
    match config::load_or_default() {
        Ok(cfg) => cfg,
        Err(err) => {
            tracing::warn!("Using default settings: {err}");
            AppConfig::default()
        }
    }
}
