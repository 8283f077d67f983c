//! Shared state types for the egui UI.

use crate::advice::Advice;
use crate::config::FormRanges;
use crate::egui_app::ui::style;
use crate::schema::HabitInput;
use egui::Color32;

/// Top-level UI model consumed by the egui renderer.
#[derive(Clone, Debug)]
pub struct UiState {
    /// Current slider and radio values.
    pub form: HabitInput,
    pub ranges: FormRanges,
    /// Outcome of the last prediction, cleared when the form changes.
    pub result: Option<PredictionView>,
    pub status: StatusBarState,
}

impl UiState {
    pub fn new(ranges: FormRanges) -> Self {
        Self {
            form: ranges.default_input(),
            ranges,
            result: None,
            status: StatusBarState::idle(),
        }
    }
}

impl Default for UiState {
    fn default() -> Self {
        Self::new(FormRanges::default())
    }
}

/// Render-ready prediction.
#[derive(Clone, Debug, PartialEq)]
pub struct PredictionView {
    /// Input the prediction was made for.
    pub input: HabitInput,
    pub label: i64,
    pub advice: Advice,
    /// `(label, probability)` pairs in ascending label order.
    pub probabilities: Vec<(i64, f32)>,
}

/// Status badge + text shown in the footer.
#[derive(Clone, Debug, PartialEq)]
pub struct StatusBarState {
    pub text: String,
    pub badge_label: String,
    pub badge_color: Color32,
}

impl StatusBarState {
    pub fn idle() -> Self {
        Self::with_tone("Adjust your habits and press Predict", StatusTone::Idle)
    }

    pub fn with_tone(text: impl Into<String>, tone: StatusTone) -> Self {
        let (badge_label, badge_color) = style::status_badge(tone);
        Self {
            text: text.into(),
            badge_label: badge_label.to_string(),
            badge_color,
        }
    }
}

/// Severity of the footer status message.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusTone {
    Idle,
    Info,
    Warning,
}
