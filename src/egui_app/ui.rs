//! egui renderer for the stress detector.
pub(crate) mod charts;
pub mod style;

use crate::advice::{self, Advice};
use crate::egui_app::controller::EguiController;
use crate::egui_app::state::PredictionView;
use crate::insights::{Insights, InsightsOutcome};
use eframe::egui::{self, Color32, Frame, Margin, RichText, SliderClamping, Ui, Vec2};

/// Minimum window size that keeps the two-column form readable.
pub const MIN_VIEWPORT_SIZE: Vec2 = Vec2::new(520.0, 640.0);

/// Renders the form, result and insights using the shared controller state.
pub struct EguiApp {
    controller: EguiController,
    visuals_set: bool,
}

impl EguiApp {
    pub fn new(controller: EguiController) -> Self {
        Self {
            controller,
            visuals_set: false,
        }
    }

    fn apply_visuals(&mut self, ctx: &egui::Context) {
        if self.visuals_set {
            return;
        }
        let mut visuals = egui::Visuals::dark();
        style::apply_visuals(&mut visuals);
        ctx.set_visuals(visuals);
        self.visuals_set = true;
    }

    fn render_status(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar")
            .frame(Frame::new().fill(Color32::from_rgb(0, 0, 0)))
            .show(ctx, |ui| {
                let status = &self.controller.ui.status;
                ui.horizontal(|ui| {
                    ui.add_space(8.0);
                    ui.painter().circle_filled(
                        ui.cursor().min + egui::vec2(9.0, 11.0),
                        9.0,
                        status.badge_color,
                    );
                    ui.add_space(22.0);
                    ui.label(RichText::new(&status.badge_label).color(Color32::WHITE));
                    ui.separator();
                    ui.label(RichText::new(&status.text).color(Color32::WHITE));
                });
            });
    }

    fn render_form(&mut self, ui: &mut Ui) {
        let ranges = self.controller.ui.ranges;
        let form = &mut self.controller.ui.form;
        let mut changed = false;
        ui.columns(2, |cols| {
            changed |= cols[0]
                .add(
                    egui::Slider::new(&mut form.sleep_hours, ranges.sleep.min..=ranges.sleep.max)
                        .step_by(ranges.sleep.step as f64)
                        .clamping(SliderClamping::Always)
                        .text("Sleep Duration (hrs)"),
                )
                .changed();
            changed |= cols[1]
                .add(
                    egui::Slider::new(
                        &mut form.screen_hours,
                        ranges.screen.min..=ranges.screen.max,
                    )
                    .step_by(ranges.screen.step as f64)
                    .clamping(SliderClamping::Always)
                    .text("Screen Time (hrs)"),
                )
                .changed();
        });
        ui.columns(2, |cols| {
            changed |= cols[0]
                .add(
                    egui::Slider::new(
                        &mut form.meals_per_day,
                        ranges.meals.min as u32..=ranges.meals.max as u32,
                    )
                    .step_by(ranges.meals.step as f64)
                    .clamping(SliderClamping::Always)
                    .text("Meals/day"),
                )
                .changed();
            changed |= cols[1]
                .add(
                    egui::Slider::new(&mut form.water_litres, ranges.water.min..=ranges.water.max)
                        .step_by(ranges.water.step as f64)
                        .clamping(SliderClamping::Always)
                        .text("Water Intake (litres)"),
                )
                .changed();
        });
        ui.horizontal(|ui| {
            ui.label("Daily Exercise");
            changed |= ui.radio_value(&mut form.exercises_daily, true, "Yes").changed();
            changed |= ui.radio_value(&mut form.exercises_daily, false, "No").changed();
        });
        if changed {
            self.controller.form_changed();
        }
    }

    fn render_actions(&mut self, ui: &mut Ui) {
        ui.horizontal(|ui| {
            if ui
                .button(RichText::new("Predict Stress Level").strong())
                .clicked()
            {
                self.controller.predict();
            }
            if ui.button("Reset").clicked() {
                self.controller.reset_form();
            }
        });
    }

    fn render_result(ui: &mut Ui, result: &PredictionView) {
        let palette = style::palette();
        Frame::group(ui.style())
            .inner_margin(Margin::same(10))
            .show(ui, |ui| {
                ui.label(
                    RichText::new(format!("Predicted Stress Level (1–5): {}", result.label))
                        .strong()
                        .color(palette.accent_mint),
                );
                match result.advice {
                    Advice::Tip(tip) => {
                        ui.label(
                            RichText::new(format!("{} – {}", tip.name, tip.summary))
                                .strong()
                                .color(style::severity_color(tip.severity)),
                        );
                        ui.label(format!("Tip: {}", tip.tip));
                    }
                    Advice::Unexpected(_) => {
                        ui.colored_label(palette.warning, advice::UNEXPECTED_NOTICE);
                    }
                }
                if !result.probabilities.is_empty() {
                    let shares: Vec<String> = result
                        .probabilities
                        .iter()
                        .map(|(label, p)| format!("{label}: {:.0}%", p * 100.0))
                        .collect();
                    ui.label(
                        RichText::new(format!("Confidence  {}", shares.join("  ")))
                            .color(palette.text_muted),
                    );
                }
                ui.label(RichText::new(advice::ENCOURAGEMENT).italics());
            });
    }

    fn render_insights(ui: &mut Ui, outcome: &InsightsOutcome) {
        ui.heading("Visual Insights (Optional)");
        match outcome {
            InsightsOutcome::Ready(insights) => Self::render_charts(ui, insights),
            InsightsOutcome::Unavailable { reason } => {
                let palette = style::palette();
                ui.colored_label(
                    palette.warning,
                    "To enable graphs, make sure the stress dataset CSV exists and column names are correct.",
                )
                .on_hover_text(reason.as_str());
            }
        }
    }

    fn render_charts(ui: &mut Ui, insights: &Insights) {
        let palette = style::palette();
        ui.label(RichText::new("Avg Sleep vs Stress Level").strong());
        charts::bar_chart(ui, &insights.sleep_by_label, palette.accent_ice);
        ui.add_space(8.0);
        ui.label(RichText::new("Screen Time vs Stress Level").strong());
        charts::line_chart(ui, &insights.screen_by_label, palette.accent_copper);
        ui.add_space(8.0);
        ui.label(RichText::new("Exercise Distribution").strong());
        charts::exercise_pie(ui, insights.exercise);
    }
}

impl eframe::App for EguiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.apply_visuals(ctx);
        self.render_status(ctx);
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.heading("Mental Health Stress Detector");
                ui.label("Enter your daily habits to predict your stress level (1–5) and get helpful suggestions.");
                ui.separator();
                self.render_form(ui);
                ui.add_space(6.0);
                self.render_actions(ui);
                if let Some(result) = &self.controller.ui.result {
                    ui.add_space(6.0);
                    Self::render_result(ui, result);
                }
                ui.separator();
                Self::render_insights(ui, self.controller.insights());
            });
        });
    }
}

/// Minimal fallback app to display initialization errors.
pub struct LaunchError {
    message: String,
}

impl LaunchError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl eframe::App for LaunchError {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.heading("Failed to start the stress detector");
                ui.label(&self.message);
                ui.label("Train a model with `stress-detector-train` and try again.");
            });
        });
    }
}
