//! Minimal chart painters for the insights section.

use std::f32::consts::{FRAC_PI_2, TAU};

use eframe::egui::{self, Align2, Color32, FontId, Pos2, Rect, Sense, Shape, Stroke, Ui, Vec2};

use super::style;
use crate::insights::{ExerciseSplit, LabelMean};

const CHART_HEIGHT: f32 = 180.0;
const AXIS_MARGIN: f32 = 22.0;
const BAR_GAP: f32 = 0.25;
const PIE_SEGMENTS_PER_TURN: f32 = 96.0;

/// Bar chart of per-label means.
pub(crate) fn bar_chart(ui: &mut Ui, means: &[LabelMean], color: Color32) {
    let (painter, plot) = chart_canvas(ui);
    let values: Vec<f32> = means.iter().map(|m| m.mean).collect();
    let palette = style::palette();
    for (bar, mean) in bar_rects(&values, plot).into_iter().zip(means) {
        painter.rect_filled(bar, 0.0, color);
        painter.text(
            egui::pos2(bar.center().x, bar.min.y - 2.0),
            Align2::CENTER_BOTTOM,
            format!("{:.1}", mean.mean),
            FontId::proportional(11.0),
            palette.text_primary,
        );
    }
    label_axis(&painter, plot, means);
}

/// Line chart of per-label means.
pub(crate) fn line_chart(ui: &mut Ui, means: &[LabelMean], color: Color32) {
    let (painter, plot) = chart_canvas(ui);
    let values: Vec<f32> = means.iter().map(|m| m.mean).collect();
    let points = line_points(&values, plot);
    if points.len() > 1 {
        painter.add(Shape::line(points.clone(), Stroke::new(2.0, color)));
    }
    for point in points {
        painter.circle_filled(point, 3.0, color);
    }
    label_axis(&painter, plot, means);
}

/// Pie chart of daily-exercise answers with percentage labels.
pub(crate) fn exercise_pie(ui: &mut Ui, split: ExerciseSplit) {
    let size = Vec2::splat(CHART_HEIGHT);
    let (response, painter) = ui.allocate_painter(size, Sense::hover());
    let center = response.rect.center();
    let radius = response.rect.width().min(response.rect.height()) * 0.45;
    let colors = style::pie_colors();
    let palette = style::palette();
    let labels = ["Yes", "No"];
    for (idx, (start, sweep)) in pie_slices(&[split.yes, split.no]).into_iter().enumerate() {
        if sweep <= 0.0 {
            continue;
        }
        for shape in wedge(center, radius, start, sweep, colors[idx]) {
            painter.add(shape);
        }
        let mid = start + sweep / 2.0;
        let label_pos = center + Vec2::angled(mid) * radius * 0.6;
        let share = sweep / TAU * 100.0;
        painter.text(
            label_pos,
            Align2::CENTER_CENTER,
            format!("{}\n{share:.1}%", labels[idx]),
            FontId::proportional(12.0),
            palette.bg_primary,
        );
    }
}

fn chart_canvas(ui: &mut Ui) -> (egui::Painter, Rect) {
    let width = ui.available_width().max(120.0);
    let (response, painter) = ui.allocate_painter(Vec2::new(width, CHART_HEIGHT), Sense::hover());
    let rect = response.rect;
    painter.rect_stroke(rect, 0.0, style::outer_border(), egui::StrokeKind::Inside);
    let plot = Rect::from_min_max(
        rect.min + Vec2::new(AXIS_MARGIN, AXIS_MARGIN),
        rect.max - Vec2::new(AXIS_MARGIN / 2.0, AXIS_MARGIN),
    );
    (painter, plot)
}

fn label_axis(painter: &egui::Painter, plot: Rect, means: &[LabelMean]) {
    let palette = style::palette();
    painter.line_segment(
        [plot.left_bottom(), plot.right_bottom()],
        Stroke::new(1.0, palette.text_muted),
    );
    for (idx, mean) in means.iter().enumerate() {
        let x = slot_center(idx, means.len(), plot);
        painter.text(
            egui::pos2(x, plot.max.y + 3.0),
            Align2::CENTER_TOP,
            mean.label.to_string(),
            FontId::proportional(11.0),
            palette.text_muted,
        );
    }
}

fn slot_center(idx: usize, count: usize, plot: Rect) -> f32 {
    let slot = plot.width() / count.max(1) as f32;
    plot.min.x + slot * (idx as f32 + 0.5)
}

/// Height scale shared by bars and lines; zero-based, never zero-width.
fn value_scale(values: &[f32]) -> f32 {
    let max = values.iter().copied().fold(0.0f32, f32::max);
    if max > 0.0 { max } else { 1.0 }
}

/// One bar per value, evenly spaced, scaled so the largest fills `plot`.
pub(crate) fn bar_rects(values: &[f32], plot: Rect) -> Vec<Rect> {
    let scale = value_scale(values);
    let slot = plot.width() / values.len().max(1) as f32;
    let bar_width = slot * (1.0 - BAR_GAP);
    values
        .iter()
        .enumerate()
        .map(|(idx, &value)| {
            let x = slot_center(idx, values.len(), plot);
            let height = (value.max(0.0) / scale) * plot.height();
            Rect::from_min_max(
                egui::pos2(x - bar_width / 2.0, plot.max.y - height),
                egui::pos2(x + bar_width / 2.0, plot.max.y),
            )
        })
        .collect()
}

/// Polyline vertices for `values`, one per slot center.
pub(crate) fn line_points(values: &[f32], plot: Rect) -> Vec<Pos2> {
    let scale = value_scale(values);
    values
        .iter()
        .enumerate()
        .map(|(idx, &value)| {
            let x = slot_center(idx, values.len(), plot);
            egui::pos2(x, plot.max.y - (value.max(0.0) / scale) * plot.height())
        })
        .collect()
}

/// `(start, sweep)` angles in radians, starting at 12 o'clock.
pub(crate) fn pie_slices(counts: &[usize]) -> Vec<(f32, f32)> {
    let total: usize = counts.iter().sum();
    let mut start = -FRAC_PI_2;
    counts
        .iter()
        .map(|&count| {
            let sweep = if total == 0 {
                0.0
            } else {
                count as f32 / total as f32 * TAU
            };
            let slice = (start, sweep);
            start += sweep;
            slice
        })
        .collect()
}

/// Triangle fan covering one pie slice; each triangle is convex.
fn wedge(center: Pos2, radius: f32, start: f32, sweep: f32, fill: Color32) -> Vec<Shape> {
    let steps = ((sweep / TAU) * PIE_SEGMENTS_PER_TURN).ceil().max(1.0) as usize;
    let step = sweep / steps as f32;
    (0..steps)
        .map(|i| {
            let a = center + Vec2::angled(start + step * i as f32) * radius;
            let b = center + Vec2::angled(start + step * (i + 1) as f32) * radius;
            Shape::convex_polygon(vec![center, a, b], fill, Stroke::NONE)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plot() -> Rect {
        Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(300.0, 100.0))
    }

    #[test]
    fn tallest_bar_fills_the_plot() {
        let bars = bar_rects(&[2.0, 4.0, 1.0], plot());
        assert_eq!(bars.len(), 3);
        assert!((bars[1].height() - 100.0).abs() < 1e-3);
        assert!((bars[0].height() - 50.0).abs() < 1e-3);
        assert!(bars.iter().all(|bar| (bar.max.y - 100.0).abs() < 1e-3));
        assert!(bars[0].max.x < bars[1].min.x);
    }

    #[test]
    fn zero_values_do_not_divide_by_zero() {
        let bars = bar_rects(&[0.0, 0.0], plot());
        assert!(bars.iter().all(|bar| bar.height() == 0.0));
        let points = line_points(&[0.0], plot());
        assert_eq!(points, vec![egui::pos2(150.0, 100.0)]);
    }

    #[test]
    fn line_points_sit_on_slot_centers() {
        let points = line_points(&[1.0, 2.0], plot());
        assert_eq!(points[0], egui::pos2(75.0, 50.0));
        assert_eq!(points[1], egui::pos2(225.0, 0.0));
    }

    #[test]
    fn pie_slices_cover_the_circle() {
        let slices = pie_slices(&[3, 1]);
        assert!((slices[0].0 + FRAC_PI_2).abs() < 1e-6);
        assert!((slices[0].1 - TAU * 0.75).abs() < 1e-5);
        assert!((slices[1].0 - (slices[0].0 + slices[0].1)).abs() < 1e-6);
        let covered: f32 = slices.iter().map(|(_, sweep)| sweep).sum();
        assert!((covered - TAU).abs() < 1e-5);
        assert!(pie_slices(&[0, 0]).iter().all(|(_, sweep)| *sweep == 0.0));
    }
}
