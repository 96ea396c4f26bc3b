use std::f32::consts::TAU;
use std::ops::RangeInclusive;

use eframe::egui::{pos2, vec2, Pos2, Sense, Shape, Stroke, Ui};
use egui_plot::{Bar, BarChart, GridMark, Line, Plot, PlotPoints};

use crate::color::{slice_colors, SERIES_COLOR};
use crate::data::analytics::ChartDataset;
use crate::state::AppState;

const CHART_HEIGHT: f32 = 250.0;

// ---------------------------------------------------------------------------
// Chart grid (central panel, "Charts" view)
// ---------------------------------------------------------------------------

pub fn charts(ui: &mut Ui, state: &AppState) {
    if state.dataset.is_empty() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("No data  (File → Open…)");
        });
        return;
    }

    let snapshot = &state.snapshot;
    ui.columns(2, |cols| {
        cols[0].strong("Vehicle Type Distribution");
        type_pie(&mut cols[0], &snapshot.vehicle_types);

        cols[1].strong("Top Manufacturers");
        manufacturer_bars(&mut cols[1], &snapshot.top_manufacturers);
    });

    ui.separator();
    ui.strong("Yearly Trend");
    yearly_line(ui, &snapshot.yearly_trend);
}

// ---------------------------------------------------------------------------
// Pie – drawn with the painter, egui_plot has no pie chart
// ---------------------------------------------------------------------------

/// Largest angle of one fan polygon; keeps every polygon convex.
const MAX_WEDGE: f32 = TAU / 8.0;

fn type_pie(ui: &mut Ui, chart: &ChartDataset) {
    let total = chart.total();
    if total == 0 {
        ui.label("No vehicles match the current filters.");
        return;
    }
    let colors = slice_colors(chart.points.len());

    ui.horizontal(|ui: &mut Ui| {
        let side = CHART_HEIGHT.min(ui.available_width() * 0.5);
        let (response, painter) = ui.allocate_painter(vec2(side, side), Sense::hover());
        let center = response.rect.center();
        let radius = side * 0.45;

        let mut start = -TAU / 4.0;
        for ((_, count), color) in chart.points.iter().zip(&colors) {
            let sweep = TAU * (*count as f32 / total as f32);
            let steps = (sweep / MAX_WEDGE).ceil().max(1.0) as usize;
            for s in 0..steps {
                let a0 = start + sweep * s as f32 / steps as f32;
                let a1 = start + sweep * (s + 1) as f32 / steps as f32;
                painter.add(Shape::convex_polygon(
                    wedge(center, radius, a0, a1),
                    *color,
                    Stroke::NONE,
                ));
            }
            start += sweep;
        }

        ui.vertical(|ui: &mut Ui| {
            for ((label, count), color) in chart.points.iter().zip(&colors) {
                ui.horizontal(|ui: &mut Ui| {
                    let (swatch, _) = ui.allocate_exact_size(vec2(12.0, 12.0), Sense::hover());
                    ui.painter().rect_filled(swatch, 2.0, *color);
                    ui.label(format!("{label} ({count})"));
                });
            }
        });
    });
}

/// Fan polygon approximating the arc between `a0` and `a1`.
fn wedge(center: Pos2, radius: f32, a0: f32, a1: f32) -> Vec<Pos2> {
    const ARC_POINTS: usize = 12;
    let mut points = Vec::with_capacity(ARC_POINTS + 2);
    points.push(center);
    for i in 0..=ARC_POINTS {
        let a = a0 + (a1 - a0) * i as f32 / ARC_POINTS as f32;
        points.push(pos2(center.x + radius * a.cos(), center.y + radius * a.sin()));
    }
    points
}

// ---------------------------------------------------------------------------
// Bar and line charts
// ---------------------------------------------------------------------------

/// Axis formatter that shows a category label at each integer position.
fn category_axis(labels: Vec<String>) -> impl Fn(GridMark, &RangeInclusive<f64>) -> String {
    move |mark: GridMark, _range: &RangeInclusive<f64>| {
        let pos = mark.value.round();
        if (mark.value - pos).abs() > f64::EPSILON || pos < 0.0 {
            return String::new();
        }
        labels.get(pos as usize).cloned().unwrap_or_default()
    }
}

/// Fixed, non-interactive plot with category labels along x.
fn category_plot(
    ui: &mut Ui,
    id: &str,
    labels: Vec<String>,
    build: impl FnOnce(&mut egui_plot::PlotUi),
) {
    Plot::new(id)
        .height(CHART_HEIGHT)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .include_y(0.0)
        .legend(egui_plot::Legend::default())
        .x_axis_formatter(category_axis(labels))
        .show(ui, build);
}

fn manufacturer_bars(ui: &mut Ui, chart: &ChartDataset) {
    if chart.is_empty() {
        ui.label("No vehicles match the current filters.");
        return;
    }
    let bars: Vec<Bar> = chart
        .points
        .iter()
        .enumerate()
        .map(|(i, (label, count))| {
            Bar::new(i as f64, *count as f64)
                .name(label)
                .width(0.7)
                .fill(SERIES_COLOR)
        })
        .collect();
    let labels = chart.labels().map(str::to_owned).collect();

    category_plot(ui, "top_manufacturers", labels, |plot_ui| {
        plot_ui.bar_chart(
            BarChart::new(bars)
                .color(SERIES_COLOR)
                .name("Number of Vehicles"),
        );
    });
}

fn yearly_line(ui: &mut Ui, chart: &ChartDataset) {
    if chart.is_empty() {
        ui.label("No model years in the current selection.");
        return;
    }
    let points: PlotPoints = chart
        .values()
        .enumerate()
        .map(|(i, count)| [i as f64, count as f64])
        .collect();
    let labels = chart.labels().map(str::to_owned).collect();

    category_plot(ui, "yearly_trend", labels, |plot_ui| {
        plot_ui.line(
            Line::new(points)
                .name("Number of Vehicles")
                .color(SERIES_COLOR)
                .width(2.0),
        );
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wedge_starts_at_center_and_spans_the_arc() {
        let pts = wedge(pos2(0.0, 0.0), 10.0, 0.0, TAU / 4.0);
        assert_eq!(pts[0], pos2(0.0, 0.0));
        let first = pts[1];
        let last = *pts.last().unwrap();
        assert!((first.x - 10.0).abs() < 1e-4 && first.y.abs() < 1e-4);
        assert!(last.x.abs() < 1e-4 && (last.y - 10.0).abs() < 1e-4);
    }

    #[test]
    fn category_axis_labels_integer_marks_only() {
        let fmt = category_axis(vec!["2019".into(), "2020".into()]);
        let mark = |value| GridMark {
            value,
            step_size: 1.0,
        };
        assert_eq!(fmt(mark(1.0), &(0.0..=1.0)), "2020");
        assert_eq!(fmt(mark(0.5), &(0.0..=1.0)), "");
        assert_eq!(fmt(mark(5.0), &(0.0..=1.0)), "");
        assert_eq!(fmt(mark(-1.0), &(0.0..=1.0)), "");
    }
}
