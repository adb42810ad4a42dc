use eframe::egui::{RichText, Stroke, Ui};
use egui_plot::{Bar, BarChart, Plot, PlotBounds};

use crate::color;
use crate::data::model::{AggregatePoint, Metric, format_age};
use crate::scale::{DEFAULT_TICKS, bar_width, nice_max};
use crate::state::AppState;
use crate::transition::Phase;

// ---------------------------------------------------------------------------
// Per-age bar chart (central panel)
// ---------------------------------------------------------------------------

/// Hover text for one bar.
pub fn tooltip_text(point: &AggregatePoint, metric: Metric, min_games_played: u32) -> String {
    format!(
        "Age: {}\n{}: {:.2}\nMin GP filter: {}+",
        format_age(point.age),
        metric.label(),
        point.value,
        min_games_played
    )
}

/// Upper end of the y axis for the current aggregate.
pub fn y_domain_max(points: &[AggregatePoint]) -> f64 {
    let max = points.iter().map(|p| p.value).fold(0.0, f64::max);
    nice_max(max, DEFAULT_TICKS)
}

/// Render the animated bar chart in the central panel.
pub fn age_chart(ui: &mut Ui, state: &mut AppState, now: f64) {
    if state.dataset.is_none() {
        ui.centered_and_justified(|ui: &mut Ui| {
            if state.loading() {
                ui.heading("Loading player seasons…");
            } else {
                ui.heading("Open a file to view age curves  (File → Open…)");
            }
        });
        return;
    }

    let metric = state.selection.metric;
    let min_gp = state.selection.min_games_played;
    let fill = color::metric_color(metric);
    let stroke = Stroke::new(1.0, color::outline(fill));

    ui.vertical_centered(|ui: &mut Ui| {
        ui.label(
            RichText::new(state.title())
                .size(20.0)
                .strong()
                .color(color::TEXT),
        );
    });
    if state.aggregate.is_empty() {
        ui.vertical_centered(|ui: &mut Ui| {
            ui.label(
                RichText::new("No data after filtering; try lowering minimum games played.")
                    .color(color::AXIS),
            );
        });
    }

    let frames = state.bars.frame(now);

    // Band scale: slot i holds the i-th age. Exiting bars may sit past the end.
    let n = state.aggregate.len();
    let last_slot = frames
        .iter()
        .map(|f| f.slot)
        .fold(n.max(1) as f64 - 1.0, f64::max);
    let y_max = match y_domain_max(&state.aggregate) {
        m if m > 0.0 => m,
        _ => 1.0,
    };

    let bars: Vec<Bar> = frames
        .iter()
        .map(|f| {
            // Leaving bars fade while they shrink.
            let bar_fill = match f.phase {
                Phase::Exiting => fill.gamma_multiply(0.6),
                _ => fill,
            };
            Bar::new(f.slot, f.height)
                .width(bar_width())
                .fill(bar_fill)
                .stroke(stroke)
                .name(tooltip_text(&f.point, metric, min_gp))
        })
        .collect();

    let chart = BarChart::new(bars)
        .color(fill)
        .name(metric.label())
        .element_formatter(Box::new(|bar: &Bar, _chart: &BarChart| bar.name.clone()));

    let ages: Vec<f64> = state.aggregate.iter().map(|p| p.age).collect();

    Plot::new("age_chart")
        .x_axis_label(RichText::new("Age").color(color::TEXT))
        .y_axis_label(RichText::new(metric.label()).color(color::TEXT))
        .x_axis_formatter(move |mark, _range| {
            let slot = mark.value.round();
            if (mark.value - slot).abs() > 1e-6 || slot < 0.0 {
                return String::new();
            }
            ages.get(slot as usize)
                .map(|age| format_age(*age))
                .unwrap_or_default()
        })
        .x_grid_spacer(egui_plot::uniform_grid_spacer(|_| [1.0, 5.0, 10.0]))
        .show_grid([false, true])
        .show_x(false)
        .show_y(false)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .allow_double_click_reset(false)
        .show(ui, |plot_ui| {
            plot_ui.set_plot_bounds(PlotBounds::from_min_max(
                [-0.5, 0.0],
                [last_slot + 0.5, y_max],
            ));
            plot_ui.bar_chart(chart);
        });
}
