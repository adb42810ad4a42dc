use eframe::egui::{self, Color32, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::color;
use crate::data::model::{Metric, format_age};
use crate::state::{AppState, MIN_GAMES_RANGE};

// ---------------------------------------------------------------------------
// Left side panel – selection controls and summary
// ---------------------------------------------------------------------------

/// Render the left control panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState, now: f64) {
    ui.heading("Controls");
    ui.separator();

    if state.dataset.is_none() {
        if state.loading() {
            ui.horizontal(|ui: &mut Ui| {
                ui.spinner();
                ui.label("Loading…");
            });
        } else {
            ui.label("No dataset loaded.");
        }
    }

    // Inert until the first load resolves.
    ui.add_enabled_ui(state.controls_enabled(), |ui: &mut Ui| {
        // ---- Metric selector ----
        ui.strong("Metric");
        let mut metric = state.selection.metric;
        egui::ComboBox::from_id_salt("metric_select")
            .selected_text(RichText::new(metric.to_string()).color(color::metric_color(metric)))
            .show_ui(ui, |ui: &mut Ui| {
                for m in Metric::ALL {
                    ui.selectable_value(&mut metric, m, m.to_string());
                }
            });
        state.set_metric(metric, now);
        ui.add_space(8.0);

        // ---- Games-played threshold ----
        ui.strong("Minimum games played");
        let mut min_gp = state.selection.min_games_played;
        let response = ui.add(
            egui::Slider::new(&mut min_gp, MIN_GAMES_RANGE)
                .step_by(1.0)
                .integer(),
        );
        if response.changed() {
            state.set_min_games_played(min_gp, now);
        }
        ui.label(format!("GP ≥ {}", state.selection.min_games_played));
    });

    ui.separator();
    summary_table(ui, state);
}

/// Age / mean / count listing of the current aggregate.
fn summary_table(ui: &mut Ui, state: &AppState) {
    if state.aggregate.is_empty() {
        if state.dataset.is_some() {
            ui.label(RichText::new("No seasons pass the filter.").italics());
        }
        return;
    }

    let metric = state.selection.metric;
    TableBuilder::new(ui)
        .striped(true)
        .column(Column::auto().at_least(40.0))
        .column(Column::auto().at_least(60.0))
        .column(Column::remainder())
        .header(20.0, |mut header| {
            header.col(|ui: &mut Ui| {
                ui.strong("Age");
            });
            header.col(|ui: &mut Ui| {
                ui.strong(metric.key());
            });
            header.col(|ui: &mut Ui| {
                ui.strong("Seasons");
            });
        })
        .body(|mut body| {
            for p in &state.aggregate {
                body.row(18.0, |mut row| {
                    row.col(|ui: &mut Ui| {
                        ui.label(format_age(p.age));
                    });
                    row.col(|ui: &mut Ui| {
                        ui.label(format!("{:.2}", p.value));
                    });
                    row.col(|ui: &mut Ui| {
                        ui.label(p.count.to_string());
                    });
                });
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(ui.ctx(), state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} seasons loaded ({} rows skipped), {} with GP ≥ {}",
                ds.len(),
                ds.rows_rejected,
                state.surviving_count(),
                state.selection.min_games_played
            ));
            if let Some(src) = &ds.source {
                ui.separator();
                ui.label(RichText::new(src.display().to_string()).weak());
            }
        }

        if state.loading() {
            ui.separator();
            ui.spinner();
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(ctx: &egui::Context, state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open player seasons")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        let ctx = ctx.clone();
        state.begin_load(path, move || ctx.request_repaint());
    }
}
