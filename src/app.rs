use eframe::egui;

use crate::config;
use crate::state::AppState;
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct AgeCurvesApp {
    pub state: AppState,
}

impl AgeCurvesApp {
    /// Start on the dark theme and kick off the startup load.
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        cc.egui_ctx.set_visuals(egui::Visuals::dark());

        let mut state = AppState::default();
        let ctx = cc.egui_ctx.clone();
        state.begin_load(config::data_path(), move || ctx.request_repaint());
        Self { state }
    }
}

impl eframe::App for AgeCurvesApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = ctx.input(|i| i.time);
        self.state.poll_load(now);

        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: controls + summary ----
        egui::SidePanel::left("control_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state, now);
            });

        // ---- Central panel: chart ----
        egui::CentralPanel::default().show(ctx, |ui| {
            plot::age_chart(ui, &mut self.state, now);
        });

        if self.state.bars.is_animating(now) {
            ctx.request_repaint();
        }
    }
}
