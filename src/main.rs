mod app;
mod color;
mod config;
mod data;
mod scale;
mod state;
mod transition;
mod ui;

use app::AgeCurvesApp;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 720.0])
            .with_min_inner_size([640.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Age Curves – NBA Player Averages",
        options,
        Box::new(|cc| Ok(Box::new(AgeCurvesApp::new(cc)))),
    )
}
