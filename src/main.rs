mod app;
mod layout;
mod model;
mod registry;

fn main() -> eframe::Result<()> {
    let native_options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1080.0, 720.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Field Planner",
        native_options,
        Box::new(|cc| Ok(Box::new(app::PlotApp::new(cc)))),
    )
}
