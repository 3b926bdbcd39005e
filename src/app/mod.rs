use crate::layout::Layout;
use crate::model::{self, IRect, IVec2};
use crate::registry::CropRegistry;

mod actions;
mod render;
mod settings;
mod update;

pub struct PlotApp {
    layout: Layout,
    registry: CropRegistry,
    /// The plot whose form is shown in the side panel. Set on click and kept
    /// until the plot is removed, unlike the per-frame active plot.
    inspected: Option<u64>,
    last_pointer: Option<IVec2>,
    file_path: String,
    crops_path: String,
    settings_path: String,
    status: Option<String>,
}

impl PlotApp {
    fn config_path() -> Option<String> {
        if let Some(home) = std::env::var_os("HOME") {
            let path = std::path::PathBuf::from(home)
                .join(".config")
                .join("fieldplan.toml");
            if path.exists() {
                return Some(path.display().to_string());
            }
        }
        if std::path::Path::new("settings.toml").exists() {
            return Some("settings.toml".to_string());
        }
        None
    }

    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        let settings_path = Self::config_path().unwrap_or_else(|| "settings.toml".to_string());
        let settings = settings::load_settings(&settings_path)
            .or_else(|| settings::load_settings("settings.json"))
            .unwrap_or_default();

        let registry = CropRegistry::load_csv(&settings.crops_path);
        let mut layout = Layout::new(
            settings.canvas_width.max(320),
            settings.canvas_height.max(240),
        );

        // Two starter plots so the canvas is never empty on first launch.
        for (x, crop) in [(10, "Wheat"), (200, "Corn")] {
            let id = layout.allocate_id();
            let mut plot = model::Plot::new(id, IRect::new(x, 10, 150, 150));
            if let Some(index) = registry.index_of(crop) {
                let entry = &registry.entries()[index];
                plot.crop = entry.name.clone();
                plot.crop_index = index;
                plot.color = entry.color;
                plot.expected_yield = entry.avg_yield;
            }
            layout.add_plot(plot);
        }

        Self {
            layout,
            registry,
            inspected: None,
            last_pointer: None,
            file_path: settings.file_path,
            crops_path: settings.crops_path,
            settings_path,
            status: None,
        }
    }
}
