use crate::model::{self, IRect, PlotRecord};
use crate::registry::CropRegistry;

use super::{settings, PlotApp};

impl PlotApp {
    /// Assigns a registry entry to a plot: identifier, stable index, color
    /// and the table's average yield.
    pub(super) fn assign_crop(&mut self, id: u64, index: usize) {
        let Some(entry) = self.registry.get(index) else {
            return;
        };
        let crop = if index == 0 { "" } else { entry.name.as_str() };
        self.layout
            .set_crop(id, crop, index, entry.color, entry.avg_yield);
    }

    /// Re-resolves every plot's crop against the registry. Unknown crops
    /// drop back to "no selection" rather than erroring.
    pub(super) fn resync_crops(&mut self) {
        let ids: Vec<u64> = self.layout.plots().iter().map(|p| p.id).collect();
        for id in ids {
            let Some(crop) = self.layout.plot(id).map(|p| p.crop.clone()) else {
                continue;
            };
            match self.registry.lookup(&crop) {
                Some(entry) => {
                    let index = self.registry.index_of(&crop).unwrap_or(0);
                    self.layout
                        .set_crop(id, &crop, index, entry.color, entry.avg_yield);
                }
                None => {
                    let color = self.registry.sentinel().color;
                    self.layout.set_crop(id, "", 0, color, 0.0);
                }
            }
        }
    }

    pub(super) fn add_plot_action(&mut self) {
        // Prefer the starter size, fall back to the minimum if the field is
        // crowded.
        let slot = self
            .layout
            .find_free_slot(150, 150)
            .map(|p| (p, 150))
            .or_else(|| {
                self.layout
                    .find_free_slot(model::PLOT_MIN_WIDTH, model::PLOT_MIN_HEIGHT)
                    .map(|p| (p, model::PLOT_MIN_WIDTH))
            });
        let Some((pos, size)) = slot else {
            self.status = Some("No room left on the canvas".to_string());
            return;
        };
        let id = self.layout.allocate_id();
        let plot = model::Plot::new(id, IRect::new(pos.x, pos.y, size, size));
        if self.layout.add_plot(plot) {
            self.inspected = Some(id);
        }
    }

    pub(super) fn remove_inspected(&mut self) {
        let Some(id) = self.inspected.take() else {
            return;
        };
        if self.layout.remove_plot(id) {
            self.status = Some("Plot removed".to_string());
        }
    }

    pub(super) fn save_to_path(&mut self) {
        match serde_json::to_string_pretty(&self.layout.records()) {
            Ok(json) => match std::fs::write(&self.file_path, json) {
                Ok(()) => self.status = Some(format!("Saved {}", self.file_path)),
                Err(e) => self.status = Some(format!("Save failed: {e}")),
            },
            Err(e) => self.status = Some(format!("Serialize failed: {e}")),
        }
    }

    pub(super) fn save_json_dialog(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .set_file_name("field.json")
            .add_filter("JSON", &["json"])
            .save_file()
        {
            let path_str = path.display().to_string();
            match serde_json::to_string_pretty(&self.layout.records()) {
                Ok(json) => match std::fs::write(&path, json) {
                    Ok(()) => {
                        self.file_path = path_str.clone();
                        self.persist_settings();
                        self.status = Some(format!("Saved {}", path_str));
                    }
                    Err(e) => self.status = Some(format!("Save failed: {e}")),
                },
                Err(e) => self.status = Some(format!("Serialize failed: {e}")),
            }
        }
    }

    pub(super) fn open_json_dialog(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("JSON", &["json"])
            .pick_file()
        {
            let path_str = path.display().to_string();
            match std::fs::read_to_string(&path) {
                Ok(json) => match serde_json::from_str::<Vec<PlotRecord>>(&json) {
                    Ok(records) => {
                        let dropped = self.layout.load_records(&records);
                        self.resync_crops();
                        self.inspected = None;
                        self.file_path = path_str.clone();
                        self.persist_settings();
                        self.status = if dropped > 0 {
                            Some(format!(
                                "Loaded {} ({dropped} overlapping plot(s) dropped)",
                                path_str
                            ))
                        } else {
                            Some(format!("Loaded {}", path_str))
                        };
                    }
                    Err(e) => self.status = Some(format!("Parse failed: {e}")),
                },
                Err(e) => self.status = Some(format!("Read failed: {e}")),
            }
        }
    }

    pub(super) fn reload_crops(&mut self) {
        self.registry = CropRegistry::load_csv(&self.crops_path);
        self.resync_crops();
        self.status = Some(format!(
            "Crop table reloaded ({} crops)",
            self.registry.entries().len() - 1
        ));
    }

    pub(super) fn settings_snapshot(&self) -> settings::AppSettings {
        settings::AppSettings {
            file_path: self.file_path.clone(),
            crops_path: self.crops_path.clone(),
            canvas_width: self.layout.canvas().w,
            canvas_height: self.layout.canvas().h,
        }
    }

    pub(super) fn persist_settings(&mut self) {
        if let Err(e) = settings::save_settings(&self.settings_path, &self.settings_snapshot()) {
            self.status = Some(format!("Settings save failed: {e}"));
        }
    }
}
