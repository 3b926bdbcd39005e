use eframe::egui;

use super::{render, PlotApp};
use crate::model::{ivec2, Region};

impl eframe::App for PlotApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let wants_keyboard = ctx.wants_keyboard_input();
        ctx.input_mut(|i| {
            if i.consume_key(egui::Modifiers::COMMAND, egui::Key::S) {
                self.save_json_dialog();
            }
            if i.consume_key(egui::Modifiers::COMMAND, egui::Key::O) {
                self.open_json_dialog();
            }
            if !wants_keyboard {
                if i.consume_key(egui::Modifiers::NONE, egui::Key::Delete)
                    || i.consume_key(egui::Modifiers::NONE, egui::Key::Backspace)
                {
                    self.remove_inspected();
                }
                if i.consume_key(egui::Modifiers::NONE, egui::Key::N) {
                    self.add_plot_action();
                }
            }
        });

        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Open... (⌘O)").clicked() {
                        self.open_json_dialog();
                        ui.close_menu();
                    }
                    if ui.button("Save... (⌘S)").clicked() {
                        self.save_json_dialog();
                        ui.close_menu();
                    }
                    ui.separator();
                    ui.label("Quick save path:");
                    if ui.text_edit_singleline(&mut self.file_path).changed() {
                        self.persist_settings();
                    }
                    if ui.small_button("Quick Save").clicked() {
                        self.save_to_path();
                        ui.close_menu();
                    }
                });
                ui.menu_button("Plot", |ui| {
                    if ui.button("Add Plot (N)").clicked() {
                        self.add_plot_action();
                        ui.close_menu();
                    }
                    if ui
                        .add_enabled(self.inspected.is_some(), egui::Button::new("Remove (Del)"))
                        .clicked()
                    {
                        self.remove_inspected();
                        ui.close_menu();
                    }
                });
                ui.menu_button("Crops", |ui| {
                    ui.label("Table path:");
                    if ui.text_edit_singleline(&mut self.crops_path).changed() {
                        self.persist_settings();
                    }
                    if ui.button("Reload table").clicked() {
                        self.reload_crops();
                        ui.close_menu();
                    }
                });
            });
        });

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(format!("{} plot(s)", self.layout.plots().len()));
                if let Some(status) = &self.status {
                    ui.separator();
                    ui.label(status);
                }
            });
        });

        egui::SidePanel::right("inspector")
            .default_width(240.0)
            .show(ctx, |ui| {
                self.inspector_ui(ui);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.canvas_ui(ctx, ui);
        });
    }
}

impl PlotApp {
    fn canvas_ui(&mut self, ctx: &egui::Context, ui: &mut egui::Ui) {
        let canvas = self.layout.canvas();
        let desired = egui::vec2(canvas.w as f32, canvas.h as f32);
        let (rect, response) = ui.allocate_exact_size(desired, egui::Sense::click_and_drag());
        let origin = rect.min;

        // One layout step per frame, fed from this frame's pointer sample.
        let button_down = ctx.input(|i| i.pointer.primary_down());
        let pointer = ctx.input(|i| i.pointer.interact_pos());
        match pointer {
            Some(pos) => {
                let p = ivec2(
                    (pos.x - origin.x).round() as i32,
                    (pos.y - origin.y).round() as i32,
                );
                let delta = match self.last_pointer {
                    Some(last) => ivec2(p.x - last.x, p.y - last.y),
                    None => ivec2(0, 0),
                };
                self.last_pointer = Some(p);
                self.layout.advance(p, delta, button_down);
            }
            None => {
                self.last_pointer = None;
                self.layout.pointer_gone(button_down);
            }
        }

        if response.drag_started() || response.clicked() {
            // Clicking empty canvas clears the inspector.
            self.inspected = self.layout.active_id();
        }
        if let Some(icon) = self.canvas_cursor() {
            ctx.set_cursor_icon(icon);
        }

        let painter = ui.painter_at(rect);
        render::draw_canvas(&painter, origin, &self.layout);
        render::draw_tooltip(ctx, origin, pointer, &self.layout, &self.registry);
    }

    fn canvas_cursor(&self) -> Option<egui::CursorIcon> {
        let state = self.layout.active_state()?;
        let icon = match state.region()? {
            Region::Center => {
                if state.is_selected() {
                    egui::CursorIcon::Grabbing
                } else {
                    egui::CursorIcon::PointingHand
                }
            }
            Region::Left | Region::Right => egui::CursorIcon::ResizeHorizontal,
            Region::Top | Region::Bottom => egui::CursorIcon::ResizeVertical,
        };
        Some(icon)
    }

    fn inspector_ui(&mut self, ui: &mut egui::Ui) {
        ui.heading("Plot");
        ui.separator();
        let Some(id) = self.inspected else {
            ui.label("Click a plot on the canvas to edit it.");
            return;
        };
        let Some(plot) = self.layout.plot(id) else {
            self.inspected = None;
            return;
        };
        let mut name = plot.name.clone();
        let bounds = plot.bounds;
        let crop_index = plot.crop_index;
        let mut deviation = plot.yield_deviation;
        let expected = plot.expected_yield;

        let name_changed = ui.text_edit_singleline(&mut name).changed();

        ui.add_space(6.0);
        ui.label("Crop");
        let mut picked_crop = None;
        let selected_text = self
            .registry
            .get(crop_index)
            .map_or("No selection", |e| e.name.as_str())
            .to_string();
        egui::ComboBox::from_id_salt("crop_select")
            .selected_text(selected_text)
            .show_ui(ui, |ui| {
                for (index, entry) in self.registry.entries().iter().enumerate() {
                    if ui.selectable_label(index == crop_index, &entry.name).clicked() {
                        picked_crop = Some(index);
                    }
                }
            });
        ui.label(format!("Avg. yield: {expected:.2} t/ha"));
        let deviation_changed = ui
            .add(
                egui::DragValue::new(&mut deviation)
                    .speed(0.1)
                    .prefix("± "),
            )
            .changed();

        ui.add_space(6.0);
        ui.label("Bounds");
        let (mut x, mut y, mut w, mut h) = (bounds.x, bounds.y, bounds.w, bounds.h);
        let mut bounds_changed = false;
        ui.horizontal(|ui| {
            bounds_changed |= ui.add(egui::DragValue::new(&mut x).prefix("x: ")).changed();
            bounds_changed |= ui.add(egui::DragValue::new(&mut y).prefix("y: ")).changed();
        });
        ui.horizontal(|ui| {
            bounds_changed |= ui.add(egui::DragValue::new(&mut w).prefix("w: ")).changed();
            bounds_changed |= ui.add(egui::DragValue::new(&mut h).prefix("h: ")).changed();
        });

        if name_changed {
            self.layout.set_plot_name(id, &name);
        }
        if deviation_changed {
            self.layout.set_yield_deviation(id, deviation);
        }
        if let Some(index) = picked_crop {
            self.assign_crop(id, index);
        }
        if bounds_changed {
            // Each field is validated on its own; a rejected one simply
            // snaps back to the committed value next frame.
            let rejected = self.layout.apply_explicit_bounds(id, x, y, w, h);
            if rejected > 0 {
                self.status = Some(format!("{rejected} bounds change(s) rejected"));
            }
        }

        ui.add_space(12.0);
        if ui.button("Remove plot").clicked() {
            self.remove_inspected();
        }
    }
}
