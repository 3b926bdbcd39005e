use eframe::egui;

use crate::layout::Layout;
use crate::model::{ivec2, Plot, PointerState, PLOT_LINE_SPACING, PLOT_PADDING};
use crate::registry::CropRegistry;

pub(super) fn draw_canvas(painter: &egui::Painter, origin: egui::Pos2, layout: &Layout) {
    let canvas = layout.canvas().to_rect(origin);
    painter.rect_filled(canvas, 0.0, egui::Color32::from_gray(12));
    painter.rect_stroke(
        canvas,
        0.0,
        egui::Stroke::new(1.0, egui::Color32::from_gray(70)),
        egui::StrokeKind::Middle,
    );
    for plot in layout.plots() {
        draw_plot(painter, origin, plot);
    }
}

fn outline_color(state: PointerState) -> egui::Color32 {
    match state {
        PointerState::Selected(_) => egui::Color32::from_gray(0xD0),
        PointerState::Hovered(_) => egui::Color32::from_gray(0x80),
        PointerState::OutOfBounds => egui::Color32::from_gray(0x40),
    }
}

fn draw_plot(painter: &egui::Painter, origin: egui::Pos2, plot: &Plot) {
    let rect = plot.bounds.to_rect(origin);
    let color = plot.color.to_color32();

    painter.rect_filled(rect, 0.0, color.gamma_multiply(0.15));
    draw_hatch(painter, rect, color);
    painter.rect_stroke(
        rect,
        0.0,
        egui::Stroke::new(1.0, outline_color(plot.state)),
        egui::StrokeKind::Middle,
    );
    painter.text(
        rect.center(),
        egui::Align2::CENTER_CENTER,
        &plot.name,
        egui::FontId::proportional(13.0),
        egui::Color32::from_gray(220),
    );
}

// Diagonal furrow lines across the plot interior.
fn draw_hatch(painter: &egui::Painter, rect: egui::Rect, color: egui::Color32) {
    let inner = rect.shrink(PLOT_PADDING as f32);
    if inner.width() <= 0.0 || inner.height() <= 0.0 {
        return;
    }
    let clipped = painter.with_clip_rect(inner);
    let stroke = egui::Stroke::new(1.0, color.gamma_multiply(0.8));
    let span = inner.width() + inner.height();
    let spacing = PLOT_LINE_SPACING as f32;
    let mut offset = spacing;
    while offset <= span {
        clipped.line_segment(
            [
                egui::pos2(inner.min.x, inner.min.y + offset),
                egui::pos2(inner.min.x + offset, inner.min.y),
            ],
            stroke,
        );
        offset += spacing;
    }
}

pub(super) fn draw_tooltip(
    ctx: &egui::Context,
    origin: egui::Pos2,
    pointer: Option<egui::Pos2>,
    layout: &Layout,
    registry: &CropRegistry,
) {
    let Some(screen) = pointer else {
        return;
    };
    let canvas_pos = ivec2(
        (screen.x - origin.x).round() as i32,
        (screen.y - origin.y).round() as i32,
    );
    let Some(plot) = layout.plots().iter().find(|p| p.bounds.contains(canvas_pos)) else {
        return;
    };
    egui::Area::new(egui::Id::new("plot_tooltip"))
        .order(egui::Order::Tooltip)
        .fixed_pos(screen + egui::vec2(16.0, 16.0))
        .show(ctx, |ui| {
            let frame = egui::Frame::new()
                .fill(egui::Color32::from_rgba_unmultiplied(20, 20, 20, 240))
                .stroke(egui::Stroke::new(1.0, egui::Color32::from_gray(90)))
                .inner_margin(6.0);
            frame.show(ui, |ui| {
                ui.strong(&plot.name);
                let crop = registry.lookup(&plot.crop);
                ui.label(format!(
                    "Crop: {}",
                    crop.map_or("none", |c| c.name.as_str())
                ));
                ui.label(format!("Size: {}x{}", plot.bounds.w, plot.bounds.h));
                ui.label(format!("Offset: ({}, {})", plot.bounds.x, plot.bounds.y));
                if crop.is_some() {
                    ui.label(format!(
                        "Yield: {:.1} ± {:.1} t/ha",
                        plot.expected_yield, plot.yield_deviation
                    ));
                }
            });
        });
}
