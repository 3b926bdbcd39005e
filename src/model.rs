use eframe::egui;
use serde::{Deserialize, Serialize};

/// Width of the edge-detection band around a plot, in pixels.
pub const RESIZE_TOLERANCE: i32 = 10;
pub const PLOT_MIN_WIDTH: i32 = 64;
pub const PLOT_MIN_HEIGHT: i32 = 64;
pub const PLOT_LINE_SPACING: i32 = 10;
pub const PLOT_PADDING: i32 = PLOT_LINE_SPACING / 2;
pub const PLOT_NAME_MAX_CHARS: usize = 64;

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct IVec2 {
    pub x: i32,
    pub y: i32,
}

pub fn ivec2(x: i32, y: i32) -> IVec2 {
    IVec2 { x, y }
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct IRect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl IRect {
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    // Edge positions in i64: form input can carry arbitrary i32 values, and
    // x + w must not wrap before the placement check rejects them.
    fn right(&self) -> i64 {
        self.x as i64 + self.w as i64
    }

    fn bottom(&self) -> i64 {
        self.y as i64 + self.h as i64
    }

    // Min-inclusive, max-exclusive, matching SDL_PointInRect.
    pub fn contains(&self, p: IVec2) -> bool {
        p.x as i64 >= self.x as i64
            && (p.x as i64) < self.right()
            && p.y as i64 >= self.y as i64
            && (p.y as i64) < self.bottom()
    }

    /// Positive-area intersection. Rects that merely touch along an edge do
    /// not overlap.
    pub fn overlaps(&self, other: IRect) -> bool {
        (self.x as i64) < other.right()
            && (other.x as i64) < self.right()
            && (self.y as i64) < other.bottom()
            && (other.y as i64) < self.bottom()
    }

    pub fn contains_rect(&self, inner: IRect) -> bool {
        inner.x as i64 >= self.x as i64
            && inner.y as i64 >= self.y as i64
            && inner.right() <= self.right()
            && inner.bottom() <= self.bottom()
    }

    pub fn translated(&self, delta: IVec2) -> IRect {
        IRect {
            x: self.x + delta.x,
            y: self.y + delta.y,
            ..*self
        }
    }

    pub fn to_rect(self, origin: egui::Pos2) -> egui::Rect {
        egui::Rect::from_min_size(
            egui::pos2(origin.x + self.x as f32, origin.y + self.y as f32),
            egui::vec2(self.w as f32, self.h as f32),
        )
    }
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub fn to_color32(self) -> egui::Color32 {
        egui::Color32::from_rgba_unmultiplied(self.r, self.g, self.b, self.a)
    }
}

/// The five pointer regions of a plot, clockwise from the top edge. Edges
/// are tested before the center, so edges win at corners and top/right win
/// over bottom/left.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Region {
    Top,
    Right,
    Bottom,
    Left,
    Center,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PointerState {
    #[default]
    OutOfBounds,
    Hovered(Region),
    Selected(Region),
}

impl PointerState {
    pub fn is_selected(&self) -> bool {
        matches!(self, PointerState::Selected(_))
    }

    pub fn region(&self) -> Option<Region> {
        match self {
            PointerState::OutOfBounds => None,
            PointerState::Hovered(r) | PointerState::Selected(r) => Some(*r),
        }
    }
}

fn region_bands(bounds: IRect) -> [(Region, IRect); 5] {
    let t = RESIZE_TOLERANCE;
    [
        (
            Region::Top,
            IRect::new(bounds.x, bounds.y - t, bounds.w, t * 2),
        ),
        (
            Region::Right,
            IRect::new(bounds.x + bounds.w - t, bounds.y, t * 2, bounds.h),
        ),
        (
            Region::Bottom,
            IRect::new(bounds.x, bounds.y + bounds.h - t, bounds.w, t * 2),
        ),
        (
            Region::Left,
            IRect::new(bounds.x - t, bounds.y, t * 2, bounds.h),
        ),
        (
            Region::Center,
            IRect::new(
                bounds.x + t,
                bounds.y + t,
                bounds.w - t * 2,
                bounds.h - t * 2,
            ),
        ),
    ]
}

/// Classifies the pointer against a plot's bounds. Pure: the previous state
/// and the two button samples are explicit inputs, never hidden history.
///
/// While a drag is held (previous state selected, button down on both the
/// previous and current frame) the previous state is kept without re-testing
/// the regions. Per-frame pointer deltas can undershoot the real movement,
/// and re-testing would let a held drag slip out of its band.
pub fn classify(
    bounds: IRect,
    prev: PointerState,
    pointer: IVec2,
    button_down: bool,
    button_was_down: bool,
) -> PointerState {
    if prev.is_selected() && button_down && button_was_down {
        return prev;
    }
    for (region, band) in region_bands(bounds) {
        if band.contains(pointer) {
            return if button_down {
                PointerState::Selected(region)
            } else {
                PointerState::Hovered(region)
            };
        }
    }
    PointerState::OutOfBounds
}

/// Candidate bounds for a body drag. Never fails; validation is the layout
/// engine's job.
pub fn propose_move(bounds: IRect, delta: IVec2) -> IRect {
    bounds.translated(delta)
}

/// Candidate bounds for an edge drag. Exactly one axis changes: the dragged
/// edge follows the pointer, the opposite edge stays fixed. Corner resize is
/// not reachable from the region model.
pub fn propose_resize(bounds: IRect, region: Region, delta: IVec2) -> IRect {
    let mut out = bounds;
    match region {
        Region::Top => {
            out.y += delta.y;
            out.h -= delta.y;
        }
        Region::Bottom => out.h += delta.y,
        Region::Left => {
            out.x += delta.x;
            out.w -= delta.x;
        }
        Region::Right => out.w += delta.x,
        Region::Center => {}
    }
    out
}

#[derive(Clone, Debug)]
pub struct Plot {
    pub id: u64,
    pub bounds: IRect,
    pub state: PointerState,
    pub name: String,
    pub crop: String,
    pub crop_index: usize,
    pub expected_yield: f64,
    pub yield_deviation: f64,
    pub color: Rgba,
}

impl Plot {
    pub fn new(id: u64, bounds: IRect) -> Self {
        Self {
            id,
            bounds,
            state: PointerState::OutOfBounds,
            name: format!("Plot {id}"),
            crop: String::new(),
            crop_index: 0,
            expected_yield: 0.0,
            yield_deviation: 0.0,
            color: Rgba::opaque(120, 120, 120),
        }
    }

    pub fn set_name(&mut self, name: &str) {
        self.name = name.chars().take(PLOT_NAME_MAX_CHARS).collect();
    }

    pub fn classify(
        &self,
        pointer: IVec2,
        button_down: bool,
        button_was_down: bool,
    ) -> PointerState {
        classify(self.bounds, self.state, pointer, button_down, button_was_down)
    }

    pub fn to_record(&self) -> PlotRecord {
        PlotRecord {
            name: self.name.clone(),
            x: self.bounds.x,
            y: self.bounds.y,
            width: self.bounds.w,
            height: self.bounds.h,
            crop: self.crop.clone(),
            crop_index: self.crop_index,
            yield_deviation: self.yield_deviation,
        }
    }

    pub fn from_record(id: u64, record: &PlotRecord) -> Self {
        let mut plot = Plot::new(id, IRect::new(record.x, record.y, record.width, record.height));
        plot.set_name(&record.name);
        plot.crop = record.crop.clone();
        plot.crop_index = record.crop_index;
        plot.yield_deviation = record.yield_deviation;
        plot
    }
}

/// The persisted shape of a plot. Color and expected yield are not stored;
/// they are re-derived from the crop table on load.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PlotRecord {
    pub name: String,
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub crop: String,
    #[serde(default)]
    pub crop_index: usize,
    #[serde(default)]
    pub yield_deviation: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOUNDS: IRect = IRect {
        x: 10,
        y: 10,
        w: 100,
        h: 100,
    };

    fn classify_fresh(pointer: IVec2, button_down: bool) -> PointerState {
        classify(BOUNDS, PointerState::OutOfBounds, pointer, button_down, false)
    }

    #[test]
    fn overlap_requires_positive_area() {
        let a = IRect::new(0, 0, 100, 100);
        assert!(a.overlaps(IRect::new(99, 0, 100, 100)));
        // Edge-touching is allowed.
        assert!(!a.overlaps(IRect::new(100, 0, 100, 100)));
        assert!(!a.overlaps(IRect::new(0, 100, 100, 100)));
        assert!(!a.overlaps(IRect::new(300, 300, 10, 10)));
    }

    #[test]
    fn point_containment_is_max_exclusive() {
        let r = IRect::new(10, 10, 100, 100);
        assert!(r.contains(ivec2(10, 10)));
        assert!(r.contains(ivec2(109, 109)));
        assert!(!r.contains(ivec2(110, 10)));
        assert!(!r.contains(ivec2(10, 110)));
    }

    #[test]
    fn geometry_handles_extreme_coordinates() {
        let canvas = IRect::new(0, 0, 800, 640);
        let far = IRect::new(i32::MAX - 10, i32::MAX - 10, 100, 100);
        assert!(!canvas.contains_rect(far));
        assert!(!canvas.overlaps(far));
        assert!(!far.contains(ivec2(0, 0)));
        assert!(!canvas.contains(ivec2(i32::MAX, i32::MAX)));
        assert!(!canvas.contains_rect(IRect::new(700, 10, i32::MAX, 100)));
        assert!(!canvas.contains_rect(IRect::new(i32::MIN, 10, 100, 100)));
    }

    #[test]
    fn classify_top_band() {
        // Top band spans x in [10, 110), y in [0, 20).
        assert_eq!(
            classify_fresh(ivec2(55, 10), false),
            PointerState::Hovered(Region::Top)
        );
        assert_eq!(
            classify_fresh(ivec2(55, 10), true),
            PointerState::Selected(Region::Top)
        );
        assert_eq!(
            classify_fresh(ivec2(55, 1), false),
            PointerState::Hovered(Region::Top)
        );
    }

    #[test]
    fn classify_all_regions() {
        assert_eq!(
            classify_fresh(ivec2(105, 60), false),
            PointerState::Hovered(Region::Right)
        );
        assert_eq!(
            classify_fresh(ivec2(60, 105), false),
            PointerState::Hovered(Region::Bottom)
        );
        assert_eq!(
            classify_fresh(ivec2(12, 60), false),
            PointerState::Hovered(Region::Left)
        );
        assert_eq!(
            classify_fresh(ivec2(60, 60), false),
            PointerState::Hovered(Region::Center)
        );
        assert_eq!(classify_fresh(ivec2(200, 200), false), PointerState::OutOfBounds);
        assert_eq!(classify_fresh(ivec2(9, 9), false), PointerState::OutOfBounds);
    }

    #[test]
    fn corners_prefer_top_then_right() {
        // The top-right corner sits in both the top and right bands; the
        // fixed test order gives it to the top edge.
        assert_eq!(
            classify_fresh(ivec2(105, 12), false),
            PointerState::Hovered(Region::Top)
        );
        // Bottom-right corner: right band wins over bottom.
        assert_eq!(
            classify_fresh(ivec2(105, 105), false),
            PointerState::Hovered(Region::Right)
        );
    }

    #[test]
    fn classify_is_deterministic() {
        for _ in 0..3 {
            assert_eq!(
                classify_fresh(ivec2(55, 10), false),
                PointerState::Hovered(Region::Top)
            );
        }
    }

    #[test]
    fn held_drag_skips_reclassification() {
        let prev = PointerState::Selected(Region::Top);
        // Pointer nowhere near the plot, but the drag is held on both frames.
        let far = ivec2(500, 500);
        assert_eq!(classify(BOUNDS, prev, far, true, true), prev);
        // A fresh press does not inherit the old state.
        assert_eq!(
            classify(BOUNDS, prev, far, true, false),
            PointerState::OutOfBounds
        );
        // A released button re-classifies.
        assert_eq!(
            classify(BOUNDS, prev, far, false, true),
            PointerState::OutOfBounds
        );
        // Hovered states never skip.
        assert_eq!(
            classify(BOUNDS, PointerState::Hovered(Region::Top), far, true, true),
            PointerState::OutOfBounds
        );
    }

    #[test]
    fn resize_moves_one_axis_only() {
        let d = ivec2(7, -3);
        assert_eq!(propose_resize(BOUNDS, Region::Top, d), IRect::new(10, 7, 100, 103));
        assert_eq!(propose_resize(BOUNDS, Region::Bottom, d), IRect::new(10, 10, 100, 97));
        assert_eq!(propose_resize(BOUNDS, Region::Left, d), IRect::new(17, 10, 93, 100));
        assert_eq!(propose_resize(BOUNDS, Region::Right, d), IRect::new(10, 10, 107, 100));
        assert_eq!(propose_move(BOUNDS, d), IRect::new(17, 7, 100, 100));
    }

    #[test]
    fn record_field_set_is_stable() {
        let mut plot = Plot::new(3, IRect::new(10, 20, 100, 80));
        plot.set_name("North field");
        plot.crop = "Wheat".to_string();
        plot.crop_index = 1;
        plot.yield_deviation = 0.4;
        let value = serde_json::to_value(plot.to_record()).unwrap();
        let object = value.as_object().unwrap();
        let mut keys: Vec<&str> = object.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            ["crop", "crop_index", "height", "name", "width", "x", "y", "yield_deviation"]
        );
        let parsed: PlotRecord = serde_json::from_value(value).unwrap();
        assert_eq!(parsed, plot.to_record());
    }

    #[test]
    fn name_is_truncated_to_cap() {
        let mut plot = Plot::new(1, BOUNDS);
        plot.set_name(&"x".repeat(200));
        assert_eq!(plot.name.chars().count(), PLOT_NAME_MAX_CHARS);
    }
}
