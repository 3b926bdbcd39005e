use crate::model::{
    self, IRect, IVec2, Plot, PlotRecord, PointerState, Region, Rgba, PLOT_MIN_HEIGHT,
    PLOT_MIN_WIDTH,
};

/// Owns the plot collection and is the only write path for plot bounds.
///
/// The active plot is tracked by id, never by reference, so removing a plot
/// can never dangle it. Geometry changes go through a commit-with-rollback
/// step: the candidate bounds are applied, checked against every other plot
/// and against the canvas, and restored exactly if the check fails.
pub struct Layout {
    plots: Vec<Plot>,
    active: Option<u64>,
    canvas_width: i32,
    canvas_height: i32,
    next_id: u64,
    button_was_down: bool,
}

impl Layout {
    pub fn new(canvas_width: i32, canvas_height: i32) -> Self {
        Self {
            plots: Vec::new(),
            active: None,
            canvas_width,
            canvas_height,
            next_id: 1,
            button_was_down: false,
        }
    }

    pub fn canvas(&self) -> IRect {
        IRect::new(0, 0, self.canvas_width, self.canvas_height)
    }

    pub fn plots(&self) -> &[Plot] {
        &self.plots
    }

    pub fn plot(&self, id: u64) -> Option<&Plot> {
        self.plots.iter().find(|p| p.id == id)
    }

    // No `&mut Plot` leaves this module; bounds and pointer state are only
    // written by the engine. Hosts edit metadata through the setters below.
    fn plot_mut(&mut self, id: u64) -> Option<&mut Plot> {
        self.plots.iter_mut().find(|p| p.id == id)
    }

    pub fn set_plot_name(&mut self, id: u64, name: &str) {
        if let Some(plot) = self.plot_mut(id) {
            plot.set_name(name);
        }
    }

    pub fn set_yield_deviation(&mut self, id: u64, deviation: f64) {
        if let Some(plot) = self.plot_mut(id) {
            plot.yield_deviation = deviation;
        }
    }

    pub fn set_crop(
        &mut self,
        id: u64,
        crop: &str,
        crop_index: usize,
        color: Rgba,
        expected_yield: f64,
    ) {
        if let Some(plot) = self.plot_mut(id) {
            plot.crop = crop.to_string();
            plot.crop_index = crop_index;
            plot.color = color;
            plot.expected_yield = expected_yield;
        }
    }

    pub fn active_id(&self) -> Option<u64> {
        self.active
    }

    pub fn active_state(&self) -> Option<PointerState> {
        self.active
            .and_then(|id| self.plot(id))
            .map(|p| p.state)
    }

    pub fn allocate_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// One call per rendered frame. `delta` is the pointer movement since the
    /// previous frame; `button_down` is the primary button sampled this frame.
    pub fn advance(&mut self, pointer: IVec2, delta: IVec2, button_down: bool) {
        let was_down = self.button_was_down;
        self.button_was_down = button_down;

        if let Some(idx) = self.active.and_then(|id| self.index_of(id)) {
            // An interaction is in progress: only the active plot is
            // reclassified until it lets go.
            let state = self.plots[idx].classify(pointer, button_down, was_down);
            self.plots[idx].state = state;
            self.rest_except(idx);
            match state {
                PointerState::OutOfBounds => {
                    if !button_down {
                        self.active = None;
                    }
                }
                PointerState::Selected(region) => {
                    if button_down {
                        self.commit_drag(idx, region, delta);
                    }
                }
                PointerState::Hovered(_) => {}
            }
            return;
        }

        // No active plot: the first plot (in insertion order) the pointer
        // lands on claims the interaction. Later plots stay at rest, which
        // settles ties when bands of adjacent plots overlap.
        self.active = None;
        let mut found = None;
        for idx in 0..self.plots.len() {
            if found.is_some() {
                self.plots[idx].state = PointerState::OutOfBounds;
                continue;
            }
            let state = self.plots[idx].classify(pointer, button_down, was_down);
            self.plots[idx].state = state;
            if state != PointerState::OutOfBounds {
                found = Some(idx);
            }
        }
        if let Some(idx) = found {
            self.active = Some(self.plots[idx].id);
            if let PointerState::Selected(region) = self.plots[idx].state {
                if button_down {
                    self.commit_drag(idx, region, delta);
                }
            }
        }
    }

    /// The host calls this on frames without a pointer sample (cursor left
    /// the window). A held drag survives; otherwise everything lets go.
    pub fn pointer_gone(&mut self, button_down: bool) {
        self.button_was_down = button_down;
        if button_down {
            return;
        }
        self.active = None;
        for plot in &mut self.plots {
            plot.state = PointerState::OutOfBounds;
        }
    }

    fn index_of(&self, id: u64) -> Option<usize> {
        self.plots.iter().position(|p| p.id == id)
    }

    fn rest_except(&mut self, keep: usize) {
        for (idx, plot) in self.plots.iter_mut().enumerate() {
            if idx != keep {
                plot.state = PointerState::OutOfBounds;
            }
        }
    }

    fn commit_drag(&mut self, idx: usize, region: Region, delta: IVec2) {
        let before = self.plots[idx].bounds;
        let candidate = match region {
            Region::Center => model::propose_move(before, delta),
            edge => clamp_min_size(model::propose_resize(before, edge, delta), edge),
        };
        if candidate == before {
            return;
        }
        self.plots[idx].bounds = candidate;
        if !self.placement_valid(idx) {
            self.plots[idx].bounds = before;
        }
    }

    fn placement_valid(&self, idx: usize) -> bool {
        let bounds = self.plots[idx].bounds;
        if !self.canvas().contains_rect(bounds) {
            return false;
        }
        self.plots
            .iter()
            .enumerate()
            .all(|(i, other)| i == idx || !bounds.overlaps(other.bounds))
    }

    /// Form-driven bounds update. Each of the four fields is its own
    /// transaction: a field that differs from the current value is applied
    /// and checked on its own, and rolled back on its own if it would
    /// overlap, leave the canvas, or undershoot the minimum size. Returns
    /// the number of rejected fields.
    pub fn apply_explicit_bounds(&mut self, id: u64, x: i32, y: i32, w: i32, h: i32) -> usize {
        let Some(idx) = self.index_of(id) else {
            return 4;
        };
        let mut rejected = 0;
        for field in 0..4 {
            let before = self.plots[idx].bounds;
            let mut candidate = before;
            match field {
                0 => candidate.x = x,
                1 => candidate.y = y,
                2 => candidate.w = w,
                _ => candidate.h = h,
            }
            if candidate == before {
                continue;
            }
            let undersized = candidate.w < PLOT_MIN_WIDTH || candidate.h < PLOT_MIN_HEIGHT;
            self.plots[idx].bounds = candidate;
            if undersized || !self.placement_valid(idx) {
                self.plots[idx].bounds = before;
                rejected += 1;
            }
        }
        rejected
    }

    /// Inserts a plot if its bounds are valid against the current set.
    pub fn add_plot(&mut self, plot: Plot) -> bool {
        if !self.canvas().contains_rect(plot.bounds) {
            return false;
        }
        if self.plots.iter().any(|p| p.bounds.overlaps(plot.bounds)) {
            return false;
        }
        self.plots.push(plot);
        true
    }

    pub fn remove_plot(&mut self, id: u64) -> bool {
        let Some(idx) = self.index_of(id) else {
            return false;
        };
        self.plots.remove(idx);
        if self.active == Some(id) {
            self.active = None;
        }
        true
    }

    /// Scans the canvas for the first spot where a w x h plot fits without
    /// touching anything. Row-major, 16 px steps.
    pub fn find_free_slot(&self, w: i32, h: i32) -> Option<IVec2> {
        let mut y = 0;
        while y + h <= self.canvas_height {
            let mut x = 0;
            while x + w <= self.canvas_width {
                let candidate = IRect::new(x, y, w, h);
                if self.plots.iter().all(|p| !candidate.overlaps(p.bounds)) {
                    return Some(IVec2 { x, y });
                }
                x += 16;
            }
            y += 16;
        }
        None
    }

    pub fn records(&self) -> Vec<PlotRecord> {
        self.plots.iter().map(Plot::to_record).collect()
    }

    /// Replaces the collection with the given records, validating each one
    /// through the normal insertion path. Returns the number of records
    /// dropped because they overlapped or fell outside the canvas.
    pub fn load_records(&mut self, records: &[PlotRecord]) -> usize {
        self.plots.clear();
        self.active = None;
        let mut dropped = 0;
        for record in records {
            let id = self.allocate_id();
            if !self.add_plot(Plot::from_record(id, record)) {
                dropped += 1;
            }
        }
        dropped
    }
}

/// Clamps an edge-resize candidate to the minimum plot size. The dragged
/// edge gives way; the opposite edge stays put.
fn clamp_min_size(mut candidate: IRect, region: Region) -> IRect {
    if candidate.w < PLOT_MIN_WIDTH {
        if region == Region::Left {
            candidate.x = candidate.x + candidate.w - PLOT_MIN_WIDTH;
        }
        candidate.w = PLOT_MIN_WIDTH;
    }
    if candidate.h < PLOT_MIN_HEIGHT {
        if region == Region::Top {
            candidate.y = candidate.y + candidate.h - PLOT_MIN_HEIGHT;
        }
        candidate.h = PLOT_MIN_HEIGHT;
    }
    candidate
}
