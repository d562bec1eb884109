//! Hand-off of packed geometry to the rendering backend.

use crate::geometry::COMPONENTS;
use crate::simulation::FrameStats;

/// Read-only view of one frame's buffers.
///
/// Buffers are full-length; only the drawn prefixes are valid.
#[derive(Debug, Clone, Copy)]
pub struct FrameOutput<'a> {
    pub stats: FrameStats,
    /// `max_particle_count × 3` floats.
    pub point_positions: &'a [f32],
    /// Points in the draw range.
    pub point_count: usize,
    pub show_points: bool,
    /// `segment_capacity × 6` floats.
    pub line_positions: &'a [f32],
    /// Same layout as `line_positions`, alpha replicated over RGB.
    pub line_colors: &'a [f32],
    /// Valid vertices in the line buffers.
    pub drawn_vertex_count: usize,
    pub show_lines: bool,
}

impl<'a> FrameOutput<'a> {
    /// Positions in the point draw range.
    pub fn drawn_point_positions(&self) -> &'a [f32] {
        &self.point_positions[..self.point_count * COMPONENTS]
    }

    /// Positions of this frame's line vertices.
    pub fn drawn_line_positions(&self) -> &'a [f32] {
        &self.line_positions[..self.drawn_vertex_count * COMPONENTS]
    }

    /// Colors of this frame's line vertices.
    pub fn drawn_line_colors(&self) -> &'a [f32] {
        &self.line_colors[..self.drawn_vertex_count * COMPONENTS]
    }
}

/// Consumer of packed frames.
///
/// `attach` and `detach` bracket the running period; backends register
/// and remove their external listeners (window resize and the like) there.
pub trait RenderBackend {
    /// Register external hooks. Called once by `start`.
    fn attach(&mut self) {}

    /// Remove external hooks. Called once by `stop`.
    fn detach(&mut self) {}

    /// Upload or draw a frame. The view is only valid for this call.
    fn submit(&mut self, frame: &FrameOutput<'_>);
}

/// Backend that keeps counters of what it was given.
///
/// The JS host reads buffers directly through zero-copy views, so on the
/// wasm side this is all a backend needs to do.
#[derive(Debug, Clone, Default)]
pub struct StatsBackend {
    attached: bool,
    submitted: u64,
    last: Option<FrameStats>,
    show_points: bool,
    show_lines: bool,
}

impl StatsBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether hooks are currently registered.
    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Number of frames submitted.
    pub fn submitted(&self) -> u64 {
        self.submitted
    }

    /// Counters of the last submitted frame.
    pub fn last(&self) -> Option<FrameStats> {
        self.last
    }

    /// Visibility flags of the last submitted frame.
    pub fn visibility(&self) -> (bool, bool) {
        (self.show_points, self.show_lines)
    }
}

impl RenderBackend for StatsBackend {
    fn attach(&mut self) {
        self.attached = true;
    }

    fn detach(&mut self) {
        self.attached = false;
    }

    fn submit(&mut self, frame: &FrameOutput<'_>) {
        self.submitted += 1;
        self.last = Some(frame.stats);
        self.show_points = frame.show_points;
        self.show_lines = frame.show_lines;
    }
}
