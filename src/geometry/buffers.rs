//! Preallocated vertex buffers handed to the rendering backend.
//!
//! Buffers are sized for the worst case once and never resized. Each one
//! tracks how much of its prefix is valid this frame; everything past that
//! is stale data from earlier frames and must not be drawn.

use crate::error::{Error, Result};

/// Floats per vertex position or color.
pub const COMPONENTS: usize = 3;

/// Floats per line segment (two vertices).
pub const SEGMENT_FLOATS: usize = 2 * COMPONENTS;

/// Point positions, one `[x, y, z]` triple per particle slot.
#[derive(Debug, Clone)]
pub struct PointBuffer {
    positions: Box<[f32]>,
    draw_count: usize,
}

impl PointBuffer {
    /// Allocate room for `capacity` points.
    pub fn new(capacity: usize) -> Self {
        Self {
            positions: vec![0.0; capacity * COMPONENTS].into_boxed_slice(),
            draw_count: 0,
        }
    }

    /// Like [`PointBuffer::new`], but reports a failed allocation.
    pub fn try_new(capacity: usize) -> Result<Self> {
        Ok(Self {
            positions: zeroed(capacity, COMPONENTS, "point")?,
            draw_count: 0,
        })
    }

    /// Number of point slots.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.positions.len() / COMPONENTS
    }

    /// Number of points to draw, counted from slot 0.
    #[inline]
    pub fn draw_count(&self) -> usize {
        self.draw_count
    }

    /// The whole buffer, including slots past the draw range.
    #[inline]
    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    /// The drawable prefix.
    #[inline]
    pub fn drawn_positions(&self) -> &[f32] {
        &self.positions[..self.draw_count * COMPONENTS]
    }

    #[inline]
    pub(crate) fn positions_mut(&mut self) -> &mut [f32] {
        &mut self.positions
    }

    #[inline]
    pub(crate) fn set_draw_count(&mut self, count: usize) {
        debug_assert!(count <= self.capacity());
        self.draw_count = count;
    }
}

/// Line segment positions and per-vertex colors.
#[derive(Debug, Clone)]
pub struct LineBuffer {
    positions: Box<[f32]>,
    colors: Box<[f32]>,
    drawn_vertex_count: usize,
}

impl LineBuffer {
    /// Allocate room for `segment_capacity` segments.
    pub fn new(segment_capacity: usize) -> Self {
        let len = segment_capacity * SEGMENT_FLOATS;
        Self {
            positions: vec![0.0; len].into_boxed_slice(),
            colors: vec![0.0; len].into_boxed_slice(),
            drawn_vertex_count: 0,
        }
    }

    /// Like [`LineBuffer::new`], but reports a failed allocation.
    pub fn try_new(segment_capacity: usize) -> Result<Self> {
        Ok(Self {
            positions: zeroed(segment_capacity, SEGMENT_FLOATS, "line position")?,
            colors: zeroed(segment_capacity, SEGMENT_FLOATS, "line color")?,
            drawn_vertex_count: 0,
        })
    }

    /// Number of segments the buffer can hold.
    #[inline]
    pub fn segment_capacity(&self) -> usize {
        self.positions.len() / SEGMENT_FLOATS
    }

    /// Number of vertices the buffer can hold.
    #[inline]
    pub fn vertex_capacity(&self) -> usize {
        self.segment_capacity() * 2
    }

    /// Vertices written this frame (two per edge).
    #[inline]
    pub fn drawn_vertex_count(&self) -> usize {
        self.drawn_vertex_count
    }

    /// The whole position buffer, including the stale tail.
    #[inline]
    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    /// The whole color buffer, including the stale tail.
    #[inline]
    pub fn colors(&self) -> &[f32] {
        &self.colors
    }

    /// Positions of this frame's vertices.
    #[inline]
    pub fn drawn_positions(&self) -> &[f32] {
        &self.positions[..self.drawn_vertex_count * COMPONENTS]
    }

    /// Colors of this frame's vertices.
    #[inline]
    pub fn drawn_colors(&self) -> &[f32] {
        &self.colors[..self.drawn_vertex_count * COMPONENTS]
    }

    #[inline]
    pub(crate) fn buffers_mut(&mut self) -> (&mut [f32], &mut [f32]) {
        (&mut self.positions, &mut self.colors)
    }

    #[inline]
    pub(crate) fn set_drawn_vertex_count(&mut self, count: usize) {
        debug_assert!(count <= self.vertex_capacity());
        self.drawn_vertex_count = count;
    }
}

/// The point and line buffers of one simulation.
#[derive(Debug, Clone)]
pub struct GeometryBuffers {
    pub points: PointBuffer,
    pub lines: LineBuffer,
}

impl GeometryBuffers {
    /// Allocate buffers for `max_particles` points and `segment_capacity`
    /// line segments.
    pub fn new(max_particles: usize, segment_capacity: usize) -> Self {
        Self {
            points: PointBuffer::new(max_particles),
            lines: LineBuffer::new(segment_capacity),
        }
    }

    /// Allocate both buffers, failing with a configuration error instead
    /// of aborting when the sizes cannot be allocated.
    pub fn try_new(max_particles: usize, segment_capacity: usize) -> Result<Self> {
        Ok(Self {
            points: PointBuffer::try_new(max_particles)?,
            lines: LineBuffer::try_new(segment_capacity)?,
        })
    }
}

/// Zero-filled buffer of `count × stride` floats.
fn zeroed(count: usize, stride: usize, what: &str) -> Result<Box<[f32]>> {
    let len = count.checked_mul(stride).ok_or_else(|| {
        Error::configuration(format!("{what} buffer of {count} entries overflows"))
    })?;
    let mut buffer = Vec::new();
    buffer.try_reserve_exact(len).map_err(|err| {
        Error::configuration(format!("cannot allocate {what} buffer of {len} floats: {err}"))
    })?;
    buffer.resize(len, 0.0);
    Ok(buffer.into_boxed_slice())
}
