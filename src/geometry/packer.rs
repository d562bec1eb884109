//! Packing of particles and edges into the vertex buffers.
//!
//! Writes always restart at offset 0. Nothing past the new write offset is
//! cleared; the drawn counts are what exclude the stale tail.

use super::buffers::{COMPONENTS, GeometryBuffers, SEGMENT_FLOATS};
use crate::graph::EdgeList;
use crate::particles::ParticleStore;

/// Counts produced by one packing pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PackStats {
    /// Points in the point draw range.
    pub point_count: usize,
    /// Segments written to the line buffers.
    pub edge_count: usize,
    /// `2 × edge_count`.
    pub drawn_vertex_count: usize,
    /// Edges that did not fit in the line buffers. Zero for a validated
    /// config.
    pub dropped_edge_count: usize,
}

/// Copy active particle positions and this frame's edges into `buffers`.
///
/// The line buffers hold at least the worst-case edge count for a
/// validated config, so every edge fits. Edges past the buffer capacity
/// are not drawn and are counted in `dropped_edge_count`.
pub fn pack(store: &ParticleStore, edges: &EdgeList, buffers: &mut GeometryBuffers) -> PackStats {
    let particles = store.active_particles();

    let point_slots = buffers.points.positions_mut().chunks_exact_mut(COMPONENTS);
    debug_assert!(point_slots.len() >= particles.len());
    let mut point_count = 0;
    for (slot, particle) in point_slots.zip(particles) {
        slot.copy_from_slice(&particle.position.to_array());
        point_count += 1;
    }
    buffers.points.set_draw_count(point_count);

    let (positions, colors) = buffers.lines.buffers_mut();
    let segments = positions
        .chunks_exact_mut(SEGMENT_FLOATS)
        .zip(colors.chunks_exact_mut(SEGMENT_FLOATS));

    let mut edge_count = 0;
    for ((position, color), edge) in segments.zip(edges) {
        let (a, b) = edge.endpoints();
        position[..COMPONENTS].copy_from_slice(&particles[a].position.to_array());
        position[COMPONENTS..].copy_from_slice(&particles[b].position.to_array());
        color.fill(edge.alpha);
        edge_count += 1;
    }

    let drawn_vertex_count = edge_count * 2;
    buffers.lines.set_drawn_vertex_count(drawn_vertex_count);

    PackStats {
        point_count,
        edge_count,
        drawn_vertex_count,
        dropped_edge_count: edges.len() - edge_count,
    }
}
