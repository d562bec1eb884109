//! Proximity graph construction.
//!
//! Brute-force scan over every active pair `(i, j)`, `i < j`, in ascending
//! order. A pair closer than `min_distance` forms an edge and raises both
//! particles' connection counts.
//!
//! With the connection cap on, the cap is enforced in scan order:
//! - once particle `i` is full, the rest of row `i` is skipped;
//! - a full particle `j` only skips the pair `(i, j)`.
//!
//! Lower indices therefore claim connections first. This asymmetry is part
//! of the visual behavior and is kept as-is.

use super::edge::{Edge, EdgeList};
use crate::config::PlexusConfig;
use crate::particles::ParticleStore;

/// Parameters for one graph build.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GraphParams {
    /// Edge-formation cutoff. Non-positive values form no edges.
    pub min_distance: f32,
    /// Per-particle connection cap, `None` when unlimited.
    pub connection_cap: Option<u32>,
}

impl GraphParams {
    /// Unlimited connections with the given cutoff.
    pub fn new(min_distance: f32) -> Self {
        Self {
            min_distance,
            connection_cap: None,
        }
    }

    /// Same cutoff with a connection cap.
    pub fn with_cap(self, cap: u32) -> Self {
        Self {
            connection_cap: Some(cap),
            ..self
        }
    }

    /// Extract the graph settings from a config.
    pub fn from_config(config: &PlexusConfig) -> Self {
        Self {
            min_distance: config.min_distance,
            connection_cap: config.limit_connections.then_some(config.max_connections),
        }
    }
}

/// Rebuild the proximity graph for the store's active particles.
///
/// Resets every active connection count, clears `edges` and fills it in
/// scan order. Returns the number of edges formed.
pub fn build(store: &mut ParticleStore, params: &GraphParams, edges: &mut EdgeList) -> usize {
    let particles = store.active_particles_mut();
    for particle in particles.iter_mut() {
        particle.connections = 0;
    }
    edges.clear();

    let min_distance = params.min_distance;
    if min_distance.is_nan() || min_distance <= 0.0 {
        return 0;
    }

    let n = particles.len();
    for i in 0..n {
        for j in (i + 1)..n {
            if let Some(cap) = params.connection_cap {
                if particles[i].connections >= cap {
                    break;
                }
                if particles[j].connections >= cap {
                    continue;
                }
            }

            let distance = particles[i].distance(&particles[j]);
            if distance < min_distance {
                particles[i].connections += 1;
                particles[j].connections += 1;
                edges.push(Edge::new(i as u32, j as u32, distance, min_distance));
            }
        }
    }

    edges.len()
}
