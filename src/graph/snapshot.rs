//! Off-frame view of a proximity graph using petgraph.
//!
//! The frame pipeline only produces a flat edge list. A snapshot copies
//! that list into a petgraph `UnGraph` so the host can ask topology
//! questions (neighbors, degree, clusters) between frames. Building a
//! snapshot allocates; it is never part of the per-frame pipeline.

use petgraph::algo::connected_components;
use petgraph::graph::{NodeIndex, UnGraph};

use super::edge::Edge;

/// Undirected proximity graph for one frame.
///
/// Node `i` is particle `i`; edge weights are the line alphas.
pub struct ProximitySnapshot {
    graph: UnGraph<u32, f32>,
}

impl ProximitySnapshot {
    /// Build a snapshot over `particle_count` particles.
    ///
    /// Edges referring to particles outside that range are skipped.
    pub fn from_edges(particle_count: usize, edges: &[Edge]) -> Self {
        let mut graph = UnGraph::with_capacity(particle_count, edges.len());
        for i in 0..particle_count {
            graph.add_node(i as u32);
        }
        for edge in edges {
            let (a, b) = edge.endpoints();
            if a < particle_count && b < particle_count {
                graph.add_edge(NodeIndex::new(a), NodeIndex::new(b), edge.alpha);
            }
        }
        Self { graph }
    }

    /// Number of particles in the snapshot.
    pub fn particle_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of edges in the snapshot.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Particles connected to `index`, ascending.
    pub fn neighbors(&self, index: u32) -> Vec<u32> {
        if index as usize >= self.graph.node_count() {
            return Vec::new();
        }
        let mut neighbors: Vec<u32> = self
            .graph
            .neighbors(NodeIndex::new(index as usize))
            .filter_map(|n| self.graph.node_weight(n).copied())
            .collect();
        neighbors.sort_unstable();
        neighbors
    }

    /// Number of edges touching `index`.
    pub fn degree(&self, index: u32) -> usize {
        if index as usize >= self.graph.node_count() {
            return 0;
        }
        self.graph.edges(NodeIndex::new(index as usize)).count()
    }

    /// Number of connected clusters. Unconnected particles count as their
    /// own cluster.
    pub fn cluster_count(&self) -> usize {
        connected_components(&self.graph)
    }
}
