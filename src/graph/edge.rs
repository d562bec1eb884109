//! Edge type and the per-frame edge list.
//!
//! Edges connect two active particles closer than the distance threshold.
//! Each edge has:
//! - The two particle indices, lower index first
//! - The distance between them when the edge formed
//! - The line opacity derived from that distance

use crate::error::{Error, Result};

/// A proximity connection between particles `a < b`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    /// Lower particle index.
    pub a: u32,
    /// Higher particle index.
    pub b: u32,
    /// Euclidean distance between the endpoints.
    pub distance: f32,
    /// `1 - distance / min_distance`, in `(0, 1]`.
    pub alpha: f32,
}

impl Edge {
    /// Create an edge, deriving alpha from the threshold.
    #[inline]
    pub fn new(a: u32, b: u32, distance: f32, min_distance: f32) -> Self {
        debug_assert!(a < b);
        Self {
            a,
            b,
            distance,
            alpha: 1.0 - distance / min_distance,
        }
    }

    /// Endpoints as slice indices.
    #[inline]
    pub fn endpoints(&self) -> (usize, usize) {
        (self.a as usize, self.b as usize)
    }
}

/// Edge list reused across frames.
///
/// Capacity is reserved once; `clear` keeps the allocation, so a frame
/// that stays within capacity never allocates.
#[derive(Debug, Clone)]
pub struct EdgeList {
    edges: Vec<Edge>,
}

impl EdgeList {
    /// Reserve room for `capacity` edges.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            edges: Vec::with_capacity(capacity),
        }
    }

    /// Like [`EdgeList::with_capacity`], but reports a failed allocation.
    pub fn try_with_capacity(capacity: usize) -> Result<Self> {
        let mut edges = Vec::new();
        edges.try_reserve_exact(capacity).map_err(|err| {
            Error::configuration(format!("cannot reserve {capacity} edges: {err}"))
        })?;
        Ok(Self { edges })
    }

    /// Drop all edges, keeping the allocation.
    #[inline]
    pub fn clear(&mut self) {
        self.edges.clear();
    }

    /// Append an edge in scan order.
    #[inline]
    pub fn push(&mut self, edge: Edge) {
        debug_assert!(
            self.edges.len() < self.edges.capacity(),
            "edge list grew past its reserved capacity"
        );
        self.edges.push(edge);
    }

    /// Number of edges this frame.
    #[inline]
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Whether no edge formed this frame.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Reserved capacity.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.edges.capacity()
    }

    /// The edges in scan order.
    #[inline]
    pub fn as_slice(&self) -> &[Edge] {
        &self.edges
    }

    /// Iterate the edges in scan order.
    pub fn iter(&self) -> std::slice::Iter<'_, Edge> {
        self.edges.iter()
    }
}

impl<'a> IntoIterator for &'a EdgeList {
    type Item = &'a Edge;
    type IntoIter = std::slice::Iter<'a, Edge>;

    fn into_iter(self) -> Self::IntoIter {
        self.edges.iter()
    }
}
