//! Proximity graph construction.
//!
//! Every frame the builder scans all active particle pairs and emits the
//! edges shorter than the distance threshold into a reusable edge list.
//! Snapshots copy that list into a petgraph graph for topology queries
//! between frames.

mod builder;
mod edge;
mod snapshot;

pub use builder::{GraphParams, build};
pub use edge::{Edge, EdgeList};
pub use snapshot::ProximitySnapshot;
