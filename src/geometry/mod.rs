//! Vertex buffers for points and line segments.
//!
//! Buffers are preallocated for the worst case and reused every frame.
//! Draw counts, not buffer lengths, tell the backend what to render.

mod buffers;
mod packer;

pub use buffers::{COMPONENTS, GeometryBuffers, LineBuffer, PointBuffer, SEGMENT_FLOATS};
pub use packer::{PackStats, pack};
