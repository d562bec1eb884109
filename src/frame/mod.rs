//! Frame loop: lifecycle, refresh scheduling and render submission.
//!
//! The display clock and the renderer live outside the crate. Both sit
//! behind traits so frames can be driven synchronously in tests.

mod backend;
mod orchestrator;
mod scheduler;

pub use backend::{FrameOutput, RenderBackend, StatsBackend};
pub use orchestrator::{FrameOrchestrator, LifecycleState};
pub use scheduler::{ManualScheduler, RefreshScheduler};
