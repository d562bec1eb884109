//! Display refresh scheduling.
//!
//! The orchestrator never owns a clock. It asks a scheduler for the next
//! refresh signal and cancels it on stop; whoever owns the display loop
//! delivers the signal by calling `FrameOrchestrator::on_refresh`.

/// Source of per-refresh signals.
pub trait RefreshScheduler {
    /// Ask for one more refresh signal.
    fn request_frame(&mut self);

    /// Withdraw any outstanding request.
    fn cancel_frame(&mut self);
}

/// Scheduler that only records requests.
///
/// The host polls `take_pending` after each frame and delivers the next
/// signal itself, e.g. from `requestAnimationFrame` or a test loop.
#[derive(Debug, Clone, Default)]
pub struct ManualScheduler {
    pending: bool,
    requested: u64,
    cancelled: u64,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a refresh is currently requested.
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Consume the outstanding request, returning whether there was one.
    pub fn take_pending(&mut self) -> bool {
        std::mem::take(&mut self.pending)
    }

    /// Total requests made.
    pub fn requested(&self) -> u64 {
        self.requested
    }

    /// Total cancellations made.
    pub fn cancelled(&self) -> u64 {
        self.cancelled
    }
}

impl RefreshScheduler for ManualScheduler {
    fn request_frame(&mut self) {
        self.pending = true;
        self.requested += 1;
    }

    fn cancel_frame(&mut self) {
        self.pending = false;
        self.cancelled += 1;
    }
}
