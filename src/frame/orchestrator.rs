//! FrameOrchestrator - lifecycle and per-refresh sequencing.
//!
//! ```text
//! Uninitialized --start--> Running --stop--> Stopped
//!       |                                       ^
//!       +-----------------stop------------------+
//! ```
//!
//! Each refresh signal in `Running` runs integrate, build graph and pack,
//! submits the buffers to the backend, then requests the next refresh.
//! Signals that arrive in any other state are ignored.

use std::fmt;

use log::{debug, info, warn};

use super::backend::RenderBackend;
use super::scheduler::RefreshScheduler;
use crate::config::{ConfigUpdate, PlexusConfig};
use crate::error::{Error, Result};
use crate::simulation::{FrameStats, Simulation};

/// Lifecycle state of an orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Uninitialized,
    Running,
    /// Terminal.
    Stopped,
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Uninitialized => "uninitialized",
            Self::Running => "running",
            Self::Stopped => "stopped",
        };
        f.write_str(name)
    }
}

/// Drives a [`Simulation`] from refresh signals.
pub struct FrameOrchestrator<S: RefreshScheduler, B: RenderBackend> {
    config: PlexusConfig,
    state: LifecycleState,
    simulation: Option<Simulation>,
    scheduler: S,
    backend: B,
}

impl<S: RefreshScheduler, B: RenderBackend> FrameOrchestrator<S, B> {
    /// Create an orchestrator. Nothing is allocated until `start`.
    pub fn new(config: PlexusConfig, scheduler: S, backend: B) -> Self {
        Self {
            config,
            state: LifecycleState::Uninitialized,
            simulation: None,
            scheduler,
            backend,
        }
    }

    /// Allocate and seed the simulation, attach the backend and request
    /// the first refresh.
    ///
    /// An invalid config leaves the orchestrator `Uninitialized`.
    pub fn start(&mut self) -> Result<()> {
        if self.state != LifecycleState::Uninitialized {
            warn!("start rejected while {}", self.state);
            return Err(Error::lifecycle("start", self.state));
        }

        let simulation = Simulation::new(self.config.clone())?;
        self.simulation = Some(simulation);
        self.backend.attach();
        self.state = LifecycleState::Running;
        self.scheduler.request_frame();

        info!(
            "plexus started: {} of {} particles, minDistance {}",
            self.config.particle_count, self.config.max_particle_count, self.config.min_distance
        );
        Ok(())
    }

    /// Handle a refresh signal.
    ///
    /// Returns `None` without touching any state unless `Running`, so a
    /// signal already in flight when `stop` ran is harmless.
    pub fn on_refresh(&mut self) -> Option<FrameStats> {
        if self.state != LifecycleState::Running {
            debug!("refresh ignored while {}", self.state);
            return None;
        }
        self.step().ok()
    }

    /// Run one frame, failing unless `Running`.
    pub fn step(&mut self) -> Result<FrameStats> {
        let state = self.state;
        let simulation = match (state, self.simulation.as_mut()) {
            (LifecycleState::Running, Some(simulation)) => simulation,
            _ => return Err(Error::lifecycle("process a frame", state)),
        };

        let stats = simulation.step();
        self.backend.submit(&simulation.output());
        self.scheduler.request_frame();
        Ok(stats)
    }

    /// Cancel the pending refresh, detach the backend and stop for good.
    pub fn stop(&mut self) -> Result<()> {
        match self.state {
            LifecycleState::Running => {
                self.scheduler.cancel_frame();
                self.backend.detach();
            }
            LifecycleState::Uninitialized => {}
            LifecycleState::Stopped => {
                warn!("stop rejected: already stopped");
                return Err(Error::lifecycle("stop", self.state));
            }
        }
        self.state = LifecycleState::Stopped;
        info!("plexus stopped");
        Ok(())
    }

    /// Apply a runtime update between frames.
    ///
    /// Before `start` only the stored config changes. Rejected after
    /// `stop`; a rejected update changes nothing.
    pub fn reconfigure(&mut self, update: &ConfigUpdate) -> Result<()> {
        match self.state {
            LifecycleState::Stopped => Err(Error::lifecycle("reconfigure", self.state)),
            LifecycleState::Uninitialized => {
                self.config = self.config.merged(update)?;
                Ok(())
            }
            LifecycleState::Running => {
                let simulation = self
                    .simulation
                    .as_mut()
                    .ok_or_else(|| Error::lifecycle("reconfigure", LifecycleState::Running))?;
                simulation.reconfigure(update)?;
                self.config = simulation.config().clone();
                Ok(())
            }
        }
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == LifecycleState::Running
    }

    /// Current configuration, including accepted updates.
    pub fn config(&self) -> &PlexusConfig {
        &self.config
    }

    /// The simulation, once started. Kept readable after `stop`.
    pub fn simulation(&self) -> Option<&Simulation> {
        self.simulation.as_ref()
    }

    /// Mutable access for host-side placement between frames.
    pub fn simulation_mut(&mut self) -> Option<&mut Simulation> {
        self.simulation.as_mut()
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }
}
