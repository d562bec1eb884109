//! Particle Plexus - WASM Module
//!
//! This module provides the per-frame simulation behind the particle
//! plexus visualization: particles drifting inside a cube, linked into a
//! proximity graph and packed into vertex buffers for a WebGL/WebGPU
//! renderer. It is compiled to WebAssembly and exposes a
//! JavaScript-friendly API via wasm-bindgen.
//!
//! # Architecture
//!
//! - `particles`: Fixed-capacity particle store and motion integration
//! - `graph`: Brute-force proximity graph builder and petgraph snapshots
//! - `geometry`: Preallocated point/line buffers and the packer
//! - `simulation`: Owned per-animation context running one frame
//! - `frame`: Lifecycle state machine, refresh scheduling, render hand-off
//! - `config` / `error` / `logging`: Ambient configuration, errors, console logging

use js_sys::Float32Array;
use wasm_bindgen::prelude::*;

pub mod config;
pub mod error;
pub mod frame;
pub mod geometry;
pub mod graph;
pub mod logging;
pub mod particles;
pub mod simulation;

pub use config::{ConfigUpdate, PlexusConfig};
pub use error::{Error, Result};
pub use frame::{
    FrameOrchestrator, FrameOutput, LifecycleState, ManualScheduler, RefreshScheduler,
    RenderBackend, StatsBackend,
};
pub use simulation::{FrameStats, Simulation};

/// Initialize the WASM module.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    logging::init_console_logging(log::LevelFilter::Info);
}

/// Change the console log level ("error", "warn", "info", "debug", "trace", "off").
///
/// Returns false if the name is not a level.
#[wasm_bindgen(js_name = setLogLevel)]
pub fn set_log_level(level: &str) -> bool {
    match logging::parse_level(level) {
        Some(filter) => {
            log::set_max_level(filter);
            true
        }
        None => false,
    }
}

/// Main entry point for the plexus engine.
///
/// This struct wraps the frame orchestrator and provides the public API
/// exposed to JavaScript. The host owns the display loop:
///
/// ```js
/// const plexus = new PlexusWasm({ particleCount: 300, minDistance: 120 });
/// plexus.start();
/// function loop() {
///   if (plexus.tick()) {
///     upload(plexus.getLinePositionsView(), plexus.drawnVertexCount);
///     requestAnimationFrame(loop);
///   }
/// }
/// requestAnimationFrame(loop);
/// ```
#[wasm_bindgen]
pub struct PlexusWasm {
    orchestrator: FrameOrchestrator<ManualScheduler, StatsBackend>,
}

#[wasm_bindgen]
impl PlexusWasm {
    /// Create an engine from a config object.
    ///
    /// `undefined` or `null` gives the defaults. Unknown fields are ignored.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> std::result::Result<PlexusWasm, JsError> {
        let config: PlexusConfig = if config.is_undefined() || config.is_null() {
            PlexusConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)?
        };
        config.validate()?;
        Ok(Self {
            orchestrator: FrameOrchestrator::new(
                config,
                ManualScheduler::new(),
                StatsBackend::new(),
            ),
        })
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Allocate buffers, seed particles and start running.
    pub fn start(&mut self) -> std::result::Result<(), JsError> {
        Ok(self.orchestrator.start()?)
    }

    /// Process one refresh signal.
    ///
    /// Returns true if another frame was requested; schedule the next
    /// `requestAnimationFrame` only then. After `stop` this does nothing
    /// and returns false.
    pub fn tick(&mut self) -> bool {
        self.orchestrator.on_refresh();
        self.orchestrator.scheduler_mut().take_pending()
    }

    /// Stop processing frames. Final; a stopped engine cannot restart.
    pub fn stop(&mut self) -> std::result::Result<(), JsError> {
        Ok(self.orchestrator.stop()?)
    }

    /// Apply `{ particleCount, minDistance, limitConnections, maxConnections,
    /// showPoints, showLines }` between frames. All fields optional;
    /// `undefined` or `null` changes nothing.
    pub fn reconfigure(&mut self, update: JsValue) -> std::result::Result<(), JsError> {
        let update: ConfigUpdate = if update.is_undefined() || update.is_null() {
            ConfigUpdate::default()
        } else {
            serde_wasm_bindgen::from_value(update)?
        };
        Ok(self.orchestrator.reconfigure(&update)?)
    }

    /// Current lifecycle state name.
    pub fn state(&self) -> String {
        self.orchestrator.state().to_string()
    }

    #[wasm_bindgen(getter, js_name = isRunning)]
    pub fn is_running(&self) -> bool {
        self.orchestrator.is_running()
    }

    // =========================================================================
    // Frame Counters
    // =========================================================================

    /// Frames processed so far.
    #[wasm_bindgen(getter)]
    pub fn frame(&self) -> f64 {
        self.last_stats().frame as f64
    }

    /// Active particles (point draw range).
    #[wasm_bindgen(getter, js_name = particleCount)]
    pub fn particle_count(&self) -> u32 {
        self.orchestrator.config().particle_count as u32
    }

    /// Store capacity.
    #[wasm_bindgen(getter, js_name = maxParticleCount)]
    pub fn max_particle_count(&self) -> u32 {
        self.orchestrator.config().max_particle_count as u32
    }

    /// Edges formed in the last frame.
    #[wasm_bindgen(getter, js_name = edgeCount)]
    pub fn edge_count(&self) -> u32 {
        self.last_stats().edge_count as u32
    }

    /// Valid vertices in the line buffers (line draw range).
    #[wasm_bindgen(getter, js_name = drawnVertexCount)]
    pub fn drawn_vertex_count(&self) -> u32 {
        self.last_stats().drawn_vertex_count as u32
    }

    #[wasm_bindgen(getter, js_name = showPoints)]
    pub fn show_points(&self) -> bool {
        self.orchestrator.config().show_points
    }

    #[wasm_bindgen(getter, js_name = showLines)]
    pub fn show_lines(&self) -> bool {
        self.orchestrator.config().show_lines
    }

    // =========================================================================
    // Buffer Access (Zero-Copy)
    // =========================================================================

    /// Get a zero-copy view of point positions [x0, y0, z0, x1, ...].
    ///
    /// # Safety
    ///
    /// The returned view is invalidated if any Rust allocation occurs.
    /// Use immediately for GPU upload, do not store.
    #[wasm_bindgen(js_name = getPointPositionsView)]
    pub fn get_point_positions_view(&self) -> Float32Array {
        match self.orchestrator.simulation() {
            Some(sim) => unsafe { Float32Array::view(sim.buffers().points.positions()) },
            None => Float32Array::new_with_length(0),
        }
    }

    /// Get a zero-copy view of line vertex positions.
    ///
    /// Only the first `drawnVertexCount * 3` floats belong to this frame.
    #[wasm_bindgen(js_name = getLinePositionsView)]
    pub fn get_line_positions_view(&self) -> Float32Array {
        match self.orchestrator.simulation() {
            Some(sim) => unsafe { Float32Array::view(sim.buffers().lines.positions()) },
            None => Float32Array::new_with_length(0),
        }
    }

    /// Get a zero-copy view of line vertex colors.
    ///
    /// Same layout and draw range as the line positions.
    #[wasm_bindgen(js_name = getLineColorsView)]
    pub fn get_line_colors_view(&self) -> Float32Array {
        match self.orchestrator.simulation() {
            Some(sim) => unsafe { Float32Array::view(sim.buffers().lines.colors()) },
            None => Float32Array::new_with_length(0),
        }
    }

    // =========================================================================
    // Graph Queries
    // =========================================================================

    /// Connection count of every active particle in the last frame.
    #[wasm_bindgen(js_name = getConnectionCounts)]
    pub fn get_connection_counts(&self) -> Vec<u32> {
        self.orchestrator
            .simulation()
            .map(|sim| sim.store().connection_counts())
            .unwrap_or_default()
    }

    /// Particles linked to `index` in the last frame.
    #[wasm_bindgen(js_name = getNeighbors)]
    pub fn get_neighbors(&self, index: u32) -> Vec<u32> {
        self.orchestrator
            .simulation()
            .map(|sim| sim.snapshot().neighbors(index))
            .unwrap_or_default()
    }

    /// Number of connected clusters in the last frame.
    #[wasm_bindgen(js_name = clusterCount)]
    pub fn cluster_count(&self) -> u32 {
        self.orchestrator
            .simulation()
            .map(|sim| sim.snapshot().cluster_count() as u32)
            .unwrap_or(0)
    }
}

impl PlexusWasm {
    fn last_stats(&self) -> FrameStats {
        self.orchestrator
            .simulation()
            .map(Simulation::last_stats)
            .unwrap_or_default()
    }
}
