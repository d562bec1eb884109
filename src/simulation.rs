//! Simulation - owned state for one plexus animation.
//!
//! A `Simulation` holds everything a frame touches: the particle store,
//! the edge list and the vertex buffers, all sized once from the config.
//! `step` runs the pipeline (integrate, build graph, pack) and never
//! allocates.

use log::{debug, warn};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::config::{ConfigUpdate, PlexusConfig};
use crate::error::{Error, Result};
use crate::frame::FrameOutput;
use crate::geometry::{GeometryBuffers, pack};
use crate::graph::{EdgeList, GraphParams, ProximitySnapshot, build};
use crate::particles::{Particle, ParticleStore, integrate};

/// Counters describing one completed frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Frames completed so far, including this one.
    pub frame: u64,
    /// Active particles this frame.
    pub particle_count: usize,
    /// Edges formed this frame.
    pub edge_count: usize,
    /// Valid vertices in the line buffers (`2 × edge_count`).
    pub drawn_vertex_count: usize,
}

/// Owned simulation context.
#[derive(Debug)]
pub struct Simulation {
    config: PlexusConfig,
    params: GraphParams,
    store: ParticleStore,
    edges: EdgeList,
    buffers: GeometryBuffers,
    last: FrameStats,
}

impl Simulation {
    /// Validate the config, allocate every buffer and seed the particles.
    ///
    /// Without a configured seed the host's entropy source is used.
    pub fn new(config: PlexusConfig) -> Result<Self> {
        config.validate()?;
        let seed = config.seed.unwrap_or_else(entropy_seed);
        let mut rng = StdRng::seed_from_u64(seed);
        let store = ParticleStore::seeded(
            config.max_particle_count,
            config.particle_count,
            config.volume_half_extent,
            &mut rng,
        )?;
        debug!(
            "seeded {} particles ({} active), seed {}",
            config.max_particle_count, config.particle_count, seed
        );
        Self::with_store(config, store)
    }

    /// Build a simulation around an existing store.
    ///
    /// The store's capacity must equal `max_particle_count`; its active
    /// count is reset to `particle_count`.
    pub fn with_store(config: PlexusConfig, mut store: ParticleStore) -> Result<Self> {
        config.validate()?;
        if store.capacity() != config.max_particle_count {
            return Err(Error::configuration(format!(
                "store capacity {} does not match maxParticleCount {}",
                store.capacity(),
                config.max_particle_count
            )));
        }
        store.set_active(config.particle_count)?;

        let segment_capacity = config
            .resolved_segment_capacity()
            .ok_or_else(|| Error::configuration("segment capacity overflows"))?;
        let buffers = GeometryBuffers::try_new(config.max_particle_count, segment_capacity)?;
        let edges = EdgeList::try_with_capacity(segment_capacity)?;
        debug!(
            "allocated geometry for {} points and {} segments",
            config.max_particle_count, segment_capacity
        );

        Ok(Self {
            params: GraphParams::from_config(&config),
            config,
            store,
            edges,
            buffers,
            last: FrameStats::default(),
        })
    }

    /// Run one frame: integrate, rebuild the graph, pack the buffers.
    pub fn step(&mut self) -> FrameStats {
        integrate(
            self.store.active_particles_mut(),
            self.config.volume_half_extent,
        );
        build(&mut self.store, &self.params, &mut self.edges);
        let packed = pack(&self.store, &self.edges, &mut self.buffers);
        if packed.dropped_edge_count > 0 {
            warn!(
                "{} edges did not fit in {} line segments",
                packed.dropped_edge_count,
                self.buffers.lines.segment_capacity()
            );
        }

        self.last = FrameStats {
            frame: self.last.frame + 1,
            particle_count: packed.point_count,
            edge_count: packed.edge_count,
            drawn_vertex_count: packed.drawn_vertex_count,
        };
        self.last
    }

    /// Apply a runtime update between frames.
    ///
    /// Nothing changes if the merged config is invalid.
    pub fn reconfigure(&mut self, update: &ConfigUpdate) -> Result<()> {
        let next = self.config.merged(update)?;
        self.store.set_active(next.particle_count)?;
        self.params = GraphParams::from_config(&next);
        debug!(
            "reconfigured: {} active, minDistance {}, cap {:?}",
            next.particle_count, next.min_distance, self.params.connection_cap
        );
        self.config = next;
        Ok(())
    }

    /// Read-only view of the last frame for the rendering backend.
    pub fn output(&self) -> FrameOutput<'_> {
        FrameOutput {
            stats: self.last,
            point_positions: self.buffers.points.positions(),
            point_count: self.buffers.points.draw_count(),
            show_points: self.config.show_points,
            line_positions: self.buffers.lines.positions(),
            line_colors: self.buffers.lines.colors(),
            drawn_vertex_count: self.buffers.lines.drawn_vertex_count(),
            show_lines: self.config.show_lines,
        }
    }

    /// Copy the last frame's edges into a petgraph snapshot.
    pub fn snapshot(&self) -> ProximitySnapshot {
        ProximitySnapshot::from_edges(self.store.active(), self.edges.as_slice())
    }

    /// Overwrite a particle slot between frames.
    ///
    /// Returns false if the index is out of range.
    pub fn place(&mut self, index: usize, particle: Particle) -> bool {
        self.store.set(index, particle)
    }

    /// Current configuration.
    pub fn config(&self) -> &PlexusConfig {
        &self.config
    }

    /// Particle state.
    pub fn store(&self) -> &ParticleStore {
        &self.store
    }

    /// The last frame's edges.
    pub fn edges(&self) -> &EdgeList {
        &self.edges
    }

    /// The vertex buffers.
    pub fn buffers(&self) -> &GeometryBuffers {
        &self.buffers
    }

    /// Counters of the last completed frame.
    pub fn last_stats(&self) -> FrameStats {
        self.last
    }
}

#[cfg(target_arch = "wasm32")]
fn entropy_seed() -> u64 {
    let high = (js_sys::Math::random() * f64::from(u32::MAX)) as u64;
    let low = (js_sys::Math::random() * f64::from(u32::MAX)) as u64;
    (high << 32) | low
}

#[cfg(not(target_arch = "wasm32"))]
fn entropy_seed() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos() as u64)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn small_config() -> PlexusConfig {
        PlexusConfig {
            max_particle_count: 50,
            particle_count: 30,
            min_distance: 40.0,
            volume_half_extent: 100.0,
            seed: Some(1234),
            ..PlexusConfig::default()
        }
    }

    #[test]
    fn test_new_allocates_from_config() {
        let sim = Simulation::new(small_config()).unwrap();
        assert_eq!(sim.store().capacity(), 50);
        assert_eq!(sim.store().active(), 30);
        assert_eq!(sim.buffers().points.capacity(), 50);
        assert_eq!(sim.buffers().lines.segment_capacity(), 2500);
        assert!(sim.edges().capacity() >= 2500);
        assert_eq!(sim.last_stats(), FrameStats::default());
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = PlexusConfig::with_counts(10, 11);
        assert!(Simulation::new(config).unwrap_err().is_configuration());
    }

    #[test]
    fn test_oversized_segment_capacity_fails_setup() {
        let config = PlexusConfig {
            max_particle_count: 1,
            particle_count: 0,
            segment_capacity: Some(usize::MAX / 8),
            seed: Some(3),
            ..PlexusConfig::default()
        };
        assert!(Simulation::new(config).unwrap_err().is_configuration());

        // Passes the size checks but cannot be allocated
        let config = PlexusConfig {
            max_particle_count: 1,
            particle_count: 0,
            segment_capacity: Some(isize::MAX as usize / 32),
            seed: Some(3),
            ..PlexusConfig::default()
        };
        assert!(config.validate().is_ok());
        assert!(Simulation::new(config).unwrap_err().is_configuration());
    }

    #[test]
    fn test_huge_volume_stays_finite() {
        let config = PlexusConfig {
            max_particle_count: 50,
            particle_count: 50,
            volume_half_extent: 3.0e38,
            seed: Some(11),
            ..PlexusConfig::default()
        };
        let mut sim = Simulation::new(config).unwrap();
        for _ in 0..3 {
            sim.step();
        }
        assert!(sim.store().particles().iter().all(|p| p.position.is_finite()));
        assert!(sim.buffers().points.drawn_positions().iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_with_store_checks_capacity() {
        let store = ParticleStore::new(5, 5).unwrap();
        let config = PlexusConfig::with_counts(6, 5);
        assert!(Simulation::with_store(config, store).is_err());
    }

    #[test]
    fn test_step_counts() {
        let mut sim = Simulation::new(small_config()).unwrap();
        for expected in 1..=5 {
            let stats = sim.step();
            assert_eq!(stats.frame, expected);
            assert_eq!(stats.particle_count, 30);
            assert_eq!(stats.drawn_vertex_count, 2 * stats.edge_count);
            assert_eq!(stats.edge_count, sim.edges().len());
            assert_eq!(sim.store().total_connections(), 2 * stats.edge_count as u64);
        }
    }

    #[test]
    fn test_step_does_not_grow_buffers() {
        let mut sim = Simulation::new(small_config()).unwrap();
        let edge_capacity = sim.edges().capacity();
        let line_len = sim.buffers().lines.positions().len();
        let point_ptr = sim.buffers().points.positions().as_ptr();

        for _ in 0..50 {
            sim.step();
        }

        assert_eq!(sim.edges().capacity(), edge_capacity);
        assert_eq!(sim.buffers().lines.positions().len(), line_len);
        assert_eq!(sim.buffers().points.positions().as_ptr(), point_ptr);
    }

    #[test]
    fn test_same_seed_same_frames() {
        let mut a = Simulation::new(small_config()).unwrap();
        let mut b = Simulation::new(small_config()).unwrap();
        for _ in 0..10 {
            assert_eq!(a.step(), b.step());
        }
        assert_eq!(a.edges().as_slice(), b.edges().as_slice());
        assert_eq!(a.buffers().lines.drawn_colors(), b.buffers().lines.drawn_colors());
    }

    #[test]
    fn test_reconfigure_active_count() {
        let mut sim = Simulation::new(small_config()).unwrap();
        sim.reconfigure(&ConfigUpdate {
            particle_count: Some(50),
            ..ConfigUpdate::default()
        })
        .unwrap();
        assert_eq!(sim.step().particle_count, 50);

        let err = sim
            .reconfigure(&ConfigUpdate {
                particle_count: Some(51),
                ..ConfigUpdate::default()
            })
            .unwrap_err();
        assert!(err.is_configuration());
        assert_eq!(sim.config().particle_count, 50);
    }

    #[test]
    fn test_reconfigure_threshold_to_zero() {
        let mut sim = Simulation::new(small_config()).unwrap();
        sim.reconfigure(&ConfigUpdate {
            min_distance: Some(0.0),
            ..ConfigUpdate::default()
        })
        .unwrap();
        let stats = sim.step();
        assert_eq!(stats.edge_count, 0);
        assert_eq!(stats.drawn_vertex_count, 0);
    }

    #[test]
    fn test_output_reflects_last_frame() {
        let store = ParticleStore::from_particles(vec![
            Particle::at(Vec3::ZERO),
            Particle::at(Vec3::new(100.0, 0.0, 0.0)),
        ]);
        let config = PlexusConfig {
            max_particle_count: 2,
            particle_count: 2,
            show_lines: false,
            ..PlexusConfig::default()
        };
        let mut sim = Simulation::with_store(config, store).unwrap();
        sim.step();

        let output = sim.output();
        assert_eq!(output.stats.edge_count, 1);
        assert_eq!(output.point_count, 2);
        assert_eq!(output.drawn_vertex_count, 2);
        assert!(output.show_points);
        assert!(!output.show_lines);
        assert_eq!(output.drawn_line_positions(), &[0.0, 0.0, 0.0, 100.0, 0.0, 0.0]);
    }

    #[test]
    fn test_snapshot_matches_edges() {
        let mut sim = Simulation::new(small_config()).unwrap();
        sim.step();
        let snapshot = sim.snapshot();
        assert_eq!(snapshot.particle_count(), 30);
        assert_eq!(snapshot.edge_count(), sim.edges().len());
        for edge in sim.edges() {
            assert!(snapshot.neighbors(edge.a).contains(&edge.b));
        }
    }

    #[test]
    fn test_place_particle() {
        let mut sim = Simulation::new(small_config()).unwrap();
        assert!(sim.place(0, Particle::at(Vec3::splat(5.0))));
        assert!(!sim.place(50, Particle::default()));
        assert_eq!(sim.store().particles()[0].position, Vec3::splat(5.0));
    }
}
