//! ParticleStore - fixed-capacity particle array.
//!
//! Slots are allocated once at construction and mutated in place for the
//! lifetime of the simulation. Only the first `active` slots take part in
//! integration, graph building and packing.

use rand::Rng;

use super::particle::Particle;
use crate::error::{Error, Result};

/// Fixed-capacity storage for particle state.
#[derive(Debug, Clone)]
pub struct ParticleStore {
    /// All slots. Never reallocated.
    particles: Box<[Particle]>,

    /// Number of active slots, `<= particles.len()`
    active: usize,
}

impl ParticleStore {
    /// Allocate `capacity` zeroed slots with `active` of them in use.
    ///
    /// `active > capacity` is rejected rather than clamped.
    pub fn new(capacity: usize, active: usize) -> Result<Self> {
        check_active(capacity, active)?;
        Ok(Self {
            particles: vec![Particle::default(); capacity].into_boxed_slice(),
            active,
        })
    }

    /// Allocate and seed every slot with a random position inside the
    /// cube of half-extent `half_extent` and a random velocity.
    ///
    /// Inactive slots are seeded too, so raising the active count later
    /// brings in already-placed particles.
    pub fn seeded<R: Rng + ?Sized>(
        capacity: usize,
        active: usize,
        half_extent: f32,
        rng: &mut R,
    ) -> Result<Self> {
        check_active(capacity, active)?;
        let particles: Box<[Particle]> = (0..capacity)
            .map(|_| Particle::random(rng, half_extent))
            .collect();
        Ok(Self { particles, active })
    }

    /// Build a store from explicit particles, all of them active.
    pub fn from_particles(particles: Vec<Particle>) -> Self {
        let active = particles.len();
        Self {
            particles: particles.into_boxed_slice(),
            active,
        }
    }

    /// Total number of slots.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.particles.len()
    }

    /// Number of active slots.
    #[inline]
    pub fn active(&self) -> usize {
        self.active
    }

    /// Change the active count between frames.
    pub fn set_active(&mut self, active: usize) -> Result<()> {
        check_active(self.capacity(), active)?;
        self.active = active;
        Ok(())
    }

    /// All slots, active or not.
    #[inline]
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// The active prefix.
    #[inline]
    pub fn active_particles(&self) -> &[Particle] {
        &self.particles[..self.active]
    }

    /// The active prefix, mutably.
    #[inline]
    pub fn active_particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles[..self.active]
    }

    /// Get a slot by index.
    pub fn get(&self, index: usize) -> Option<&Particle> {
        self.particles.get(index)
    }

    /// Overwrite a slot.
    ///
    /// Returns false if the index is out of range.
    pub fn set(&mut self, index: usize, particle: Particle) -> bool {
        match self.particles.get_mut(index) {
            Some(slot) => {
                *slot = particle;
                true
            }
            None => false,
        }
    }

    /// Connection counts of the active prefix.
    pub fn connection_counts(&self) -> Vec<u32> {
        self.active_particles().iter().map(|p| p.connections).collect()
    }

    /// Sum of connection counts over the active prefix.
    pub fn total_connections(&self) -> u64 {
        self.active_particles()
            .iter()
            .map(|p| u64::from(p.connections))
            .sum()
    }
}

fn check_active(capacity: usize, active: usize) -> Result<()> {
    if active > capacity {
        return Err(Error::configuration(format!(
            "particleCount {active} exceeds maxParticleCount {capacity}"
        )));
    }
    Ok(())
}
