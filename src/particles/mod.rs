//! Particle state and motion.
//!
//! The store keeps particles in a fixed-capacity array that is allocated
//! once and mutated in place every frame.

mod motion;
mod particle;
mod store;

pub use motion::integrate;
pub use particle::Particle;
pub use store::ParticleStore;
