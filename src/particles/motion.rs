//! Constant-velocity motion with reflecting walls.
//!
//! Each frame moves every active particle by its velocity (one step per
//! frame, no wall-clock time). An axis whose new coordinate lies outside
//! `[-half_extent, half_extent]` has its velocity component negated. The
//! position is not clamped, so a particle may overshoot by at most one
//! step before it heads back.

use super::particle::Particle;

/// Advance the given particles by one frame.
pub fn integrate(particles: &mut [Particle], half_extent: f32) {
    for particle in particles {
        step_particle(particle, half_extent);
    }
}

#[inline]
fn step_particle(particle: &mut Particle, half_extent: f32) {
    particle.position += particle.velocity;

    let position = particle.position.to_array();
    let mut velocity = particle.velocity.to_array();
    for axis in 0..3 {
        if position[axis] < -half_extent || position[axis] > half_extent {
            velocity[axis] = -velocity[axis];
        }
    }
    particle.velocity = velocity.into();
}
