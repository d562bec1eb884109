//! Particle state.
//!
//! Each particle has:
//! - A position in simulation space
//! - A constant-magnitude velocity, reflected at the volume boundary
//! - The number of edges it formed in the current frame

use glam::Vec3;
use rand::Rng;

/// A single particle slot in the store.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Particle {
    /// Current position.
    pub position: Vec3,
    /// Displacement applied every frame.
    pub velocity: Vec3,
    /// Edges formed this frame. Reset by the graph builder.
    pub connections: u32,
}

impl Particle {
    /// Create a particle with no connections.
    #[inline]
    pub fn new(position: Vec3, velocity: Vec3) -> Self {
        Self {
            position,
            velocity,
            connections: 0,
        }
    }

    /// Create a particle at rest.
    #[inline]
    pub fn at(position: Vec3) -> Self {
        Self::new(position, Vec3::ZERO)
    }

    /// Place a particle uniformly in the cube of half-extent `half_extent`
    /// with a velocity uniform in `[-0.5, 0.5)` per axis.
    pub fn random<R: Rng + ?Sized>(rng: &mut R, half_extent: f32) -> Self {
        // Scale a unit offset so extents near f32::MAX stay finite
        let position = Vec3::new(
            (rng.r#gen::<f32>() * 2.0 - 1.0) * half_extent,
            (rng.r#gen::<f32>() * 2.0 - 1.0) * half_extent,
            (rng.r#gen::<f32>() * 2.0 - 1.0) * half_extent,
        );
        let velocity = Vec3::new(
            rng.r#gen::<f32>() - 0.5,
            rng.r#gen::<f32>() - 0.5,
            rng.r#gen::<f32>() - 0.5,
        );
        Self::new(position, velocity)
    }

    /// Euclidean distance to another particle.
    #[inline]
    pub fn distance(&self, other: &Particle) -> f32 {
        self.position.distance(other.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_random_stays_in_bounds() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..1000 {
            let p = Particle::random(&mut rng, 500.0);
            assert!(p.position.abs().max_element() <= 500.0);
            assert!(p.velocity.min_element() >= -0.5);
            assert!(p.velocity.max_element() < 0.5);
            assert_eq!(p.connections, 0);
        }
    }

    #[test]
    fn test_random_huge_extent_stays_finite() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let p = Particle::random(&mut rng, 3.0e38);
            assert!(p.position.is_finite());
            assert!(p.position.abs().max_element() <= 3.0e38);
        }
    }

    #[test]
    fn test_random_zero_extent() {
        let mut rng = StdRng::seed_from_u64(1);
        let p = Particle::random(&mut rng, 0.0);
        assert_eq!(p.position, Vec3::ZERO);
    }

    #[test]
    fn test_distance() {
        let a = Particle::at(Vec3::ZERO);
        let b = Particle::at(Vec3::new(3.0, 4.0, 0.0));
        assert_eq!(a.distance(&b), 5.0);
        assert_eq!(b.distance(&a), 5.0);
    }
}
