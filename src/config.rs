//! Engine configuration.
//!
//! `PlexusConfig` is fixed when the simulation starts, except for the
//! fields covered by [`ConfigUpdate`], which may change between frames.
//! Both types deserialize from camelCase objects so the JS host can pass
//! plain objects through `serde-wasm-bindgen`.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::geometry::{COMPONENTS, SEGMENT_FLOATS};
use crate::graph::Edge;
use crate::particles::Particle;

/// Configuration for the particle plexus simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlexusConfig {
    /// Store capacity; upper bound for buffer sizing (default: 1000).
    pub max_particle_count: usize,
    /// Active particles, `<= max_particle_count` (default: 500).
    pub particle_count: usize,
    /// Edge-formation cutoff distance (default: 135.0).
    pub min_distance: f32,
    /// Enable the per-particle connection cap (default: false).
    pub limit_connections: bool,
    /// Cap value when `limit_connections` is set (default: 20).
    pub max_connections: u32,
    /// Reflection boundary per axis (default: 500.0).
    pub volume_half_extent: f32,
    /// Point cloud visibility, forwarded to the backend (default: true).
    pub show_points: bool,
    /// Line mesh visibility, forwarded to the backend (default: true).
    pub show_lines: bool,
    /// Line buffer capacity in segments (default: `max_particle_count²`).
    pub segment_capacity: Option<usize>,
    /// RNG seed for particle placement (default: host entropy).
    pub seed: Option<u64>,
}

impl Default for PlexusConfig {
    fn default() -> Self {
        Self {
            max_particle_count: 1000,
            particle_count: 500,
            min_distance: 135.0,
            limit_connections: false,
            max_connections: 20,
            volume_half_extent: 500.0,
            show_points: true,
            show_lines: true,
            segment_capacity: None,
            seed: None,
        }
    }
}

impl PlexusConfig {
    /// Create a config with the given capacity and active count, other
    /// fields at their defaults.
    pub fn with_counts(max_particle_count: usize, particle_count: usize) -> Self {
        Self {
            max_particle_count,
            particle_count,
            ..Self::default()
        }
    }

    /// Line buffer capacity in segments, resolving the default.
    ///
    /// Returns `None` when `max_particle_count²` overflows.
    pub fn resolved_segment_capacity(&self) -> Option<usize> {
        match self.segment_capacity {
            Some(capacity) => Some(capacity),
            None => self.max_particle_count.checked_mul(self.max_particle_count),
        }
    }

    /// Largest edge count any frame can produce under this config.
    ///
    /// All pairs of the full store, or `⌊n·maxConnections/2⌋` when the cap
    /// is on, since every edge raises two counts that never exceed the cap.
    pub fn worst_case_segments(&self) -> Option<usize> {
        let n = self.max_particle_count;
        let all_pairs = n.checked_mul(n.saturating_sub(1))? / 2;
        if !self.limit_connections {
            return Some(all_pairs);
        }
        let capped = n.checked_mul(self.max_connections as usize)? / 2;
        Some(all_pairs.min(capped))
    }

    /// Check every capacity, threshold and count relationship.
    pub fn validate(&self) -> Result<()> {
        if self.particle_count > self.max_particle_count {
            return Err(Error::configuration(format!(
                "particleCount {} exceeds maxParticleCount {}",
                self.particle_count, self.max_particle_count
            )));
        }

        if !self.volume_half_extent.is_finite() || self.volume_half_extent < 0.0 {
            return Err(Error::configuration(format!(
                "volumeHalfExtent must be finite and non-negative, got {}",
                self.volume_half_extent
            )));
        }

        if self.min_distance.is_nan() {
            return Err(Error::configuration("minDistance must not be NaN"));
        }

        let n = self.max_particle_count;
        if !fits_allocation(n, size_of::<Particle>())
            || !fits_allocation(n, COMPONENTS * size_of::<f32>())
        {
            return Err(Error::configuration(format!(
                "maxParticleCount {n} is too large for the particle store"
            )));
        }

        let capacity = self.resolved_segment_capacity().ok_or_else(|| {
            Error::configuration(format!(
                "maxParticleCount {} overflows the default segment capacity",
                self.max_particle_count
            ))
        })?;

        if !fits_allocation(capacity, SEGMENT_FLOATS * size_of::<f32>())
            || !fits_allocation(capacity, size_of::<Edge>())
        {
            return Err(Error::configuration(format!(
                "segmentCapacity {capacity} is too large for the line buffers"
            )));
        }

        let worst_case = self.worst_case_segments().ok_or_else(|| {
            Error::configuration("worst-case segment count overflows")
        })?;

        if capacity < worst_case {
            return Err(Error::configuration(format!(
                "segmentCapacity {capacity} is below the worst case of {worst_case} segments"
            )));
        }

        Ok(())
    }

    /// Merge a runtime update into a copy of this config and validate it.
    ///
    /// The receiver is left untouched, so a rejected update changes nothing.
    pub fn merged(&self, update: &ConfigUpdate) -> Result<Self> {
        let mut next = self.clone();
        if let Some(count) = update.particle_count {
            next.particle_count = count;
        }
        if let Some(distance) = update.min_distance {
            next.min_distance = distance;
        }
        if let Some(limit) = update.limit_connections {
            next.limit_connections = limit;
        }
        if let Some(max) = update.max_connections {
            next.max_connections = max;
        }
        if let Some(show) = update.show_points {
            next.show_points = show;
        }
        if let Some(show) = update.show_lines {
            next.show_lines = show;
        }
        next.validate()?;
        Ok(next)
    }
}

/// Whether `count` elements of `size` bytes stay within the allocator's
/// `isize::MAX` byte limit.
fn fits_allocation(count: usize, size: usize) -> bool {
    count
        .checked_mul(size)
        .is_some_and(|bytes| bytes <= isize::MAX as usize)
}

/// Settings that may change between frames.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConfigUpdate {
    pub particle_count: Option<usize>,
    pub min_distance: Option<f32>,
    pub limit_connections: Option<bool>,
    pub max_connections: Option<u32>,
    pub show_points: Option<bool>,
    pub show_lines: Option<bool>,
}

impl ConfigUpdate {
    /// Whether the update changes nothing.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = PlexusConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.resolved_segment_capacity(), Some(1_000_000));
        assert_eq!(config.worst_case_segments(), Some(499_500));
    }

    #[test]
    fn test_rejects_count_above_capacity() {
        let config = PlexusConfig::with_counts(10, 11);
        let err = config.validate().unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_accepts_empty_store() {
        assert!(PlexusConfig::with_counts(0, 0).validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_half_extent() {
        let mut config = PlexusConfig::default();
        config.volume_half_extent = -1.0;
        assert!(config.validate().is_err());

        config.volume_half_extent = f32::INFINITY;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_nonpositive_distance_is_allowed() {
        let mut config = PlexusConfig::default();
        config.min_distance = 0.0;
        assert!(config.validate().is_ok());
        config.min_distance = -5.0;
        assert!(config.validate().is_ok());
        config.min_distance = f32::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_segment_capacity_must_cover_worst_case() {
        let mut config = PlexusConfig::with_counts(10, 10);
        config.segment_capacity = Some(44);
        assert!(config.validate().is_err());

        config.segment_capacity = Some(45);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_connection_cap_lowers_worst_case() {
        let mut config = PlexusConfig::with_counts(10, 10);
        config.limit_connections = true;
        config.max_connections = 2;
        config.segment_capacity = Some(10);
        assert_eq!(config.worst_case_segments(), Some(10));
        assert!(config.validate().is_ok());

        // Turning the cap off needs room for all pairs again
        let update = ConfigUpdate {
            limit_connections: Some(false),
            ..ConfigUpdate::default()
        };
        assert!(config.merged(&update).is_err());
    }

    #[test]
    fn test_overflowing_capacity_is_rejected() {
        let config = PlexusConfig::with_counts(usize::MAX, 0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_segment_capacity_beyond_byte_limit_is_rejected() {
        let mut config = PlexusConfig::with_counts(1, 0);
        config.segment_capacity = Some(usize::MAX / 8);
        let err = config.validate().unwrap_err();
        assert!(err.is_configuration());

        // Element count fits, byte size does not
        config.segment_capacity = Some(isize::MAX as usize / SEGMENT_FLOATS);
        assert!(config.validate().unwrap_err().is_configuration());
    }

    #[test]
    fn test_particle_capacity_beyond_byte_limit_is_rejected() {
        let mut config = PlexusConfig::with_counts(isize::MAX as usize / 4, 0);
        config.segment_capacity = Some(0);
        assert!(config.validate().unwrap_err().is_configuration());
    }

    #[test]
    fn test_merged_leaves_original_on_error() {
        let config = PlexusConfig::with_counts(10, 5);
        let update = ConfigUpdate {
            particle_count: Some(20),
            min_distance: Some(10.0),
            ..ConfigUpdate::default()
        };
        assert!(config.merged(&update).is_err());
        assert_eq!(config.particle_count, 5);
        assert_eq!(config.min_distance, 135.0);
    }

    #[test]
    fn test_merged_applies_fields() {
        let config = PlexusConfig::with_counts(10, 5);
        let update = ConfigUpdate {
            particle_count: Some(8),
            limit_connections: Some(true),
            max_connections: Some(3),
            show_lines: Some(false),
            ..ConfigUpdate::default()
        };
        let next = config.merged(&update).unwrap();
        assert_eq!(next.particle_count, 8);
        assert!(next.limit_connections);
        assert_eq!(next.max_connections, 3);
        assert!(!next.show_lines);
        assert!(next.show_points);
    }

    #[test]
    fn test_deserialize_camel_case_with_defaults() {
        let config: PlexusConfig = serde_json::from_str(
            r#"{ "maxParticleCount": 200, "particleCount": 50, "minDistance": 80.5, "seed": 7 }"#,
        )
        .unwrap();
        assert_eq!(config.max_particle_count, 200);
        assert_eq!(config.particle_count, 50);
        assert_eq!(config.min_distance, 80.5);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.volume_half_extent, 500.0);
        assert!(!config.limit_connections);
    }

    #[test]
    fn test_update_is_empty() {
        assert!(ConfigUpdate::default().is_empty());
        let update: ConfigUpdate = serde_json::from_str(r#"{ "showPoints": false }"#).unwrap();
        assert!(!update.is_empty());
        assert_eq!(update.show_points, Some(false));
    }
}
