//! Ground geometry the walker stands on, and how its height is sampled.

pub mod heightfield;
pub mod mesh;
pub mod sampler;

use glam::Vec3;

use crate::math::AABB;

pub use heightfield::Heightfield;
pub use mesh::{MeshTerrain, Triangle};
pub use sampler::{sampler_for, BoundsSampler, HeightSample, HeightSampler, RaySampler, SENTINEL_HEIGHT};

/// Opaque ground handle supplied by the host
pub trait TerrainModel {
    /// World-space bounds, `None` while there is no geometry
    fn bounds(&self) -> Option<AABB>;

    /// Distance along `dir` to the first surface hit
    fn raycast(&self, origin: Vec3, dir: Vec3) -> Option<f32>;

    /// Bumped whenever the geometry moves or changes
    fn revision(&self) -> u64 {
        0
    }
}
