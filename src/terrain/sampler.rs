use glam::Vec3;

use super::TerrainModel;
use crate::config::{BoundsHeight, SamplerConfig};
use crate::math::AABB;

/// Height reported while no terrain is available
pub const SENTINEL_HEIGHT: f32 = 0.0;

/// Walkable height at a query position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeightSample {
    pub height: f32,
    /// Whether the occupant is over/touching ground. False when no surface was found.
    pub grounded: bool,
}

impl HeightSample {
    fn sentinel() -> Self {
        Self {
            height: SENTINEL_HEIGHT,
            grounded: false,
        }
    }
}

/// Walkable-height strategy
pub trait HeightSampler {
    /// Build whatever cache the strategy needs; called once per activation
    fn prepare(&mut self, terrain: &dyn TerrainModel);

    /// Walkable height below `position` (only its XZ matters for the height)
    fn sample(&mut self, terrain: Option<&dyn TerrainModel>, position: Vec3) -> HeightSample;

    /// Most recent height returned
    fn last_height(&self) -> f32;

    /// Drop caches; the next activation recomputes them
    fn reset(&mut self);
}

/// Build the sampler a config asks for
pub fn sampler_for(config: &SamplerConfig, ray_headroom: f32) -> Box<dyn HeightSampler> {
    match *config {
        SamplerConfig::Ray => Box::new(RaySampler::new(ray_headroom)),
        SamplerConfig::Bounds { height, occupant_size } => {
            Box::new(BoundsSampler::new(height, occupant_size, ray_headroom))
        }
    }
}

/// Casts straight down from above the terrain for every query
#[derive(Debug, Clone)]
pub struct RaySampler {
    headroom: f32,
    last_height: f32,
}

impl RaySampler {
    pub fn new(headroom: f32) -> Self {
        Self {
            headroom,
            last_height: SENTINEL_HEIGHT,
        }
    }
}

impl HeightSampler for RaySampler {
    fn prepare(&mut self, terrain: &dyn TerrainModel) {
        if let Some(bounds) = terrain.bounds() {
            self.last_height = bounds.max.y;
        }
    }

    fn sample(&mut self, terrain: Option<&dyn TerrainModel>, position: Vec3) -> HeightSample {
        let Some((terrain, bounds)) = terrain.and_then(|t| t.bounds().map(|b| (t, b))) else {
            log::warn!("Height query without terrain, using sentinel height");
            return HeightSample::sentinel();
        };

        let miss = HeightSample {
            height: self.last_height,
            grounded: false,
        };
        if !bounds.contains_xz(position) {
            return miss;
        }

        let origin = Vec3::new(position.x, bounds.max.y + self.headroom, position.z);
        match terrain.raycast(origin, Vec3::NEG_Y) {
            Some(t) => {
                self.last_height = origin.y - t;
                HeightSample {
                    height: self.last_height,
                    grounded: true,
                }
            }
            // Through a hole: keep the previous height
            None => miss,
        }
    }

    fn last_height(&self) -> f32 {
        self.last_height
    }

    fn reset(&mut self) {
        self.last_height = SENTINEL_HEIGHT;
    }
}

#[derive(Debug, Clone, Copy)]
struct CachedBounds {
    bounds: AABB,
    height: f32,
    revision: u64,
}

/// Fixed walking height from the terrain box, computed once per activation
#[derive(Debug, Clone)]
pub struct BoundsSampler {
    mode: BoundsHeight,
    occupant_size: Vec3,
    headroom: f32,
    cache: Option<CachedBounds>,
    last_height: f32,
}

impl BoundsSampler {
    pub fn new(mode: BoundsHeight, occupant_size: Vec3, headroom: f32) -> Self {
        Self {
            mode,
            occupant_size,
            headroom,
            cache: None,
            last_height: SENTINEL_HEIGHT,
        }
    }

    pub fn cached_bounds(&self) -> Option<AABB> {
        self.cache.map(|c| c.bounds)
    }

    fn build_cache(&mut self, terrain: &dyn TerrainModel) -> Option<CachedBounds> {
        let Some(bounds) = terrain.bounds() else {
            log::warn!("Terrain has no geometry yet, cannot size walking height");
            return None;
        };

        let height = match self.mode {
            BoundsHeight::MaxY => bounds.max.y,
            BoundsHeight::CenterRay => {
                let center = bounds.center();
                let origin = Vec3::new(center.x, bounds.max.y + self.headroom, center.z);
                terrain
                    .raycast(origin, Vec3::NEG_Y)
                    .map(|t| origin.y - t)
                    .unwrap_or(bounds.max.y)
            }
        };

        log::info!("Terrain height detected: {:.3}", height);
        let cache = CachedBounds {
            bounds,
            height,
            revision: terrain.revision(),
        };
        self.cache = Some(cache);
        Some(cache)
    }
}

impl HeightSampler for BoundsSampler {
    fn prepare(&mut self, terrain: &dyn TerrainModel) {
        self.build_cache(terrain);
    }

    fn sample(&mut self, terrain: Option<&dyn TerrainModel>, position: Vec3) -> HeightSample {
        let Some(terrain) = terrain else {
            log::warn!("Height query without terrain, using sentinel height");
            return HeightSample::sentinel();
        };

        let cache = match self.cache {
            Some(cache) if cache.revision == terrain.revision() => Some(cache),
            _ => self.build_cache(terrain),
        };
        let Some(cache) = cache else {
            return HeightSample::sentinel();
        };

        let occupant = AABB::from_center_size(position, self.occupant_size);
        self.last_height = cache.height;
        HeightSample {
            height: cache.height,
            grounded: occupant.intersects(&cache.bounds),
        }
    }

    fn last_height(&self) -> f32 {
        self.last_height
    }

    fn reset(&mut self) {
        self.cache = None;
        self.last_height = SENTINEL_HEIGHT;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain::Heightfield;
    use std::cell::Cell;

    /// Terrain wrapper counting ray casts
    struct CountingTerrain<T: TerrainModel> {
        inner: T,
        casts: Cell<usize>,
    }

    impl<T: TerrainModel> TerrainModel for CountingTerrain<T> {
        fn bounds(&self) -> Option<AABB> {
            self.inner.bounds()
        }

        fn raycast(&self, origin: Vec3, dir: Vec3) -> Option<f32> {
            self.casts.set(self.casts.get() + 1);
            self.inner.raycast(origin, dir)
        }

        fn revision(&self) -> u64 {
            self.inner.revision()
        }
    }

    fn slope() -> CountingTerrain<crate::terrain::MeshTerrain> {
        CountingTerrain {
            inner: Heightfield::from_fn(100.0, 10, |x, _| x * 0.1).into_terrain(),
            casts: Cell::new(0),
        }
    }

    #[test]
    fn test_ray_sampler_follows_surface() {
        let terrain = slope();
        let mut sampler = RaySampler::new(1000.0);
        sampler.prepare(&terrain);

        let a = sampler.sample(Some(&terrain), Vec3::new(-20.0, 50.0, 0.0));
        let b = sampler.sample(Some(&terrain), Vec3::new(20.0, 50.0, 0.0));

        assert!((a.height + 2.0).abs() < 1e-2);
        assert!((b.height - 2.0).abs() < 1e-2);
        assert!(a.grounded && b.grounded);
        assert_eq!(terrain.casts.get(), 2);
    }

    #[test]
    fn test_ray_sampler_keeps_last_height_on_miss() {
        let terrain = slope();
        let mut sampler = RaySampler::new(1000.0);

        let on = sampler.sample(Some(&terrain), Vec3::new(30.0, 0.0, 0.0));
        let off = sampler.sample(Some(&terrain), Vec3::new(500.0, 0.0, 0.0));

        assert_eq!(off.height, on.height);
        assert!(!off.grounded);
        // Off the footprint is answered without casting
        assert_eq!(terrain.casts.get(), 1);
    }

    #[test]
    fn test_ray_sampler_without_terrain_returns_sentinel() {
        let mut sampler = RaySampler::new(1000.0);
        let sample = sampler.sample(None, Vec3::ZERO);
        assert_eq!(sample.height, SENTINEL_HEIGHT);
        assert!(!sample.grounded);
    }

    #[test]
    fn test_bounds_sampler_max_y_is_fixed() {
        let terrain = slope();
        let mut sampler = BoundsSampler::new(BoundsHeight::MaxY, Vec3::new(1.0, 2.0, 1.0), 1000.0);
        sampler.prepare(&terrain);

        let a = sampler.sample(Some(&terrain), Vec3::new(-40.0, 5.0, 0.0));
        let b = sampler.sample(Some(&terrain), Vec3::new(40.0, 5.0, 0.0));

        assert_eq!(a.height, 5.0);
        assert_eq!(b.height, 5.0);
        assert_eq!(terrain.casts.get(), 0);
    }

    #[test]
    fn test_bounds_sampler_center_ray_casts_once() {
        let terrain = slope();
        let mut sampler = BoundsSampler::new(BoundsHeight::CenterRay, Vec3::new(1.0, 2.0, 1.0), 1000.0);
        sampler.prepare(&terrain);

        for i in 0..10 {
            let sample = sampler.sample(Some(&terrain), Vec3::new(i as f32, 1.0, 0.0));
            assert!(sample.height.abs() < 1e-3);
        }
        assert_eq!(terrain.casts.get(), 1);
    }

    #[test]
    fn test_bounds_sampler_ground_contact() {
        let terrain = slope();
        let mut sampler = BoundsSampler::new(BoundsHeight::MaxY, Vec3::new(1.0, 2.0, 1.0), 1000.0);
        sampler.prepare(&terrain);

        // Eye one unit above the box top: the occupant box touches it
        assert!(sampler.sample(Some(&terrain), Vec3::new(0.0, 6.0, 0.0)).grounded);
        // Walked past the footprint
        assert!(!sampler.sample(Some(&terrain), Vec3::new(80.0, 6.0, 0.0)).grounded);
    }

    #[test]
    fn test_bounds_sampler_rebuilds_after_terrain_moves() {
        let mut terrain = Heightfield::flat(10.0, 1.0).into_terrain();
        let mut sampler = BoundsSampler::new(BoundsHeight::MaxY, Vec3::ONE, 1000.0);
        sampler.prepare(&terrain);
        assert_eq!(sampler.sample(Some(&terrain), Vec3::ZERO).height, 1.0);

        terrain.translate(Vec3::new(0.0, 3.0, 0.0));

        assert_eq!(sampler.sample(Some(&terrain), Vec3::ZERO).height, 4.0);
    }

    #[test]
    fn test_bounds_sampler_lazy_without_prepare() {
        let terrain = Heightfield::flat(10.0, 2.0).into_terrain();
        let mut sampler = BoundsSampler::new(BoundsHeight::MaxY, Vec3::ONE, 1000.0);
        assert!(sampler.cached_bounds().is_none());

        assert_eq!(sampler.sample(Some(&terrain), Vec3::ZERO).height, 2.0);
        assert!(sampler.cached_bounds().is_some());

        sampler.reset();
        assert!(sampler.cached_bounds().is_none());
        assert_eq!(sampler.last_height(), SENTINEL_HEIGHT);
    }

    #[test]
    fn test_sampler_for_config() {
        let terrain = Heightfield::flat(10.0, 2.0).into_terrain();
        let mut ray = sampler_for(&SamplerConfig::Ray, 1000.0);
        let mut bounds = sampler_for(&SamplerConfig::bounds(), 1000.0);

        assert!((ray.sample(Some(&terrain), Vec3::ZERO).height - 2.0).abs() < 1e-3);
        assert_eq!(bounds.sample(Some(&terrain), Vec3::ZERO).height, 2.0);
    }
}
