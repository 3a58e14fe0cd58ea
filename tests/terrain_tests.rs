use glam::Vec3;
use castro_walk::config::{BoundsHeight, SamplerConfig};
use castro_walk::loaders::load_gltf_terrain;
use castro_walk::math::AABB;
use castro_walk::terrain::{
    sampler_for, BoundsSampler, HeightSampler, Heightfield, RaySampler, TerrainModel, SENTINEL_HEIGHT,
};

/// One triangle spanning x in [-10, 10], z in [-10, 10], lifted 5 units by its node
const TRIANGLE_GLTF: &str = r#"{
  "asset": { "version": "2.0" },
  "scene": 0,
  "scenes": [{ "nodes": [0] }],
  "nodes": [{ "mesh": 0, "translation": [0.0, 5.0, 0.0] }],
  "meshes": [{ "primitives": [{ "attributes": { "POSITION": 0 } }] }],
  "accessors": [{
    "bufferView": 0,
    "componentType": 5126,
    "count": 3,
    "type": "VEC3",
    "min": [-10.0, 0.0, -10.0],
    "max": [10.0, 0.0, 10.0]
  }],
  "bufferViews": [{ "buffer": 0, "byteLength": 36 }],
  "buffers": [{
    "byteLength": 36,
    "uri": "data:application/octet-stream;base64,AAAgwQAAAAAAACDBAAAAAAAAAAAAACBBAAAgQQAAAAAAACDB"
  }]
}"#;

fn write_temp(name: &str, contents: &str) -> std::path::PathBuf {
    let path = std::env::temp_dir().join(format!("castro-walk-{}-{}", std::process::id(), name));
    std::fs::write(&path, contents).unwrap();
    path
}

#[cfg(test)]
mod gltf_terrain_tests {
    use super::*;

    #[test]
    fn test_node_transform_applied() {
        let path = write_temp("triangle.gltf", TRIANGLE_GLTF);
        let terrain = load_gltf_terrain(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(terrain.triangle_count(), 1);
        let bounds = terrain.bounds().unwrap();
        assert_eq!(bounds.min.y, 5.0);
        assert_eq!(bounds.max.y, 5.0);

        let t = terrain.raycast(Vec3::new(0.0, 100.0, 0.0), Vec3::NEG_Y).unwrap();
        assert!((t - 95.0).abs() < 1e-4);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let path = write_temp("broken.gltf", "{ not gltf");
        let result = load_gltf_terrain(&path);
        let _ = std::fs::remove_file(&path);

        assert!(result.is_err());
    }
}

#[cfg(test)]
mod mesh_raycast_tests {
    use super::*;

    #[test]
    fn test_bvh_matches_brute_force() {
        let terrain = Heightfield::coastal_headland(200.0, 48).into_terrain();

        for i in 0..50 {
            let x = -95.0 + (i as f32 * 37.0) % 190.0;
            let z = -95.0 + (i as f32 * 53.0) % 190.0;
            let origin = Vec3::new(x, 500.0, z);

            let brute = terrain
                .triangles()
                .iter()
                .filter_map(|tri| tri.intersect(origin, Vec3::NEG_Y))
                .fold(f32::INFINITY, f32::min);
            let fast = terrain.raycast(origin, Vec3::NEG_Y).unwrap();

            assert!((brute - fast).abs() < 1e-3, "mismatch at ({}, {})", x, z);
        }
    }

    #[test]
    fn test_mesh_follows_height_function_near_grid_vertices() {
        let height = |x: f32, z: f32| 2.0 * (x * 0.05).sin() + 0.02 * z;
        // 400 / 64 = 6.25 units per cell, so (-75, -81.25) is a grid vertex
        let terrain = Heightfield::from_fn(400.0, 64, height).into_terrain();

        let t = terrain.raycast(Vec3::new(-74.9, 200.0, -81.2), Vec3::NEG_Y).unwrap();

        assert!(((200.0 - t) - height(-74.9, -81.2)).abs() < 0.05);
    }
}

#[cfg(test)]
mod sampler_strategy_tests {
    use super::*;

    #[test]
    fn test_strategies_agree_on_flat_ground() {
        let terrain = Heightfield::flat(50.0, -3.0).into_terrain();
        let mut ray = RaySampler::new(1000.0);
        let mut bounds = BoundsSampler::new(BoundsHeight::MaxY, Vec3::new(1.0, 2.0, 1.0), 1000.0);
        ray.prepare(&terrain);
        bounds.prepare(&terrain);

        for x in [-20.0, -5.0, 0.0, 12.5, 24.0] {
            let p = Vec3::new(x, -2.0, x * 0.5);
            let a = ray.sample(Some(&terrain), p).height;
            let b = bounds.sample(Some(&terrain), p).height;
            assert!((a - b).abs() < 1e-3);
        }
    }

    #[test]
    fn test_bounds_sampler_overestimates_on_slopes() {
        let terrain = Heightfield::coastal_headland(400.0, 64).into_terrain();
        let mut ray = sampler_for(&SamplerConfig::Ray, 1000.0);
        let mut bounds = sampler_for(&SamplerConfig::bounds(), 1000.0);
        ray.prepare(&terrain);
        bounds.prepare(&terrain);

        let shore = Vec3::new(180.0, 0.0, 0.0);
        let exact = ray.sample(Some(&terrain), shore).height;
        let boxed = bounds.sample(Some(&terrain), shore).height;

        assert!(boxed > exact);
        assert_eq!(boxed, terrain.bounds().unwrap().max.y);
    }

    #[test]
    fn test_center_ray_height_sits_on_surface() {
        let terrain = Heightfield::coastal_headland(400.0, 64).into_terrain();
        let center_height = 1000.0 - terrain.raycast(Vec3::new(0.0, 1000.0, 0.0), Vec3::NEG_Y).unwrap();
        let mut sampler = BoundsSampler::new(BoundsHeight::CenterRay, Vec3::ONE, 1000.0);
        sampler.prepare(&terrain);

        let height = sampler.sample(Some(&terrain), Vec3::new(150.0, 0.0, 150.0)).height;

        assert!((height - center_height).abs() < 0.5);
    }

    #[test]
    fn test_no_terrain_gives_sentinel_for_every_strategy() {
        for config in [SamplerConfig::Ray, SamplerConfig::bounds()] {
            let mut sampler = sampler_for(&config, 1000.0);
            let sample = sampler.sample(None, Vec3::new(3.0, 4.0, 5.0));
            assert_eq!(sample.height, SENTINEL_HEIGHT);
            assert!(!sample.grounded);
        }
    }

    #[test]
    fn test_occupant_box_contact() {
        let ground = AABB::new(Vec3::new(-10.0, -1.0, -10.0), Vec3::new(10.0, 0.0, 10.0));
        // Eye one unit above the top: box bottom touches the ground box
        let standing = AABB::from_center_size(Vec3::new(0.0, 1.0, 0.0), Vec3::new(1.0, 2.0, 1.0));
        let floating = AABB::from_center_size(Vec3::new(0.0, 3.0, 0.0), Vec3::new(1.0, 2.0, 1.0));

        assert!(standing.intersects(&ground));
        assert!(!floating.intersects(&ground));
    }
}
