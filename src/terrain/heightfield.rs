use glam::Vec3;

use super::mesh::{MeshTerrain, Triangle};

/// Regular grid of heights centered on the origin, `resolution` cells per side
#[derive(Debug, Clone)]
pub struct Heightfield {
    size: f32,
    resolution: usize,
    heights: Vec<f32>,
}

impl Heightfield {
    /// Sample `height(x, z)` at every grid vertex
    pub fn from_fn<F>(size: f32, resolution: usize, height: F) -> Self
    where
        F: Fn(f32, f32) -> f32,
    {
        let resolution = resolution.max(1);
        let verts = resolution + 1;
        let mut heights = Vec::with_capacity(verts * verts);
        for iz in 0..verts {
            for ix in 0..verts {
                let (x, z) = Self::grid_to_world(size, resolution, ix, iz);
                heights.push(height(x, z));
            }
        }
        Self {
            size,
            resolution,
            heights,
        }
    }

    pub fn flat(size: f32, height: f32) -> Self {
        Self::from_fn(size, 1, |_, _| height)
    }

    /// Rocky promontory with a low fort mound near the tip, sloping into the sea.
    /// Heights roughly match the site model: sea level around -10, mound top near 0.
    pub fn coastal_headland(size: f32, resolution: usize) -> Self {
        let half = size * 0.5;
        Self::from_fn(size, resolution, move |x, z| {
            let nx = x / half;
            let nz = z / half;
            // Ridge running along -Z, dropping off at the sides
            let ridge = (-(nx * nx) * 4.0).exp() * (1.0 - 0.5 * (nz + 1.0) * 0.5);
            // Fort mound
            let dx = nx;
            let dz = nz + 0.4;
            let mound = (-(dx * dx + dz * dz) * 18.0).exp();
            // Weathered rock
            let rough = 0.15 * (x * 0.21).sin() * (z * 0.17).cos();
            -10.0 + ridge * 7.0 + mound * 3.0 + rough
        })
    }

    fn grid_to_world(size: f32, resolution: usize, ix: usize, iz: usize) -> (f32, f32) {
        let step = size / resolution as f32;
        let half = size * 0.5;
        (ix as f32 * step - half, iz as f32 * step - half)
    }

    fn height_at_vertex(&self, ix: usize, iz: usize) -> f32 {
        self.heights[iz * (self.resolution + 1) + ix]
    }

    fn vertex(&self, ix: usize, iz: usize) -> Vec3 {
        let (x, z) = Self::grid_to_world(self.size, self.resolution, ix, iz);
        Vec3::new(x, self.height_at_vertex(ix, iz), z)
    }

    /// Two triangles per cell
    pub fn triangles(&self) -> Vec<Triangle> {
        let mut triangles = Vec::with_capacity(self.resolution * self.resolution * 2);
        for iz in 0..self.resolution {
            for ix in 0..self.resolution {
                let a = self.vertex(ix, iz);
                let b = self.vertex(ix + 1, iz);
                let c = self.vertex(ix + 1, iz + 1);
                let d = self.vertex(ix, iz + 1);
                triangles.push(Triangle::new(a, b, c));
                triangles.push(Triangle::new(a, c, d));
            }
        }
        triangles
    }

    pub fn into_terrain(self) -> MeshTerrain {
        MeshTerrain::from_triangles(self.triangles())
    }
}
