use glam::Vec3;

use super::TerrainModel;
use crate::core::bvh::{BVHNode, BVHPrimitive};
use crate::math::{intersect_triangle, AABB};

/// Ground triangle in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub v0: Vec3,
    pub v1: Vec3,
    pub v2: Vec3,
}

impl Triangle {
    pub fn new(v0: Vec3, v1: Vec3, v2: Vec3) -> Self {
        Self { v0, v1, v2 }
    }

    pub fn intersect(&self, origin: Vec3, dir: Vec3) -> Option<f32> {
        intersect_triangle(origin, dir, self.v0, self.v1, self.v2).map(|hit| hit.t)
    }
}

impl BVHPrimitive for Triangle {
    fn bounds(&self) -> AABB {
        AABB::new(
            self.v0.min(self.v1).min(self.v2),
            self.v0.max(self.v1).max(self.v2),
        )
    }
}

/// Triangle-soup terrain with a BVH for downward rays
#[derive(Debug, Clone)]
pub struct MeshTerrain {
    triangles: Vec<Triangle>,
    bvh: Option<BVHNode>,
    revision: u64,
}

impl MeshTerrain {
    pub fn from_triangles(triangles: Vec<Triangle>) -> Self {
        let bvh = BVHNode::build(&triangles);
        if let Some(bvh) = &bvh {
            let stats = bvh.stats();
            log::debug!(
                "Terrain BVH: {} triangles, {} nodes, depth {}, {:.1} per leaf",
                stats.total_primitives,
                stats.num_nodes,
                stats.max_depth,
                stats.avg_leaf_size
            );
        }
        Self {
            triangles,
            bvh,
            revision: 0,
        }
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Move the whole model; invalidates cached samplers via the revision
    pub fn translate(&mut self, offset: Vec3) {
        for tri in &mut self.triangles {
            tri.v0 += offset;
            tri.v1 += offset;
            tri.v2 += offset;
        }
        self.bvh = BVHNode::build(&self.triangles);
        self.revision += 1;
    }
}

impl TerrainModel for MeshTerrain {
    fn bounds(&self) -> Option<AABB> {
        self.bvh.as_ref().map(|bvh| *bvh.bounds())
    }

    fn raycast(&self, origin: Vec3, dir: Vec3) -> Option<f32> {
        let bvh = self.bvh.as_ref()?;
        bvh.closest_hit(origin, dir, &|idx| self.triangles[idx as usize].intersect(origin, dir))
            .map(|(_, t)| t)
    }

    fn revision(&self) -> u64 {
        self.revision
    }
}
