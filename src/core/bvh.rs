use crate::math::{intersect_aabb, AABB};
use glam::Vec3;

/// Maximum primitives per leaf node before splitting
const MAX_LEAF_SIZE: usize = 4;

/// Number of SAH buckets for binned building
const SAH_BUCKETS: usize = 12;

/// Bounding volume hierarchy over primitive indices
#[derive(Clone, Debug)]
pub enum BVHNode {
    Leaf {
        bounds: AABB,
        primitive_indices: Vec<u32>,
    },
    Internal {
        bounds: AABB,
        left: Box<BVHNode>,
        right: Box<BVHNode>,
    },
}

/// Primitive trait for objects that can be inserted into BVH
pub trait BVHPrimitive {
    fn bounds(&self) -> AABB;
    fn centroid(&self) -> Vec3 {
        self.bounds().center()
    }
}

/// BVH build statistics, logged when terrain is loaded
#[derive(Debug, Clone, Copy)]
pub struct BVHStats {
    pub num_nodes: usize,
    pub num_leaves: usize,
    pub max_depth: usize,
    pub total_primitives: usize,
    pub avg_leaf_size: f32,
}

impl BVHNode {
    /// Build BVH using SAH (Surface Area Heuristic). Returns `None` for no primitives.
    pub fn build<P: BVHPrimitive>(primitives: &[P]) -> Option<Self> {
        if primitives.is_empty() {
            return None;
        }
        let indices: Vec<u32> = (0..primitives.len() as u32).collect();
        Some(Self::build_recursive(primitives, indices, 0))
    }

    fn build_recursive<P: BVHPrimitive>(primitives: &[P], mut indices: Vec<u32>, depth: usize) -> Self {
        let bounds = indices.iter().fold(primitives[indices[0] as usize].bounds(), |acc, &idx| {
            acc.union(&primitives[idx as usize].bounds())
        });

        if indices.len() <= MAX_LEAF_SIZE {
            return BVHNode::Leaf {
                bounds,
                primitive_indices: indices,
            };
        }

        let (split_axis, split_pos) = Self::find_best_split(primitives, &indices, &bounds);
        let mid = Self::partition_primitives(primitives, &mut indices, split_axis, split_pos);

        // Degenerate partition, keep everything in one leaf
        if mid == 0 || mid == indices.len() {
            return BVHNode::Leaf {
                bounds,
                primitive_indices: indices,
            };
        }

        let right_indices = indices.split_off(mid);
        let left = Box::new(Self::build_recursive(primitives, indices, depth + 1));
        let right = Box::new(Self::build_recursive(primitives, right_indices, depth + 1));

        BVHNode::Internal { bounds, left, right }
    }

    fn find_best_split<P: BVHPrimitive>(primitives: &[P], indices: &[u32], bounds: &AABB) -> (usize, f32) {
        let mut best_cost = f32::INFINITY;
        let mut best_axis = 0;
        let mut best_pos = 0.0;

        for axis in 0..3 {
            let (cost, pos) = Self::evaluate_sah_axis(primitives, indices, bounds, axis);
            if cost < best_cost {
                best_cost = cost;
                best_axis = axis;
                best_pos = pos;
            }
        }

        (best_axis, best_pos)
    }

    /// Evaluate SAH cost for a given axis using binning
    fn evaluate_sah_axis<P: BVHPrimitive>(
        primitives: &[P],
        indices: &[u32],
        bounds: &AABB,
        axis: usize,
    ) -> (f32, f32) {
        let mut bucket_bounds: Vec<Option<AABB>> = vec![None; SAH_BUCKETS];
        let mut bucket_counts = vec![0; SAH_BUCKETS];

        let extent = bounds.max - bounds.min;
        let axis_extent = extent[axis];

        if axis_extent < 1e-6 {
            return (f32::INFINITY, 0.0);
        }

        for &idx in indices {
            let centroid = primitives[idx as usize].centroid();
            let offset = (centroid[axis] - bounds.min[axis]) / axis_extent;
            let bucket_idx = ((offset * SAH_BUCKETS as f32) as usize).min(SAH_BUCKETS - 1);
            bucket_counts[bucket_idx] += 1;
            let prim_bounds = primitives[idx as usize].bounds();
            bucket_bounds[bucket_idx] = Some(match bucket_bounds[bucket_idx] {
                Some(b) => b.union(&prim_bounds),
                None => prim_bounds,
            });
        }

        let mut best_cost = f32::INFINITY;
        let mut best_split = 0;

        for split in 1..SAH_BUCKETS {
            let (left_bounds, left_count) = Self::accumulate_buckets(&bucket_bounds, &bucket_counts, 0, split);
            let (right_bounds, right_count) =
                Self::accumulate_buckets(&bucket_bounds, &bucket_counts, split, SAH_BUCKETS);

            if let (Some(lb), Some(rb)) = (left_bounds, right_bounds) {
                let cost = Self::sah_cost(lb.surface_area(), left_count, rb.surface_area(), right_count);
                if cost < best_cost {
                    best_cost = cost;
                    best_split = split;
                }
            }
        }

        let split_pos = bounds.min[axis] + (best_split as f32 / SAH_BUCKETS as f32) * axis_extent;

        (best_cost, split_pos)
    }

    fn accumulate_buckets(
        bucket_bounds: &[Option<AABB>],
        bucket_counts: &[usize],
        start: usize,
        end: usize,
    ) -> (Option<AABB>, usize) {
        let mut combined_bounds: Option<AABB> = None;
        let mut total_count = 0;

        for i in start..end {
            if let Some(bounds) = bucket_bounds[i] {
                combined_bounds = Some(match combined_bounds {
                    Some(b) => b.union(&bounds),
                    None => bounds,
                });
                total_count += bucket_counts[i];
            }
        }

        (combined_bounds, total_count)
    }

    fn sah_cost(left_area: f32, left_count: usize, right_area: f32, right_count: usize) -> f32 {
        const TRAVERSAL_COST: f32 = 0.125;
        const INTERSECTION_COST: f32 = 1.0;

        TRAVERSAL_COST + INTERSECTION_COST * (left_area * left_count as f32 + right_area * right_count as f32)
    }

    fn partition_primitives<P: BVHPrimitive>(
        primitives: &[P],
        indices: &mut [u32],
        axis: usize,
        split_pos: f32,
    ) -> usize {
        let mut left = 0;
        let mut right = indices.len();

        while left < right {
            let centroid = primitives[indices[left] as usize].centroid();
            if centroid[axis] < split_pos {
                left += 1;
            } else {
                right -= 1;
                indices.swap(left, right);
            }
        }

        left
    }

    pub fn bounds(&self) -> &AABB {
        match self {
            BVHNode::Leaf { bounds, .. } => bounds,
            BVHNode::Internal { bounds, .. } => bounds,
        }
    }

    /// Closest hit along the ray. `hit` tests one primitive and returns its distance.
    pub fn closest_hit<F>(&self, origin: Vec3, dir: Vec3, hit: &F) -> Option<(u32, f32)>
    where
        F: Fn(u32) -> Option<f32>,
    {
        let mut best: Option<(u32, f32)> = None;
        self.closest_hit_recursive(origin, dir, hit, &mut best);
        best
    }

    fn closest_hit_recursive<F>(&self, origin: Vec3, dir: Vec3, hit: &F, best: &mut Option<(u32, f32)>)
    where
        F: Fn(u32) -> Option<f32>,
    {
        let bounds = self.bounds();
        if !contains(bounds, origin) {
            let t_box = intersect_aabb(origin, dir, bounds.min, bounds.max);
            if t_box < 0.0 {
                return;
            }
            if let Some((_, best_t)) = *best {
                if t_box > best_t {
                    return;
                }
            }
        }

        match self {
            BVHNode::Leaf { primitive_indices, .. } => {
                for &idx in primitive_indices {
                    if let Some(t) = hit(idx) {
                        if best.map_or(true, |(_, best_t)| t < best_t) {
                            *best = Some((idx, t));
                        }
                    }
                }
            }
            BVHNode::Internal { left, right, .. } => {
                left.closest_hit_recursive(origin, dir, hit, best);
                right.closest_hit_recursive(origin, dir, hit, best);
            }
        }
    }

    pub fn stats(&self) -> BVHStats {
        let mut stats = BVHStats {
            num_nodes: 0,
            num_leaves: 0,
            max_depth: 0,
            total_primitives: 0,
            avg_leaf_size: 0.0,
        };

        self.gather_stats(&mut stats, 0);

        if stats.num_leaves > 0 {
            stats.avg_leaf_size = stats.total_primitives as f32 / stats.num_leaves as f32;
        }

        stats
    }

    fn gather_stats(&self, stats: &mut BVHStats, depth: usize) {
        stats.num_nodes += 1;
        stats.max_depth = stats.max_depth.max(depth);

        match self {
            BVHNode::Leaf { primitive_indices, .. } => {
                stats.num_leaves += 1;
                stats.total_primitives += primitive_indices.len();
            }
            BVHNode::Internal { left, right, .. } => {
                left.gather_stats(stats, depth + 1);
                right.gather_stats(stats, depth + 1);
            }
        }
    }
}

fn contains(bounds: &AABB, p: Vec3) -> bool {
    p.cmpge(bounds.min).all() && p.cmple(bounds.max).all()
}
