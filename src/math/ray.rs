use glam::Vec3;

/// Slab test. Returns the entry distance, the exit distance when the origin is
/// inside the box, or -1.0 on a miss.
pub fn intersect_aabb(ray_origin: Vec3, ray_dir: Vec3, box_min: Vec3, box_max: Vec3) -> f32 {
    const EPSILON: f32 = 1e-8;

    // Near-zero direction components are clamped to a huge inverse instead of dividing by zero
    let inv_dir = Vec3::new(
        if ray_dir.x.abs() < EPSILON { 1.0 / EPSILON.copysign(ray_dir.x) } else { 1.0 / ray_dir.x },
        if ray_dir.y.abs() < EPSILON { 1.0 / EPSILON.copysign(ray_dir.y) } else { 1.0 / ray_dir.y },
        if ray_dir.z.abs() < EPSILON { 1.0 / EPSILON.copysign(ray_dir.z) } else { 1.0 / ray_dir.z },
    );

    let t_min = (box_min - ray_origin) * inv_dir;
    let t_max = (box_max - ray_origin) * inv_dir;

    let t1 = t_min.min(t_max);
    let t2 = t_min.max(t_max);

    let t_near = t1.x.max(t1.y).max(t1.z);
    let t_far = t2.x.min(t2.y).min(t2.z);

    if t_near > t_far || t_far < 0.0 {
        return -1.0;
    }

    if t_near < 0.0 {
        if t_far > 0.001 {
            t_far
        } else {
            -1.0
        }
    } else {
        t_near
    }
}

/// Result of a Möller-Trumbore ray/triangle test
#[derive(Debug, Clone, Copy)]
pub struct TriangleHit {
    pub t: f32, // Distance along ray
    pub u: f32,
    pub v: f32,
}

/// Möller-Trumbore ray-triangle intersection, double sided
pub fn intersect_triangle(ray_origin: Vec3, ray_dir: Vec3, v0: Vec3, v1: Vec3, v2: Vec3) -> Option<TriangleHit> {
    const EPSILON: f32 = 1e-6;

    let edge1 = v1 - v0;
    let edge2 = v2 - v0;

    let h = ray_dir.cross(edge2);
    let a = edge1.dot(h);

    // Parallel to the triangle plane
    if a.abs() < EPSILON {
        return None;
    }

    let f = 1.0 / a;
    let s = ray_origin - v0;
    let u = f * s.dot(h);
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(edge1);
    let v = f * ray_dir.dot(q);
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = f * edge2.dot(q);
    if t < EPSILON {
        return None;
    }

    Some(TriangleHit { t, u, v })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intersect_aabb_hit() {
        let t = intersect_aabb(
            Vec3::ZERO,
            Vec3::X,
            Vec3::new(5.0, -1.0, -1.0),
            Vec3::new(10.0, 1.0, 1.0),
        );
        assert!((t - 5.0).abs() < 0.01);
    }

    #[test]
    fn test_intersect_aabb_miss() {
        let t = intersect_aabb(
            Vec3::ZERO,
            Vec3::X,
            Vec3::new(5.0, 2.0, 2.0),
            Vec3::new(10.0, 3.0, 3.0),
        );
        assert!(t < 0.0);
    }

    #[test]
    fn test_intersect_aabb_straight_down() {
        let t = intersect_aabb(
            Vec3::new(0.0, 100.0, 0.0),
            Vec3::NEG_Y,
            Vec3::new(-1.0, -1.0, -1.0),
            Vec3::new(1.0, 2.0, 1.0),
        );
        assert!((t - 98.0).abs() < 0.01);
    }

    fn flat_triangle() -> (Vec3, Vec3, Vec3) {
        (
            Vec3::new(-1.0, 0.0, -1.0),
            Vec3::new(1.0, 0.0, -1.0),
            Vec3::new(0.0, 0.0, 1.0),
        )
    }

    #[test]
    fn test_triangle_hit_from_above() {
        let (v0, v1, v2) = flat_triangle();
        let hit = intersect_triangle(Vec3::new(0.0, 10.0, 0.0), Vec3::NEG_Y, v0, v1, v2).unwrap();
        assert!((hit.t - 10.0).abs() < 1e-4);
    }

    #[test]
    fn test_triangle_hit_is_double_sided() {
        let (v0, v1, v2) = flat_triangle();
        // Reversed winding, same plane
        assert!(intersect_triangle(Vec3::new(0.0, 10.0, 0.0), Vec3::NEG_Y, v0, v2, v1).is_some());
    }

    #[test]
    fn test_triangle_miss_outside() {
        let (v0, v1, v2) = flat_triangle();
        assert!(intersect_triangle(Vec3::new(5.0, 10.0, 0.0), Vec3::NEG_Y, v0, v1, v2).is_none());
    }

    #[test]
    fn test_triangle_behind_ray() {
        let (v0, v1, v2) = flat_triangle();
        assert!(intersect_triangle(Vec3::new(0.0, -10.0, 0.0), Vec3::NEG_Y, v0, v1, v2).is_none());
    }

    #[test]
    fn test_triangle_parallel_ray() {
        let (v0, v1, v2) = flat_triangle();
        assert!(intersect_triangle(Vec3::new(-5.0, 0.0, 0.0), Vec3::X, v0, v1, v2).is_none());
    }
}
