use glam::{IVec3, Vec3};

use blockworld_common::{BlockKind, VoxelCoord};
use blockworld_kernel::Block;

/// Half the edge length of a voxel cube.
const HALF_EXTENT: f32 = 0.5;

/// A half-line with a unit direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Build a ray, normalizing `direction`.
    ///
    /// A zero-length direction is a caller error.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        debug_assert!(
            direction.length_squared() > f32::EPSILON,
            "degenerate ray direction {direction:?}"
        );
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    pub fn down(origin: Vec3) -> Self {
        Self {
            origin,
            direction: Vec3::NEG_Y,
        }
    }

    pub fn up(origin: Vec3) -> Self {
        Self {
            origin,
            direction: Vec3::Y,
        }
    }

    pub fn at(&self, distance: f32) -> Vec3 {
        self.origin + self.direction * distance
    }
}

/// The nearest block struck by a ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub coord: VoxelCoord,
    pub kind: BlockKind,
    pub distance: f32,
    /// Outward normal of the struck face.
    pub normal: IVec3,
    pub point: Vec3,
}

impl RayHit {
    /// The voxel sharing the struck face, where a new block would be placed.
    pub fn adjacent(&self) -> VoxelCoord {
        self.coord.offset(self.normal)
    }
}

/// Intersect `ray` with the unit cube centered on `coord`.
///
/// Faces are double-sided: a ray starting inside the cube strikes the face it
/// exits through. Returns the distance and the struck face's outward normal.
pub fn intersect_voxel(ray: &Ray, coord: VoxelCoord) -> Option<(f32, IVec3)> {
    let center = coord.center();
    let mut t_near = f32::NEG_INFINITY;
    let mut t_far = f32::INFINITY;
    let mut near_axis = 0;
    let mut far_axis = 0;

    for axis in 0..3 {
        let o = ray.origin[axis];
        let d = ray.direction[axis];
        let min = center[axis] - HALF_EXTENT;
        let max = center[axis] + HALF_EXTENT;
        if d == 0.0 {
            // Parallel to this slab: either always inside it or never.
            if o < min || o > max {
                return None;
            }
            continue;
        }
        let inv = 1.0 / d;
        let (t0, t1) = {
            let a = (min - o) * inv;
            let b = (max - o) * inv;
            if a <= b { (a, b) } else { (b, a) }
        };
        if t0 > t_near {
            t_near = t0;
            near_axis = axis;
        }
        if t1 < t_far {
            t_far = t1;
            far_axis = axis;
        }
        if t_near > t_far {
            return None;
        }
    }

    if t_far < 0.0 {
        return None;
    }

    let axis_normal = |axis: usize, sign: f32| {
        let mut n = IVec3::ZERO;
        n[axis] = sign as i32;
        n
    };

    if t_near >= 0.0 {
        // Entering face points back against the ray.
        let sign = -ray.direction[near_axis].signum();
        Some((t_near, axis_normal(near_axis, sign)))
    } else {
        let sign = ray.direction[far_axis].signum();
        Some((t_far, axis_normal(far_axis, sign)))
    }
}

/// The nearest block along `ray` among `candidates`.
///
/// Closest distance wins; on an exact tie the earliest candidate is kept, so
/// results are deterministic for a deterministic candidate order.
pub fn nearest_hit<'a>(ray: &Ray, candidates: impl IntoIterator<Item = &'a Block>) -> Option<RayHit> {
    let mut best: Option<RayHit> = None;
    for block in candidates {
        let Some((distance, normal)) = intersect_voxel(ray, block.coord) else {
            continue;
        };
        if best.is_none_or(|b| distance < b.distance) {
            best = Some(RayHit {
                coord: block.coord,
                kind: block.kind,
                distance,
                normal,
                point: ray.at(distance),
            });
        }
    }
    best
}
