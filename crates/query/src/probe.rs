use glam::Vec3;

use blockworld_common::PhysicsConfig;
use blockworld_kernel::BlockRegistry;

use crate::ray::{Ray, RayHit, nearest_hit};

/// Result of the multi-sample ground probe.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundContact {
    /// Whether the nearest surface below is within contact distance.
    pub colliding: bool,
    /// Nearest hit across all samples, if any sample struck a block.
    pub hit: Option<RayHit>,
}

impl GroundContact {
    /// Distance to the nearest surface below, or infinity when nothing is below.
    pub fn distance(&self) -> f32 {
        self.hit.map_or(f32::INFINITY, |h| h.distance)
    }

    /// Height of the surface the player would stand on.
    pub fn surface_y(&self) -> Option<f32> {
        self.hit.map(|h| h.point.y)
    }
}

/// The block under the reticle, if within interaction range.
pub fn target(
    registry: &BlockRegistry,
    origin: Vec3,
    direction: Vec3,
    config: &PhysicsConfig,
) -> Option<RayHit> {
    let ray = Ray::new(origin, direction);
    nearest_hit(&ray, registry.blocks()).filter(|hit| hit.distance <= config.interaction_range)
}

/// Probe for ground below a player whose eye is at `eye`.
///
/// Casts down from the center and the four corners of the square inscribed
/// at player radius, starting just above the feet. Sampling the corners keeps
/// a player standing on a block edge from reading as airborne.
pub fn ground(registry: &BlockRegistry, eye: Vec3, config: &PhysicsConfig) -> GroundContact {
    let r = config.player_radius;
    let feet_y = eye.y - (config.floor_offset - config.ground_probe_margin);
    let samples = [
        Vec3::new(0.0, 0.0, 0.0),
        Vec3::new(r, 0.0, r),
        Vec3::new(-r, 0.0, r),
        Vec3::new(r, 0.0, -r),
        Vec3::new(-r, 0.0, -r),
    ];

    let mut nearest: Option<RayHit> = None;
    for offset in samples {
        let origin = Vec3::new(eye.x + offset.x, feet_y, eye.z + offset.z);
        let hit = nearest_hit(&Ray::down(origin), registry.blocks());
        if let Some(hit) = hit.filter(|h| nearest.is_none_or(|n| h.distance < n.distance)) {
            nearest = Some(hit);
        }
    }

    let contact = GroundContact {
        colliding: nearest.is_some_and(|h| h.distance <= config.ground_contact_distance),
        hit: nearest,
    };
    tracing::trace!(
        colliding = contact.colliding,
        distance = contact.distance(),
        "ground probe"
    );
    contact
}

/// Whether a block sits within head clearance directly above the eye.
pub fn ceiling(registry: &BlockRegistry, eye: Vec3, config: &PhysicsConfig) -> bool {
    nearest_hit(&Ray::up(eye), registry.blocks())
        .is_some_and(|hit| hit.distance < config.ceiling_clearance)
}

/// Whether moving along the horizontal `direction` would push into a wall.
///
/// Casts a fan of rays along `direction` from every combination of probe
/// height and lateral offset (`-r`, `0`, `+r` across the direction of travel).
/// Any hit closer than the player radius blocks the move.
pub fn wall(registry: &BlockRegistry, eye: Vec3, direction: Vec3, config: &PhysicsConfig) -> bool {
    let r = config.player_radius;
    let perpendicular = Vec3::new(-direction.z, 0.0, direction.x).normalize_or_zero();
    let ray_dir = direction.normalize();

    for &height in &config.wall_probe_heights {
        for lateral in [-r, 0.0, r] {
            let origin = eye + Vec3::Y * height + perpendicular * lateral;
            let ray = Ray {
                origin,
                direction: ray_dir,
            };
            if nearest_hit(&ray, registry.blocks()).is_some_and(|hit| hit.distance < r) {
                tracing::trace!(?direction, height, lateral, "wall probe blocked");
                return true;
            }
        }
    }
    false
}
