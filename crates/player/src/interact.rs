use glam::Vec3;

use blockworld_common::{BlockError, BlockKind, PhysicsConfig, VoxelCoord};
use blockworld_kernel::{Block, BlockRegistry};
use blockworld_query::{self as query, RayHit};

use crate::kinematics::Player;

/// Result of a placement attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Created(VoxelCoord),
    /// The cell already held a block; nothing changed.
    Occupied(VoxelCoord),
    /// The cell overlaps the player's body.
    BlockedByPlayer(VoxelCoord),
}

impl Placement {
    pub fn coord(&self) -> VoxelCoord {
        match *self {
            Placement::Created(c) | Placement::Occupied(c) | Placement::BlockedByPlayer(c) => c,
        }
    }
}

/// The block under the player's reticle.
pub fn target(registry: &BlockRegistry, player: &Player, config: &PhysicsConfig) -> Option<RayHit> {
    query::target(registry, player.eye, player.view_direction(), config)
}

/// Remove the targeted block.
pub fn mine(registry: &mut BlockRegistry, hit: &RayHit) -> Option<Block> {
    let removed = registry.remove_at(hit.coord);
    if let Some(block) = &removed {
        tracing::debug!(coord = %block.coord, kind = %block.kind, "mined");
    }
    removed
}

/// Place `kind` in the cell against the struck face of `hit`.
///
/// The cell is refused when its center lies within the player radius on
/// both horizontal axes and within the floor offset vertically of the eye.
pub fn place(
    registry: &mut BlockRegistry,
    hit: &RayHit,
    eye: Vec3,
    kind: BlockKind,
    config: &PhysicsConfig,
) -> Result<Placement, BlockError> {
    let cell = hit.adjacent();
    let delta = cell.center() - eye;
    let overlaps = delta.x.abs() <= config.player_radius
        && delta.y.abs() <= config.floor_offset
        && delta.z.abs() <= config.player_radius;
    if overlaps {
        tracing::debug!(%cell, "placement blocked by player");
        return Ok(Placement::BlockedByPlayer(cell));
    }
    if registry.create_at(cell, kind)? {
        tracing::debug!(%cell, %kind, "placed");
        Ok(Placement::Created(cell))
    } else {
        Ok(Placement::Occupied(cell))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockworld_kernel::BlockCatalog;

    fn setup() -> (BlockRegistry, PhysicsConfig) {
        let mut reg = BlockRegistry::new();
        for x in -4..=4 {
            reg.create(x as f32, 0.0, 0.0, BlockKind::Grass).unwrap();
        }
        (reg, PhysicsConfig::default())
    }

    fn looking_down_at(x: f32) -> Player {
        let mut p = Player::new(Vec3::new(x, 2.3, 0.0));
        p.look(0.0, -std::f32::consts::FRAC_PI_2);
        p
    }

    #[test]
    fn target_looks_through_reticle() {
        let (reg, cfg) = setup();
        let hit = target(&reg, &looking_down_at(2.0), &cfg).unwrap();
        assert_eq!(hit.coord, VoxelCoord::new(2, 0, 0));
        assert_eq!(hit.normal, glam::IVec3::Y);
    }

    #[test]
    fn mine_removes_target() {
        let (mut reg, cfg) = setup();
        let hit = target(&reg, &looking_down_at(-3.0), &cfg).unwrap();
        let block = mine(&mut reg, &hit).unwrap();
        assert_eq!(block.coord, VoxelCoord::new(-3, 0, 0));
        assert!(!reg.contains(block.coord));
        assert!(mine(&mut reg, &hit).is_none());
    }

    #[test]
    fn place_refuses_player_cell() {
        let (mut reg, cfg) = setup();
        let player = looking_down_at(0.0);
        let hit = target(&reg, &player, &cfg).unwrap();
        let result = place(&mut reg, &hit, player.eye, BlockKind::Stone, &cfg).unwrap();
        assert_eq!(result, Placement::BlockedByPlayer(VoxelCoord::new(0, 1, 0)));
        assert!(!reg.contains(VoxelCoord::new(0, 1, 0)));
    }

    #[test]
    fn place_on_distant_face() {
        let (mut reg, cfg) = setup();
        let mut player = Player::new(Vec3::new(-2.0, 2.3, 0.0));
        // Aim at the top of the block at x=0 from two cells away.
        let aim = Vec3::new(0.0, 0.5, 0.0) - player.eye;
        player.pitch = (aim.y / aim.length()).asin();
        player.yaw = std::f32::consts::FRAC_PI_2 * 3.0;
        let hit = target(&reg, &player, &cfg).unwrap();
        let result = place(&mut reg, &hit, player.eye, BlockKind::Wood, &cfg).unwrap();
        assert_eq!(hit.coord, VoxelCoord::new(0, 0, 0));
        assert_eq!(result, Placement::Created(VoxelCoord::new(0, 1, 0)));
        assert_eq!(reg.get(result.coord()).unwrap().kind, BlockKind::Wood);
    }

    #[test]
    fn place_into_filled_cell_is_occupied() {
        let (mut reg, cfg) = setup();
        let hit = target(&reg, &looking_down_at(3.0), &cfg).unwrap();
        reg.create(3.0, 1.0, 0.0, BlockKind::Dirt).unwrap();
        let far_eye = Vec3::new(10.0, 10.0, 10.0);
        let result = place(&mut reg, &hit, far_eye, BlockKind::Stone, &cfg).unwrap();
        assert_eq!(result, Placement::Occupied(VoxelCoord::new(3, 1, 0)));
        assert_eq!(reg.get(VoxelCoord::new(3, 1, 0)).unwrap().kind, BlockKind::Dirt);
    }

    #[test]
    fn place_unknown_kind_errors() {
        let cfg = PhysicsConfig::default();
        let mut reg = BlockRegistry::with_catalog(BlockCatalog::empty());
        let hit = RayHit {
            coord: VoxelCoord::new(0, 0, 0),
            kind: BlockKind::Stone,
            distance: 1.0,
            normal: glam::IVec3::X,
            point: Vec3::new(0.5, 0.0, 0.0),
        };
        let err = place(&mut reg, &hit, Vec3::splat(10.0), BlockKind::Leaves, &cfg).unwrap_err();
        assert_eq!(err, BlockError::InvalidBlockType("leaves".into()));
    }
}
