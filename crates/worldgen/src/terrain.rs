use rand::Rng;

use blockworld_common::{BlockError, BlockKind, VoxelCoord, WorldConfig};
use blockworld_kernel::BlockRegistry;

/// Chance a ground cell is dirt instead of grass.
const DIRT_CHANCE: f64 = 0.05;
/// Grass cells rolling above this get a stone on top.
const STONE_THRESHOLD: f64 = 0.98;

const TRUNK_HEIGHT: i32 = 4;
/// Leaf layers, as offsets above the tree base.
const CANOPY_LAYERS: std::ops::RangeInclusive<i32> = 4..=6;
const CANOPY_RADIUS: i32 = 2;

/// Lay a square of ground at y=0 spanning `±terrain_extent`.
///
/// Returns the number of blocks created.
pub fn generate_terrain(
    registry: &mut BlockRegistry,
    config: &WorldConfig,
    rng: &mut impl Rng,
) -> Result<usize, BlockError> {
    let extent = config.terrain_extent;
    let mut created = 0;
    for x in -extent..=extent {
        for z in -extent..=extent {
            let roll: f64 = rng.gen_range(0.0..1.0);
            if roll < DIRT_CHANCE {
                created += registry.create_at(VoxelCoord::new(x, 0, z), BlockKind::Dirt)? as usize;
                continue;
            }
            created += registry.create_at(VoxelCoord::new(x, 0, z), BlockKind::Grass)? as usize;
            if roll > STONE_THRESHOLD {
                created += registry.create_at(VoxelCoord::new(x, 1, z), BlockKind::Stone)? as usize;
            }
        }
    }
    tracing::debug!(created, extent, "terrain generated");
    Ok(created)
}

/// Grow one tree with its trunk starting at `base`.
///
/// The canopy is a 5x5 square on its two lower layers with the corners
/// cut, and a 3x3 cap on top. Existing blocks are left in place.
pub fn plant_tree(registry: &mut BlockRegistry, base: VoxelCoord) -> Result<usize, BlockError> {
    let mut created = 0;
    for dy in 0..TRUNK_HEIGHT {
        created += registry.create_at(VoxelCoord::new(base.x, base.y + dy, base.z), BlockKind::Wood)? as usize;
    }
    let top = *CANOPY_LAYERS.end();
    for dx in -CANOPY_RADIUS..=CANOPY_RADIUS {
        for dz in -CANOPY_RADIUS..=CANOPY_RADIUS {
            for dy in CANOPY_LAYERS {
                if dx.abs() == CANOPY_RADIUS && dz.abs() == CANOPY_RADIUS {
                    continue;
                }
                if dy == top && (dx.abs() > 1 || dz.abs() > 1) {
                    continue;
                }
                let coord = VoxelCoord::new(base.x + dx, base.y + dy, base.z + dz);
                created += registry.create_at(coord, BlockKind::Leaves)? as usize;
            }
        }
    }
    Ok(created)
}

/// Plant `tree_count` trees at random spots inside the spawn square.
///
/// Returns the trunk bases.
pub fn plant_trees(
    registry: &mut BlockRegistry,
    config: &WorldConfig,
    rng: &mut impl Rng,
) -> Result<Vec<VoxelCoord>, BlockError> {
    let extent = config.spawn_extent;
    let mut bases = Vec::with_capacity(config.tree_count);
    for _ in 0..config.tree_count {
        let base = VoxelCoord::new(rng.gen_range(-extent..extent), 1, rng.gen_range(-extent..extent));
        plant_tree(registry, base)?;
        tracing::trace!(%base, "tree planted");
        bases.push(base);
    }
    Ok(bases)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn terrain_covers_ground_plane() {
        let mut reg = BlockRegistry::new();
        let cfg = WorldConfig::default();
        let mut rng = StdRng::seed_from_u64(7);
        let created = generate_terrain(&mut reg, &cfg, &mut rng).unwrap();
        assert_eq!(created, reg.len());

        let extent = cfg.terrain_extent;
        for x in -extent..=extent {
            for z in -extent..=extent {
                let ground = reg.get(VoxelCoord::new(x, 0, z)).unwrap();
                assert!(matches!(ground.kind, BlockKind::Grass | BlockKind::Dirt));
            }
        }
        let side = (2 * extent + 1) as usize;
        let stones = reg.counts_by_kind().get(&BlockKind::Stone).copied().unwrap_or(0);
        assert_eq!(reg.len(), side * side + stones);
        assert!(!reg.contains(VoxelCoord::new(extent + 1, 0, 0)));
    }

    #[test]
    fn stones_only_sit_on_grass() {
        let mut reg = BlockRegistry::new();
        let mut rng = StdRng::seed_from_u64(99);
        generate_terrain(&mut reg, &WorldConfig::default(), &mut rng).unwrap();
        for block in reg.blocks().filter(|b| b.kind == BlockKind::Stone) {
            assert_eq!(block.coord.y, 1);
            let below = reg.get(VoxelCoord::new(block.coord.x, 0, block.coord.z)).unwrap();
            assert_eq!(below.kind, BlockKind::Grass);
        }
    }

    #[test]
    fn tree_shape() {
        let mut reg = BlockRegistry::new();
        let created = plant_tree(&mut reg, VoxelCoord::new(0, 1, 0)).unwrap();
        let counts = reg.counts_by_kind();
        assert_eq!(counts[&BlockKind::Wood], 4);
        // Two 5x5 layers without corners plus a 3x3 cap.
        assert_eq!(counts[&BlockKind::Leaves], 21 + 21 + 9);
        assert_eq!(created, 4 + 51);
        assert!(reg.contains(VoxelCoord::new(0, 4, 0)));
        assert!(!reg.contains(VoxelCoord::new(2, 5, 2)));
        assert!(!reg.contains(VoxelCoord::new(2, 7, 0)));
        assert!(reg.contains(VoxelCoord::new(1, 7, 1)));
    }

    #[test]
    fn overlapping_trees_keep_first_blocks() {
        let mut reg = BlockRegistry::new();
        plant_tree(&mut reg, VoxelCoord::new(0, 1, 0)).unwrap();
        let second = plant_tree(&mut reg, VoxelCoord::new(1, 1, 0)).unwrap();
        assert!(second < 55);
        assert_eq!(reg.get(VoxelCoord::new(1, 5, 0)).unwrap().kind, BlockKind::Leaves);
        assert_eq!(reg.get(VoxelCoord::new(1, 1, 0)).unwrap().kind, BlockKind::Wood);
    }

    #[test]
    fn trees_land_inside_spawn_square() {
        let mut reg = BlockRegistry::new();
        let cfg = WorldConfig::default();
        let mut rng = StdRng::seed_from_u64(3);
        let bases = plant_trees(&mut reg, &cfg, &mut rng).unwrap();
        assert_eq!(bases.len(), cfg.tree_count);
        for base in bases {
            assert_eq!(base.y, 1);
            assert!((-cfg.spawn_extent..cfg.spawn_extent).contains(&base.x));
            assert!((-cfg.spawn_extent..cfg.spawn_extent).contains(&base.z));
            assert_eq!(reg.get(base).unwrap().kind, BlockKind::Wood);
        }
    }
}
