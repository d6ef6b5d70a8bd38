//! Initial world content.
//!
//! Generation is a plain caller of the registry and world entry points: it
//! never reaches into their internals. All randomness comes from the RNG the
//! caller passes in, so a seeded RNG reproduces the same world.

mod spawn;
mod terrain;

use rand::SeedableRng;
use rand::rngs::StdRng;

use blockworld_common::{BlockError, EntityId, VoxelCoord};
use blockworld_kernel::World;

pub use spawn::spawn_initial_creatures;
pub use terrain::{generate_terrain, plant_tree, plant_trees};

/// What [`populate`] produced.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationReport {
    pub blocks_created: usize,
    pub trees: Vec<VoxelCoord>,
    pub creatures: Vec<EntityId>,
}

/// Fill `world` with terrain, trees and creatures, in that order.
pub fn populate(world: &mut World, rng: &mut impl rand::Rng) -> Result<GenerationReport, BlockError> {
    let config = world.config().world.clone();
    let terrain = generate_terrain(world.registry_mut(), &config, rng)?;
    let before_trees = world.registry().len();
    let trees = plant_trees(world.registry_mut(), &config, rng)?;
    let tree_blocks = world.registry().len() - before_trees;
    let creatures = spawn_initial_creatures(world, &config, rng);
    tracing::info!(
        blocks = world.registry().len(),
        trees = trees.len(),
        creatures = creatures.len(),
        "world populated"
    );
    Ok(GenerationReport {
        blocks_created: terrain + tree_blocks,
        trees,
        creatures,
    })
}

/// [`populate`] with an RNG seeded from the world's configured seed.
pub fn populate_seeded(world: &mut World) -> Result<GenerationReport, BlockError> {
    let mut rng = StdRng::seed_from_u64(world.config().world.seed);
    populate(world, &mut rng)
}

pub fn crate_info() -> &'static str {
    "blockworld-worldgen v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("worldgen"));
    }

    #[test]
    fn populate_builds_full_world() {
        let mut world = World::default();
        let report = populate_seeded(&mut world).unwrap();
        let cfg = &world.config().world;
        assert_eq!(report.trees.len(), cfg.tree_count);
        assert_eq!(report.creatures.len(), cfg.initial_creatures);
        assert_eq!(report.blocks_created, world.registry().len());
        let side = (2 * cfg.terrain_extent + 1) as usize;
        assert!(world.registry().len() > side * side);
    }

    #[test]
    fn same_seed_same_world() {
        let build = || {
            let mut world = World::with_seed(1234);
            populate_seeded(&mut world).unwrap();
            for _ in 0..50 {
                world.step();
            }
            world.state_hash()
        };
        assert_eq!(build(), build());
    }

    #[test]
    fn different_seeds_differ() {
        let mut a = World::with_seed(1);
        let mut b = World::with_seed(2);
        populate_seeded(&mut a).unwrap();
        populate_seeded(&mut b).unwrap();
        assert_ne!(a.state_hash(), b.state_hash());
    }
}
