use rand::Rng;

use blockworld_common::{EntityId, WorldConfig};
use blockworld_kernel::World;
use blockworld_kernel::world::CREATURE_Y;

/// Rerolls allowed per creature before giving up on it.
const MAX_SPAWN_ATTEMPTS: usize = 1000;

/// Spawn `initial_creatures` creatures at free integer cells.
///
/// A cell is free when no block sits at creature height. Positions are
/// rerolled until one is free; a creature that finds no free cell within
/// the attempt limit is skipped.
pub fn spawn_initial_creatures(
    world: &mut World,
    config: &WorldConfig,
    rng: &mut impl Rng,
) -> Vec<EntityId> {
    let extent = config.spawn_extent;
    let mut ids = Vec::with_capacity(config.initial_creatures);
    for _ in 0..config.initial_creatures {
        let cell = (0..MAX_SPAWN_ATTEMPTS).find_map(|_| {
            let x = rng.gen_range(-extent..extent) as f32;
            let z = rng.gen_range(-extent..extent) as f32;
            (!world.block_exists(x, CREATURE_Y, z)).then_some((x, z))
        });
        match cell {
            Some((x, z)) => ids.push(world.spawn_creature(x, z)),
            None => tracing::warn!(attempts = MAX_SPAWN_ATTEMPTS, "no free cell for creature"),
        }
    }
    ids
}
