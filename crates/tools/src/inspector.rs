use serde::Serialize;
use std::collections::BTreeMap;

use blockworld_common::{BlockKind, EntityId};
use blockworld_kernel::{CreatureState, World};

/// World inspector for developer tooling.
///
/// Provides read-only queries against the world state for debugging and the
/// command line driver.
pub struct WorldInspector;

impl WorldInspector {
    /// Produce a summary of the world state.
    pub fn summary(world: &World) -> WorldSummary {
        let registry = world.registry();
        WorldSummary {
            tick: world.tick(),
            seed: world.seed(),
            block_count: registry.len(),
            blocks_by_kind: registry.counts_by_kind(),
            creature_count: world.creatures().len(),
            creatures_by_state: StateCounts {
                wandering: world.count_in_state(CreatureState::Wandering),
                chasing: world.count_in_state(CreatureState::Chasing),
                preparing: world.count_in_state(CreatureState::Preparing),
            },
            pending_block_events: registry.events().len(),
            pending_events: world.events().len(),
            state_hash: world.state_hash(),
        }
    }

    /// Details of a single creature.
    pub fn inspect_creature(world: &World, id: EntityId) -> Option<CreatureInfo> {
        world.creature(id).map(|c| CreatureInfo {
            id,
            position: c.position.to_array(),
            heading: c.heading,
            facing: c.facing,
            state: c.state,
            prepare_ticks: c.prepare_ticks,
            color: c.color,
            leg_heights: c.leg_heights(),
        })
    }

    /// Every creature id, in spawn order.
    pub fn list_creatures(world: &World) -> Vec<EntityId> {
        world.creatures().iter().map(|c| c.id).collect()
    }
}

/// Creature counts per behaviour state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StateCounts {
    pub wandering: usize,
    pub chasing: usize,
    pub preparing: usize,
}

/// Summary of world state for the inspector.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorldSummary {
    pub tick: u64,
    pub seed: u64,
    pub block_count: usize,
    pub blocks_by_kind: BTreeMap<BlockKind, usize>,
    pub creature_count: usize,
    pub creatures_by_state: StateCounts,
    pub pending_block_events: usize,
    pub pending_events: usize,
    pub state_hash: u64,
}

impl std::fmt::Display for WorldSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "World: tick={} seed={} blocks={} creatures={} (wandering={} chasing={} preparing={}) pending_events={} hash={:016x}",
            self.tick,
            self.seed,
            self.block_count,
            self.creature_count,
            self.creatures_by_state.wandering,
            self.creatures_by_state.chasing,
            self.creatures_by_state.preparing,
            self.pending_events,
            self.state_hash,
        )
    }
}

/// Detailed info about a single creature.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreatureInfo {
    pub id: EntityId,
    pub position: [f32; 3],
    pub heading: f32,
    pub facing: f32,
    pub state: CreatureState,
    pub prepare_ticks: u32,
    pub color: [f32; 3],
    pub leg_heights: [f32; 4],
}

impl std::fmt::Display for CreatureInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Creature [{:.8}] {} pos=({:.2}, {:.2}, {:.2}) heading={:.2} prepare={}",
            &self.id.0.to_string()[..8],
            self.state,
            self.position[0],
            self.position[1],
            self.position[2],
            self.heading,
            self.prepare_ticks,
        )
    }
}
