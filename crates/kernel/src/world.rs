use glam::Vec3;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use blockworld_common::{BlockError, BlockKind, EntityId, SandboxConfig};

use crate::creature::{Creature, CreatureState};
use crate::registry::{Block, BlockRegistry};

/// Height at which creatures walk.
pub const CREATURE_Y: f32 = 1.0;

/// A record produced by orchestrator-level changes.
///
/// Block mutations are logged separately by the [`BlockRegistry`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WorldEvent {
    CreatureSpawned { id: EntityId, position: Vec3 },
    CreatureStateChanged {
        id: EntityId,
        from: CreatureState,
        to: CreatureState,
    },
    /// Simulation advanced one tick with the given seed.
    Stepped { tick: u64, seed: u64 },
}

/// The authoritative world state.
///
/// Owns the block registry, the creature list and a cached copy of the player
/// position. The cache is written once per frame by the driver and only read
/// by creatures, so it may lag the player by one tick.
///
/// Given the same seed, configuration and sequence of calls, two worlds
/// produce identical states: creature randomness for each tick is drawn from
/// an RNG seeded by that tick's seed.
#[derive(Debug, Clone)]
pub struct World {
    registry: BlockRegistry,
    creatures: Vec<Creature>,
    player_position: Vec3,
    tick: u64,
    /// Seed for deterministic RNG. Advanced each step.
    seed: u64,
    config: SandboxConfig,
    event_log: Vec<WorldEvent>,
}

impl Default for World {
    fn default() -> Self {
        Self::new(SandboxConfig::default())
    }
}

impl World {
    /// An empty world seeded from `config.world.seed`.
    pub fn new(config: SandboxConfig) -> Self {
        Self {
            registry: BlockRegistry::new(),
            creatures: Vec::new(),
            player_position: Vec3::new(0.0, 1.0, 0.0),
            tick: 0,
            seed: config.world.seed,
            config,
            event_log: Vec::new(),
        }
    }

    /// An empty world with default tuning and a specific seed.
    pub fn with_seed(seed: u64) -> Self {
        let mut config = SandboxConfig::default();
        config.world.seed = seed;
        Self::new(config)
    }

    pub fn config(&self) -> &SandboxConfig {
        &self.config
    }

    /// Current simulation tick.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Current RNG seed.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn registry(&self) -> &BlockRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut BlockRegistry {
        &mut self.registry
    }

    pub fn create_block(&mut self, x: f32, y: f32, z: f32, kind: BlockKind) -> Result<bool, BlockError> {
        self.registry.create(x, y, z, kind)
    }

    pub fn remove_block(&mut self, x: f32, y: f32, z: f32) -> Option<Block> {
        self.registry.remove(x, y, z)
    }

    pub fn block_exists(&self, x: f32, y: f32, z: f32) -> bool {
        self.registry.exists(x, y, z)
    }

    pub fn creatures(&self) -> &[Creature] {
        &self.creatures
    }

    pub fn creature(&self, id: EntityId) -> Option<&Creature> {
        self.creatures.iter().find(|c| c.id == id)
    }

    /// Number of creatures currently in `state`.
    pub fn count_in_state(&self, state: CreatureState) -> usize {
        self.creatures.iter().filter(|c| c.state == state).count()
    }

    /// Spawn a wandering creature at ground-plane position `(x, z)`.
    pub fn spawn_creature(&mut self, x: f32, z: f32) -> EntityId {
        let id = EntityId::new();
        let position = Vec3::new(x, CREATURE_Y, z);
        let mut rng = StdRng::seed_from_u64(self.seed ^ self.creatures.len() as u64);
        self.creatures
            .push(Creature::new(id, position, &self.config.creature, &mut rng));
        self.event_log
            .push(WorldEvent::CreatureSpawned { id, position });
        tracing::debug!(?id, x, z, "creature spawned");
        id
    }

    /// Remove a creature. Returns it if it existed.
    pub fn despawn_creature(&mut self, id: EntityId) -> Option<Creature> {
        let index = self.creatures.iter().position(|c| c.id == id)?;
        Some(self.creatures.remove(index))
    }

    /// Cached player position as last synced.
    pub fn player_position(&self) -> Vec3 {
        self.player_position
    }

    /// Sync the cached player position read by creatures.
    pub fn update_player_position(&mut self, x: f32, y: f32, z: f32) {
        self.player_position = Vec3::new(x, y, z);
        tracing::trace!(x, y, z, "player position cached");
    }

    /// Advance the simulation by one tick, updating every creature against
    /// the cached player position.
    pub fn step(&mut self) {
        let _span = tracing::info_span!("world_tick", tick = self.tick + 1).entered();
        self.tick += 1;
        self.seed = splitmix64(self.seed);

        let mut rng = StdRng::seed_from_u64(self.seed);
        let player = self.player_position;
        for creature in &mut self.creatures {
            if let Some(from) = creature.update(player, &self.config.creature, &mut rng) {
                tracing::debug!(id = ?creature.id, %from, to = %creature.state, "creature state changed");
                self.event_log.push(WorldEvent::CreatureStateChanged {
                    id: creature.id,
                    from,
                    to: creature.state,
                });
            }
        }

        self.event_log.push(WorldEvent::Stepped {
            tick: self.tick,
            seed: self.seed,
        });
    }

    /// Drain and return the event log.
    pub fn drain_events(&mut self) -> Vec<WorldEvent> {
        std::mem::take(&mut self.event_log)
    }

    /// Read-only access to the event log.
    pub fn events(&self) -> &[WorldEvent] {
        &self.event_log
    }

    /// Compute a deterministic hash of the world state for comparison.
    ///
    /// Creature ids are random and excluded; creatures are hashed in spawn
    /// order.
    pub fn state_hash(&self) -> u64 {
        let mut h: u64 = 0xcbf2_9ce4_8422_2325; // FNV offset basis
        let mix = |h: &mut u64, bytes: &[u8]| {
            for &b in bytes {
                *h ^= b as u64;
                *h = h.wrapping_mul(0x0100_0000_01b3);
            }
        };
        mix(&mut h, &self.tick.to_le_bytes());
        mix(&mut h, &self.seed.to_le_bytes());
        for block in self.registry.blocks() {
            mix(&mut h, &block.coord.packed().to_le_bytes());
            mix(&mut h, block.kind.name().as_bytes());
        }
        for c in &self.creatures {
            mix(&mut h, &c.position.x.to_le_bytes());
            mix(&mut h, &c.position.y.to_le_bytes());
            mix(&mut h, &c.position.z.to_le_bytes());
            mix(&mut h, &c.heading.to_le_bytes());
            mix(&mut h, &[c.state as u8]);
            mix(&mut h, &c.prepare_ticks.to_le_bytes());
        }
        h
    }
}

/// Splitmix64 step, used to advance the world seed each tick.
fn splitmix64(mut state: u64) -> u64 {
    state = state.wrapping_add(0x9e37_79b9_7f4a_7c15);
    let mut z = state;
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn world_starts_empty() {
        let w = World::default();
        assert_eq!(w.tick(), 0);
        assert!(w.registry().is_empty());
        assert!(w.creatures().is_empty());
        assert_eq!(w.player_position(), Vec3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn step_increments_tick_and_seed() {
        let mut w = World::with_seed(1);
        w.step();
        w.step();
        w.step();
        assert_eq!(w.tick(), 3);
        assert_ne!(w.seed(), 1);
    }

    #[test]
    fn block_entry_points_delegate_to_registry() {
        let mut w = World::default();
        assert!(w.create_block(1.0, 0.0, 1.0, BlockKind::Dirt).unwrap());
        assert!(w.block_exists(1.2, -0.3, 0.9));
        assert_eq!(w.remove_block(1.0, 0.0, 1.0).unwrap().kind, BlockKind::Dirt);
        assert!(!w.block_exists(1.0, 0.0, 1.0));
    }

    #[test]
    fn creatures_react_to_cached_player_position() {
        let mut w = World::default();
        let id = w.spawn_creature(0.0, 0.0);
        w.update_player_position(3.0, 2.8, 0.0);
        w.step();
        assert_eq!(w.creature(id).unwrap().state, CreatureState::Chasing);
        assert_eq!(w.count_in_state(CreatureState::Chasing), 1);
        assert!(w.events().iter().any(|e| matches!(
            e,
            WorldEvent::CreatureStateChanged {
                to: CreatureState::Chasing,
                ..
            }
        )));
    }

    #[test]
    fn creatures_ignore_terrain() {
        let mut w = World::default();
        for x in -3..=3 {
            for z in -3..=3 {
                w.create_block(x as f32, 1.0, z as f32, BlockKind::Stone).unwrap();
            }
        }
        let id = w.spawn_creature(0.0, 0.0);
        w.update_player_position(4.0, 1.0, 0.0);
        for _ in 0..10 {
            w.step();
        }
        let c = w.creature(id).unwrap();
        assert_eq!(c.position.y, CREATURE_Y);
        assert!(c.position.x > 0.0);
    }

    #[test]
    fn despawn_creature() {
        let mut w = World::default();
        let id = w.spawn_creature(5.0, 5.0);
        assert!(w.despawn_creature(id).is_some());
        assert!(w.creature(id).is_none());
        assert!(w.despawn_creature(id).is_none());
    }

    #[test]
    fn drain_events_clears_log() {
        let mut w = World::default();
        w.spawn_creature(0.0, 0.0);
        w.update_player_position(50.0, 1.0, 50.0);
        w.step();
        let events = w.drain_events();
        assert_eq!(events.len(), 2);
        assert!(w.events().is_empty());
    }

    #[test]
    fn same_seed_same_state() {
        let run = || {
            let mut w = World::with_seed(42);
            w.create_block(0.0, 0.0, 0.0, BlockKind::Grass).unwrap();
            w.spawn_creature(-4.0, 2.0);
            w.spawn_creature(10.0, -10.0);
            for i in 0..200 {
                w.update_player_position((i as f32 * 0.05).sin() * 6.0, 2.8, 0.0);
                w.step();
            }
            w.state_hash()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn different_seeds_diverge() {
        let mut w1 = World::with_seed(1);
        let mut w2 = World::with_seed(2);
        w1.step();
        w2.step();
        assert_ne!(w1.seed(), w2.seed());
        assert_ne!(w1.state_hash(), w2.state_hash());
    }

    #[test]
    fn state_hash_tracks_blocks() {
        let mut w = World::default();
        let empty = w.state_hash();
        w.create_block(0.0, 0.0, 0.0, BlockKind::Stone).unwrap();
        assert_ne!(w.state_hash(), empty);
        w.remove_block(0.0, 0.0, 0.0);
        assert_eq!(w.state_hash(), empty);
    }
}
