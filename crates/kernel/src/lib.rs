//! World Kernel: authoritative voxel world state and the creature simulation.
//!
//! # Invariants
//! - At most one block per voxel; creating on an occupied voxel is a no-op.
//! - All block mutations flow through the [`BlockRegistry`] and are logged.
//! - Creatures never read the registry.
//! - Given the same seed and calls, stepping is deterministic.

pub mod catalog;
pub mod creature;
pub mod registry;
pub mod world;

pub use catalog::{Appearance, BlockCatalog, Material, MaterialHandle};
pub use creature::{Creature, CreatureState};
pub use registry::{Block, BlockEvent, BlockRegistry};
pub use world::{World, WorldEvent};

pub fn crate_info() -> &'static str {
    "blockworld-kernel v0.1.0"
}
