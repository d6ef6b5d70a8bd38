//! The first-person player and the per-frame driver.
//!
//! # Invariants
//! - The player never mutates blocks except through explicit mine and place.
//! - Kinematics read the registry only through ray queries.
//! - Within a frame the world's cached player position is synced before the
//!   player moves and before creatures update.
//! - Transient effects age by wall-clock time and never touch the registry.

pub mod effects;
pub mod frame;
pub mod input;
pub mod interact;
pub mod kinematics;

pub use effects::{EffectQueue, JumpRing, RING_LIFETIME};
pub use frame::{Outcome, Session, advance_frame};
pub use input::{Action, HeldInputs, Hotbar, MoveIntent};
pub use interact::{Placement, mine, place, target};
pub use kinematics::{JumpKind, Player, SPAWN_EYE};

pub fn crate_info() -> &'static str {
    "blockworld-player v0.1.0"
}
