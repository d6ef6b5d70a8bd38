//! Shared types, configuration and errors for the blockworld workspace.

pub mod config;
pub mod error;
pub mod types;

pub use config::{CreatureConfig, PhysicsConfig, SandboxConfig, WorldConfig};
pub use error::{BlockError, ConfigError};
pub use types::{BlockKind, EntityId, VoxelCoord};
