use glam::{IVec3, Vec3};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::BlockError;

/// Unique identifier for a creature in the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub Uuid);

impl EntityId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

/// Round half toward positive infinity, so `0.5 -> 1` and `-0.5 -> 0`.
fn round_half_up(v: f32) -> i32 {
    (v + 0.5).floor() as i32
}

const PACK_BITS: u32 = 21;
const PACK_MASK: u64 = (1 << PACK_BITS) - 1;
const PACK_BIAS: i64 = 1 << (PACK_BITS - 1);

/// Integer coordinate of a voxel cell.
///
/// Ordered by (x, y, z) so maps keyed by it iterate deterministically.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct VoxelCoord {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl VoxelCoord {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Snap a continuous world position onto the nearest voxel.
    ///
    /// Fractional positions that round to the same triple alias the same cell.
    pub fn from_world(x: f32, y: f32, z: f32) -> Self {
        Self {
            x: round_half_up(x),
            y: round_half_up(y),
            z: round_half_up(z),
        }
    }

    pub fn from_vec3(v: Vec3) -> Self {
        Self::from_world(v.x, v.y, v.z)
    }

    /// World-space center of the cell.
    pub fn center(self) -> Vec3 {
        Vec3::new(self.x as f32, self.y as f32, self.z as f32)
    }

    pub fn offset(self, delta: IVec3) -> Self {
        Self {
            x: self.x + delta.x,
            y: self.y + delta.y,
            z: self.z + delta.z,
        }
    }

    /// Packed 64-bit key: 21 biased bits per axis.
    ///
    /// Unique for coordinates in `-2^20..2^20`; outside that range it wraps and
    /// only serves as a hash.
    pub fn packed(self) -> u64 {
        let pack = |v: i32| ((v as i64 + PACK_BIAS) as u64) & PACK_MASK;
        (pack(self.x) << (2 * PACK_BITS)) | (pack(self.y) << PACK_BITS) | pack(self.z)
    }
}

impl From<IVec3> for VoxelCoord {
    fn from(v: IVec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl From<VoxelCoord> for IVec3 {
    fn from(c: VoxelCoord) -> Self {
        IVec3::new(c.x, c.y, c.z)
    }
}

impl fmt::Display for VoxelCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.x, self.y, self.z)
    }
}

/// The closed set of placeable block kinds.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    Dirt,
    Stone,
    Grass,
    Wood,
    Leaves,
}

impl BlockKind {
    /// All kinds in hotbar order.
    pub const ALL: [BlockKind; 5] = [
        BlockKind::Dirt,
        BlockKind::Stone,
        BlockKind::Grass,
        BlockKind::Wood,
        BlockKind::Leaves,
    ];

    pub fn name(self) -> &'static str {
        match self {
            BlockKind::Dirt => "dirt",
            BlockKind::Stone => "stone",
            BlockKind::Grass => "grass",
            BlockKind::Wood => "wood",
            BlockKind::Leaves => "leaves",
        }
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BlockKind {
    type Err = BlockError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BlockKind::ALL
            .into_iter()
            .find(|k| k.name() == s)
            .ok_or_else(|| BlockError::InvalidBlockType(s.to_string()))
    }
}
