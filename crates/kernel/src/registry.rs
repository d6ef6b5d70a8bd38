use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::collections::btree_map;

use blockworld_common::{BlockError, BlockKind, VoxelCoord};

use crate::catalog::{Appearance, BlockCatalog};

/// A placed block. The coordinate never changes after creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub coord: VoxelCoord,
    pub kind: BlockKind,
    pub appearance: Appearance,
}

/// A record produced by every successful registry mutation.
///
/// The renderer drains these to attach and detach block meshes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockEvent {
    Placed { coord: VoxelCoord, kind: BlockKind },
    Removed { coord: VoxelCoord, kind: BlockKind },
}

/// Sparse store of every placed block, keyed by voxel coordinate.
///
/// Sole source of truth for "does this voxel contain solid matter". All
/// positions are snapped with [`VoxelCoord::from_world`] before lookup.
/// Uses BTreeMap so iteration order is deterministic.
#[derive(Debug, Clone)]
pub struct BlockRegistry {
    blocks: BTreeMap<VoxelCoord, Block>,
    catalog: BlockCatalog,
    events: Vec<BlockEvent>,
}

impl Default for BlockRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockRegistry {
    /// An empty registry backed by the standard catalog.
    pub fn new() -> Self {
        Self::with_catalog(BlockCatalog::standard())
    }

    pub fn with_catalog(catalog: BlockCatalog) -> Self {
        Self {
            blocks: BTreeMap::new(),
            catalog,
            events: Vec::new(),
        }
    }

    pub fn catalog(&self) -> &BlockCatalog {
        &self.catalog
    }

    /// The canonical key for a world position.
    pub fn key(x: f32, y: f32, z: f32) -> VoxelCoord {
        VoxelCoord::from_world(x, y, z)
    }

    /// Place a block of `kind` at the voxel nearest to `(x, y, z)`.
    ///
    /// Returns `Ok(true)` when a block was created and `Ok(false)` when the
    /// voxel was already occupied (the existing block is left untouched).
    pub fn create(&mut self, x: f32, y: f32, z: f32, kind: BlockKind) -> Result<bool, BlockError> {
        self.create_at(Self::key(x, y, z), kind)
    }

    /// [`create`](Self::create) on an already snapped coordinate.
    pub fn create_at(&mut self, coord: VoxelCoord, kind: BlockKind) -> Result<bool, BlockError> {
        let appearance = self.catalog.appearance(kind)?;
        match self.blocks.entry(coord) {
            btree_map::Entry::Occupied(_) => Ok(false),
            btree_map::Entry::Vacant(slot) => {
                slot.insert(Block {
                    coord,
                    kind,
                    appearance,
                });
                self.events.push(BlockEvent::Placed { coord, kind });
                tracing::trace!(%coord, %kind, "block placed");
                Ok(true)
            }
        }
    }

    /// Remove the block at the voxel nearest to `(x, y, z)`, if any.
    pub fn remove(&mut self, x: f32, y: f32, z: f32) -> Option<Block> {
        self.remove_at(Self::key(x, y, z))
    }

    pub fn remove_at(&mut self, coord: VoxelCoord) -> Option<Block> {
        let block = self.blocks.remove(&coord)?;
        self.events.push(BlockEvent::Removed {
            coord,
            kind: block.kind,
        });
        tracing::trace!(%coord, kind = %block.kind, "block removed");
        Some(block)
    }

    /// Whether the voxel nearest to `(x, y, z)` is occupied.
    pub fn exists(&self, x: f32, y: f32, z: f32) -> bool {
        self.blocks.contains_key(&Self::key(x, y, z))
    }

    pub fn contains(&self, coord: VoxelCoord) -> bool {
        self.blocks.contains_key(&coord)
    }

    pub fn get(&self, coord: VoxelCoord) -> Option<&Block> {
        self.blocks.get(&coord)
    }

    /// Every block at call time, in coordinate order.
    ///
    /// The iterator is lazy and cheap to clone, so callers can restart it.
    pub fn blocks(&self) -> btree_map::Values<'_, VoxelCoord, Block> {
        self.blocks.values()
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Number of blocks of each kind present.
    pub fn counts_by_kind(&self) -> BTreeMap<BlockKind, usize> {
        let mut counts = BTreeMap::new();
        for block in self.blocks.values() {
            *counts.entry(block.kind).or_insert(0) += 1;
        }
        counts
    }

    /// Drain and return pending mutation events.
    pub fn drain_events(&mut self) -> Vec<BlockEvent> {
        std::mem::take(&mut self.events)
    }

    /// Read-only access to pending mutation events.
    pub fn events(&self) -> &[BlockEvent] {
        &self.events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_then_exists() {
        let mut reg = BlockRegistry::new();
        for (x, y, z) in [(0.0, 0.0, 0.0), (-3.0, 7.0, 12.0), (100.2, -4.6, 0.4)] {
            assert!(reg.create(x, y, z, BlockKind::Stone).unwrap());
            assert!(reg.exists(x, y, z));
        }
        assert_eq!(reg.len(), 3);
    }

    #[test]
    fn create_is_first_write_wins() {
        let mut reg = BlockRegistry::new();
        assert!(reg.create(1.0, 2.0, 3.0, BlockKind::Dirt).unwrap());
        assert!(!reg.create(1.0, 2.0, 3.0, BlockKind::Stone).unwrap());
        assert_eq!(reg.get(VoxelCoord::new(1, 2, 3)).unwrap().kind, BlockKind::Dirt);
        assert_eq!(reg.len(), 1);
        assert_eq!(reg.events().len(), 1);
    }

    #[test]
    fn remove_clears_voxel() {
        let mut reg = BlockRegistry::new();
        reg.create(4.0, 0.0, -4.0, BlockKind::Wood).unwrap();
        let removed = reg.remove(4.0, 0.0, -4.0).unwrap();
        assert_eq!(removed.kind, BlockKind::Wood);
        assert!(!reg.exists(4.0, 0.0, -4.0));
        assert!(reg.is_empty());
    }

    #[test]
    fn remove_missing_is_noop() {
        let mut reg = BlockRegistry::new();
        assert!(reg.remove(9.0, 9.0, 9.0).is_none());
        assert!(reg.events().is_empty());
    }

    #[test]
    fn fractional_positions_alias() {
        let mut reg = BlockRegistry::new();
        assert!(reg.create(0.49, 0.0, 0.0, BlockKind::Grass).unwrap());
        assert!(!reg.create(0.0, 0.0, 0.0, BlockKind::Grass).unwrap());
        assert!(reg.create(0.51, 0.0, 0.0, BlockKind::Grass).unwrap());
        assert!(reg.contains(VoxelCoord::new(0, 0, 0)));
        assert!(reg.contains(VoxelCoord::new(1, 0, 0)));
        assert_eq!(reg.len(), 2);
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let mut reg = BlockRegistry::with_catalog(BlockCatalog::empty());
        let err = reg.create(0.0, 0.0, 0.0, BlockKind::Leaves).unwrap_err();
        assert_eq!(err, BlockError::InvalidBlockType("leaves".into()));
        assert!(!reg.exists(0.0, 0.0, 0.0));
    }

    #[test]
    fn created_block_carries_catalog_appearance() {
        let mut reg = BlockRegistry::new();
        reg.create(0.0, 0.0, 0.0, BlockKind::Wood).unwrap();
        let block = reg.get(VoxelCoord::new(0, 0, 0)).unwrap();
        assert_eq!(
            block.appearance,
            reg.catalog().appearance(BlockKind::Wood).unwrap()
        );
    }

    #[test]
    fn blocks_iterator_is_restartable_and_ordered() {
        let mut reg = BlockRegistry::new();
        reg.create(2.0, 0.0, 0.0, BlockKind::Dirt).unwrap();
        reg.create(-2.0, 0.0, 0.0, BlockKind::Dirt).unwrap();
        reg.create(0.0, 5.0, 0.0, BlockKind::Dirt).unwrap();
        let iter = reg.blocks();
        let first: Vec<VoxelCoord> = iter.clone().map(|b| b.coord).collect();
        let second: Vec<VoxelCoord> = iter.map(|b| b.coord).collect();
        assert_eq!(first, second);
        let mut sorted = first.clone();
        sorted.sort();
        assert_eq!(first, sorted);
    }

    #[test]
    fn events_track_mutations() {
        let mut reg = BlockRegistry::new();
        reg.create(0.0, 0.0, 0.0, BlockKind::Stone).unwrap();
        reg.remove(0.0, 0.0, 0.0);
        let events = reg.drain_events();
        assert_eq!(
            events,
            vec![
                BlockEvent::Placed {
                    coord: VoxelCoord::new(0, 0, 0),
                    kind: BlockKind::Stone
                },
                BlockEvent::Removed {
                    coord: VoxelCoord::new(0, 0, 0),
                    kind: BlockKind::Stone
                },
            ]
        );
        assert!(reg.events().is_empty());
    }

    #[test]
    fn counts_by_kind() {
        let mut reg = BlockRegistry::new();
        reg.create(0.0, 0.0, 0.0, BlockKind::Grass).unwrap();
        reg.create(1.0, 0.0, 0.0, BlockKind::Grass).unwrap();
        reg.create(2.0, 0.0, 0.0, BlockKind::Stone).unwrap();
        let counts = reg.counts_by_kind();
        assert_eq!(counts[&BlockKind::Grass], 2);
        assert_eq!(counts[&BlockKind::Stone], 1);
        assert!(!counts.contains_key(&BlockKind::Wood));
    }
}
