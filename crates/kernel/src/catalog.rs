use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use blockworld_common::config::rgb;
use blockworld_common::{BlockError, BlockKind};

/// A handle referencing a material owned by the rendering collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MaterialHandle(pub u32);

/// Material description handed to the renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub name: String,
    pub base_color: [f32; 3],
    pub opacity: f32,
}

/// Per-face materials of a block, ordered +x, -x, +y, -y, +z, -z.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appearance {
    pub faces: [MaterialHandle; 6],
}

impl Appearance {
    pub fn uniform(material: MaterialHandle) -> Self {
        Self {
            faces: [material; 6],
        }
    }

    /// Distinct top and bottom materials with one material on all four sides.
    pub fn capped(side: MaterialHandle, top: MaterialHandle, bottom: MaterialHandle) -> Self {
        Self {
            faces: [side, side, top, bottom, side, side],
        }
    }

    pub fn top(&self) -> MaterialHandle {
        self.faces[2]
    }
}

/// Static mapping from block kind to its renderable appearance.
///
/// The registry consults the catalog on every create; kinds missing here are
/// rejected with [`BlockError::InvalidBlockType`].
#[derive(Debug, Clone, Default)]
pub struct BlockCatalog {
    materials: Vec<Material>,
    appearances: BTreeMap<BlockKind, Appearance>,
}

impl BlockCatalog {
    /// An empty catalog. Every create fails until kinds are registered.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The five stock block kinds with their face layouts.
    pub fn standard() -> Self {
        let mut catalog = Self::empty();
        let dirt = catalog.add_material("dirt", rgb(0x8b4513), 1.0);
        let grass_top = catalog.add_material("grass_top", rgb(0x228b22), 1.0);
        let grass_side = catalog.add_material("grass_side", rgb(0x8b4513), 1.0);
        let stone = catalog.add_material("stone", rgb(0x808080), 1.0);
        let wood_side = catalog.add_material("wood_side", rgb(0x8b4513), 1.0);
        let wood_top = catalog.add_material("wood_top", rgb(0x8b4513), 1.0);
        let leaves = catalog.add_material("leaves", rgb(0x228b22), 0.95);

        catalog.register(BlockKind::Dirt, Appearance::uniform(dirt));
        catalog.register(
            BlockKind::Grass,
            Appearance::capped(grass_side, grass_top, dirt),
        );
        catalog.register(BlockKind::Stone, Appearance::uniform(stone));
        catalog.register(
            BlockKind::Wood,
            Appearance::capped(wood_side, wood_top, wood_top),
        );
        catalog.register(BlockKind::Leaves, Appearance::uniform(leaves));
        catalog
    }

    /// Append a material and return its handle.
    pub fn add_material(&mut self, name: &str, base_color: [f32; 3], opacity: f32) -> MaterialHandle {
        let handle = MaterialHandle(self.materials.len() as u32);
        self.materials.push(Material {
            name: name.to_string(),
            base_color,
            opacity,
        });
        handle
    }

    /// Register or replace the appearance of a kind.
    pub fn register(&mut self, kind: BlockKind, appearance: Appearance) {
        self.appearances.insert(kind, appearance);
    }

    /// Resolve the appearance for `kind`.
    pub fn appearance(&self, kind: BlockKind) -> Result<Appearance, BlockError> {
        self.appearances
            .get(&kind)
            .copied()
            .ok_or_else(|| BlockError::InvalidBlockType(kind.name().to_string()))
    }

    pub fn material(&self, handle: MaterialHandle) -> Option<&Material> {
        self.materials.get(handle.0 as usize)
    }

    pub fn materials(&self) -> &[Material] {
        &self.materials
    }

    pub fn contains(&self, kind: BlockKind) -> bool {
        self.appearances.contains_key(&kind)
    }
}
