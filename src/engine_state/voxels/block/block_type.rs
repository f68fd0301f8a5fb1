//! # Block Type Module
//!
//! This module defines the immutable block descriptors and the catalog that
//! holds them. The catalog is built once at startup from settings and is never
//! mutated afterwards; every placed block refers back into it.

use std::{collections::HashMap, fmt, rc::Rc};

use serde::{Deserialize, Serialize};

/// Small integer identifying a block type inside the catalog.
///
/// Id `0` is reserved for the air sentinel. Air is never stored in the world:
/// the absence of a block *is* air.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(pub u8);

impl BlockId {
    /// The reserved air sentinel.
    pub const AIR: BlockId = BlockId(0);
    /// Unbreakable floor layer at y = 0.
    pub const BEDROCK: BlockId = BlockId(1);
    /// Bulk underground material.
    pub const STONE: BlockId = BlockId(2);
    /// Transition layer below the surface.
    pub const DIRT: BlockId = BlockId(3);
    /// Forest and plains surface.
    pub const GRASS: BlockId = BlockId(4);
    /// Desert surface.
    pub const SAND: BlockId = BlockId(5);
    /// Tree trunks.
    pub const WOOD: BlockId = BlockId(6);
    /// Tree canopies. Transparent but still solid.
    pub const LEAVES: BlockId = BlockId(7);
    /// Pools. Never blocks movement.
    pub const WATER: BlockId = BlockId(8);
    /// Most common ore.
    pub const COAL_ORE: BlockId = BlockId(9);
    /// Mid-depth ore.
    pub const IRON_ORE: BlockId = BlockId(10);
    /// Rare deep ore.
    pub const GOLD_ORE: BlockId = BlockId(11);

    /// Whether this id is the air sentinel.
    pub fn is_air(self) -> bool {
        self == BlockId::AIR
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

fn default_solid() -> bool {
    true
}

/// Immutable descriptor of a kind of block.
///
/// `solid` decides participation in collision, `transparent` is only a
/// rendering hint, and `unbreakable` blocks cannot be removed by the player.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BlockType {
    /// Unique id inside the catalog.
    pub id: BlockId,
    /// Display name shown by the presentation layer.
    pub name: String,
    /// 0xRRGGBB color used for the renderable proxy and the ghost preview.
    pub color: u32,
    /// Participates in collision.
    #[serde(default = "default_solid")]
    pub solid: bool,
    /// Rendering hint only; has no effect on collision.
    #[serde(default)]
    pub transparent: bool,
    /// Cannot be removed by edit commands or carved by caves.
    #[serde(default)]
    pub unbreakable: bool,
}

impl BlockType {
    /// Creates an opaque, solid, breakable block type.
    pub fn new(id: BlockId, name: impl Into<String>, color: u32) -> Self {
        Self {
            id,
            name: name.into(),
            color,
            solid: true,
            transparent: false,
            unbreakable: false,
        }
    }

    /// Marks the type as see-through.
    pub fn transparent(mut self) -> Self {
        self.transparent = true;
        self
    }

    /// Marks the type as non-solid.
    pub fn non_solid(mut self) -> Self {
        self.solid = false;
        self
    }

    /// Marks the type as unbreakable.
    pub fn unbreakable(mut self) -> Self {
        self.unbreakable = true;
        self
    }

    /// The air sentinel descriptor held at id 0 of every catalog.
    pub fn air() -> Self {
        Self {
            id: BlockId::AIR,
            name: String::from("Air"),
            color: 0x000000,
            solid: false,
            transparent: true,
            unbreakable: false,
        }
    }

    /// The block types shipped with the sandbox, in hotbar order.
    pub fn default_types() -> Vec<BlockType> {
        vec![
            BlockType::new(BlockId::STONE, "Stone", 0x888888),
            BlockType::new(BlockId::GRASS, "Grass", 0x3d9970),
            BlockType::new(BlockId::WOOD, "Wood", 0x8b4513),
            BlockType::new(BlockId::SAND, "Sand", 0xffd700),
            BlockType::new(BlockId::WATER, "Water", 0x0066cc)
                .transparent()
                .non_solid(),
            BlockType::new(BlockId::DIRT, "Dirt", 0x6b4423),
            BlockType::new(BlockId::LEAVES, "Leaves", 0x2e8b57).transparent(),
            BlockType::new(BlockId::COAL_ORE, "Coal Ore", 0x333333),
            BlockType::new(BlockId::IRON_ORE, "Iron Ore", 0xd8af93),
            BlockType::new(BlockId::GOLD_ORE, "Gold Ore", 0xfcee4b),
            BlockType::new(BlockId::BEDROCK, "Bedrock", 0x222222).unbreakable(),
        ]
    }
}

/// Startup-time errors raised while building a [`BlockCatalog`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// Two entries share the same id.
    DuplicateId(BlockId),
    /// An entry tried to claim the air sentinel id.
    ReservedId(BlockId),
    /// A type required by a consumer (e.g. terrain generation) is missing.
    MissingType(BlockId),
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::DuplicateId(id) => write!(f, "block id {id} is declared twice"),
            CatalogError::ReservedId(id) => write!(f, "block id {id} is reserved for air"),
            CatalogError::MissingType(id) => write!(f, "block id {id} is required but not declared"),
        }
    }
}

impl std::error::Error for CatalogError {}

/// Process-wide, read-only table of block types.
///
/// Lookups by id are O(1). Declaration order is preserved and doubles as the
/// hotbar order.
#[derive(Debug)]
pub struct BlockCatalog {
    air: Rc<BlockType>,
    by_id: HashMap<BlockId, Rc<BlockType>>,
    ordered: Vec<Rc<BlockType>>,
}

impl BlockCatalog {
    /// Builds a catalog, rejecting duplicate ids and any use of the air id.
    pub fn new(types: Vec<BlockType>) -> Result<Self, CatalogError> {
        let mut by_id = HashMap::with_capacity(types.len());
        let mut ordered = Vec::with_capacity(types.len());

        for block_type in types {
            if block_type.id.is_air() {
                return Err(CatalogError::ReservedId(block_type.id));
            }
            let block_type = Rc::new(block_type);
            if by_id.insert(block_type.id, block_type.clone()).is_some() {
                return Err(CatalogError::DuplicateId(block_type.id));
            }
            ordered.push(block_type);
        }

        Ok(Self {
            air: Rc::new(BlockType::air()),
            by_id,
            ordered,
        })
    }

    /// Looks up a block type. Air is not returned: it is not placeable.
    pub fn get(&self, id: BlockId) -> Option<&Rc<BlockType>> {
        self.by_id.get(&id)
    }

    /// The air sentinel descriptor.
    pub fn air(&self) -> &Rc<BlockType> {
        &self.air
    }

    /// Checks that every id in `required` is declared.
    pub fn require(&self, required: &[BlockId]) -> Result<(), CatalogError> {
        match required.iter().find(|id| !self.by_id.contains_key(id)) {
            Some(id) => Err(CatalogError::MissingType(*id)),
            None => Ok(()),
        }
    }

    /// Block types in declaration (hotbar) order.
    pub fn hotbar(&self) -> impl Iterator<Item = &Rc<BlockType>> {
        self.ordered.iter()
    }

    /// The block type in the given hotbar slot, if any.
    pub fn slot(&self, index: usize) -> Option<&Rc<BlockType>> {
        self.ordered.get(index)
    }

    /// Number of declared (non-air) types.
    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    /// Whether no types are declared.
    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }
}

impl Default for BlockCatalog {
    fn default() -> Self {
        let types = BlockType::default_types();
        let mut by_id = HashMap::with_capacity(types.len());
        let ordered: Vec<Rc<BlockType>> = types.into_iter().map(Rc::new).collect();
        for block_type in &ordered {
            by_id.insert(block_type.id, block_type.clone());
        }
        Self {
            air: Rc::new(BlockType::air()),
            by_id,
            ordered,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_catalog_is_valid() {
        let catalog = BlockCatalog::new(BlockType::default_types()).unwrap();
        assert_eq!(catalog.len(), BlockType::default_types().len());
        assert!(catalog.get(BlockId::BEDROCK).unwrap().unbreakable);
        assert!(!catalog.get(BlockId::WATER).unwrap().solid);
        assert!(catalog.get(BlockId::LEAVES).unwrap().solid);
        assert!(catalog.get(BlockId::AIR).is_none());
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let types = vec![
            BlockType::new(BlockId(3), "A", 0),
            BlockType::new(BlockId(3), "B", 0),
        ];
        assert_eq!(
            BlockCatalog::new(types).unwrap_err(),
            CatalogError::DuplicateId(BlockId(3))
        );
    }

    #[test]
    fn air_id_is_reserved() {
        let types = vec![BlockType::new(BlockId::AIR, "Void", 0)];
        assert_eq!(
            BlockCatalog::new(types).unwrap_err(),
            CatalogError::ReservedId(BlockId::AIR)
        );
    }

    #[test]
    fn hotbar_follows_declaration_order() {
        let catalog = BlockCatalog::default();
        let first: Vec<BlockId> = catalog.hotbar().take(3).map(|t| t.id).collect();
        assert_eq!(first, vec![BlockId::STONE, BlockId::GRASS, BlockId::WOOD]);
        assert_eq!(catalog.slot(3).unwrap().id, BlockId::SAND);
        assert!(catalog.slot(99).is_none());
    }

    #[test]
    fn require_reports_the_missing_type() {
        let catalog = BlockCatalog::new(vec![BlockType::new(BlockId::STONE, "Stone", 0)]).unwrap();
        assert!(catalog.require(&[BlockId::STONE]).is_ok());
        assert_eq!(
            catalog.require(&[BlockId::STONE, BlockId::DIRT]),
            Err(CatalogError::MissingType(BlockId::DIRT))
        );
    }

    #[test]
    fn block_type_deserializes_with_defaults() {
        let json = r#"{ "id": 12, "name": "Glass", "color": 11206655, "transparent": true }"#;
        let glass: BlockType = serde_json::from_str(json).unwrap();
        assert_eq!(glass.id, BlockId(12));
        assert!(glass.solid);
        assert!(glass.transparent);
        assert!(!glass.unbreakable);
    }
}
