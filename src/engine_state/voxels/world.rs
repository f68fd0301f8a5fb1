//! # World Module
//!
//! This module provides `VoxelWorld`, the sparse block store at the heart of
//! the sandbox.
//!
//! ## Architecture
//!
//! Blocks live in a hash map keyed by integer coordinate. There is no entry for
//! air: a missing key *is* air. Every key equals the coordinate stored in its
//! value, so two blocks can never share a cell.
//!
//! Every mutation is mirrored to the scene surface the world was built with,
//! which keeps the renderable proxies in step with the stored blocks.
//!
//! ## Performance Considerations
//!
//! - `get`, `set` and `remove` are O(1) expected
//! - There is no chunk boundary in storage; chunks only batch generation work

use std::{collections::HashMap, fmt, rc::Rc};

use cgmath::Point3;

use super::block::{
    block_type::{BlockCatalog, BlockId, BlockType},
    cell_of, Block, Coordinate,
};
use crate::engine_state::scene::{NullScene, SceneSurface, VisualStyle};

/// Rejections raised by [`VoxelWorld::set`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorldError {
    /// The id is the air sentinel or is not declared in the catalog.
    InvalidBlock(BlockId),
}

impl fmt::Display for WorldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorldError::InvalidBlock(id) => write!(f, "block {id} cannot be placed"),
        }
    }
}

impl std::error::Error for WorldError {}

/// Sparse mapping from coordinate to placed block.
pub struct VoxelWorld {
    catalog: Rc<BlockCatalog>,
    blocks: HashMap<Coordinate, Block>,
    scene: Box<dyn SceneSurface>,
}

impl VoxelWorld {
    /// Creates an empty world that mirrors its contents to `scene`.
    pub fn new(catalog: Rc<BlockCatalog>, scene: Box<dyn SceneSurface>) -> Self {
        VoxelWorld {
            catalog,
            blocks: HashMap::new(),
            scene,
        }
    }

    /// Creates an empty world with no render collaborator.
    pub fn headless(catalog: Rc<BlockCatalog>) -> Self {
        Self::new(catalog, Box::new(NullScene))
    }

    /// The catalog block ids are resolved against.
    pub fn catalog(&self) -> &Rc<BlockCatalog> {
        &self.catalog
    }

    /// The render collaborator, for highlight and ghost updates.
    pub fn scene_mut(&mut self) -> &mut dyn SceneSurface {
        self.scene.as_mut()
    }

    /// Inserts or overwrites the block at `coordinate`.
    ///
    /// Fails with [`WorldError::InvalidBlock`] for the air sentinel or an id
    /// missing from the catalog; nothing is mutated in that case.
    pub fn set(&mut self, coordinate: Coordinate, id: BlockId) -> Result<(), WorldError> {
        let block_type = self.resolve(id)?;
        self.insert(coordinate, block_type);
        Ok(())
    }

    /// Inserts `id` only if the cell is empty. Returns whether it was placed.
    pub fn set_if_empty(&mut self, coordinate: Coordinate, id: BlockId) -> Result<bool, WorldError> {
        let block_type = self.resolve(id)?;
        if self.blocks.contains_key(&coordinate) {
            return Ok(false);
        }
        self.insert(coordinate, block_type);
        Ok(true)
    }

    /// Removes the block at `coordinate`, returning its type so the caller can
    /// restock it. Returns `None` (a no-op) when the cell is already empty.
    pub fn remove(&mut self, coordinate: Coordinate) -> Option<Rc<BlockType>> {
        let block = self.blocks.remove(&coordinate)?;
        self.scene.remove_renderable(coordinate);
        Some(block.block_type)
    }

    /// The block at `coordinate`, if any.
    pub fn get(&self, coordinate: Coordinate) -> Option<&Block> {
        self.blocks.get(&coordinate)
    }

    /// Whether any block (solid or not) occupies `coordinate`.
    pub fn contains(&self, coordinate: Coordinate) -> bool {
        self.blocks.contains_key(&coordinate)
    }

    /// Whether a solid block occupies the cell containing `point`.
    ///
    /// Each axis is floored independently, never rounded.
    pub fn is_solid_at(&self, point: Point3<f32>) -> bool {
        self.is_solid_cell(cell_of(point))
    }

    /// Whether a solid block occupies `coordinate`.
    pub fn is_solid_cell(&self, coordinate: Coordinate) -> bool {
        self.blocks
            .get(&coordinate)
            .map(Block::is_solid)
            .unwrap_or(false)
    }

    /// The highest occupied y in the column `(x, z)`, if any.
    pub fn top_at(&self, x: i32, z: i32) -> Option<i32> {
        self.blocks
            .keys()
            .filter(|c| c.x == x && c.z == z)
            .map(|c| c.y)
            .max()
    }

    /// Number of stored blocks.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Whether the world holds no blocks.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Iterates over every stored block in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = &Block> {
        self.blocks.values()
    }

    /// Removes every block, telling the scene about each one. Used on world
    /// teardown (stop/restart).
    pub fn clear(&mut self) {
        for (coordinate, _) in self.blocks.drain() {
            self.scene.remove_renderable(coordinate);
        }
    }

    fn resolve(&self, id: BlockId) -> Result<Rc<BlockType>, WorldError> {
        if id.is_air() {
            return Err(WorldError::InvalidBlock(id));
        }
        self.catalog
            .get(id)
            .cloned()
            .ok_or(WorldError::InvalidBlock(id))
    }

    fn insert(&mut self, coordinate: Coordinate, block_type: Rc<BlockType>) {
        let style = VisualStyle::from(block_type.as_ref());
        let previous = self
            .blocks
            .insert(coordinate, Block::new(coordinate, block_type));
        if previous.is_some() {
            self.scene.remove_renderable(coordinate);
        }
        self.scene.add_renderable(coordinate, style);
    }
}
