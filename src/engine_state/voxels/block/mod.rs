//! # Block Module
//!
//! Core block-related types: coordinates, block type descriptors, faces, and
//! the placed-block record stored by the world.

use std::rc::Rc;

use cgmath::Point3;

use block_type::{BlockId, BlockType};

pub mod block_side;
pub mod block_type;

/// Integer cell coordinate; the canonical identity of a block.
///
/// The cell `c` covers the half-open unit cube `[c, c + 1)` on every axis, so a
/// continuous point maps to its cell by flooring each component.
pub type Coordinate = Point3<i32>;

/// Maps a continuous point to the cell containing it (per-axis floor).
pub fn cell_of(point: Point3<f32>) -> Coordinate {
    Point3::new(
        point.x.floor() as i32,
        point.y.floor() as i32,
        point.z.floor() as i32,
    )
}

/// A placed block: a coordinate plus a reference into the block catalog.
///
/// Blocks are owned exclusively by `VoxelWorld`.
#[derive(Clone, Debug)]
pub struct Block {
    /// Where the block sits. Always equal to its key in the world map.
    pub coordinate: Coordinate,
    /// The catalog entry describing the block.
    pub block_type: Rc<BlockType>,
}

impl Block {
    /// Creates a block record.
    pub fn new(coordinate: Coordinate, block_type: Rc<BlockType>) -> Self {
        Block {
            coordinate,
            block_type,
        }
    }

    /// Shorthand for `self.block_type.id`.
    pub fn id(&self) -> BlockId {
        self.block_type.id
    }

    /// Whether the block participates in collision.
    pub fn is_solid(&self) -> bool {
        self.block_type.solid
    }
}
