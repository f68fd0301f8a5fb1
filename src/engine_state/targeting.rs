//! # Block Targeting
//!
//! Ray-based selection of the block the player is looking at, and the edit
//! protocol built on top of it.
//!
//! ## Per tick
//! 1. The highlight on the previously targeted block is reverted
//! 2. A ray is cast from the eye along the view direction
//! 3. On a hit, the block is highlighted and the placement cell is the cell
//!    across the hit face. The ghost is shown there if no solid block is in it
//! 4. On a miss, the selection is cleared and the ghost hidden
//!
//! Block `c` occupies the unit cube `[c, c + 1)`. Taking the neighbor across
//! the hit face gives the same cell as rounding `hit point + normal / 2`
//! against cubes centered on integers, without the tie-breaking trouble at
//! cube edges.

use std::fmt;

use cgmath::{InnerSpace, Point3, Vector3};
use log::debug;

use crate::engine_state::{
    inventory::Inventory,
    player_state::camera::Camera,
    scene::HighlightStyle,
    voxels::{
        block::{block_side::BlockSide, block_type::BlockId, cell_of, Coordinate},
        world::{VoxelWorld, WorldError},
    },
};

/// Where a ray met a block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// The block that was hit.
    pub coordinate: Coordinate,
    /// The face the ray entered through.
    pub side: BlockSide,
    /// The entry point on that face.
    pub point: Point3<f32>,
    /// Distance from the ray origin.
    pub distance: f32,
}

impl RayHit {
    /// Outward normal of the hit face.
    pub fn normal(&self) -> Vector3<i32> {
        self.side.normal()
    }

    /// The empty cell adjacent to the hit face.
    pub fn placement(&self) -> Coordinate {
        self.side.neighbor(self.coordinate)
    }
}

/// Something that can answer "what does this ray hit first".
pub trait RaySurface {
    /// Nearest block hit by the ray from `origin` along `direction`.
    fn cast(&self, world: &VoxelWorld, origin: Point3<f32>, direction: Vector3<f32>) -> Option<RayHit>;
}

/// Voxel traversal (Amanatides & Woo) through the world's cells.
///
/// Any stored block stops the ray, solid or not. The cell containing the
/// origin is skipped, so a block around the eye never shadows everything.
#[derive(Debug, Clone, Copy)]
pub struct VoxelRaycaster {
    /// Farthest distance considered.
    pub max_distance: f32,
}

impl VoxelRaycaster {
    /// Creates a raycaster reaching `max_distance`.
    pub fn new(max_distance: f32) -> Self {
        Self { max_distance }
    }
}

impl RaySurface for VoxelRaycaster {
    fn cast(&self, world: &VoxelWorld, origin: Point3<f32>, direction: Vector3<f32>) -> Option<RayHit> {
        if direction.magnitude2() == 0.0 || world.is_empty() {
            return None;
        }
        let direction = direction.normalize();
        let mut cell = cell_of(origin);

        let axis = |o: f32, d: f32, c: i32| -> (i32, f32, f32) {
            if d > 0.0 {
                (1, (c as f32 + 1.0 - o) / d, 1.0 / d)
            } else if d < 0.0 {
                (-1, (c as f32 - o) / d, -1.0 / d)
            } else {
                (0, f32::INFINITY, f32::INFINITY)
            }
        };
        let (step_x, mut t_max_x, delta_x) = axis(origin.x, direction.x, cell.x);
        let (step_y, mut t_max_y, delta_y) = axis(origin.y, direction.y, cell.y);
        let (step_z, mut t_max_z, delta_z) = axis(origin.z, direction.z, cell.z);

        loop {
            let (distance, side) = if t_max_x <= t_max_y && t_max_x <= t_max_z {
                cell.x += step_x;
                let t = t_max_x;
                t_max_x += delta_x;
                (t, if step_x > 0 { BlockSide::LEFT } else { BlockSide::RIGHT })
            } else if t_max_y <= t_max_z {
                cell.y += step_y;
                let t = t_max_y;
                t_max_y += delta_y;
                (t, if step_y > 0 { BlockSide::BOTTOM } else { BlockSide::TOP })
            } else {
                cell.z += step_z;
                let t = t_max_z;
                t_max_z += delta_z;
                (t, if step_z > 0 { BlockSide::BACK } else { BlockSide::FRONT })
            };

            if distance > self.max_distance {
                return None;
            }
            if world.contains(cell) {
                return Some(RayHit {
                    coordinate: cell,
                    side,
                    point: origin + direction * distance,
                    distance,
                });
            }
        }
    }
}

/// Routine reasons an edit command did nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditError {
    /// The selected type is air or not in the catalog.
    InvalidBlock(BlockId),
    /// Something already occupies the placement cell.
    OccupiedCell(Coordinate),
    /// No stock of the selected type.
    InsufficientInventory(BlockId),
    /// The targeted block cannot be removed.
    Unbreakable(Coordinate),
    /// The player is not looking at any block.
    NoTarget,
    /// The session is not running.
    NotRunning,
}

impl fmt::Display for EditError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditError::InvalidBlock(id) => write!(f, "block {id} cannot be placed"),
            EditError::OccupiedCell(c) => write!(f, "cell {:?} is occupied", c),
            EditError::InsufficientInventory(id) => write!(f, "no {id} left"),
            EditError::Unbreakable(c) => write!(f, "block at {:?} is unbreakable", c),
            EditError::NoTarget => write!(f, "nothing targeted"),
            EditError::NotRunning => write!(f, "session is not running"),
        }
    }
}

impl std::error::Error for EditError {}

impl From<WorldError> for EditError {
    fn from(e: WorldError) -> Self {
        match e {
            WorldError::InvalidBlock(id) => EditError::InvalidBlock(id),
        }
    }
}

/// A successful edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    /// A block of this type was placed here.
    Placed(Coordinate, BlockId),
    /// A block of this type was removed from here.
    Removed(Coordinate, BlockId),
    /// The command was valid but changed nothing (e.g. the cell was already empty).
    Nothing,
}

/// The current selection: targeted block plus placement cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Selection {
    /// What the ray hit.
    pub hit: RayHit,
    /// Where a placement would go.
    pub placement: Coordinate,
    /// Whether the ghost is shown at `placement`.
    pub ghost_visible: bool,
}

/// Tracks the targeted block and applies place/remove commands to it.
pub struct BlockTargeter {
    ray: Box<dyn RaySurface>,
    selection: Option<Selection>,
}

impl BlockTargeter {
    /// Creates a targeter with nothing selected.
    pub fn new(ray: Box<dyn RaySurface>) -> Self {
        BlockTargeter {
            ray,
            selection: None,
        }
    }

    /// The current selection, if any.
    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    /// Recomputes the selection from `camera` and mirrors it to the scene.
    ///
    /// Returns whether the targeted block or the ghost cell changed.
    pub fn update(&mut self, world: &mut VoxelWorld, camera: &Camera, ghost_color: u32) -> bool {
        let previous = self.selection.take();
        if let Some(previous) = &previous {
            if world.contains(previous.hit.coordinate) {
                world.scene_mut().set_highlight(previous.hit.coordinate, None);
            }
        }

        let hit = self.ray.cast(world, camera.position, camera.forward());
        self.selection = hit.map(|hit| {
            let placement = hit.placement();
            Selection {
                hit,
                placement,
                ghost_visible: !world.is_solid_cell(placement),
            }
        });

        match &self.selection {
            Some(selection) => {
                world
                    .scene_mut()
                    .set_highlight(selection.hit.coordinate, Some(HighlightStyle::Selected));
                let ghost = selection.ghost_visible.then_some(selection.placement);
                world.scene_mut().set_ghost(ghost, ghost_color);
            }
            None => world.scene_mut().set_ghost(None, ghost_color),
        }

        let key = |s: &Option<Selection>| {
            s.as_ref()
                .map(|s| (s.hit.coordinate, s.placement, s.ghost_visible))
        };
        key(&previous) != key(&self.selection)
    }

    /// Drops the selection without touching the scene (used on world teardown).
    pub fn clear(&mut self) {
        self.selection = None;
    }

    /// Places the selected block type at the placement cell.
    ///
    /// Requires a target, an empty placement cell and stock of the type. One
    /// unit is consumed on success. Nothing changes on failure.
    pub fn place(&mut self, world: &mut VoxelWorld, inventory: &mut Inventory) -> Result<EditOutcome, EditError> {
        let selection = self.selection.as_mut().ok_or(EditError::NoTarget)?;
        let cell = selection.placement;
        let id = inventory.selected();

        if id.is_air() || world.catalog().get(id).is_none() {
            return Err(EditError::InvalidBlock(id));
        }
        if world.contains(cell) {
            return Err(EditError::OccupiedCell(cell));
        }
        if !inventory.has(id) {
            return Err(EditError::InsufficientInventory(id));
        }

        world.set(cell, id)?;
        inventory
            .take(id)
            .map_err(|e| EditError::InsufficientInventory(e.0))?;
        selection.ghost_visible = false;
        world.scene_mut().set_ghost(None, 0);
        debug!("Placed {} at {:?}", id, cell);
        Ok(EditOutcome::Placed(cell, id))
    }

    /// Removes the targeted block and restocks its type.
    ///
    /// Unbreakable blocks are refused and never restocked. A target that has
    /// already disappeared is a no-op.
    pub fn remove(&mut self, world: &mut VoxelWorld, inventory: &mut Inventory) -> Result<EditOutcome, EditError> {
        let selection = self.selection.as_ref().ok_or(EditError::NoTarget)?;
        let cell = selection.hit.coordinate;

        let unbreakable = match world.get(cell) {
            Some(block) => block.block_type.unbreakable,
            None => return Ok(EditOutcome::Nothing),
        };
        if unbreakable {
            return Err(EditError::Unbreakable(cell));
        }

        let Some(removed) = world.remove(cell) else {
            return Ok(EditOutcome::Nothing);
        };
        inventory.add(removed.id);
        self.selection = None;
        world.scene_mut().set_ghost(None, 0);
        debug!("Removed {} at {:?}", removed.id, cell);
        Ok(EditOutcome::Removed(cell, removed.id))
    }
}
