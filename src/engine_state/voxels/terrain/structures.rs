//! Trees, caves and the demo structures.

use cgmath::Point3;
use log::debug;

use super::TerrainGenerator;
use crate::engine_state::voxels::{
    block::{block_type::BlockId, Coordinate},
    world::{VoxelWorld, WorldError},
};

/// Distance of the demo structures from the origin along x.
const DEMO_OFFSET: i32 = 15;
/// Levels of the sand pyramid.
const PYRAMID_LEVELS: i32 = 5;
/// Half-width of the water pool.
const POOL_HALF_WIDTH: i32 = 3;

impl TerrainGenerator {
    /// Grows a tree whose trunk starts at `base`.
    ///
    /// The trunk is 4 to 6 wood blocks. Leaves fill the cells within Manhattan
    /// distance 3 of the trunk top, except the two cells directly above the top
    /// that the trunk passes through. Leaves never overwrite existing blocks.
    pub fn generate_tree(&mut self, world: &mut VoxelWorld, base: Coordinate) -> Result<(), WorldError> {
        let trunk_height = self.rng.i32(4..=6);
        for dy in 0..trunk_height {
            world.set(Point3::new(base.x, base.y + dy, base.z), BlockId::WOOD)?;
        }

        let crown = base.y + trunk_height - 1;
        for dx in -2i32..=2 {
            for dz in -2i32..=2 {
                for dy in 0i32..3 {
                    if dx.abs() + dz.abs() + dy >= 4 {
                        continue;
                    }
                    if dx == 0 && dz == 0 && dy < 2 {
                        continue;
                    }
                    world.set_if_empty(Point3::new(base.x + dx, crown + dy, base.z + dz), BlockId::LEAVES)?;
                }
            }
        }
        Ok(())
    }

    /// Removes every breakable block within a random radius of 3 to 6 around
    /// `center`. Returns how many blocks were removed.
    pub fn carve_cave(&mut self, world: &mut VoxelWorld, center: Coordinate) -> usize {
        let radius = self.rng.i32(3..=6);
        let limit = radius * radius;
        let mut removed = 0;
        for dx in -radius..=radius {
            for dy in -radius..=radius {
                for dz in -radius..=radius {
                    if dx * dx + dy * dy + dz * dz > limit {
                        continue;
                    }
                    let cell = Point3::new(center.x + dx, center.y + dy, center.z + dz);
                    let unbreakable = match world.get(cell) {
                        Some(block) => block.block_type.unbreakable,
                        None => continue,
                    };
                    if !unbreakable && world.remove(cell).is_some() {
                        removed += 1;
                    }
                }
            }
        }
        debug!("Carved cave at {:?} (radius {}): {} blocks", center, radius, removed);
        removed
    }

    /// Builds a hollow stepped sand pyramid east of the origin and a water pool
    /// west of it, both resting on the generated surface.
    pub fn generate_demo_structures(&mut self, world: &mut VoxelWorld) -> Result<(), WorldError> {
        let ground = self.height_at(DEMO_OFFSET, 0);
        for level in 0..PYRAMID_LEVELS {
            let size = PYRAMID_LEVELS - level;
            for x in -size..=size {
                for z in -size..=size {
                    if x.abs() == size || z.abs() == size {
                        world.set(
                            Point3::new(DEMO_OFFSET + x, ground + level + 1, z),
                            BlockId::SAND,
                        )?;
                    }
                }
            }
        }

        for x in -POOL_HALF_WIDTH..=POOL_HALF_WIDTH {
            for z in -POOL_HALF_WIDTH..=POOL_HALF_WIDTH {
                let column_x = x - DEMO_OFFSET;
                let surface = self.height_at(column_x, z);
                world.set(Point3::new(column_x, surface, z), BlockId::WATER)?;
            }
        }
        debug!("Built demo structures");
        Ok(())
    }
}
