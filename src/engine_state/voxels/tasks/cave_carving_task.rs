//! # Cave Carving Task

use crate::{
    core::StResource,
    engine_state::{
        task_management::task::{Done, Task, TaskResult},
        voxels::{block::Coordinate, terrain::TerrainGenerator, world::VoxelWorld},
    },
};

/// Removes a sphere of blocks around `center`.
pub struct CaveCarvingTask {
    generator: StResource<TerrainGenerator>,
    world: StResource<VoxelWorld>,
    center: Coordinate,
}

impl CaveCarvingTask {
    /// Creates a new cave carving task.
    pub fn new(
        generator: StResource<TerrainGenerator>,
        world: StResource<VoxelWorld>,
        center: Coordinate,
    ) -> Self {
        CaveCarvingTask {
            generator,
            world,
            center,
        }
    }
}

impl Task for CaveCarvingTask {
    fn label(&self) -> String {
        format!("cave {:?}", self.center)
    }

    fn process(&self) -> Box<dyn TaskResult> {
        let mut world = self.world.get_mut();
        self.generator.get_mut().carve_cave(&mut world, self.center);
        Box::new(Done)
    }
}
