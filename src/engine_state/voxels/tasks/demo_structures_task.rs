//! # Demo Structures Task

use log::warn;

use crate::{
    core::StResource,
    engine_state::{
        task_management::task::{Done, Task, TaskResult},
        voxels::{terrain::TerrainGenerator, world::VoxelWorld},
    },
};

/// Builds the sand pyramid and the water pool.
///
/// Published after the chunk tasks, the first run only re-queues the task, so
/// the build happens behind every cave those chunks scheduled.
pub struct DemoStructuresTask {
    generator: StResource<TerrainGenerator>,
    world: StResource<VoxelWorld>,
    deferred: bool,
}

impl DemoStructuresTask {
    /// Creates a task that defers itself once before building.
    pub fn new(generator: StResource<TerrainGenerator>, world: StResource<VoxelWorld>) -> Self {
        DemoStructuresTask {
            generator,
            world,
            deferred: true,
        }
    }
}

/// Re-queues the build behind the work queued meanwhile.
struct Requeue(DemoStructuresTask);

impl TaskResult for Requeue {
    fn handle_result(self: Box<Self>) -> Vec<Box<dyn Task>> {
        vec![Box::new(self.0)]
    }
}

impl Task for DemoStructuresTask {
    fn label(&self) -> String {
        "demo structures".to_string()
    }

    fn process(&self) -> Box<dyn TaskResult> {
        if self.deferred {
            return Box::new(Requeue(DemoStructuresTask {
                generator: self.generator.clone(),
                world: self.world.clone(),
                deferred: false,
            }));
        }

        let mut world = self.world.get_mut();
        if let Err(e) = self.generator.get_mut().generate_demo_structures(&mut world) {
            warn!("Demo structures left incomplete: {}", e);
        }
        Box::new(Done)
    }
}
