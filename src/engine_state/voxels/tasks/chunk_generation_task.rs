//! # Chunk Generation Task
//!
//! This module defines the `ChunkGenerationTask`, which writes every column of
//! one square chunk into the world and schedules the caves those columns asked
//! for.

use log::warn;

use crate::{
    core::StResource,
    engine_state::{
        task_management::task::{Task, TaskResult},
        voxels::{block::Coordinate, terrain::TerrainGenerator, world::VoxelWorld},
    },
};

use super::CaveCarvingTask;

/// A task that generates the columns of one chunk.
pub struct ChunkGenerationTask {
    /// Shared generator (noise and random stream)
    generator: StResource<TerrainGenerator>,
    /// The world the columns are written into
    world: StResource<VoxelWorld>,
    /// Minimum (x, z) corner of the chunk
    origin: (i32, i32),
    /// Width of the chunk in columns
    size: i32,
}

impl ChunkGenerationTask {
    /// Creates a new chunk generation task.
    pub fn new(
        generator: StResource<TerrainGenerator>,
        world: StResource<VoxelWorld>,
        origin: (i32, i32),
        size: i32,
    ) -> Self {
        ChunkGenerationTask {
            generator,
            world,
            origin,
            size,
        }
    }
}

impl Task for ChunkGenerationTask {
    fn label(&self) -> String {
        format!("chunk {:?}", self.origin)
    }

    fn process(&self) -> Box<dyn TaskResult> {
        let mut world = self.world.get_mut();
        let caves = match self
            .generator
            .get_mut()
            .generate_chunk(&mut world, self.origin, self.size)
        {
            Ok(caves) => caves,
            Err(e) => {
                warn!("Chunk {:?} left incomplete: {}", self.origin, e);
                Vec::new()
            }
        };

        Box::new(ChunkGenerationTaskResult {
            generator: self.generator.clone(),
            world: self.world.clone(),
            caves,
        })
    }
}

/// The result of a chunk generation task: the caves still to carve.
pub struct ChunkGenerationTaskResult {
    generator: StResource<TerrainGenerator>,
    world: StResource<VoxelWorld>,
    caves: Vec<Coordinate>,
}

impl TaskResult for ChunkGenerationTaskResult {
    fn handle_result(self: Box<Self>) -> Vec<Box<dyn Task>> {
        self.caves
            .into_iter()
            .map(|center| {
                Box::new(CaveCarvingTask::new(
                    self.generator.clone(),
                    self.world.clone(),
                    center,
                )) as Box<dyn Task>
            })
            .collect()
    }
}
