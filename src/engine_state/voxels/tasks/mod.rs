//! # Voxel Task System
//!
//! Deferred world generation, run a few tasks per tick by the
//! [`TaskManager`](crate::engine_state::task_management::TaskManager).
//!
//! Generation is two-pass: every `ChunkGenerationTask` writes its columns and
//! hands back `CaveCarvingTask`s as follow-ups, which therefore run only after
//! every chunk task published before them. `DemoStructuresTask` re-queues
//! itself once so it lands behind those caves.

pub mod cave_carving_task;
pub mod chunk_generation_task;
pub mod demo_structures_task;

pub use cave_carving_task::CaveCarvingTask;
pub use chunk_generation_task::ChunkGenerationTask;
pub use demo_structures_task::DemoStructuresTask;
