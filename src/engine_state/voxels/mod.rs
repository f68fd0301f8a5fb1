//! # Voxels
//!
//! Representation, storage and generation of the block world.
//!
//! * **Block**: coordinates, block type descriptors, faces
//! * **World**: the sparse coordinate-to-block store
//! * **Terrain**: procedural height, biome, ores, trees, caves
//! * **Tasks**: deferred generation work for the task manager
//!
//! ## Data Flow
//!
//! 1. The session publishes one `ChunkGenerationTask` per chunk
//! 2. Chunk tasks write columns through `VoxelWorld::set`, which mirrors each
//!    block to the scene surface
//! 3. Caves requested by the columns are carved once every chunk exists
//! 4. Afterwards only edit commands mutate the world

pub mod block;
pub mod tasks;
pub mod terrain;
pub mod world;
