//! # Core Module
//!
//! Shared-ownership primitives used throughout the sandbox.
//!
//! The simulation is single-threaded: the session, the deferred generation
//! tasks and the presentation layer all run on one logical thread. They still
//! need to share a few long-lived values (the voxel world, the terrain
//! generator, recorded scene commands), which is what `StResource` is for.
//!
//! ## Usage
//! ```rust
//! use voxel_sandbox::core::StResource;
//!
//! let counter = StResource::new(0);
//! let alias = counter.clone();
//! *alias.get_mut() += 1;
//! assert_eq!(*counter.get(), 1);
//! ```

pub mod st_resource;

pub use st_resource::StResource;
