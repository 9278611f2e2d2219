//! Rendering side of the voxel engine.
//!
//! This module turns chunks into GPU-ready records: the meshers, the record
//! layouts, the block palette and the manager that keeps finished meshes. Drawing
//! the records is left to the host application.

pub mod meshing;
pub mod tasks;
pub mod texture;
mod vertex;

// Re-export commonly used types
pub use meshing::{ChunkMesh, MeshManager, MeshRecords};
pub use texture::{BlockPalette, PaletteError};
pub use vertex::{GreedyVoxel, Voxel};
