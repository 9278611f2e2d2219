//! Mesh generation for voxel chunks.
//!
//! This module converts the blocks of a chunk, seen through its 3x3 neighborhood,
//! into GPU-ready records.
//!
//! # Architecture
//! - [`SliceBitmask`]: exposed blocks of one type in one horizontal slice, one word per column
//! - [`is_occluded`]: the six-face visibility test shared by both meshers
//! - [`greedy_mesh`]: merges exposed blocks into boxes ([`GreedyVoxel`](crate::engine_state::rendering::GreedyVoxel))
//! - [`mesh_voxels`]: one record per exposed block ([`Voxel`](crate::engine_state::rendering::Voxel))
//! - [`ChunkMesh`]: the finished output of either mesher
//!
//! # Usage
//! ```no_run
//! use voxel_box_engine::engine_state::{
//!     rendering::{meshing::greedy_mesh, BlockPalette},
//!     voxels::{chunk::{Chunk, ChunkCoordinate}, neighborhood::Neighborhood},
//! };
//!
//! let chunk = Chunk::perlin(ChunkCoordinate::new(0, 0), 0);
//! let boxes = greedy_mesh(&Neighborhood::new(&chunk), chunk.position, &BlockPalette::default());
//! ```

mod bitmask;
mod greedy;
mod mesh;
mod occlusion;
mod voxel;

pub use bitmask::{run_pattern, trailing_ones, trailing_zeros, SliceBitmask, SLICE_WIDTH};
pub use greedy::{greedy_mesh, merge_section};
pub use mesh::*;
pub use occlusion::{is_occluded, FACE_OFFSETS};
pub use voxel::mesh_voxels;
