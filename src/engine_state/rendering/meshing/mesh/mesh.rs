//! Mesh data structures for meshed chunks.
//!
//! A [`ChunkMesh`] is the finished output of meshing one chunk: the records in
//! emission order plus the chunk's bounding box for culling.

use crate::engine_state::{
    camera_state::Aabb,
    rendering::{GreedyVoxel, Voxel},
    voxels::chunk::ChunkCoordinate,
};

/// The records of one chunk mesh, merged or per block.
#[derive(Debug, Clone, PartialEq)]
pub enum MeshRecords {
    Greedy(Vec<GreedyVoxel>),
    Voxels(Vec<Voxel>),
}

impl MeshRecords {
    /// Number of records.
    pub fn len(&self) -> usize {
        match self {
            MeshRecords::Greedy(records) => records.len(),
            MeshRecords::Voxels(records) => records.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Size of a single record in bytes.
    pub fn record_size(&self) -> usize {
        match self {
            MeshRecords::Greedy(_) => std::mem::size_of::<GreedyVoxel>(),
            MeshRecords::Voxels(_) => std::mem::size_of::<Voxel>(),
        }
    }

    /// The densely packed record bytes, ready for a GPU buffer copy.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            MeshRecords::Greedy(records) => bytemuck::cast_slice(records),
            MeshRecords::Voxels(records) => bytemuck::cast_slice(records),
        }
    }
}

/// Represents a complete mesh for one chunk.
#[derive(Debug, Clone)]
pub struct ChunkMesh {
    /// The chunk this mesh was built for
    pub position: ChunkCoordinate,
    /// The emitted records
    pub records: MeshRecords,
    /// World-space bounds of the chunk, used for frustum culling
    pub bounding_box: Aabb,
}

impl ChunkMesh {
    pub fn new(position: ChunkCoordinate, records: MeshRecords) -> Self {
        ChunkMesh {
            position,
            records,
            bounding_box: position.bounding_box(),
        }
    }

    /// Number of records in the mesh.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// See [`MeshRecords::as_bytes`].
    pub fn as_bytes(&self) -> &[u8] {
        self.records.as_bytes()
    }
}
