//! Task for generating mesh data for chunks in a background thread.
//!
//! This module contains the `ChunkMeshGenerationTask` which is responsible for
//! meshing one chunk against its 3x3 neighborhood in a background thread. This
//! keeps the main thread responsive while meshing is performed.

use std::sync::Arc;

use crate::{
    core::MtResource,
    engine_state::{
        rendering::{
            meshing::{greedy_mesh, mesh_voxels, ChunkMesh, MeshRecords},
            texture::BlockPalette,
        },
        task_management::task::{Task, TaskContext, TaskResult},
        voxels::{
            chunk::{Chunk, ChunkCoordinate},
            neighborhood::Neighborhood,
        },
    },
};

/// A task that meshes a chunk in a background thread.
///
/// The task holds handles to all nine chunks of the neighborhood, so the chunks
/// stay alive even if the world unloads them before the task runs.
pub struct ChunkMeshGenerationTask {
    position: ChunkCoordinate,
    /// Chunk handles ordered `(dx + 1) * 3 + (dz + 1)`
    chunks: [MtResource<Chunk>; 9],
    palette: Arc<BlockPalette>,
    /// Merge blocks into boxes instead of emitting one record per block
    greedy: bool,
}

impl ChunkMeshGenerationTask {
    /// Creates a new chunk mesh generation task.
    ///
    /// # Arguments
    /// * `position` - The chunk to mesh
    /// * `chunks` - The chunk and its neighbors, as returned by `World::neighborhood_handles`
    /// * `palette` - Block colors and texture indices
    /// * `greedy` - Selects the merged or per-block output
    pub fn new(
        position: ChunkCoordinate,
        chunks: [MtResource<Chunk>; 9],
        palette: Arc<BlockPalette>,
        greedy: bool,
    ) -> Self {
        ChunkMeshGenerationTask {
            position,
            chunks,
            palette,
            greedy,
        }
    }

    /// Meshes the chunk on the calling thread.
    ///
    /// Read locks on all nine chunks are held for the whole pass, so the mesh
    /// reflects one consistent state of the neighborhood.
    pub fn build(&self) -> ChunkMesh {
        let guards: Vec<_> = self.chunks.iter().map(MtResource::get).collect();

        let mut neighborhood = Neighborhood::new(&*guards[4]);
        for (index, guard) in guards.iter().enumerate() {
            let dx = index as i32 / 3 - 1;
            let dz = index as i32 % 3 - 1;
            neighborhood = neighborhood.with_neighbor(dx, dz, &**guard);
        }

        let records = if self.greedy {
            MeshRecords::Greedy(greedy_mesh(&neighborhood, self.position, &self.palette))
        } else {
            MeshRecords::Voxels(mesh_voxels(&neighborhood, self.position, &self.palette))
        };
        ChunkMesh::new(self.position, records)
    }
}

impl Task for ChunkMeshGenerationTask {
    fn process(&self) -> Box<dyn TaskResult> {
        Box::new(ChunkMeshGenerationTaskResult { mesh: self.build() })
    }

    fn failed(&self) -> Box<dyn TaskResult> {
        Box::new(ChunkMeshGenerationFailed {
            position: self.position,
        })
    }
}

/// Releases the in-flight slot of a build that panicked.
struct ChunkMeshGenerationFailed {
    position: ChunkCoordinate,
}

impl TaskResult for ChunkMeshGenerationFailed {
    fn handle_result(self: Box<Self>, context: &mut TaskContext<'_>) -> Vec<Box<dyn Task>> {
        context.mesh_manager.abandon(self.position);
        Vec::new()
    }
}

/// The finished mesh, handed to the mesh manager on the main thread.
pub struct ChunkMeshGenerationTaskResult {
    mesh: ChunkMesh,
}

impl TaskResult for ChunkMeshGenerationTaskResult {
    fn handle_result(self: Box<Self>, context: &mut TaskContext<'_>) -> Vec<Box<dyn Task>> {
        context
            .mesh_manager
            .complete_mesh(context.world, self.mesh)
            .into_iter()
            .collect()
    }
}
