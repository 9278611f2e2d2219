//! # Chunk Generation Task
//!
//! This module defines the `ChunkGenerationTask` which handles asynchronous
//! generation of chunk data. This task is scheduled when new chunks need to be
//! generated as the camera moves through the world.

use log::{trace, warn};

use crate::engine_state::{
    task_management::task::{Task, TaskContext, TaskResult},
    voxels::chunk::{Chunk, ChunkCoordinate, GenerationMethod},
};

/// A task that generates chunk data asynchronously.
///
/// This task is responsible for:
/// 1. Generating the chunk data at the specified position
/// 2. Adding the chunk to the world, unless the request was cancelled meanwhile
/// 3. Scheduling mesh generation for chunks whose neighborhood became complete
pub struct ChunkGenerationTask {
    /// The position of the chunk to generate (in chunk coordinates)
    position: ChunkCoordinate,
    method: GenerationMethod,
    seed: u32,
}

impl ChunkGenerationTask {
    /// Creates a new chunk generation task.
    ///
    /// The caller is expected to have called `World::begin_generation` for `position`.
    pub fn new(position: ChunkCoordinate, method: GenerationMethod, seed: u32) -> Self {
        ChunkGenerationTask {
            position,
            method,
            seed,
        }
    }
}

impl Task for ChunkGenerationTask {
    fn process(&self) -> Box<dyn TaskResult> {
        Box::new(ChunkGenerationTaskResult {
            chunk: Chunk::generate(self.method, self.position, self.seed),
        })
    }

    fn failed(&self) -> Box<dyn TaskResult> {
        Box::new(ChunkGenerationFailed {
            position: self.position,
        })
    }
}

/// Clears the generation mark of a chunk whose task panicked, so the next
/// update requests it again.
struct ChunkGenerationFailed {
    position: ChunkCoordinate,
}

impl TaskResult for ChunkGenerationFailed {
    fn handle_result(self: Box<Self>, context: &mut TaskContext<'_>) -> Vec<Box<dyn Task>> {
        warn!(
            "Generation of chunk ({}, {}) failed, will retry",
            self.position.x, self.position.z
        );
        context.world.cancel_generation(self.position);
        Vec::new()
    }
}

/// The result of a chunk generation task.
pub struct ChunkGenerationTaskResult {
    chunk: Chunk,
}

impl TaskResult for ChunkGenerationTaskResult {
    /// Inserts the chunk into the world and requests meshes for every chunk in its
    /// 3x3 neighborhood.
    ///
    /// Neighbors that already have a mesh were meshed against an earlier copy of
    /// this chunk, so they are rebuilt too.
    fn handle_result(self: Box<Self>, context: &mut TaskContext<'_>) -> Vec<Box<dyn Task>> {
        let position = self.chunk.position;
        if !context.world.finish_generation(position) {
            trace!("Dropping chunk ({}, {}), no longer wanted", position.x, position.z);
            return Vec::new();
        }
        context.world.insert_chunk(self.chunk);

        let mut tasks = Vec::new();
        for dx in -1..=1 {
            for dz in -1..=1 {
                let neighbor = position.offset(dx, dz);
                if !context.world.contains(neighbor) {
                    continue;
                }
                if let Some(task) = context.mesh_manager.request_mesh(context.world, neighbor) {
                    tasks.push(task);
                }
            }
        }
        tasks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::rendering::{BlockPalette, MeshManager};
    use crate::engine_state::voxels::world::World;
    use std::{num::NonZeroUsize, sync::Arc};

    fn mesh_manager() -> MeshManager {
        MeshManager::new(
            NonZeroUsize::new(16).unwrap(),
            Arc::new(BlockPalette::default()),
            true,
        )
    }

    #[test]
    fn cancelled_chunk_is_dropped() {
        let mut world = World::new(GenerationMethod::Solid, 0);
        let mut mesh_manager = mesh_manager();
        let position = ChunkCoordinate::new(0, 0);

        world.begin_generation(position);
        let result = ChunkGenerationTask::new(position, GenerationMethod::Solid, 0).process();
        world.cancel_generation(position);

        let tasks = result.handle_result(&mut TaskContext {
            world: &mut world,
            mesh_manager: &mut mesh_manager,
        });
        assert!(tasks.is_empty());
        assert!(!world.contains(position));
    }

    #[test]
    fn last_neighbor_triggers_center_mesh() {
        let mut world = World::new(GenerationMethod::Solid, 0);
        let mut mesh_manager = mesh_manager();
        for dx in -1..=1 {
            for dz in -1..=1 {
                if (dx, dz) != (1, 1) {
                    world.add_chunk_at(ChunkCoordinate::new(dx, dz));
                }
            }
        }

        let last = ChunkCoordinate::new(1, 1);
        world.begin_generation(last);
        let result = ChunkGenerationTask::new(last, GenerationMethod::Solid, 0).process();
        let tasks = result.handle_result(&mut TaskContext {
            world: &mut world,
            mesh_manager: &mut mesh_manager,
        });

        assert!(world.contains(last));
        assert_eq!(tasks.len(), 1);
        assert!(mesh_manager.is_in_flight(ChunkCoordinate::new(0, 0)));
    }

    #[test]
    fn regenerated_neighbor_rebuilds_existing_mesh() {
        let mut world = World::new(GenerationMethod::Solid, 0);
        let mut mesh_manager = mesh_manager();
        for dx in -1..=1 {
            for dz in -1..=1 {
                world.add_chunk_at(ChunkCoordinate::new(dx, dz));
            }
        }
        let center = ChunkCoordinate::new(0, 0);
        let build = mesh_manager.request_mesh(&world, center).unwrap();
        build.process().handle_result(&mut TaskContext {
            world: &mut world,
            mesh_manager: &mut mesh_manager,
        });
        assert!(mesh_manager.has_mesh(center));

        let west = ChunkCoordinate::new(-1, 0);
        world.remove_chunk(west);
        world.begin_generation(west);
        let tasks = ChunkGenerationTask::new(west, GenerationMethod::Solid, 0)
            .process()
            .handle_result(&mut TaskContext {
                world: &mut world,
                mesh_manager: &mut mesh_manager,
            });

        assert_eq!(tasks.len(), 1);
        assert!(mesh_manager.is_in_flight(center));
    }

    #[test]
    fn failed_generation_is_requested_again() {
        let mut world = World::new(GenerationMethod::Solid, 0);
        let mut mesh_manager = mesh_manager();
        let position = ChunkCoordinate::new(3, 3);

        assert!(world.begin_generation(position));
        let tasks = ChunkGenerationTask::new(position, GenerationMethod::Solid, 0)
            .failed()
            .handle_result(&mut TaskContext {
                world: &mut world,
                mesh_manager: &mut mesh_manager,
            });

        assert!(tasks.is_empty());
        assert!(!world.is_generating(position));
        assert!(world.begin_generation(position));
    }
}
