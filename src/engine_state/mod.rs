//! # Engine State Module
//!
//! The core engine module that manages the state and functionality of the voxel engine.
//!
//! ## Key Components
//!
//! * `EngineState` - The main state container for the engine
//! * `camera_state` - Camera, projection and frustum culling
//! * `rendering` - Meshing, mesh records and the mesh manager
//! * `task_management` - Manages asynchronous tasks and worker threads
//! * `voxels` - Handles voxel data, chunks, and world generation
//!
//! ## Architecture
//!
//! Each subsystem is responsible for a specific aspect of the engine. The
//! `EngineState` struct serves as the central coordinator: it owns the world and
//! the mesh manager, hands them to task results on the main thread, and decides
//! which chunks to load, unload and mesh as the camera moves.
//!
//! ## Frame Update
//!
//! 1. Chunks beyond the render distance are unloaded and their meshes dropped
//! 2. Missing chunks within the render distance are queued for generation, nearest first
//! 3. Resident chunks without a mesh are queued for meshing
//! 4. Finished task results are applied and queued tasks handed to free workers

use std::{num::NonZeroUsize, sync::Arc};

use log::{debug, info};

use crate::config::EngineConfig;

use camera_state::{CameraState, Frustum};
use rendering::{BlockPalette, ChunkMesh, MeshManager};
use task_management::{TaskContext, TaskManager};
use voxels::{
    block::block_type::BlockType,
    chunk::{ChunkCoordinate, CHUNK_DIMENSION},
    tasks::ChunkGenerationTask,
    world::World,
};

pub mod camera_state;
pub mod rendering;
pub mod task_management;
pub mod voxels;

/// Counters describing the current engine state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EngineStats {
    /// Resident chunks
    pub chunks: usize,
    /// Chunks with a generation task outstanding
    pub chunks_generating: usize,
    /// Stored meshes
    pub meshes: usize,
    /// Mesh builds handed out and not yet completed
    pub meshes_in_flight: usize,
    /// Records across all stored meshes
    pub records: usize,
    /// Bytes of record data across all stored meshes
    pub bytes: usize,
}

/// The main state container for the voxel engine.
///
/// # Examples
///
/// ```
/// use voxel_box_engine::config::EngineConfig;
/// use voxel_box_engine::engine_state::{
///     camera_state::CameraState, rendering::BlockPalette, voxels::chunk::GenerationMethod,
///     EngineState,
/// };
///
/// let config = EngineConfig {
///     render_distance: 2,
///     worker_threads: 2,
///     generation: GenerationMethod::Solid,
///     ..EngineConfig::default()
/// };
/// let camera = CameraState::from_config(&config.camera);
/// let mut engine = EngineState::new(&config, BlockPalette::default());
///
/// engine.update(&camera);
/// engine.wait_idle();
/// engine.update(&camera);
/// engine.wait_idle();
/// assert!(engine.stats().meshes > 0);
/// ```
pub struct EngineState {
    /// The voxel world containing all resident chunk data
    world: World,
    /// Finished meshes and mesh builds in flight
    mesh_manager: MeshManager,
    /// Task manager for asynchronous operations
    task_manager: TaskManager,
    /// Square chunk radius kept loaded around the camera
    render_distance: i32,
}

impl EngineState {
    /// Creates a new engine state with all subsystems initialized.
    ///
    /// # Arguments
    /// * `config` - A validated engine configuration
    /// * `palette` - Block colors and texture indices used for every mesh
    pub fn new(config: &EngineConfig, palette: BlockPalette) -> Self {
        let capacity = NonZeroUsize::new(config.max_resident_meshes).unwrap_or(NonZeroUsize::MIN);
        info!(
            "Creating engine: render distance {}, {} meshing, {:?} terrain",
            config.render_distance,
            if config.greedy_meshing { "greedy" } else { "per-block" },
            config.generation
        );

        Self {
            world: World::new(config.generation, config.seed),
            mesh_manager: MeshManager::new(capacity, Arc::new(palette), config.greedy_meshing),
            task_manager: TaskManager::new(config.worker_threads.max(1)),
            render_distance: config.render_distance.max(1),
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn mesh_manager(&self) -> &MeshManager {
        &self.mesh_manager
    }

    pub fn render_distance(&self) -> i32 {
        self.render_distance
    }

    /// Streams chunks around the camera and processes finished tasks.
    ///
    /// This method should be called once per frame.
    pub fn update(&mut self, camera_state: &CameraState) {
        let center = camera_state.chunk_position();

        self.unload_outside(center);
        self.request_generation(center);
        self.request_missing_meshes(center);
        self.process_tasks();
    }

    /// Drops every chunk, mesh and pending generation beyond the render distance.
    fn unload_outside(&mut self, center: ChunkCoordinate) {
        let distance = self.render_distance;

        let far_chunks: Vec<ChunkCoordinate> = self
            .world
            .positions()
            .filter(|position| position.chebyshev_distance(&center) > distance)
            .collect();
        for position in &far_chunks {
            self.world.remove_chunk(*position);
            self.mesh_manager.unload(*position);
        }

        let far_generating: Vec<ChunkCoordinate> = self
            .world
            .generating_positions()
            .filter(|position| position.chebyshev_distance(&center) > distance)
            .collect();
        for position in &far_generating {
            self.world.cancel_generation(*position);
        }

        if !far_chunks.is_empty() || !far_generating.is_empty() {
            debug!(
                "Unloaded {} chunks and cancelled {} generations outside ({}, {})",
                far_chunks.len(),
                far_generating.len(),
                center.x,
                center.z
            );
        }
    }

    /// Publishes generation tasks for missing chunks, nearest first.
    fn request_generation(&mut self, center: ChunkCoordinate) {
        let distance = self.render_distance;
        let mut wanted: Vec<ChunkCoordinate> = (-distance..=distance)
            .flat_map(|dx| (-distance..=distance).map(move |dz| center.offset(dx, dz)))
            .collect();
        wanted.sort_by_key(|position| (position.chebyshev_distance(&center), position.x, position.z));

        for position in wanted {
            if self.world.begin_generation(position) {
                self.task_manager.publish_task(Box::new(ChunkGenerationTask::new(
                    position,
                    self.world.generation_method(),
                    self.world.seed(),
                )));
            }
        }
    }

    /// Publishes mesh tasks for resident chunks that have no mesh, nearest first.
    ///
    /// Chunks whose neighborhood is incomplete are skipped until their last
    /// neighbor arrives.
    fn request_missing_meshes(&mut self, center: ChunkCoordinate) {
        let mut unmeshed: Vec<ChunkCoordinate> = self
            .world
            .positions()
            .filter(|position| {
                !self.mesh_manager.has_mesh(*position) && !self.mesh_manager.is_in_flight(*position)
            })
            .collect();
        unmeshed.sort_by_key(|position| (position.chebyshev_distance(&center), position.x, position.z));

        for position in unmeshed {
            if let Some(task) = self.mesh_manager.request_mesh(&self.world, position) {
                self.task_manager.publish_task(task);
            }
        }
    }

    /// Applies finished task results and schedules queued tasks.
    pub fn process_tasks(&mut self) {
        let mut context = TaskContext {
            world: &mut self.world,
            mesh_manager: &mut self.mesh_manager,
        };
        self.task_manager.process_completed_tasks(&mut context);
        self.task_manager.process_queued_tasks();
    }

    /// Blocks until all generation and meshing work, including follow-up tasks,
    /// has finished.
    pub fn wait_idle(&mut self) {
        let mut context = TaskContext {
            world: &mut self.world,
            mesh_manager: &mut self.mesh_manager,
        };
        self.task_manager.wait_idle(&mut context);
    }

    /// Sets the block at world coordinates and remeshes every chunk whose mesh
    /// can see the change.
    ///
    /// Waits for any mesh build currently reading the chunk to finish.
    ///
    /// # Returns
    /// `true` if a resident chunk changed.
    pub fn set_block(&mut self, x: i32, y: i32, z: i32, block_type: BlockType) -> bool {
        if !self.world.set_block(x, y, z, block_type) {
            return false;
        }

        let owner = ChunkCoordinate::containing_block(x, z);
        let (origin_x, origin_z) = owner.block_origin();
        let (local_x, local_z) = (x - origin_x, z - origin_z);

        let mut affected = vec![owner];
        if local_x == 0 {
            affected.push(owner.offset(-1, 0));
        } else if local_x == CHUNK_DIMENSION - 1 {
            affected.push(owner.offset(1, 0));
        }
        if local_z == 0 {
            affected.push(owner.offset(0, -1));
        } else if local_z == CHUNK_DIMENSION - 1 {
            affected.push(owner.offset(0, 1));
        }

        for position in affected {
            if !self.world.contains(position) {
                continue;
            }
            if let Some(task) = self.mesh_manager.request_mesh(&self.world, position) {
                self.task_manager.publish_task(task);
            }
        }
        true
    }

    /// Stored meshes whose chunk passes the frustum test.
    pub fn visible_meshes(&mut self, frustum: &Frustum) -> Vec<Arc<ChunkMesh>> {
        self.mesh_manager.visible_meshes(frustum)
    }

    pub fn stats(&self) -> EngineStats {
        let (records, bytes) = self
            .mesh_manager
            .meshes()
            .fold((0, 0), |(records, bytes), mesh| {
                (records + mesh.len(), bytes + mesh.as_bytes().len())
            });
        EngineStats {
            chunks: self.world.len(),
            chunks_generating: self.world.generating_positions().count(),
            meshes: self.mesh_manager.len(),
            meshes_in_flight: self.mesh_manager.in_flight_count(),
            records,
            bytes,
        }
    }
}
