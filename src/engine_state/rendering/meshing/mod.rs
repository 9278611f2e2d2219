//! Mesh generation and management for voxel rendering.
//!
//! This module turns chunk data into GPU-ready records and keeps the finished
//! meshes around for drawing.
//!
//! # Architecture
//! - `MeshManager`: tracks finished meshes and mesh builds in flight
//! - `mesh/`: the meshing algorithms and the records they produce
//!
//! # Mesh Lifecycle
//! 1. `request_mesh` creates a `ChunkMeshGenerationTask` once the chunk's whole
//!    3x3 neighborhood is resident
//! 2. The task runs on a worker thread
//! 3. `complete_mesh` stores the result, unless the chunk was unloaded meanwhile
//! 4. A block edit during a build marks the build for rebuilding; the stale result
//!    is stored and a fresh build is issued right away
//! 5. A request while the neighborhood is incomplete drops the stored mesh, so
//!    the chunk is rebuilt once its neighbors are resident again
//!
//! # Performance Considerations
//! - Greedy meshing minimizes the number of records per chunk
//! - At most one build per chunk is in flight at any time
//! - Meshes are kept in an LRU cache so memory stays bounded

use std::{collections::HashMap, num::NonZeroUsize, sync::Arc};

use log::{debug, trace};
use lru::LruCache;

mod mesh;

pub use mesh::*;

use crate::engine_state::{
    camera_state::Frustum,
    rendering::{tasks::ChunkMeshGenerationTask, texture::BlockPalette},
    task_management::task::Task,
    voxels::{chunk::ChunkCoordinate, world::World},
};

/// Bookkeeping for a mesh build that has been handed to the worker pool.
#[derive(Debug, Default, Clone, Copy)]
struct InFlightBuild {
    /// The chunk changed after the build started
    rebuild: bool,
    /// The chunk was unloaded; the result must not be stored
    discarded: bool,
}

/// Central manager for voxel mesh generation.
///
/// The `MeshManager` is responsible for:
/// - Creating mesh tasks for chunks whose neighborhood is resident
/// - Deduplicating builds so each chunk has at most one in flight
/// - Storing finished meshes and evicting the least recently used ones
/// - Dropping meshes of unloaded chunks
pub struct MeshManager {
    /// Finished meshes, least recently used evicted first
    meshes: LruCache<ChunkCoordinate, Arc<ChunkMesh>>,
    in_flight: HashMap<ChunkCoordinate, InFlightBuild>,
    palette: Arc<BlockPalette>,
    greedy: bool,
}

impl MeshManager {
    /// Creates a new mesh manager.
    ///
    /// # Arguments
    /// * `capacity` - Maximum number of meshes kept
    /// * `palette` - Block colors and texture indices shared with every mesh task
    /// * `greedy` - Produce merged boxes instead of one record per block
    pub fn new(capacity: NonZeroUsize, palette: Arc<BlockPalette>, greedy: bool) -> Self {
        Self {
            meshes: LruCache::new(capacity),
            in_flight: HashMap::new(),
            palette,
            greedy,
        }
    }

    /// Requests a mesh build for the chunk at `position`.
    ///
    /// If a build is already in flight, it is marked for rebuilding instead and no
    /// task is returned.
    ///
    /// If the chunk's 3x3 neighborhood is not fully resident, any stored mesh is
    /// dropped as stale, so the chunk is meshed again once its neighbors return.
    ///
    /// # Returns
    /// The task to publish, or `None` if a build is already in flight or the
    /// chunk's 3x3 neighborhood is not fully resident.
    pub fn request_mesh(&mut self, world: &World, position: ChunkCoordinate) -> Option<Box<dyn Task>> {
        if let Some(build) = self.in_flight.get_mut(&position) {
            trace!("Mesh for ({}, {}) already in flight, marking for rebuild", position.x, position.z);
            build.rebuild = true;
            build.discarded = false;
            return None;
        }

        let Some(chunks) = world.neighborhood_handles(position) else {
            if self.meshes.pop(&position).is_some() {
                trace!("Dropping stale mesh for ({}, {}), neighborhood incomplete", position.x, position.z);
            }
            return None;
        };
        self.in_flight.insert(position, InFlightBuild::default());
        Some(Box::new(ChunkMeshGenerationTask::new(
            position,
            chunks,
            self.palette.clone(),
            self.greedy,
        )))
    }

    /// Stores a finished mesh.
    ///
    /// # Returns
    /// A follow-up build if the chunk changed while this one was running.
    pub fn complete_mesh(&mut self, world: &World, mesh: ChunkMesh) -> Option<Box<dyn Task>> {
        let position = mesh.position;
        let build = self.in_flight.remove(&position).unwrap_or_default();

        if build.discarded {
            trace!("Discarding mesh for unloaded chunk ({}, {})", position.x, position.z);
        } else if let Some((evicted, _)) = self.meshes.push(position, Arc::new(mesh)) {
            if evicted != position {
                debug!("Evicted mesh for chunk ({}, {})", evicted.x, evicted.z);
            }
        }

        if build.rebuild {
            self.request_mesh(world, position)
        } else {
            None
        }
    }

    /// Drops the mesh of an unloaded chunk. A build still in flight is discarded
    /// when it completes.
    pub fn unload(&mut self, position: ChunkCoordinate) {
        self.meshes.pop(&position);
        if let Some(build) = self.in_flight.get_mut(&position) {
            build.discarded = true;
            build.rebuild = false;
        }
    }

    /// `true` if a finished mesh is stored for `position`. Does not count as a use.
    pub fn has_mesh(&self, position: ChunkCoordinate) -> bool {
        self.meshes.contains(&position)
    }

    pub fn is_in_flight(&self, position: ChunkCoordinate) -> bool {
        self.in_flight.contains_key(&position)
    }

    /// The stored mesh for `position`, marking it as recently used.
    pub fn get_mesh(&mut self, position: ChunkCoordinate) -> Option<Arc<ChunkMesh>> {
        self.meshes.get(&position).cloned()
    }

    /// Every stored mesh, most recently used first.
    pub fn meshes(&self) -> impl Iterator<Item = &Arc<ChunkMesh>> {
        self.meshes.iter().map(|(_, mesh)| mesh)
    }

    /// Number of stored meshes.
    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }

    /// Forgets a build whose task never produced a mesh. The chunk is picked up
    /// again by the next request.
    pub fn abandon(&mut self, position: ChunkCoordinate) {
        if self.in_flight.remove(&position).is_some() {
            debug!("Abandoned mesh build for ({}, {})", position.x, position.z);
        }
    }

    /// Number of builds handed out and not yet completed.
    pub fn in_flight_count(&self) -> usize {
        self.in_flight.len()
    }

    /// Stored meshes whose chunk box intersects `frustum`, marked as recently used.
    pub fn visible_meshes(&mut self, frustum: &Frustum) -> Vec<Arc<ChunkMesh>> {
        let visible: Vec<ChunkCoordinate> = self
            .meshes
            .iter()
            .filter(|(_, mesh)| frustum.is_inside(&mesh.bounding_box))
            .map(|(position, _)| *position)
            .collect();

        visible
            .into_iter()
            .filter_map(|position| self.meshes.get(&position).cloned())
            .collect()
    }
}
