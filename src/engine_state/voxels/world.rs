//! # World Module
//!
//! This module provides the `World` struct which manages the resident chunks of the
//! voxel world. It serves as the central coordinator for chunk loading, unloading,
//! and access.
//!
//! ## Architecture
//!
//! The world uses a sparse storage approach where only chunks around the camera are
//! kept in memory. This allows for effectively infinite world sizes while
//! maintaining reasonable memory usage.
//!
//! Chunk generation happens on worker threads. The world tracks which positions
//! have a generation request outstanding so that a position is never generated
//! twice and a chunk that left the load radius while generating is discarded.
//!
//! ## Performance Considerations
//!
//! - Chunks are stored in thread-safe containers so meshing tasks can read them
//!   off the main thread
//! - Chunk lookup is O(1) using a hash map

use std::collections::{HashMap, HashSet};

use crate::core::MtResource;
use crate::engine_state::voxels::{
    block::block_type::BlockType,
    chunk::{Chunk, ChunkCoordinate, GenerationMethod},
};

/// Represents a voxel world composed of multiple chunks.
///
/// # Examples
///
/// ```
/// use voxel_box_engine::engine_state::voxels::{
///     chunk::{ChunkCoordinate, GenerationMethod},
///     world::World,
/// };
///
/// let mut world = World::new(GenerationMethod::Solid, 0);
/// world.add_chunk_at(ChunkCoordinate::new(0, 0));
/// assert!(world.get_chunk_at(ChunkCoordinate::new(0, 0)).is_some());
/// ```
pub struct World {
    /// A mapping from chunk coordinates to chunk data.
    chunks: HashMap<ChunkCoordinate, MtResource<Chunk>>,
    /// Positions with a generation task in flight.
    generating: HashSet<ChunkCoordinate>,
    method: GenerationMethod,
    seed: u32,
}

impl World {
    /// Creates a new, empty world that fills new chunks with `method`.
    pub fn new(method: GenerationMethod, seed: u32) -> Self {
        World {
            chunks: HashMap::new(),
            generating: HashSet::new(),
            method,
            seed,
        }
    }

    pub fn generation_method(&self) -> GenerationMethod {
        self.method
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// `true` if a chunk is resident at `position`.
    pub fn contains(&self, position: ChunkCoordinate) -> bool {
        self.chunks.contains_key(&position)
    }

    /// Number of resident chunks.
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Positions of every resident chunk, in no particular order.
    pub fn positions(&self) -> impl Iterator<Item = ChunkCoordinate> + '_ {
        self.chunks.keys().copied()
    }

    /// Generates and inserts a chunk at `position` on the calling thread, if one
    /// doesn't already exist.
    pub fn add_chunk_at(&mut self, position: ChunkCoordinate) {
        if self.chunks.contains_key(&position) {
            return;
        }
        let chunk = Chunk::generate(self.method, position, self.seed);
        self.insert_chunk(chunk);
    }

    /// Inserts `chunk` at its own position, replacing any chunk already there.
    pub fn insert_chunk(&mut self, chunk: Chunk) {
        self.chunks.insert(chunk.position, MtResource::new(chunk));
    }

    /// Removes the chunk at `position`.
    ///
    /// Tasks still holding a handle to it keep reading the old data until they finish.
    pub fn remove_chunk(&mut self, position: ChunkCoordinate) -> Option<MtResource<Chunk>> {
        self.chunks.remove(&position)
    }

    /// Retrieves a handle to the chunk at the specified chunk coordinates.
    ///
    /// # Returns
    /// A clone of the `MtResource<Chunk>` if the chunk exists, or `None` if not.
    pub fn get_chunk_at(&self, position: ChunkCoordinate) -> Option<MtResource<Chunk>> {
        self.chunks.get(&position).cloned()
    }

    /// Handles to the 3x3 chunks centered on `position`, ordered
    /// `(dx + 1) * 3 + (dz + 1)` so the center sits at index 4.
    ///
    /// # Returns
    /// `None` unless all nine chunks are resident.
    pub fn neighborhood_handles(&self, position: ChunkCoordinate) -> Option<[MtResource<Chunk>; 9]> {
        let handles = (-1..=1)
            .flat_map(|dx| (-1..=1).map(move |dz| (dx, dz)))
            .map(|(dx, dz)| self.get_chunk_at(position.offset(dx, dz)))
            .collect::<Option<Vec<_>>>()?;
        handles.try_into().ok()
    }

    /// Marks `position` as being generated.
    ///
    /// # Returns
    /// `false` if the chunk is already resident or already being generated; the
    /// caller must not start another generation in that case.
    pub fn begin_generation(&mut self, position: ChunkCoordinate) -> bool {
        if self.chunks.contains_key(&position) {
            return false;
        }
        self.generating.insert(position)
    }

    /// Clears the generation mark for `position`.
    ///
    /// # Returns
    /// `true` if the generated chunk is still wanted. `false` means the request
    /// was cancelled and the chunk should be dropped.
    pub fn finish_generation(&mut self, position: ChunkCoordinate) -> bool {
        self.generating.remove(&position)
    }

    /// Cancels an outstanding generation request. The result is dropped when it arrives.
    pub fn cancel_generation(&mut self, position: ChunkCoordinate) -> bool {
        self.generating.remove(&position)
    }

    pub fn is_generating(&self, position: ChunkCoordinate) -> bool {
        self.generating.contains(&position)
    }

    /// Positions with a generation request outstanding.
    pub fn generating_positions(&self) -> impl Iterator<Item = ChunkCoordinate> + '_ {
        self.generating.iter().copied()
    }

    /// The block at world coordinates, `AIR` if the owning chunk isn't resident.
    pub fn get_block(&self, x: i32, y: i32, z: i32) -> BlockType {
        let position = ChunkCoordinate::containing_block(x, z);
        let (origin_x, origin_z) = position.block_origin();
        self.chunks.get(&position).map_or(BlockType::AIR, |chunk| {
            chunk.get().get_block_at(x - origin_x, y, z - origin_z)
        })
    }

    /// Sets the block at world coordinates.
    ///
    /// # Returns
    /// `true` if a resident chunk changed.
    pub fn set_block(&mut self, x: i32, y: i32, z: i32, block_type: BlockType) -> bool {
        let position = ChunkCoordinate::containing_block(x, z);
        let (origin_x, origin_z) = position.block_origin();
        match self.chunks.get(&position) {
            Some(chunk) => chunk
                .get_mut()
                .set_block_at(x - origin_x, y, z - origin_z, block_type),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generation_is_tracked_per_position() {
        let mut world = World::new(GenerationMethod::Empty, 0);
        let position = ChunkCoordinate::new(3, -2);

        assert!(world.begin_generation(position));
        assert!(!world.begin_generation(position));
        assert!(world.is_generating(position));

        assert!(world.finish_generation(position));
        assert!(!world.is_generating(position));

        world.add_chunk_at(position);
        assert!(!world.begin_generation(position));
    }

    #[test]
    fn cancelled_generation_is_not_wanted() {
        let mut world = World::new(GenerationMethod::Empty, 0);
        let position = ChunkCoordinate::new(0, 0);
        world.begin_generation(position);
        assert!(world.cancel_generation(position));
        assert!(!world.finish_generation(position));
    }

    #[test]
    fn neighborhood_requires_all_nine_chunks() {
        let mut world = World::new(GenerationMethod::Empty, 0);
        for dx in -1..=1 {
            for dz in -1..=1 {
                if (dx, dz) != (1, 1) {
                    world.add_chunk_at(ChunkCoordinate::new(dx, dz));
                }
            }
        }
        assert!(world.neighborhood_handles(ChunkCoordinate::new(0, 0)).is_none());

        world.add_chunk_at(ChunkCoordinate::new(1, 1));
        let handles = world
            .neighborhood_handles(ChunkCoordinate::new(0, 0))
            .unwrap();
        assert_eq!(handles[4].get().position, ChunkCoordinate::new(0, 0));
        assert_eq!(handles[0].get().position, ChunkCoordinate::new(-1, -1));
        assert_eq!(handles[5].get().position, ChunkCoordinate::new(0, 1));
        assert_eq!(handles[8].get().position, ChunkCoordinate::new(1, 1));
    }

    #[test]
    fn world_coordinates_reach_negative_chunks() {
        let mut world = World::new(GenerationMethod::Empty, 0);
        world.add_chunk_at(ChunkCoordinate::new(-1, 0));

        assert!(world.set_block(-1, 70, 15, BlockType::SANDSTONE));
        assert_eq!(world.get_block(-1, 70, 15), BlockType::SANDSTONE);
        assert_eq!(
            world
                .get_chunk_at(ChunkCoordinate::new(-1, 0))
                .unwrap()
                .get()
                .get_block_at(15, 70, 15),
            BlockType::SANDSTONE
        );

        assert!(!world.set_block(0, 70, 0, BlockType::SANDSTONE));
        assert_eq!(world.get_block(0, 70, 0), BlockType::AIR);
    }
}
