//! # Chunk Module
//!
//! This module provides the `Chunk` struct: a 16x16 column of blocks spanning the
//! whole world height, split into 24 vertical sections of 16 blocks each.
//!
//! ## Memory Optimization
//!
//! Sections are allocated lazily. A section that has never held a non-air block
//! is stored as `None` and reads as air, so the sky above the terrain costs nothing.
//! An allocated section keeps:
//! - `blocks`: a dense array of `Block` (one byte per voxel) for O(1) lookups
//! - `solid_array`: a bit vector (1 bit per voxel) tracking which voxels are non-air
//!
//! ### Performance Characteristics
//! - **Block Lookup**: O(1), a single index into the section array
//! - **Solidity Check**: O(1), one bit
//! - **Empty Section Check**: O(1) for unallocated sections, O(n/64) otherwise

use bitvec::prelude::BitVec;
use cgmath::Point3;
use serde::{Deserialize, Serialize};

use crate::engine_state::camera_state::Aabb;

use super::block::block_type::BlockType;
use super::block::Block;

pub mod chunk_creation;

pub use chunk_creation::GenerationMethod;

/// The width and depth of a chunk, and the height of one section, in blocks.
pub const CHUNK_DIMENSION: i32 = 16;
/// The number of blocks in a single horizontal plane of a chunk (CHUNK_DIMENSION²).
pub const CHUNK_PLANE_SIZE: i32 = CHUNK_DIMENSION * CHUNK_DIMENSION;
/// The number of blocks in one section (CHUNK_DIMENSION³).
pub const SECTION_VOLUME: usize = (CHUNK_PLANE_SIZE * CHUNK_DIMENSION) as usize;
/// Lowest valid world Y (inclusive).
pub const WORLD_MIN_Y: i32 = -64;
/// Highest valid world Y (exclusive).
pub const WORLD_MAX_Y: i32 = 320;
/// Number of vertical sections in every chunk.
pub const SECTION_COUNT: usize = ((WORLD_MAX_Y - WORLD_MIN_Y) / CHUNK_DIMENSION) as usize;

/// Identifies a 16x16 column of the world by its chunk-grid X and Z.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChunkCoordinate {
    pub x: i32,
    pub z: i32,
}

impl ChunkCoordinate {
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// World-space block coordinates of the chunk's (0, 0, 0) corner along X and Z.
    pub const fn block_origin(&self) -> (i32, i32) {
        (self.x * CHUNK_DIMENSION, self.z * CHUNK_DIMENSION)
    }

    /// The chunk containing the given world-space block column.
    pub const fn containing_block(x: i32, z: i32) -> Self {
        Self {
            x: x.div_euclid(CHUNK_DIMENSION),
            z: z.div_euclid(CHUNK_DIMENSION),
        }
    }

    /// Returns the coordinate offset by `dx`, `dz` chunks.
    pub const fn offset(&self, dx: i32, dz: i32) -> Self {
        Self {
            x: self.x + dx,
            z: self.z + dz,
        }
    }

    /// The world-space box covering the whole column, bottom to top of the world.
    pub fn bounding_box(&self) -> Aabb {
        let (x, z) = self.block_origin();
        Aabb::new(
            Point3::new(x as f32, WORLD_MIN_Y as f32, z as f32),
            Point3::new(
                (x + CHUNK_DIMENSION) as f32,
                WORLD_MAX_Y as f32,
                (z + CHUNK_DIMENSION) as f32,
            ),
        )
    }

    /// Chebyshev distance in chunks, the metric of the square load radius.
    pub fn chebyshev_distance(&self, other: &ChunkCoordinate) -> i32 {
        (self.x - other.x).abs().max((self.z - other.z).abs())
    }
}

/// Read access to the blocks of one chunk.
///
/// `x` and `z` are local coordinates in `[0, 16)`, `y` is a world Y. Implementors
/// return `AIR` for anything outside the valid world height.
pub trait BlockGrid {
    /// The block at local `(x, z)` and world `y`.
    fn block_at(&self, x: i32, y: i32, z: i32) -> BlockType;

    /// `true` if the given section is known to contain only air. Meshing skips such
    /// sections since they cannot contribute geometry of their own.
    fn is_section_empty(&self, _section: usize) -> bool {
        false
    }
}

/// Sixteen vertical blocks of a chunk.
#[derive(Clone)]
pub struct ChunkSection {
    /// Dense block storage, indexed `x + z * 16 + y * 256`.
    blocks: Vec<Block>,
    /// One bit per voxel, set for every non-air block.
    solid_array: BitVec,
}

impl ChunkSection {
    fn new() -> Self {
        let mut solid_array = BitVec::with_capacity(SECTION_VOLUME);
        solid_array.resize(SECTION_VOLUME, false);
        Self {
            blocks: vec![Block::AIR; SECTION_VOLUME],
            solid_array,
        }
    }

    #[inline]
    fn index(x: i32, local_y: i32, z: i32) -> usize {
        (x + z * CHUNK_DIMENSION + local_y * CHUNK_PLANE_SIZE) as usize
    }

    /// Number of non-air blocks stored in the section.
    pub fn non_air_count(&self) -> usize {
        self.solid_array.count_ones()
    }

    /// Raw block bytes in storage order.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.blocks)
    }
}

/// Represents a 16-wide, 16-deep, full-height column of voxel blocks.
///
/// Chunks are the unit of loading, meshing and culling. Each chunk knows its
/// position on the chunk grid and owns its sections.
#[derive(Clone)]
pub struct Chunk {
    /// The position of this chunk in chunk coordinates (not block coordinates).
    pub position: ChunkCoordinate,
    /// Vertical sections from `WORLD_MIN_Y` upwards; `None` is all air.
    sections: Vec<Option<ChunkSection>>,
}

impl Chunk {
    /// Creates a new, completely empty chunk (all blocks are air).
    pub fn empty(position: ChunkCoordinate) -> Self {
        Self {
            position,
            sections: vec![None; SECTION_COUNT],
        }
    }

    /// Maps a world Y to `(section index, y within section)`.
    ///
    /// # Returns
    /// `None` if `y` lies outside `[WORLD_MIN_Y, WORLD_MAX_Y)`.
    #[inline]
    pub fn section_of(y: i32) -> Option<(usize, i32)> {
        if !(WORLD_MIN_Y..WORLD_MAX_Y).contains(&y) {
            return None;
        }
        let offset = y - WORLD_MIN_Y;
        Some((
            (offset / CHUNK_DIMENSION) as usize,
            offset % CHUNK_DIMENSION,
        ))
    }

    /// The world Y of the bottom layer of a section.
    #[inline]
    pub const fn section_base_y(section: usize) -> i32 {
        WORLD_MIN_Y + section as i32 * CHUNK_DIMENSION
    }

    #[inline]
    fn in_column(x: i32, z: i32) -> bool {
        (0..CHUNK_DIMENSION).contains(&x) && (0..CHUNK_DIMENSION).contains(&z)
    }

    /// Gets the block at the specified chunk-relative coordinates.
    ///
    /// # Arguments
    /// * `x` - X coordinate within the chunk (0..CHUNK_DIMENSION)
    /// * `y` - World Y coordinate
    /// * `z` - Z coordinate within the chunk (0..CHUNK_DIMENSION)
    ///
    /// # Returns
    /// The block type, or `AIR` for coordinates outside the chunk.
    pub fn get_block_at(&self, x: i32, y: i32, z: i32) -> BlockType {
        if !Self::in_column(x, z) {
            return BlockType::AIR;
        }
        match Self::section_of(y) {
            Some((section, local_y)) => match &self.sections[section] {
                Some(section) => section.blocks[ChunkSection::index(x, local_y, z)].get_block_type(),
                None => BlockType::AIR,
            },
            None => BlockType::AIR,
        }
    }

    /// Sets the block at the specified chunk-relative coordinates.
    ///
    /// Allocates the owning section on first non-air write.
    ///
    /// # Returns
    /// `true` if the stored block changed, `false` if the coordinates are outside
    /// the chunk or the block already had that type.
    pub fn set_block_at(&mut self, x: i32, y: i32, z: i32, block_type: BlockType) -> bool {
        if !Self::in_column(x, z) {
            return false;
        }
        let Some((section_index, local_y)) = Self::section_of(y) else {
            return false;
        };

        let slot = &mut self.sections[section_index];
        if slot.is_none() {
            if block_type.is_air() {
                return false;
            }
            *slot = Some(ChunkSection::new());
        }
        let Some(section) = slot.as_mut() else {
            return false;
        };

        let index = ChunkSection::index(x, local_y, z);
        let block = Block::new(block_type);
        if section.blocks[index] == block {
            return false;
        }
        section.blocks[index] = block;
        section.solid_array.set(index, !block_type.is_air());
        true
    }

    /// Checks if the block at the specified chunk-relative coordinates is solid.
    ///
    /// # Returns
    /// `true` if the block is non-air, `false` if it's air or out of bounds.
    pub fn is_block_solid(&self, x: i32, y: i32, z: i32) -> bool {
        if !Self::in_column(x, z) {
            return false;
        }
        match Self::section_of(y) {
            Some((section, local_y)) => self.sections[section]
                .as_ref()
                .is_some_and(|section| section.solid_array[ChunkSection::index(x, local_y, z)]),
            None => false,
        }
    }

    /// The world-space bounding box of this chunk.
    pub fn bounding_box(&self) -> Aabb {
        self.position.bounding_box()
    }

    /// Borrow a section, if it has been allocated.
    pub fn section(&self, section: usize) -> Option<&ChunkSection> {
        self.sections.get(section).and_then(Option::as_ref)
    }

    /// Total number of non-air blocks in the chunk.
    pub fn non_air_count(&self) -> usize {
        self.sections
            .iter()
            .flatten()
            .map(ChunkSection::non_air_count)
            .sum()
    }
}

impl BlockGrid for Chunk {
    #[inline]
    fn block_at(&self, x: i32, y: i32, z: i32) -> BlockType {
        self.get_block_at(x, y, z)
    }

    fn is_section_empty(&self, section: usize) -> bool {
        self.section(section)
            .map_or(true, |section| section.solid_array.not_any())
    }
}
