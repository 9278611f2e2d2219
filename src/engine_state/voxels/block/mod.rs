//! # Block Module
//!
//! This module provides the core block-related functionality for the voxel engine:
//! block type definitions and the compact per-voxel storage record.

use block_type::BlockType;

pub mod block_type;

/// The underlying integer type used to represent block types in memory.
/// This is used for efficient storage of block data inside chunk sections.
pub type BlockTypeSize = u8;

/// Represents a single voxel block in the world.
///
/// This is a lightweight structure that stores only the essential block data.
/// The actual block properties are looked up from the block type.
///
/// # Memory Layout
/// The `#[repr(C)]` attribute keeps the layout stable so section arrays can be
/// viewed as raw bytes. The block type is stored as a compact `BlockTypeSize`.
#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable, Debug, Default, PartialEq, Eq)]
pub struct Block {
    /// The type of this block, encoded as a `BlockTypeSize` for compact storage.
    pub block_type: BlockTypeSize,
}

impl Block {
    /// An air block, the value every freshly allocated section starts with.
    pub const AIR: Block = Block { block_type: 0 };

    /// Creates a new block of the specified type.
    pub fn new(block_type: BlockType) -> Self {
        Block {
            block_type: block_type as BlockTypeSize,
        }
    }

    /// Decodes the stored block type.
    ///
    /// Ids that do not name a block type decode as `UNKNOWN` so they still render.
    pub fn get_block_type(&self) -> BlockType {
        BlockType::get_block_type_from_int(self.block_type).unwrap_or(BlockType::UNKNOWN)
    }
}
