//! # Block Type Module
//!
//! This module defines the different types of blocks in the voxel world.
//! It provides block type identification, conversion from the compact storage
//! representation, name lookup and the color each block is drawn with.

use num_derive::FromPrimitive;
use serde::{Deserialize, Serialize};

use super::BlockTypeSize;

/// Enumerates all possible block types in the voxel world.
///
/// `AIR` is the sentinel value 0: it is transparent, never meshed and never
/// occludes a neighbor. The `FromPrimitive` derive allows conversion from the
/// compact `BlockTypeSize` stored in chunks.
#[derive(
    Copy,
    Clone,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    FromPrimitive,
    Serialize,
    Deserialize,
)]
#[repr(u8)]
pub enum BlockType {
    /// Empty space.
    #[default]
    AIR = 0,
    STONE,
    DIRT,
    /// A grass block, green on top with dirt sides.
    GRASS,
    SAND,
    GRAVEL,
    /// Wooden planks.
    PLANKS,
    WATER,
    LEAVES,
    /// A tree log.
    WOOD,
    SNOW,
    LAVA,
    /// The indestructible floor of the world.
    BEDROCK,
    SANDSTONE,
    /// Placeholder for block ids the renderer has no texture for.
    UNKNOWN,
}

/// RGB color of each block type, indexed by `BlockType as usize`.
static BLOCK_COLORS: [[f32; 3]; BlockType::COUNT] = [
    [0.0, 0.0, 0.0],    // AIR
    [0.5, 0.5, 0.5],    // STONE
    [0.45, 0.32, 0.2],  // DIRT
    [0.33, 0.6, 0.22],  // GRASS
    [0.86, 0.8, 0.55],  // SAND
    [0.55, 0.52, 0.5],  // GRAVEL
    [0.72, 0.56, 0.34], // PLANKS
    [0.2, 0.35, 0.85],  // WATER
    [0.2, 0.5, 0.15],   // LEAVES
    [0.4, 0.3, 0.17],   // WOOD
    [0.95, 0.97, 1.0],  // SNOW
    [0.9, 0.35, 0.05],  // LAVA
    [0.15, 0.15, 0.15], // BEDROCK
    [0.85, 0.78, 0.55], // SANDSTONE
    [1.0, 0.0, 1.0],    // UNKNOWN
];

/// Texture file stem (with `_side`/`_top`/`_bottom` removed) to block type.
static BLOCK_NAMES: phf::Map<&'static str, BlockType> = phf::phf_map! {
    "stone" => BlockType::STONE,
    "dirt" => BlockType::DIRT,
    "grass_block" => BlockType::GRASS,
    "sand" => BlockType::SAND,
    "gravel" => BlockType::GRAVEL,
    "planks" => BlockType::PLANKS,
    "water" => BlockType::WATER,
    "leaves" => BlockType::LEAVES,
    "log" => BlockType::WOOD,
    "snow" => BlockType::SNOW,
    "lava" => BlockType::LAVA,
    "bedrock" => BlockType::BEDROCK,
    "sandstone" => BlockType::SANDSTONE,
    "unknown" => BlockType::UNKNOWN,
};

impl BlockType {
    /// Number of block types, including `AIR`.
    pub const COUNT: usize = BlockType::UNKNOWN as usize + 1;

    /// Converts a `BlockTypeSize` to a `BlockType`.
    ///
    /// # Returns
    /// `None` if the value does not name a block type
    pub fn get_block_type_from_int(btype: BlockTypeSize) -> Option<Self> {
        num::FromPrimitive::from_u8(btype)
    }

    /// Looks a block type up by its texture name, e.g. `"grass_block"` or `"log"`.
    pub fn from_name(name: &str) -> Option<Self> {
        BLOCK_NAMES.get(name).copied()
    }

    /// Iterates over every block type that produces geometry (everything but `AIR`),
    /// in ascending id order.
    pub fn meshable() -> impl Iterator<Item = BlockType> {
        (1..Self::COUNT as BlockTypeSize).filter_map(Self::get_block_type_from_int)
    }

    /// Returns `true` for the `AIR` sentinel.
    #[inline]
    pub const fn is_air(self) -> bool {
        matches!(self, BlockType::AIR)
    }

    /// The RGB color the block is tinted with.
    pub fn color(self) -> [f32; 3] {
        BLOCK_COLORS[self as usize]
    }

    /// Generates a random block type (excluding AIR and UNKNOWN).
    ///
    /// This is used for procedural test chunks.
    pub fn get_random_type() -> Self {
        Self::get_block_type_from_int(fastrand::u8(1..BlockType::UNKNOWN as BlockTypeSize))
            .unwrap_or(BlockType::STONE)
    }
}
