//! Block texture indexing.
//!
//! The renderer samples block textures from a texture array. [`BlockPalette`]
//! maps each block type to its layer in that array and carries the block colors
//! into the mesh records. Layers are assigned from the list of texture files in
//! the order they are found. The `_side`, `_top` and `_bottom` variants of one
//! block share a single index.

use std::path::Path;

use log::debug;
use thiserror::Error;

use crate::engine_state::voxels::block::block_type::BlockType;

/// Suffixes of per-face texture variants.
const FACE_SUFFIXES: [&str; 3] = ["_side", "_top", "_bottom"];

/// Errors building a [`BlockPalette`] from texture names.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PaletteError {
    #[error("texture `{0}` does not name a block type")]
    UnknownTextureName(String),
    #[error("no `unknown` texture to fall back on")]
    MissingUnknownTexture,
}

/// Texture array index and color of every block type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockPalette {
    /// Texture index per block type; `None` for types without a texture.
    indices: [Option<u32>; BlockType::COUNT],
    /// Index used for every type without its own texture.
    unknown_index: u32,
    texture_count: u32,
}

/// Removes the directory, extension and a face suffix from a texture file name.
fn block_name(texture_name: &str) -> &str {
    let stem = Path::new(texture_name)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or(texture_name);
    FACE_SUFFIXES
        .iter()
        .find_map(|suffix| stem.strip_suffix(suffix))
        .unwrap_or(stem)
}

impl BlockPalette {
    /// Builds a palette from texture file names in array order.
    ///
    /// # Errors
    /// - [`PaletteError::UnknownTextureName`] if a name maps to no block type
    /// - [`PaletteError::MissingUnknownTexture`] if no `unknown` texture is listed
    pub fn from_texture_names<I, S>(names: I) -> Result<Self, PaletteError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut indices = [None; BlockType::COUNT];
        let mut next_index = 0;

        for name in names {
            let name = name.as_ref();
            let block_type = BlockType::from_name(block_name(name))
                .ok_or_else(|| PaletteError::UnknownTextureName(name.to_string()))?;
            let slot = &mut indices[block_type as usize];
            if slot.is_none() {
                debug!("Mapped {} to texture index {}", name, next_index);
                *slot = Some(next_index);
                next_index += 1;
            }
        }

        let unknown_index =
            indices[BlockType::UNKNOWN as usize].ok_or(PaletteError::MissingUnknownTexture)?;

        Ok(BlockPalette {
            indices,
            unknown_index,
            texture_count: next_index,
        })
    }

    /// Texture array index of `block_type`, or the `unknown` index if it has none.
    #[inline]
    pub fn texture_index(&self, block_type: BlockType) -> u32 {
        self.indices[block_type as usize].unwrap_or(self.unknown_index)
    }

    /// RGB tint of `block_type`.
    #[inline]
    pub fn color(&self, block_type: BlockType) -> [f32; 3] {
        block_type.color()
    }

    /// Number of distinct texture layers.
    pub fn texture_count(&self) -> u32 {
        self.texture_count
    }
}

impl Default for BlockPalette {
    /// One texture per meshable block type, in block id order.
    fn default() -> Self {
        let mut indices = [None; BlockType::COUNT];
        for (index, block_type) in BlockType::meshable().enumerate() {
            indices[block_type as usize] = Some(index as u32);
        }
        let texture_count = BlockType::COUNT as u32 - 1;
        BlockPalette {
            indices,
            unknown_index: texture_count - 1,
            texture_count,
        }
    }
}
