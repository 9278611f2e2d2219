//! # Neighborhood Module
//!
//! A borrowed 3x3 view of chunks centered on the chunk being meshed. Lookups take
//! coordinates relative to the center chunk and transparently cross into the
//! adjacent chunk when `x` or `z` leaves `[0, 16)`.
//!
//! Missing neighbors read as air. A chunk meshed while a neighbor is absent will
//! therefore expose its boundary faces; callers only request meshing once all nine
//! chunks are resident.

use super::block::block_type::BlockType;
use super::chunk::{BlockGrid, Chunk, CHUNK_DIMENSION, WORLD_MAX_Y, WORLD_MIN_Y};

/// Maps a chunk-relative coordinate to its column in the 3x3 grid.
#[inline]
const fn column_index(v: i32) -> usize {
    if v < 0 {
        0
    } else if v < CHUNK_DIMENSION {
        1
    } else {
        2
    }
}

/// Read-only view of a chunk and its eight horizontal neighbors.
///
/// `chunks[i][k]` holds the chunk at offset `(i - 1, k - 1)` from the center.
pub struct Neighborhood<'a, G: BlockGrid = Chunk> {
    center: &'a G,
    chunks: [[Option<&'a G>; 3]; 3],
}

impl<'a, G: BlockGrid> Neighborhood<'a, G> {
    /// Creates a neighborhood with only the center chunk present.
    pub fn new(center: &'a G) -> Self {
        let mut chunks = [[None; 3]; 3];
        chunks[1][1] = Some(center);
        Self { center, chunks }
    }

    /// Builds a neighborhood from a full 3x3 grid, indexed `[x offset + 1][z offset + 1]`.
    ///
    /// # Returns
    /// `None` if the center slot is empty.
    pub fn from_grid(chunks: [[Option<&'a G>; 3]; 3]) -> Option<Self> {
        let center = chunks[1][1]?;
        Some(Self { center, chunks })
    }

    /// Places `neighbor` at chunk offset `(dx, dz)`, each in `-1..=1`.
    ///
    /// The center slot cannot be replaced; offsets outside the 3x3 grid are ignored.
    pub fn with_neighbor(mut self, dx: i32, dz: i32, neighbor: &'a G) -> Self {
        if (dx, dz) != (0, 0) && (-1..=1).contains(&dx) && (-1..=1).contains(&dz) {
            self.chunks[(dx + 1) as usize][(dz + 1) as usize] = Some(neighbor);
        }
        self
    }

    /// The chunk being meshed.
    pub fn center(&self) -> &'a G {
        self.center
    }

    /// `true` when all eight neighbors are present.
    pub fn is_fully_resident(&self) -> bool {
        self.chunks.iter().flatten().all(Option::is_some)
    }

    /// Resolves the block at chunk-relative `(x, y, z)`.
    ///
    /// `x` and `z` may range one chunk beyond either side of the center. `y` is
    /// a world coordinate; anything outside the world height is air.
    #[inline]
    pub fn access(&self, x: i32, y: i32, z: i32) -> BlockType {
        if !(WORLD_MIN_Y..WORLD_MAX_Y).contains(&y) {
            return BlockType::AIR;
        }
        let i = column_index(x);
        let k = column_index(z);
        if i == 1 && k == 1 {
            return self.center.block_at(x, y, z);
        }
        match self.chunks[i][k] {
            Some(neighbor) => {
                neighbor.block_at(x & (CHUNK_DIMENSION - 1), y, z & (CHUNK_DIMENSION - 1))
            }
            None => BlockType::AIR,
        }
    }
}
