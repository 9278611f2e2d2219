//! Per-slice occupancy bitmasks.
//!
//! A [`SliceBitmask`] holds one 16-bit word per local X column of a chunk at a
//! single world Y. Bit `z` of word `x` is set when the block at `(x, y, z)` has
//! the block type being meshed and is not fully occluded. The greedy mesher
//! drains these words run by run.

use crate::engine_state::voxels::{
    block::block_type::BlockType,
    chunk::{BlockGrid, CHUNK_DIMENSION},
    neighborhood::Neighborhood,
};

use super::occlusion::is_occluded;

/// Number of 16-bit words in a slice, one per local X.
pub const SLICE_WIDTH: usize = CHUNK_DIMENSION as usize;

/// Index of the lowest set bit of `word`.
///
/// Returns 0 for an all-zero word; callers only use it on nonzero words.
#[inline]
pub const fn trailing_zeros(word: u16) -> u32 {
    if word == 0 {
        0
    } else {
        word.trailing_zeros()
    }
}

/// Length of the run of set bits starting at bit 0. Returns 16 for `0xFFFF`.
#[inline]
pub const fn trailing_ones(word: u16) -> u32 {
    word.trailing_ones()
}

/// Bits `[start, start + len)` set, everything else clear.
///
/// Computed in 32 bits so a full-width run (`len == 16`) does not overflow.
#[inline]
pub const fn run_pattern(start: u32, len: u32) -> u16 {
    (((1u32 << len) - 1) << start) as u16
}

/// Exposed blocks of one block type in one horizontal slice of a chunk.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SliceBitmask {
    columns: [u16; SLICE_WIDTH],
}

impl SliceBitmask {
    /// An all-zero mask.
    pub const EMPTY: SliceBitmask = SliceBitmask {
        columns: [0; SLICE_WIDTH],
    };

    /// Builds the mask of exposed `block_type` blocks at world `y` of the center chunk.
    pub fn build<G: BlockGrid>(
        neighborhood: &Neighborhood<'_, G>,
        block_type: BlockType,
        y: i32,
    ) -> Self {
        Self::from_fn(|x, z| {
            neighborhood.access(x, y, z) == block_type && !is_occluded(neighborhood, x, y, z)
        })
    }

    /// Builds a mask by evaluating `exposed(x, z)` for every local column.
    pub fn from_fn(mut exposed: impl FnMut(i32, i32) -> bool) -> Self {
        let mut mask = Self::EMPTY;
        for x in 0..CHUNK_DIMENSION {
            for z in 0..CHUNK_DIMENSION {
                if exposed(x, z) {
                    mask.set_bit(x as usize, z as u32);
                }
            }
        }
        mask
    }

    /// Sets bit `z` of column `x`.
    ///
    /// Setting a bit twice within one construction means two sources claimed the
    /// same block, which is a bug; debug builds panic on it.
    #[inline]
    pub fn set_bit(&mut self, x: usize, z: u32) {
        debug_assert!(
            !self.is_set(x, z),
            "bit ({x}, {z}) set twice while building a slice mask"
        );
        self.columns[x] |= 1 << z;
    }

    #[inline]
    pub fn is_set(&self, x: usize, z: u32) -> bool {
        self.columns[x] & (1 << z) != 0
    }

    /// The raw word of column `x`.
    #[inline]
    pub fn column(&self, x: usize) -> u16 {
        self.columns[x]
    }

    /// `true` if every bit of `pattern` is set in column `x`.
    #[inline]
    pub fn contains(&self, x: usize, pattern: u16) -> bool {
        self.columns[x] & pattern == pattern
    }

    /// Clears the bits of `pattern` in column `x`.
    #[inline]
    pub fn clear(&mut self, x: usize, pattern: u16) {
        self.columns[x] &= !pattern;
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.columns.iter().all(|&word| word == 0)
    }

    /// Total number of set bits.
    pub fn count(&self) -> u32 {
        self.columns.iter().map(|word| word.count_ones()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::chunk::{Chunk, ChunkCoordinate};

    #[test]
    fn trailing_zeros_of_zero_is_zero() {
        assert_eq!(trailing_zeros(0), 0);
        assert_eq!(trailing_zeros(0b0110), 1);
        assert_eq!(trailing_zeros(0x8000), 15);
    }

    #[test]
    fn trailing_ones_counts_the_low_run() {
        assert_eq!(trailing_ones(0), 0);
        assert_eq!(trailing_ones(0b0111), 3);
        assert_eq!(trailing_ones(0b1011), 2);
        assert_eq!(trailing_ones(0xFFFF), 16);
    }

    #[test]
    fn run_patterns() {
        assert_eq!(run_pattern(0, 1), 0b1);
        assert_eq!(run_pattern(2, 3), 0b11100);
        assert_eq!(run_pattern(0, 16), 0xFFFF);
        assert_eq!(run_pattern(15, 1), 0x8000);
    }

    #[test]
    fn contains_requires_every_pattern_bit() {
        let mut mask = SliceBitmask::EMPTY;
        mask.set_bit(3, 1);
        mask.set_bit(3, 2);
        assert!(mask.contains(3, 0b110));
        assert!(!mask.contains(3, 0b111));

        mask.clear(3, 0b010);
        assert_eq!(mask.column(3), 0b100);
        assert_eq!(mask.count(), 1);
    }

    #[test]
    fn from_fn_sets_bit_z_of_word_x() {
        let mask = SliceBitmask::from_fn(|x, z| x == 2 && z % 2 == 0);
        assert_eq!(mask.column(2), 0b0101_0101_0101_0101);
        assert_eq!(mask.column(1), 0);
        assert!(!mask.is_empty());
        assert!(SliceBitmask::EMPTY.is_empty());
    }

    #[test]
    fn build_clears_the_occluded_center_of_a_cube() {
        let position = ChunkCoordinate::new(0, 0);
        let mut chunk = Chunk::empty(position);
        for x in 4..7 {
            for y in 0..3 {
                for z in 4..7 {
                    chunk.set_block_at(x, y, z, BlockType::STONE);
                }
            }
        }
        let neighborhood = Neighborhood::new(&chunk);

        let middle = SliceBitmask::build(&neighborhood, BlockType::STONE, 1);
        assert_eq!(middle.count(), 8);
        assert!(!middle.is_set(5, 5));
        assert!(middle.is_set(4, 4));
        assert_eq!(middle.column(5), 0b101_0000);

        let top = SliceBitmask::build(&neighborhood, BlockType::STONE, 2);
        assert_eq!(top.count(), 9);
        assert!(SliceBitmask::build(&neighborhood, BlockType::SAND, 1).is_empty());
    }

    #[test]
    fn build_sees_occlusion_across_the_chunk_border() {
        let solid = |chunk_x: i32| {
            let mut chunk = Chunk::empty(ChunkCoordinate::new(chunk_x, 0));
            for x in 0..CHUNK_DIMENSION {
                for y in 0..3 {
                    for z in 0..CHUNK_DIMENSION {
                        chunk.set_block_at(x, y, z, BlockType::STONE);
                    }
                }
            }
            chunk
        };
        let (west, center) = (solid(-1), solid(0));

        let alone = SliceBitmask::build(&Neighborhood::new(&center), BlockType::STONE, 1);
        let with_west = SliceBitmask::build(
            &Neighborhood::new(&center).with_neighbor(-1, 0, &west),
            BlockType::STONE,
            1,
        );

        // Column x = 0 faces the west chunk; interior z is hidden once it is loaded.
        assert_eq!(alone.column(0), 0xFFFF);
        assert_eq!(with_west.column(0), 0x8001);
        assert_eq!(with_west.column(15), 0xFFFF);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "set twice")]
    fn setting_a_bit_twice_panics_in_debug() {
        let mut mask = SliceBitmask::EMPTY;
        mask.set_bit(0, 4);
        mask.set_bit(0, 4);
    }
}
