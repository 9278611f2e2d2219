//! # Chunk Creation Module
//!
//! Procedural generators for chunk contents. Every generator is a pure function of
//! the chunk position (and seed), so a chunk that is unloaded and later regenerated
//! comes back identical, with the exception of `random` which exists for stress
//! testing the mesher.
//!
//! ## Terrain
//!
//! The `perlin` generator samples 2D Perlin noise once per block column to get a
//! surface height, then fills the column:
//! - a bedrock floor at `WORLD_MIN_Y`
//! - stone up to a few blocks below the surface
//! - dirt under the surface block
//! - grass on top, or sand near and below the water line
//! - water from the surface up to `SEA_LEVEL`

use noise::{NoiseFn, Perlin};
use serde::{Deserialize, Serialize};

use crate::engine_state::voxels::block::block_type::BlockType;

use super::{Chunk, ChunkCoordinate, CHUNK_DIMENSION, WORLD_MAX_Y, WORLD_MIN_Y};

/// Scaling factor applied to world coordinates when sampling Perlin noise.
pub const PERLIN_SCALE_FACTOR: f64 = 0.02;
/// Surface height around which the terrain oscillates.
pub const BASE_TERRAIN_HEIGHT: i32 = 64;
/// Maximum distance of the surface from `BASE_TERRAIN_HEIGHT`.
pub const TERRAIN_AMPLITUDE: f64 = 24.0;
/// Everything below this Y that is not terrain is filled with water.
pub const SEA_LEVEL: i32 = 62;
/// Surfaces above this Y are capped with snow.
pub const SNOW_LINE: i32 = 84;
/// Depth of the dirt layer below the surface block.
const DIRT_DEPTH: i32 = 3;
/// Fraction of blocks left empty by the random generator.
const RANDOM_SPARSENESS: f64 = 0.9;
/// Height of the slab produced by the solid and checkerboard generators.
const TEST_SLAB_HEIGHT: i32 = 16;

/// Selects how new chunks are filled.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationMethod {
    #[default]
    Perlin,
    Checkerboard,
    Solid,
    Empty,
    Random,
}

impl Chunk {
    /// Generates the chunk at `position` with the given method.
    ///
    /// # Arguments
    /// * `method` - The generator to use
    /// * `position` - The chunk coordinates of the new chunk
    /// * `seed` - Noise seed, only used by `GenerationMethod::Perlin`
    pub fn generate(method: GenerationMethod, position: ChunkCoordinate, seed: u32) -> Self {
        match method {
            GenerationMethod::Perlin => Self::perlin(position, seed),
            GenerationMethod::Checkerboard => Self::checkerboard(position),
            GenerationMethod::Solid => Self::solid(position),
            GenerationMethod::Empty => Self::empty(position),
            GenerationMethod::Random => Self::random(position),
        }
    }

    /// Creates a chunk whose bottom 16 world layers (`0..16`) are solid dirt.
    pub fn solid(position: ChunkCoordinate) -> Self {
        let mut chunk = Self::empty(position);
        for y in 0..TEST_SLAB_HEIGHT {
            for z in 0..CHUNK_DIMENSION {
                for x in 0..CHUNK_DIMENSION {
                    chunk.set_block_at(x, y, z, BlockType::DIRT);
                }
            }
        }
        chunk
    }

    /// Creates a chunk with a 3D checkerboard of dirt in world layers `0..16`.
    ///
    /// Parity is taken from world coordinates so the pattern continues across
    /// chunk borders. Every placed block is exposed, which makes this the worst
    /// case for greedy meshing.
    pub fn checkerboard(position: ChunkCoordinate) -> Self {
        let (origin_x, origin_z) = position.block_origin();
        let mut chunk = Self::empty(position);
        for y in 0..TEST_SLAB_HEIGHT {
            for z in 0..CHUNK_DIMENSION {
                for x in 0..CHUNK_DIMENSION {
                    if (origin_x + x + y + origin_z + z).rem_euclid(2) == 0 {
                        chunk.set_block_at(x, y, z, BlockType::DIRT);
                    }
                }
            }
        }
        chunk
    }

    /// Creates a chunk with randomly placed blocks of random types in world
    /// layers `0..16`.
    pub fn random(position: ChunkCoordinate) -> Self {
        let mut chunk = Self::empty(position);
        for y in 0..TEST_SLAB_HEIGHT {
            for z in 0..CHUNK_DIMENSION {
                for x in 0..CHUNK_DIMENSION {
                    if fastrand::f64() >= RANDOM_SPARSENESS {
                        chunk.set_block_at(x, y, z, BlockType::get_random_type());
                    }
                }
            }
        }
        chunk
    }

    /// Generates heightmap terrain from Perlin noise.
    ///
    /// # Arguments
    /// * `position` - The chunk coordinates where the chunk will be placed
    /// * `seed` - Seed for the noise function
    pub fn perlin(position: ChunkCoordinate, seed: u32) -> Self {
        let perlin = Perlin::new(seed);
        let (origin_x, origin_z) = position.block_origin();
        let mut chunk = Self::empty(position);

        for z in 0..CHUNK_DIMENSION {
            for x in 0..CHUNK_DIMENSION {
                let height = surface_height(&perlin, origin_x + x, origin_z + z);
                let top = height.max(SEA_LEVEL);
                for y in WORLD_MIN_Y..top {
                    chunk.set_block_at(x, y, z, terrain_block(y, height));
                }
            }
        }

        chunk
    }
}

/// The first air (or water) Y above the terrain of one block column.
fn surface_height(perlin: &Perlin, world_x: i32, world_z: i32) -> i32 {
    let sample = perlin.get([
        world_x as f64 * PERLIN_SCALE_FACTOR,
        world_z as f64 * PERLIN_SCALE_FACTOR,
    ]);
    (BASE_TERRAIN_HEIGHT + (sample * TERRAIN_AMPLITUDE) as i32).clamp(WORLD_MIN_Y + 1, WORLD_MAX_Y)
}

/// Block at world `y` in a column whose surface height is `height`.
fn terrain_block(y: i32, height: i32) -> BlockType {
    let surface = height - 1;
    if y == WORLD_MIN_Y {
        BlockType::BEDROCK
    } else if y > surface {
        BlockType::WATER
    } else if y == surface {
        if surface < SEA_LEVEL {
            BlockType::SAND
        } else if surface >= SNOW_LINE {
            BlockType::SNOW
        } else {
            BlockType::GRASS
        }
    } else if y >= surface - DIRT_DEPTH {
        if surface < SEA_LEVEL {
            BlockType::SAND
        } else {
            BlockType::DIRT
        }
    } else {
        BlockType::STONE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solid_fills_sixteen_layers() {
        let chunk = Chunk::solid(ChunkCoordinate::new(0, 0));
        assert_eq!(chunk.non_air_count(), 16 * 16 * 16);
        assert_eq!(chunk.get_block_at(0, 0, 0), BlockType::DIRT);
        assert_eq!(chunk.get_block_at(15, 15, 15), BlockType::DIRT);
        assert_eq!(chunk.get_block_at(0, 16, 0), BlockType::AIR);
    }

    #[test]
    fn checkerboard_alternates_across_chunks() {
        let a = Chunk::checkerboard(ChunkCoordinate::new(0, 0));
        let b = Chunk::checkerboard(ChunkCoordinate::new(1, 0));
        assert_eq!(a.non_air_count(), 16 * 16 * 16 / 2);
        // World x = 15 and x = 16 at the same y/z have opposite parity.
        assert_ne!(a.is_block_solid(15, 0, 0), b.is_block_solid(0, 0, 0));
    }

    #[test]
    fn perlin_is_deterministic_for_a_seed() {
        let position = ChunkCoordinate::new(3, -2);
        let a = Chunk::perlin(position, 7);
        let b = Chunk::perlin(position, 7);
        for y in WORLD_MIN_Y..WORLD_MAX_Y {
            for z in 0..CHUNK_DIMENSION {
                for x in 0..CHUNK_DIMENSION {
                    assert_eq!(a.get_block_at(x, y, z), b.get_block_at(x, y, z));
                }
            }
        }
    }

    #[test]
    fn perlin_columns_have_bedrock_and_reach_sea_level() {
        let chunk = Chunk::perlin(ChunkCoordinate::new(0, 0), 1);
        for z in 0..CHUNK_DIMENSION {
            for x in 0..CHUNK_DIMENSION {
                assert_eq!(chunk.get_block_at(x, WORLD_MIN_Y, z), BlockType::BEDROCK);
                assert!(chunk.is_block_solid(x, SEA_LEVEL - 1, z));
            }
        }
    }

    #[test]
    fn terrain_layers() {
        assert_eq!(terrain_block(WORLD_MIN_Y, 70), BlockType::BEDROCK);
        assert_eq!(terrain_block(69, 70), BlockType::GRASS);
        assert_eq!(terrain_block(67, 70), BlockType::DIRT);
        assert_eq!(terrain_block(10, 70), BlockType::STONE);
        assert_eq!(terrain_block(59, 60), BlockType::SAND);
        assert_eq!(terrain_block(61, 60), BlockType::WATER);
        assert_eq!(terrain_block(89, 90), BlockType::SNOW);
    }

    #[test]
    fn generation_method_parses_lowercase() {
        let method: GenerationMethod = serde_json::from_str("\"checkerboard\"").unwrap();
        assert_eq!(method, GenerationMethod::Checkerboard);
    }
}
