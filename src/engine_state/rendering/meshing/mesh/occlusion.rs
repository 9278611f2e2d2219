//! Face-neighbor occlusion.

use crate::engine_state::voxels::{chunk::BlockGrid, neighborhood::Neighborhood};

/// Offsets of the six face-adjacent neighbors: +Y, -Y, +X, -X, +Z, -Z.
pub const FACE_OFFSETS: [(i32, i32, i32); 6] = [
    (0, 1, 0),
    (0, -1, 0),
    (1, 0, 0),
    (-1, 0, 0),
    (0, 0, 1),
    (0, 0, -1),
];

/// `true` if all six face neighbors of the block at chunk-relative `(x, y, z)`
/// are non-air, meaning none of its faces can be seen.
#[inline]
pub fn is_occluded<G: BlockGrid>(neighborhood: &Neighborhood<'_, G>, x: i32, y: i32, z: i32) -> bool {
    FACE_OFFSETS
        .iter()
        .all(|&(dx, dy, dz)| !neighborhood.access(x + dx, y + dy, z + dz).is_air())
}
