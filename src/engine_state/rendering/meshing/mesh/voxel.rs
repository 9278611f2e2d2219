//! Unmerged meshing: one record per exposed block.

use cgmath::Point3;

use crate::engine_state::{
    rendering::{texture::BlockPalette, Voxel},
    voxels::{
        chunk::{BlockGrid, Chunk, ChunkCoordinate, CHUNK_DIMENSION, SECTION_COUNT},
        neighborhood::Neighborhood,
    },
};

use super::occlusion::is_occluded;

/// Emits a [`Voxel`] for every non-air, non-occluded block of the center chunk.
///
/// Blocks are visited section by section from the bottom of the world, then by
/// X, Y and Z within a section.
pub fn mesh_voxels<G: BlockGrid>(
    neighborhood: &Neighborhood<'_, G>,
    position: ChunkCoordinate,
    palette: &BlockPalette,
) -> Vec<Voxel> {
    let (origin_x, origin_z) = position.block_origin();
    let mut voxels = Vec::new();

    for section in 0..SECTION_COUNT {
        if neighborhood.center().is_section_empty(section) {
            continue;
        }
        let base_y = Chunk::section_base_y(section);
        for x in 0..CHUNK_DIMENSION {
            for y in base_y..base_y + CHUNK_DIMENSION {
                for z in 0..CHUNK_DIMENSION {
                    let block_type = neighborhood.access(x, y, z);
                    if block_type.is_air() || is_occluded(neighborhood, x, y, z) {
                        continue;
                    }
                    voxels.push(Voxel::new(
                        Point3::new(x + origin_x, y, z + origin_z),
                        palette.color(block_type),
                        palette.texture_index(block_type),
                    ));
                }
            }
        }
    }

    voxels
}
