//! Greedy meshing implementation for voxel rendering.
//!
//! This module merges exposed blocks of the same type into the fewest axis-aligned
//! boxes it can find with a single greedy pass over slice bitmasks.
//!
//! For each block type and each 16-block section of the chunk, the sixteen slice
//! masks of that section are kept side by side. Each set bit starts a box:
//! 1. the run of set bits along Z from the lowest set bit gives the Z extent
//! 2. following X columns are absorbed while they contain that whole run
//! 3. following slices upwards are absorbed while every absorbed column contains it
//!
//! Every absorbed bit is cleared, so each exposed block ends up in exactly one
//! box and the pass terminates once all masks are zero. Boxes never cross a
//! section boundary.

use cgmath::Point3;
use log::debug;
use web_time::Instant;

use crate::engine_state::{
    rendering::{texture::BlockPalette, GreedyVoxel},
    voxels::{
        block::block_type::BlockType,
        chunk::{BlockGrid, Chunk, ChunkCoordinate, CHUNK_DIMENSION, SECTION_COUNT},
        neighborhood::Neighborhood,
    },
};

use super::bitmask::{run_pattern, trailing_ones, trailing_zeros, SliceBitmask, SLICE_WIDTH};

/// Slice masks of one section, for every block type.
struct SectionMasks {
    /// `slices[block type][local y]`
    slices: [[SliceBitmask; SLICE_WIDTH]; BlockType::COUNT],
    /// Whether any bit is set for a block type.
    present: [bool; BlockType::COUNT],
}

impl SectionMasks {
    /// Builds the slice masks of one section of the center chunk, one
    /// [`SliceBitmask::build`] per block type present and local Y.
    ///
    /// # Returns
    /// `None` if the section holds no exposed blocks.
    fn scan<G: BlockGrid>(neighborhood: &Neighborhood<'_, G>, section: usize) -> Option<Box<Self>> {
        if neighborhood.center().is_section_empty(section) {
            return None;
        }

        let base_y = Chunk::section_base_y(section);
        let mut contained = [false; BlockType::COUNT];
        for y in base_y..base_y + CHUNK_DIMENSION {
            for x in 0..CHUNK_DIMENSION {
                for z in 0..CHUNK_DIMENSION {
                    contained[neighborhood.access(x, y, z) as usize] = true;
                }
            }
        }

        let mut masks = Box::new(SectionMasks {
            slices: [[SliceBitmask::EMPTY; SLICE_WIDTH]; BlockType::COUNT],
            present: [false; BlockType::COUNT],
        });
        let mut any = false;

        for block_type in BlockType::meshable().filter(|block_type| contained[*block_type as usize]) {
            let index = block_type as usize;
            for local_y in 0..CHUNK_DIMENSION {
                let slice = SliceBitmask::build(neighborhood, block_type, base_y + local_y);
                if !slice.is_empty() {
                    masks.slices[index][local_y as usize] = slice;
                    masks.present[index] = true;
                    any = true;
                }
            }
        }

        any.then_some(masks)
    }
}

/// Drains the sixteen slices of one section, calling `emit(start, end)` with
/// section-local box corners (end exclusive) for every box found.
///
/// Scan order is ascending local Y, then ascending X, then ascending Z, which
/// makes the output deterministic.
pub fn merge_section(
    slices: &mut [SliceBitmask; SLICE_WIDTH],
    mut emit: impl FnMut(Point3<i32>, Point3<i32>),
) {
    for y in 0..SLICE_WIDTH {
        for x in 0..SLICE_WIDTH {
            loop {
                let word = slices[y].column(x);
                if word == 0 {
                    break;
                }

                let z_start = trailing_zeros(word);
                let z_len = trailing_ones(word >> z_start);
                let pattern = run_pattern(z_start, z_len);

                let mut x_end = x + 1;
                while x_end < SLICE_WIDTH && slices[y].contains(x_end, pattern) {
                    slices[y].clear(x_end, pattern);
                    x_end += 1;
                }

                let mut y_end = y + 1;
                while y_end < SLICE_WIDTH
                    && (x..x_end).all(|column| slices[y_end].contains(column, pattern))
                {
                    for column in x..x_end {
                        slices[y_end].clear(column, pattern);
                    }
                    y_end += 1;
                }

                slices[y].clear(x, pattern);

                emit(
                    Point3::new(x as i32, y as i32, z_start as i32),
                    Point3::new(x_end as i32, y_end as i32, (z_start + z_len) as i32),
                );
            }
        }
    }
}

/// Meshes the center chunk of `neighborhood` into merged boxes.
///
/// # Arguments
/// * `neighborhood` - The chunk to mesh and its neighbors; should be fully resident
/// * `position` - Chunk coordinates of the center chunk, for world-space output
/// * `palette` - Block colors and texture indices
///
/// # Returns
/// Boxes in world coordinates, grouped by block type in id order, then by section
/// from the bottom of the world up.
pub fn greedy_mesh<G: BlockGrid>(
    neighborhood: &Neighborhood<'_, G>,
    position: ChunkCoordinate,
    palette: &BlockPalette,
) -> Vec<GreedyVoxel> {
    let start_time = Instant::now();
    let (origin_x, origin_z) = position.block_origin();

    let mut sections: Vec<Option<Box<SectionMasks>>> = (0..SECTION_COUNT)
        .map(|section| SectionMasks::scan(neighborhood, section))
        .collect();

    let mut boxes = Vec::new();
    for block_type in BlockType::meshable() {
        let color = palette.color(block_type);
        let texture_index = palette.texture_index(block_type);

        for (section, masks) in sections.iter_mut().enumerate() {
            let Some(masks) = masks else {
                continue;
            };
            if !masks.present[block_type as usize] {
                continue;
            }

            let base_y = Chunk::section_base_y(section);
            merge_section(&mut masks.slices[block_type as usize], |start, end| {
                boxes.push(GreedyVoxel::new(
                    Point3::new(start.x + origin_x, start.y + base_y, start.z + origin_z),
                    Point3::new(end.x + origin_x, end.y + base_y, end.z + origin_z),
                    color,
                    texture_index,
                ));
            });
        }
    }

    debug!(
        "Greedy meshed chunk ({}, {}) into {} boxes in {:?}",
        position.x,
        position.z,
        boxes.len(),
        start_time.elapsed()
    );
    boxes
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(slices: &mut [SliceBitmask; SLICE_WIDTH]) -> Vec<(Point3<i32>, Point3<i32>)> {
        let mut boxes = Vec::new();
        merge_section(slices, |start, end| boxes.push((start, end)));
        boxes
    }

    #[test]
    fn full_section_is_one_box() {
        let mut slices = [SliceBitmask::from_fn(|_, _| true); SLICE_WIDTH];
        let boxes = drain(&mut slices);
        assert_eq!(boxes, vec![(Point3::new(0, 0, 0), Point3::new(16, 16, 16))]);
        assert!(slices.iter().all(SliceBitmask::is_empty));
    }

    #[test]
    fn x_expansion_needs_the_whole_run() {
        let mut slices = [SliceBitmask::EMPTY; SLICE_WIDTH];
        // Column 0 has z 0..3, column 1 only z 0..2.
        slices[0] = SliceBitmask::from_fn(|x, z| (x == 0 && z < 3) || (x == 1 && z < 2));
        let boxes = drain(&mut slices);
        assert_eq!(
            boxes,
            vec![
                (Point3::new(0, 0, 0), Point3::new(1, 1, 3)),
                (Point3::new(1, 0, 0), Point3::new(2, 1, 2)),
            ]
        );
    }

    #[test]
    fn superset_columns_are_absorbed_and_keep_their_extra_bits() {
        let mut slices = [SliceBitmask::EMPTY; SLICE_WIDTH];
        slices[0] = SliceBitmask::from_fn(|x, z| (x == 0 && z == 1) || (x == 1 && z <= 2));
        let boxes = drain(&mut slices);
        assert_eq!(
            boxes,
            vec![
                (Point3::new(0, 0, 1), Point3::new(2, 1, 2)),
                (Point3::new(1, 0, 0), Point3::new(2, 1, 1)),
                (Point3::new(1, 0, 2), Point3::new(2, 1, 3)),
            ]
        );
    }

    #[test]
    fn y_expansion_requires_every_column() {
        let mut slices = [SliceBitmask::EMPTY; SLICE_WIDTH];
        slices[0] = SliceBitmask::from_fn(|x, z| x < 2 && z == 0);
        slices[1] = SliceBitmask::from_fn(|x, z| x < 2 && z == 0);
        slices[2] = SliceBitmask::from_fn(|x, z| x == 0 && z == 0);
        let boxes = drain(&mut slices);
        assert_eq!(
            boxes,
            vec![
                (Point3::new(0, 0, 0), Point3::new(2, 2, 1)),
                (Point3::new(0, 2, 0), Point3::new(1, 3, 1)),
            ]
        );
    }

    #[test]
    fn split_runs_in_one_column() {
        let mut slices = [SliceBitmask::EMPTY; SLICE_WIDTH];
        slices[5] = SliceBitmask::from_fn(|x, z| x == 15 && (z == 0 || z >= 14));
        let boxes = drain(&mut slices);
        assert_eq!(
            boxes,
            vec![
                (Point3::new(15, 5, 0), Point3::new(16, 6, 1)),
                (Point3::new(15, 5, 14), Point3::new(16, 6, 16)),
            ]
        );
    }

    #[test]
    fn slab_in_a_chunk_becomes_one_box() {
        let mut chunk = Chunk::empty(ChunkCoordinate::new(0, 0));
        for x in 0..2 {
            for z in 0..3 {
                chunk.set_block_at(x, 0, z, BlockType::STONE);
            }
        }
        let empty = Chunk::empty(ChunkCoordinate::new(0, 0));
        let mut grid = [[Some(&empty); 3]; 3];
        grid[1][1] = Some(&chunk);
        let neighborhood = Neighborhood::from_grid(grid).unwrap();
        let boxes = greedy_mesh(&neighborhood, ChunkCoordinate::new(0, 0), &BlockPalette::default());
        assert_eq!(boxes.len(), 1);
        assert_eq!(boxes[0].start, [0, 0, 0]);
        assert_eq!(boxes[0].end, [2, 1, 3]);
        assert_eq!(boxes[0].texture_index, BlockPalette::default().texture_index(BlockType::STONE));
    }
}
