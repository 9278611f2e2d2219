//! Greedy meshing through the public API, checked against the per-block mesher.

use cgmath::Point3;
use proptest::prelude::*;
use voxel_box_engine::engine_state::{
    rendering::{
        meshing::{greedy_mesh, mesh_voxels},
        BlockPalette, GreedyVoxel,
    },
    voxels::{
        block::block_type::BlockType,
        chunk::{Chunk, ChunkCoordinate, CHUNK_DIMENSION, WORLD_MIN_Y},
        neighborhood::Neighborhood,
    },
};

fn fill(chunk: &mut Chunk, min: Point3<i32>, max: Point3<i32>, block_type: BlockType) {
    for x in min.x..max.x {
        for y in min.y..max.y {
            for z in min.z..max.z {
                chunk.set_block_at(x, y, z, block_type);
            }
        }
    }
}

fn section_of(y: i32) -> i32 {
    (y - WORLD_MIN_Y).div_euclid(CHUNK_DIMENSION)
}

#[test]
fn adjacent_types_stay_separate_boxes() {
    let position = ChunkCoordinate::new(0, 0);
    let mut chunk = Chunk::empty(position);
    fill(&mut chunk, Point3::new(2, 0, 0), Point3::new(4, 1, 3), BlockType::SAND);
    fill(&mut chunk, Point3::new(0, 0, 0), Point3::new(2, 1, 3), BlockType::STONE);

    let palette = BlockPalette::default();
    let boxes = greedy_mesh(&Neighborhood::new(&chunk), position, &palette);

    assert_eq!(
        boxes,
        vec![
            GreedyVoxel::new(
                Point3::new(0, 0, 0),
                Point3::new(2, 1, 3),
                BlockType::STONE.color(),
                palette.texture_index(BlockType::STONE),
            ),
            GreedyVoxel::new(
                Point3::new(2, 0, 0),
                Point3::new(4, 1, 3),
                BlockType::SAND.color(),
                palette.texture_index(BlockType::SAND),
            ),
        ]
    );
}

#[test]
fn boxes_split_at_section_boundaries() {
    let position = ChunkCoordinate::new(-3, 7);
    let mut chunk = Chunk::empty(position);
    fill(&mut chunk, Point3::new(4, 14, 9), Point3::new(5, 18, 10), BlockType::WOOD);

    let boxes = greedy_mesh(&Neighborhood::new(&chunk), position, &BlockPalette::default());
    let (origin_x, origin_z) = position.block_origin();

    assert_eq!(boxes.len(), 2);
    assert_eq!(boxes[0].start, [origin_x + 4, 14, origin_z + 9]);
    assert_eq!(boxes[0].end, [origin_x + 5, 16, origin_z + 10]);
    assert_eq!(boxes[1].start, [origin_x + 4, 16, origin_z + 9]);
    assert_eq!(boxes[1].end, [origin_x + 5, 18, origin_z + 10]);
}

#[test]
fn meshing_twice_gives_identical_bytes() {
    let position = ChunkCoordinate::new(4, -9);
    let chunk = Chunk::perlin(position, 1234);
    let palette = BlockPalette::default();

    let first = greedy_mesh(&Neighborhood::new(&chunk), position, &palette);
    let second = greedy_mesh(&Neighborhood::new(&chunk), position, &palette);

    assert!(!first.is_empty());
    assert_eq!(
        bytemuck::cast_slice::<GreedyVoxel, u8>(&first),
        bytemuck::cast_slice::<GreedyVoxel, u8>(&second)
    );
}

#[test]
fn empty_chunk_has_no_boxes() {
    let position = ChunkCoordinate::new(0, 0);
    let chunk = Chunk::empty(position);
    assert!(greedy_mesh(&Neighborhood::new(&chunk), position, &BlockPalette::default()).is_empty());
}

fn block_strategy() -> impl Strategy<Value = Vec<(i32, i32, i32, u8)>> {
    prop::collection::vec(
        (
            0..CHUNK_DIMENSION,
            0..2 * CHUNK_DIMENSION,
            0..CHUNK_DIMENSION,
            1u8..BlockType::UNKNOWN as u8,
        ),
        0..300,
    )
}

/// Seed and fill ratio for one chunk of a 3x3 neighborhood.
fn dense_strategy() -> impl Strategy<Value = [(u64, f64); 9]> {
    prop::array::uniform9((any::<u64>(), 0.4f64..0.95))
}

/// Fills the two lowest sections above y = 0 with a few block types so whole
/// runs are buried and cross-chunk faces decide exposure.
fn dense_chunk(position: ChunkCoordinate, seed: u64, fill: f64) -> Chunk {
    let mut rng = fastrand::Rng::with_seed(seed);
    let mut chunk = Chunk::empty(position);
    for x in 0..CHUNK_DIMENSION {
        for y in 0..2 * CHUNK_DIMENSION {
            for z in 0..CHUNK_DIMENSION {
                if rng.f64() < fill {
                    let block_type = BlockType::get_block_type_from_int(rng.u8(1..4)).unwrap();
                    chunk.set_block_at(x, y, z, block_type);
                }
            }
        }
    }
    chunk
}

/// Boxes of each type cover exactly the exposed blocks of that type, without
/// overlap and without crossing a section boundary.
fn check_partition(
    neighborhood: &Neighborhood<'_, Chunk>,
    position: ChunkCoordinate,
) -> Result<(), TestCaseError> {
    let palette = BlockPalette::default();
    let boxes = greedy_mesh(neighborhood, position, &palette);
    let voxels = mesh_voxels(neighborhood, position, &palette);

    let volume: i64 = boxes.iter().map(GreedyVoxel::volume).sum();
    prop_assert_eq!(volume, voxels.len() as i64);

    for voxel in &voxels {
        let [x, y, z] = voxel.position;
        let covering: Vec<&GreedyVoxel> = boxes.iter().filter(|b| b.contains(x, y, z)).collect();
        prop_assert_eq!(covering.len(), 1);
        prop_assert_eq!(covering[0].texture_index, voxel.texture_index);
    }

    for b in &boxes {
        prop_assert_eq!(section_of(b.start[1]), section_of(b.end[1] - 1));
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn boxes_partition_exposed_blocks_of_a_lone_chunk(blocks in block_strategy()) {
        let position = ChunkCoordinate::new(1, -1);
        let mut chunk = Chunk::empty(position);
        for (x, y, z, block_type) in blocks {
            let block_type = BlockType::get_block_type_from_int(block_type).unwrap();
            chunk.set_block_at(x, y, z, block_type);
        }

        check_partition(&Neighborhood::new(&chunk), position)?;
    }

    #[test]
    fn boxes_partition_exposed_blocks_with_neighbors(fills in dense_strategy()) {
        let position = ChunkCoordinate::new(-2, 5);
        let chunks: Vec<Chunk> = fills
            .iter()
            .enumerate()
            .map(|(index, &(seed, fill))| {
                let (dx, dz) = (index as i32 / 3 - 1, index as i32 % 3 - 1);
                dense_chunk(position.offset(dx, dz), seed, fill)
            })
            .collect();

        let mut neighborhood = Neighborhood::new(&chunks[4]);
        for (index, chunk) in chunks.iter().enumerate() {
            neighborhood = neighborhood.with_neighbor(index as i32 / 3 - 1, index as i32 % 3 - 1, chunk);
        }
        prop_assert!(neighborhood.is_fully_resident());

        check_partition(&neighborhood, position)?;
    }
}
