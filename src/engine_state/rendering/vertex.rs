//! Fixed-layout records handed to the GPU upload stage.
//!
//! Both record types are `#[repr(C)]` and `Pod`, so a slice of records can be
//! reinterpreted as bytes with `bytemuck::cast_slice` and copied straight into a
//! GPU buffer. Field order and native byte order are part of the format.

use cgmath::Point3;

/// One merged box of same-type exposed blocks.
///
/// # Memory Layout
/// - Start: 3x i32 (12 bytes), inclusive world-space corner
/// - End: 3x i32 (12 bytes), exclusive world-space corner
/// - Color: 3x f32 (12 bytes)
/// - Texture Index: u32 (4 bytes)
///
/// Total size: 40 bytes
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GreedyVoxel {
    pub start: [i32; 3],
    pub end: [i32; 3],
    pub color: [f32; 3],
    pub texture_index: u32,
}

impl GreedyVoxel {
    /// Creates a box record from its world-space corners.
    ///
    /// # Arguments
    /// * `start` - Inclusive minimum corner
    /// * `end` - Exclusive maximum corner, greater than `start` on every axis
    /// * `color` - RGB tint of the block type
    /// * `texture_index` - Layer in the block texture array
    pub fn new(start: Point3<i32>, end: Point3<i32>, color: [f32; 3], texture_index: u32) -> Self {
        debug_assert!(start.x < end.x && start.y < end.y && start.z < end.z);
        GreedyVoxel {
            start: start.into(),
            end: end.into(),
            color,
            texture_index,
        }
    }

    /// Number of blocks the box covers.
    pub fn volume(&self) -> i64 {
        (0..3)
            .map(|axis| (self.end[axis] - self.start[axis]) as i64)
            .product()
    }

    /// `true` if the block at world `(x, y, z)` lies inside the box.
    pub fn contains(&self, x: i32, y: i32, z: i32) -> bool {
        let p = [x, y, z];
        (0..3).all(|axis| self.start[axis] <= p[axis] && p[axis] < self.end[axis])
    }
}

/// A single exposed block, as emitted by the unmerged mesher.
///
/// # Memory Layout
/// - Position: 3x i32 (12 bytes)
/// - Color: 3x f32 (12 bytes)
/// - Texture Index: u32 (4 bytes)
///
/// Total size: 28 bytes
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Voxel {
    pub position: [i32; 3],
    pub color: [f32; 3],
    pub texture_index: u32,
}

impl Voxel {
    pub fn new(position: Point3<i32>, color: [f32; 3], texture_index: u32) -> Self {
        Voxel {
            position: position.into(),
            color,
            texture_index,
        }
    }
}
