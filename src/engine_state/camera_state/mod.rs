//! # Camera State Management
//!
//! This module handles all camera-related functionality including:
//! - Camera position and orientation tracking
//! - View and projection matrix calculations
//! - Frustum construction for chunk culling
//! - Chunk-based position tracking for streaming
//! - Playback of recorded camera paths
//!
//! ## Core Components
//! - `Camera`: Represents the camera's position and orientation in 3D space
//! - `Projection`: Manages the camera's projection matrix
//! - `Frustum` / `Aabb`: Conservative visibility tests for chunk bounding boxes
//!
//! `CameraState` is an explicit context object: the engine receives it in
//! `EngineState::update` rather than reading any global camera.

use cgmath::{Deg, Matrix4, Point3};

use super::voxels::chunk::ChunkCoordinate;
use crate::config::CameraConfig;

pub mod camera;
pub mod frustum;
pub mod path;

pub use camera::{Camera, Projection};
pub use frustum::{Aabb, Frustum};
pub use path::{CameraKeyframe, CameraPath};

/// The camera and its projection.
#[derive(Debug, Clone)]
pub struct CameraState {
    /// The current camera position and orientation
    pub camera: Camera,
    /// Camera projection settings
    pub projection: Projection,
}

impl CameraState {
    /// Creates a camera state from a camera and projection.
    pub fn new(camera: Camera, projection: Projection) -> Self {
        Self { camera, projection }
    }

    /// Creates a camera state from its configuration section.
    pub fn from_config(config: &CameraConfig) -> Self {
        let [x, y, z] = config.position;
        let camera = Camera::new(
            Point3::new(x, y, z),
            Deg(config.yaw_degrees),
            Deg(config.pitch_degrees),
        );
        let projection = Projection::new(
            config.width,
            config.height,
            Deg(config.fovy_degrees),
            config.znear,
            config.zfar,
        );
        Self::new(camera, projection)
    }

    /// Projection × view.
    pub fn view_projection(&self) -> Matrix4<f32> {
        self.projection.calc_matrix() * self.camera.calc_matrix()
    }

    /// The current view frustum.
    ///
    /// # Returns
    /// `None` if the view-projection matrix is singular.
    pub fn frustum(&self) -> Option<Frustum> {
        Frustum::from_view_projection(self.view_projection())
    }

    /// The chunk column the camera is in.
    pub fn chunk_position(&self) -> ChunkCoordinate {
        let position = self.camera.position;
        ChunkCoordinate::containing_block(position.x.floor() as i32, position.z.floor() as i32)
    }
}
