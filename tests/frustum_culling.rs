//! Chunk culling against a camera frustum.

use cgmath::{Deg, Point3};
use voxel_box_engine::{
    config::{CameraConfig, EngineConfig},
    engine_state::{
        camera_state::{Camera, CameraState, Projection},
        rendering::BlockPalette,
        voxels::chunk::{ChunkCoordinate, GenerationMethod},
        EngineState,
    },
};

/// A camera inside chunk (0, 0) looking along +X.
fn camera_looking_east() -> CameraState {
    CameraState::new(
        Camera::new(Point3::new(8.0, 100.0, 8.0), Deg(0.0), Deg(0.0)),
        Projection::new(1280, 720, Deg(70.0), 0.1, 1000.0),
    )
}

#[test]
fn chunks_ahead_are_kept_and_behind_are_culled() {
    let frustum = camera_looking_east().frustum().unwrap();

    assert!(frustum.is_inside(&ChunkCoordinate::new(5, 0).bounding_box()));
    assert!(frustum.is_inside(&ChunkCoordinate::new(0, 0).bounding_box()));
    assert!(!frustum.is_inside(&ChunkCoordinate::new(-5, 0).bounding_box()));
    assert!(!frustum.is_inside(&ChunkCoordinate::new(-1, 3).bounding_box()));
}

#[test]
fn engine_returns_only_meshes_in_view() {
    let config = EngineConfig {
        render_distance: 2,
        worker_threads: 2,
        generation: GenerationMethod::Solid,
        camera: CameraConfig {
            position: [8.0, 100.0, 8.0],
            pitch_degrees: 0.0,
            ..CameraConfig::default()
        },
        ..EngineConfig::default()
    };
    let camera = CameraState::from_config(&config.camera);
    let mut engine = EngineState::new(&config, BlockPalette::default());
    engine.update(&camera);
    engine.wait_idle();
    assert_eq!(engine.stats().meshes, 9);

    let visible = engine.visible_meshes(&camera.frustum().unwrap());
    assert_eq!(visible.len(), 6);
    assert!(visible.iter().all(|mesh| mesh.position.x >= 0));
}
