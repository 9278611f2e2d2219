//! World streaming and the headless session.

use std::{fs, path::PathBuf};

use cgmath::Point3;
use voxel_box_engine::{
    config::{CameraConfig, EngineConfig},
    engine_state::{
        camera_state::CameraState,
        rendering::{BlockPalette, MeshRecords, PaletteError},
        voxels::{block::block_type::BlockType, chunk::{ChunkCoordinate, GenerationMethod}},
        EngineState,
    },
    run_with_args, Args, RunError,
};

fn small_config(generation: GenerationMethod, greedy_meshing: bool) -> EngineConfig {
    EngineConfig {
        render_distance: 2,
        worker_threads: 3,
        generation,
        greedy_meshing,
        camera: CameraConfig {
            position: [8.0, 100.0, 8.0],
            ..CameraConfig::default()
        },
        ..EngineConfig::default()
    }
}

fn write_config(name: &str, json: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("voxel-box-engine-{}-{}.json", name, std::process::id()));
    fs::write(&path, json).unwrap();
    path
}

#[test]
fn flat_meshing_emits_voxel_records() {
    let config = small_config(GenerationMethod::Checkerboard, false);
    let camera = CameraState::from_config(&config.camera);
    let mut engine = EngineState::new(&config, BlockPalette::default());
    engine.update(&camera);
    engine.wait_idle();

    let stats = engine.stats();
    assert_eq!(stats.meshes, 9);
    assert_eq!(stats.bytes, stats.records * 28);
    assert!(engine
        .mesh_manager()
        .meshes()
        .all(|mesh| matches!(mesh.records, MeshRecords::Voxels(_))));
}

#[test]
fn checkerboard_is_not_merged() {
    // Every block of a 3D checkerboard is exposed and has no same-type face neighbor.
    let config = small_config(GenerationMethod::Checkerboard, true);
    let camera = CameraState::from_config(&config.camera);
    let mut engine = EngineState::new(&config, BlockPalette::default());
    engine.update(&camera);
    engine.wait_idle();

    let stats = engine.stats();
    assert_eq!(stats.meshes, 9);
    assert_eq!(stats.records, 9 * 16 * 16 * 16 / 2);
}

#[test]
fn edits_reach_the_next_mesh() {
    let config = small_config(GenerationMethod::Empty, true);
    let mut camera = CameraState::from_config(&config.camera);
    let mut engine = EngineState::new(&config, BlockPalette::default());
    engine.update(&camera);
    engine.wait_idle();
    assert_eq!(engine.stats().records, 0);

    assert!(engine.set_block(3, 40, 4, BlockType::LAVA));
    engine.wait_idle();
    assert_eq!(engine.world().get_block(3, 40, 4), BlockType::LAVA);
    assert_eq!(engine.stats().records, 1);

    // Walking far away and back regenerates the chunk from scratch.
    camera.camera.position = Point3::new(8.0 + 16.0 * 20.0, 100.0, 8.0);
    engine.update(&camera);
    engine.wait_idle();
    assert!(!engine.world().contains(ChunkCoordinate::new(0, 0)));

    camera.camera.position = Point3::new(8.0, 100.0, 8.0);
    engine.update(&camera);
    engine.wait_idle();
    assert_eq!(engine.world().get_block(3, 40, 4), BlockType::AIR);
    assert_eq!(engine.stats().records, 0);
}

#[test]
fn headless_session_runs_from_a_config_file() {
    let path = write_config(
        "session",
        r#"{ "render_distance": 2, "worker_threads": 2, "generation": "perlin", "seed": 7 }"#,
    );
    let result = run_with_args(Args {
        config: Some(path.clone()),
        frames: 3,
        flat: true,
        path: None,
    });
    fs::remove_file(&path).unwrap();
    assert!(result.is_ok());
}

#[test]
fn unknown_texture_name_stops_the_session() {
    let path = write_config(
        "palette",
        r#"{ "render_distance": 1, "texture_names": ["stone", "banana", "unknown"] }"#,
    );
    let result = run_with_args(Args {
        config: Some(path.clone()),
        frames: 1,
        flat: false,
        path: None,
    });
    fs::remove_file(&path).unwrap();
    assert!(matches!(
        result,
        Err(RunError::Palette(PaletteError::UnknownTextureName(name))) if name == "banana"
    ));
}

#[test]
fn headless_session_plays_back_a_camera_path() {
    let config = write_config(
        "route-config",
        r#"{ "render_distance": 1, "worker_threads": 2, "generation": "solid" }"#,
    );
    let route = write_config(
        "route",
        r#"[
            { "position": [8.0, 60.0, 8.0], "yaw_degrees": 0.0, "pitch_degrees": -45.0 },
            { "position": [40.0, 60.0, 8.0], "yaw_degrees": 180.0 },
            { "position": [-24.0, 60.0, -24.0], "pitch_degrees": 10.0 }
        ]"#,
    );
    let result = run_with_args(Args {
        config: Some(config.clone()),
        frames: 5,
        flat: false,
        path: Some(route.clone()),
    });
    fs::remove_file(&config).unwrap();
    fs::remove_file(&route).unwrap();
    assert!(result.is_ok());
}
