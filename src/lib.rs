#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Voxel Box Engine
//!
//! Chunk meshing and streaming for a voxel world.
//!
//! The engine turns 16x16 chunk columns into compact box records ready for a GPU
//! upload, culls the finished meshes against the camera frustum and streams
//! chunks in and out around the camera on a pool of worker threads.
//!
//! ## Key Modules
//!
//! * `config` - Engine configuration loaded from JSON
//! * `core` - Concurrency primitives shared by the engine
//! * `engine_state` - World data, meshing, culling and task management
//!
//! ## Usage
//!
//! ```no_run
//! fn main() {
//!     if voxel_box_engine::run().is_err() {
//!         std::process::exit(1);
//!     }
//! }
//! ```
//!
//! ## Performance Considerations
//!
//! * Chunk sections are allocated lazily, all-air sections cost nothing
//! * Greedy meshing merges exposed blocks with word-sized bit operations
//! * Generation and meshing run on worker threads

use std::path::PathBuf;

use clap::Parser;
use log::{error, info, warn};
use thiserror::Error;

pub mod config;
pub mod core;
pub mod engine_state;

use config::{ConfigError, EngineConfig};
use engine_state::{
    camera_state::{CameraPath, CameraState},
    rendering::{BlockPalette, PaletteError},
    voxels::chunk::CHUNK_DIMENSION,
    EngineState,
};

/// Command line arguments of the headless session.
#[derive(Parser, Debug)]
#[command(author, version, about = "Streams and meshes a voxel world without a window", long_about = None)]
pub struct Args {
    /// JSON configuration file; defaults are used when omitted
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Number of engine updates to run
    #[arg(long, default_value_t = 8)]
    pub frames: u32,

    /// Emit one record per exposed block instead of merged boxes
    #[arg(long)]
    pub flat: bool,

    /// JSON camera path played back one keyframe per frame, instead of moving
    /// one chunk forward after each frame
    #[arg(long)]
    pub path: Option<PathBuf>,
}

/// Errors that stop a headless session before it starts.
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to build block palette: {0}")]
    Palette(#[from] PaletteError),
    #[error("failed to load camera path: {0}")]
    CameraPath(ConfigError),
}

/// Runs a headless session with arguments from the command line.
pub fn run() -> Result<(), RunError> {
    let mut log_builder = env_logger::Builder::new();
    log_builder
        .target(env_logger::Target::Stdout)
        .parse_env("RUST_LOG")
        .init();

    info!("Logger initialized");

    run_with_args(Args::parse()).inspect_err(|err| error!("{err}"))
}

/// Runs a headless session: streams the world around the camera for
/// `args.frames` updates, then logs what was built.
///
/// The camera follows `args.path` when given. Otherwise it starts where the
/// configuration puts it and moves one chunk forward after each update.
pub fn run_with_args(args: Args) -> Result<(), RunError> {
    let mut config = match &args.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    if args.flat {
        config.greedy_meshing = false;
    }

    let palette = match &config.texture_names {
        Some(names) => BlockPalette::from_texture_names(names)?,
        None => BlockPalette::default(),
    };
    info!("Block palette has {} textures", palette.texture_count());

    let camera_path = args
        .path
        .as_deref()
        .map(CameraPath::load)
        .transpose()
        .map_err(RunError::CameraPath)?;
    if let Some(camera_path) = &camera_path {
        info!("Playing back a camera path of {} keyframes", camera_path.len());
    }

    let mut camera_state = CameraState::from_config(&config.camera);
    let mut engine = EngineState::new(&config, palette);

    for frame in 0..args.frames {
        if let Some(camera_path) = &camera_path {
            camera_path.apply(frame as usize, &mut camera_state.camera);
        }
        engine.update(&camera_state);
        engine.wait_idle();

        let position = camera_state.chunk_position();
        info!(
            "Frame {}: camera in chunk ({}, {}), {} chunks resident",
            frame,
            position.x,
            position.z,
            engine.stats().chunks
        );
        if camera_path.is_none() {
            camera_state.camera.move_forward(CHUNK_DIMENSION as f32);
        }
    }

    let stats = engine.stats();
    let visible = match camera_state.frustum() {
        Some(frustum) => engine.visible_meshes(&frustum).len(),
        None => {
            warn!("Camera matrix is singular, skipping culling");
            0
        }
    };
    info!(
        "{} chunks, {} meshes, {} records, {} bytes, {} meshes visible",
        stats.chunks, stats.meshes, stats.records, stats.bytes, visible
    );
    Ok(())
}
