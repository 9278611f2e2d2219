//! # Engine Configuration
//!
//! `EngineConfig` collects every tunable of the engine. It deserializes from JSON
//! with all fields optional; anything missing takes its default. Values are
//! checked by [`EngineConfig::validate`] after loading.
//!
//! ```json
//! {
//!     "render_distance": 8,
//!     "greedy_meshing": true,
//!     "generation": "perlin",
//!     "seed": 42,
//!     "camera": { "position": [0.0, 100.0, 0.0], "pitch_degrees": -20.0 }
//! }
//! ```

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::engine_state::voxels::chunk::GenerationMethod;

/// Errors that can occur while loading or validating the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Wrap IO failures when reading the configuration file.
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
    /// Wrap JSON parsing issues.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
    /// A value is out of its valid range.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Initial camera placement and projection.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CameraConfig {
    /// World-space position.
    pub position: [f32; 3],
    /// Heading in degrees, 0 looking along +X.
    pub yaw_degrees: f32,
    /// Pitch in degrees, positive looking up.
    pub pitch_degrees: f32,
    /// Vertical field of view in degrees.
    pub fovy_degrees: f32,
    pub znear: f32,
    pub zfar: f32,
    /// Viewport width in pixels.
    pub width: u32,
    /// Viewport height in pixels.
    pub height: u32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: [0.0, 100.0, 0.0],
            yaw_degrees: 0.0,
            pitch_degrees: -20.0,
            fovy_degrees: 70.0,
            znear: 0.1,
            zfar: 1000.0,
            width: 1280,
            height: 720,
        }
    }
}

/// Top-level engine configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Chunk radius (square) kept loaded around the camera.
    pub render_distance: i32,
    /// Merge exposed blocks into boxes; `false` emits one record per block.
    pub greedy_meshing: bool,
    /// Number of worker threads for generation and meshing.
    pub worker_threads: usize,
    /// Maximum number of chunk meshes kept before the least recently used is dropped.
    pub max_resident_meshes: usize,
    /// How new chunks are filled.
    pub generation: GenerationMethod,
    /// Terrain noise seed.
    pub seed: u32,
    /// Block texture file names in texture array order. `None` uses one texture
    /// per block type.
    pub texture_names: Option<Vec<String>>,
    pub camera: CameraConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            render_distance: 16,
            greedy_meshing: true,
            worker_threads: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
            max_resident_meshes: 10_000,
            generation: GenerationMethod::default(),
            seed: 0,
            texture_names: None,
            camera: CameraConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Loads and validates the configuration at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Parses and validates a JSON configuration.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that every value is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.render_distance < 1 {
            return Err(ConfigError::Invalid(format!(
                "render_distance must be at least 1, got {}",
                self.render_distance
            )));
        }
        if self.worker_threads == 0 {
            return Err(ConfigError::Invalid(
                "worker_threads must be at least 1".to_string(),
            ));
        }
        if self.max_resident_meshes == 0 {
            return Err(ConfigError::Invalid(
                "max_resident_meshes must be at least 1".to_string(),
            ));
        }

        let camera = &self.camera;
        if camera.znear.is_nan() || camera.znear <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "camera.znear must be positive, got {}",
                camera.znear
            )));
        }
        if camera.zfar.is_nan() || camera.zfar <= camera.znear {
            return Err(ConfigError::Invalid(format!(
                "camera.zfar ({}) must be greater than camera.znear ({})",
                camera.zfar, camera.znear
            )));
        }
        if camera.width == 0 || camera.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "camera viewport must be non-empty, got {}x{}",
                camera.width, camera.height
            )));
        }
        Ok(())
    }
}
