//! Recorded camera paths.
//!
//! A path is a JSON array of keyframes, each a camera position with a heading
//! and pitch in degrees. Playing it back places the camera on one keyframe per
//! frame and starts over after the last one, so sessions over the same path
//! stream the same chunks.
//!
//! ```json
//! [
//!     { "position": [8.0, 100.0, 8.0], "yaw_degrees": 0.0, "pitch_degrees": -20.0 },
//!     { "position": [24.0, 100.0, 8.0], "yaw_degrees": 15.0, "pitch_degrees": -20.0 }
//! ]
//! ```

use std::{fs, path::Path};

use cgmath::{Deg, Point3};
use serde::{Deserialize, Serialize};

use super::Camera;
use crate::config::ConfigError;

/// One recorded camera placement.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct CameraKeyframe {
    pub position: [f32; 3],
    #[serde(default)]
    pub yaw_degrees: f32,
    #[serde(default)]
    pub pitch_degrees: f32,
}

/// A non-empty sequence of keyframes played back in a loop.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct CameraPath {
    keyframes: Vec<CameraKeyframe>,
}

impl CameraPath {
    /// Creates a path from keyframes.
    pub fn new(keyframes: Vec<CameraKeyframe>) -> Result<Self, ConfigError> {
        if keyframes.is_empty() {
            return Err(ConfigError::Invalid("camera path has no keyframes".to_string()));
        }
        Ok(Self { keyframes })
    }

    /// Loads the path stored as JSON at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let path: CameraPath = serde_json::from_str(json)?;
        Self::new(path.keyframes)
    }

    pub fn len(&self) -> usize {
        self.keyframes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keyframes.is_empty()
    }

    /// The keyframe shown on `frame`, wrapping around at the end of the path.
    pub fn keyframe(&self, frame: usize) -> &CameraKeyframe {
        &self.keyframes[frame % self.keyframes.len()]
    }

    /// Places `camera` on the keyframe of `frame`.
    pub fn apply(&self, frame: usize, camera: &mut Camera) {
        let keyframe = self.keyframe(frame);
        let [x, y, z] = keyframe.position;
        *camera = Camera::new(
            Point3::new(x, y, z),
            Deg(keyframe.yaw_degrees),
            Deg(keyframe.pitch_degrees),
        );
    }
}
