use serde::Deserialize;

use crate::error::GemError;

/// Tunables for projection and animation. Every field falls back to its default when
/// missing from the JSON.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct GemConfig {
    pub canvas_size: u32,
    pub fov: f32,
    pub camera_distance: f32,
    pub time_step: f32,
    pub morph_interval_ms: u64,
    pub fade_step: f32,
    pub spin_speed: f32,
    pub wobble_amplitude: f32,
    pub wobble_frequency: f32,
    pub tilt: f32,
}

impl Default for GemConfig {
    fn default() -> Self {
        Self {
            canvas_size: 400,
            fov: 1.3,
            camera_distance: 4.5,
            time_step: 0.01,
            morph_interval_ms: 3000,
            fade_step: 0.05,
            spin_speed: 0.4,
            wobble_amplitude: 0.2,
            wobble_frequency: 0.3,
            tilt: 0.3,
        }
    }
}

impl GemConfig {
    pub fn from_json(json: &str) -> Result<Self, GemError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn rotation_x(&self, time: f32) -> f32 {
        (time * self.wobble_frequency).sin() * self.wobble_amplitude + self.tilt
    }

    pub fn rotation_y(&self, time: f32) -> f32 {
        time * self.spin_speed
    }
}
