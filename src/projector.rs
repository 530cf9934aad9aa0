use glam::{Vec2, Vec3};

use crate::config::GemConfig;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projected {
    pub x: f32,
    pub y: f32,
    /// Rotated z: larger is closer to the camera.
    pub depth: f32,
}

impl Projected {
    pub fn point(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

/// Perspective camera on +Z looking at the origin of a square viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projector {
    pub size: f32,
    pub fov: f32,
    pub camera_distance: f32,
}

impl Projector {
    pub fn new(size: f32) -> Self {
        let config = GemConfig::default();
        Self {
            size,
            fov: config.fov,
            camera_distance: config.camera_distance,
        }
    }

    pub fn from_config(config: &GemConfig) -> Self {
        Self {
            size: config.canvas_size as f32,
            fov: config.fov,
            camera_distance: config.camera_distance,
        }
    }

    /// Rotates about Y by `rotation_y`, then about X by `rotation_x`, then projects.
    /// Screen y grows downward.
    pub fn project(&self, vertex: Vec3, rotation_x: f32, rotation_y: f32) -> Projected {
        let (sin_y, cos_y) = rotation_y.sin_cos();
        let x = vertex.x * cos_y + vertex.z * sin_y;
        let z = -vertex.x * sin_y + vertex.z * cos_y;

        let (sin_x, cos_x) = rotation_x.sin_cos();
        let y = vertex.y * cos_x - z * sin_x;
        let depth = vertex.y * sin_x + z * cos_x;

        let scale = self.size / (self.fov * (self.camera_distance - depth));
        let half = self.size / 2.0;
        Projected {
            x: half + x * scale,
            y: half - y * scale,
            depth,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_maps_to_center() {
        let projector = Projector::new(400.0);
        for (rx, ry) in [(0.0, 0.0), (0.3, 1.2), (-2.0, 5.0)] {
            let p = projector.project(Vec3::ZERO, rx, ry);
            assert!((p.x - 200.0).abs() < 1e-4);
            assert!((p.y - 200.0).abs() < 1e-4);
            assert_eq!(p.depth, 0.0);
        }
    }

    #[test]
    fn projection_is_deterministic() {
        let projector = Projector::new(280.0);
        let v = Vec3::new(0.4, -0.7, 1.1);
        assert_eq!(projector.project(v, 0.3, 0.8), projector.project(v, 0.3, 0.8));
    }

    #[test]
    fn up_is_up_on_screen() {
        let projector = Projector::new(400.0);
        let top = projector.project(Vec3::Y, 0.0, 0.0);
        assert!(top.y < 200.0);
        let right = projector.project(Vec3::X, 0.0, 0.0);
        assert!(right.x > 200.0);
        let near = projector.project(Vec3::Z, 0.0, 0.0);
        assert_eq!(near.depth, 1.0);
    }
}
