use crate::consts::MIN_ZOOM;
use egui::{Pos2, Vec2};
use serde::{Deserialize, Serialize};

/// Pan/zoom mapping between canvas-local screen space and world space:
/// `screen = world * zoom + pan`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewTransform {
    pub zoom: f32,
    pub pan: Vec2,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            pan: Vec2::ZERO,
        }
    }
}

impl ViewTransform {
    pub fn screen_to_world(&self, screen: Pos2) -> Pos2 {
        ((screen.to_vec2() - self.pan) / self.zoom).to_pos2()
    }

    pub fn world_to_screen(&self, world: Pos2) -> Pos2 {
        (world.to_vec2() * self.zoom + self.pan).to_pos2()
    }

    /// Scale by `factor` keeping the world point under `pivot` fixed on screen.
    /// Zoom never drops below [`MIN_ZOOM`]; there is no upper limit.
    pub fn zoom_about(&mut self, factor: f32, pivot: Pos2) {
        let old_zoom = self.zoom;
        let new_zoom = (old_zoom * factor).max(MIN_ZOOM);
        let ratio = new_zoom / old_zoom;
        self.pan.x = pivot.x - (pivot.x - self.pan.x) * ratio;
        self.pan.y = pivot.y - (pivot.y - self.pan.y) * ratio;
        self.zoom = new_zoom;
    }

    pub fn pan_by(&mut self, delta: Vec2) {
        self.pan += delta;
    }
}
