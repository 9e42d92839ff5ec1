use egui::{Pos2, Rect, Vec2};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// Stable identity of a placed image. Two images built from the same bytes
/// still have distinct ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageId(Uuid);

impl ImageId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ImageId {
    fn default() -> Self {
        Self::new()
    }
}

/// Encoded pixel data (PNG, JPEG, ...) shared by every copy of an image
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageSource(Arc<Vec<u8>>);

impl ImageSource {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(Arc::new(bytes))
    }

    pub fn bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn decode(&self) -> Result<::image::RgbaImage, ::image::ImageError> {
        ::image::load_from_memory(&self.0).map(|img| img.to_rgba8())
    }
}

// Custom Debug implementation to avoid dumping the raw bytes
impl std::fmt::Debug for ImageSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageSource")
            .field("data_len", &self.0.len())
            .finish()
    }
}

/// A raster image placed on the canvas. `x`/`y` is the top-left corner in
/// world space; `rotation` is in radians about the centre.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedImage {
    pub id: ImageId,
    #[serde(rename = "src")]
    pub source: ImageSource,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    #[serde(default)]
    pub rotation: f32,
    /// Index into the scene's layer list
    #[serde(default)]
    pub layer: usize,
}

/// Partial update of an image's placement. `None` fields are left as is.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ImageTransform {
    pub x: Option<f32>,
    pub y: Option<f32>,
    pub width: Option<f32>,
    pub height: Option<f32>,
    pub rotation: Option<f32>,
}

impl PlacedImage {
    pub fn new(source: ImageSource, position: Pos2, size: Vec2) -> Self {
        Self {
            id: ImageId::new(),
            source,
            x: position.x,
            y: position.y,
            width: size.x,
            height: size.y,
            rotation: 0.0,
            layer: 0,
        }
    }

    /// Axis-aligned bounds, ignoring rotation
    pub fn rect(&self) -> Rect {
        Rect::from_min_size(Pos2::new(self.x, self.y), Vec2::new(self.width, self.height))
    }

    pub fn center(&self) -> Pos2 {
        self.rect().center()
    }

    /// Axis-aligned bounds of the rotated image
    pub fn rotated_bounds(&self) -> Rect {
        let center = self.center();
        let (sin, cos) = self.rotation.sin_cos();
        let half = Vec2::new(self.width / 2.0, self.height / 2.0);
        let corners = [
            Vec2::new(-half.x, -half.y),
            Vec2::new(half.x, -half.y),
            Vec2::new(half.x, half.y),
            Vec2::new(-half.x, half.y),
        ];
        let mut bounds = Rect::NOTHING;
        for corner in corners {
            let rotated = Vec2::new(
                corner.x * cos - corner.y * sin,
                corner.x * sin + corner.y * cos,
            );
            bounds.extend_with(center + rotated);
        }
        bounds
    }

    pub fn apply(&mut self, transform: ImageTransform) {
        if let Some(x) = transform.x {
            self.x = x;
        }
        if let Some(y) = transform.y {
            self.y = y;
        }
        if let Some(width) = transform.width {
            self.width = width;
        }
        if let Some(height) = transform.height {
            self.height = height;
        }
        if let Some(rotation) = transform.rotation {
            self.rotation = rotation;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image() -> PlacedImage {
        PlacedImage::new(
            ImageSource::new(vec![1, 2, 3]),
            Pos2::new(10.0, 20.0),
            Vec2::new(40.0, 20.0),
        )
    }

    #[test]
    fn same_bytes_do_not_share_identity() {
        let a = image();
        let b = image();
        assert_eq!(a.source, b.source);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn partial_transform_only_touches_given_fields() {
        let mut img = image();
        img.apply(ImageTransform {
            width: Some(80.0),
            rotation: Some(1.0),
            ..Default::default()
        });
        assert_eq!(img.x, 10.0);
        assert_eq!(img.width, 80.0);
        assert_eq!(img.height, 20.0);
        assert_eq!(img.rotation, 1.0);
    }

    #[test]
    fn quarter_turn_swaps_bounds() {
        let mut img = image();
        img.rotation = std::f32::consts::FRAC_PI_2;
        let bounds = img.rotated_bounds();
        assert!((bounds.width() - 20.0).abs() < 1e-3);
        assert!((bounds.height() - 40.0).abs() < 1e-3);
        assert!((bounds.center().x - img.center().x).abs() < 1e-3);
    }
}
