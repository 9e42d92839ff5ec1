use crate::image::PlacedImage;
use crate::renderer::Surface;
use ::image::{Rgba, RgbaImage};
use egui::{Color32, Pos2, Rect, Vec2};
use log::warn;

/// Software [`Surface`] over an RGBA buffer. World position `origin` maps to
/// the buffer's top-left corner and one world unit spans `scale` pixels.
pub struct RasterSurface {
    pixels: RgbaImage,
    origin: Pos2,
    scale: f32,
}

// Custom Debug implementation to avoid dumping the pixel buffer
impl std::fmt::Debug for RasterSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RasterSurface")
            .field("width", &self.pixels.width())
            .field("height", &self.pixels.height())
            .field("origin", &self.origin)
            .field("scale", &self.scale)
            .finish()
    }
}

impl RasterSurface {
    /// A fully transparent surface
    pub fn new(width: u32, height: u32, origin: Pos2, scale: f32) -> Self {
        Self {
            pixels: RgbaImage::new(width, height),
            origin,
            scale: if scale > 0.0 { scale } else { 1.0 },
        }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn into_image(self) -> RgbaImage {
        self.pixels
    }

    fn to_pixel(&self, world: Pos2) -> Pos2 {
        ((world - self.origin) * self.scale).to_pos2()
    }

    fn to_world(&self, pixel: Pos2) -> Pos2 {
        self.origin + pixel.to_vec2() / self.scale
    }

    /// Pixel index range whose centres fall in `[min, max)`, clipped to `len`
    fn span(min: f32, max: f32, len: u32) -> std::ops::Range<u32> {
        let start = (min - 0.5).ceil().clamp(0.0, len as f32) as u32;
        let end = (max - 0.5).ceil().clamp(0.0, len as f32) as u32;
        start..end.max(start)
    }

    fn blend(&mut self, x: u32, y: u32, color: Color32) {
        let [r, g, b, a] = color.to_srgba_unmultiplied();
        if a == 0 {
            return;
        }
        let dst = self.pixels.get_pixel_mut(x, y);
        if a == 255 {
            *dst = Rgba([r, g, b, 255]);
            return;
        }
        let src_a = f32::from(a) / 255.0;
        let dst_a = f32::from(dst.0[3]) / 255.0;
        let out_a = src_a + dst_a * (1.0 - src_a);
        let mix = |s: u8, d: u8| -> u8 {
            let value = (f32::from(s) * src_a + f32::from(d) * dst_a * (1.0 - src_a)) / out_a;
            value.round().clamp(0.0, 255.0) as u8
        };
        *dst = Rgba([
            mix(r, dst.0[0]),
            mix(g, dst.0[1]),
            mix(b, dst.0[2]),
            (out_a * 255.0).round() as u8,
        ]);
    }

    /// Fill every pixel whose centre lies within `radius` pixels of `center`
    fn stamp_disc(&mut self, center: Pos2, radius: f32, color: Color32) {
        let xs = Self::span(center.x - radius, center.x + radius + 1.0, self.width());
        let ys = Self::span(center.y - radius, center.y + radius + 1.0, self.height());
        let radius_sq = radius * radius;
        for y in ys {
            for x in xs.clone() {
                let dx = x as f32 + 0.5 - center.x;
                let dy = y as f32 + 0.5 - center.y;
                if dx * dx + dy * dy <= radius_sq {
                    self.blend(x, y, color);
                }
            }
        }
    }
}

impl Surface for RasterSurface {
    fn clear(&mut self, color: Color32) {
        let [r, g, b, a] = color.to_srgba_unmultiplied();
        for pixel in self.pixels.pixels_mut() {
            *pixel = Rgba([r, g, b, a]);
        }
    }

    fn visible_rect(&self) -> Rect {
        let size = Vec2::new(self.width() as f32, self.height() as f32) / self.scale;
        Rect::from_min_size(self.origin, size)
    }

    fn pixel_size(&self) -> f32 {
        1.0 / self.scale
    }

    fn fill_rect(&mut self, rect: Rect, color: Color32) {
        let min = self.to_pixel(rect.min);
        let max = self.to_pixel(rect.max);
        let ys = Self::span(min.y, max.y, self.height());
        for y in ys {
            for x in Self::span(min.x, max.x, self.width()) {
                self.blend(x, y, color);
            }
        }
    }

    fn draw_line(&mut self, from: Pos2, to: Pos2, width: f32, color: Color32) {
        let from = self.to_pixel(from);
        let to = self.to_pixel(to);
        let radius = (width * self.scale / 2.0).max(0.5);
        let length = from.distance(to);
        if !length.is_finite() {
            return;
        }

        // Overlapping stamps; half-transparent lines darken where they overlap
        let step = (radius / 2.0).max(0.5);
        let stamps = (length / step).ceil().max(1.0) as usize;
        for i in 0..=stamps {
            let t = i as f32 / stamps as f32;
            self.stamp_disc(from.lerp(to, t), radius, color);
        }
    }

    fn draw_image(&mut self, image: &PlacedImage) {
        let source = match image.source.decode() {
            Ok(decoded) => decoded,
            Err(err) => {
                warn!("Skipping image {:?} that failed to decode: {err}", image.id);
                return;
            }
        };
        if source.width() == 0 || source.height() == 0 || image.width <= 0.0 || image.height <= 0.0 {
            return;
        }

        let bounds = image.rotated_bounds();
        let min = self.to_pixel(bounds.min);
        let max = self.to_pixel(bounds.max);
        let center = image.center();
        let (sin, cos) = (-image.rotation).sin_cos();
        let scale_x = source.width() as f32 / image.width;
        let scale_y = source.height() as f32 / image.height;

        for y in Self::span(min.y, max.y, self.height()) {
            for x in Self::span(min.x, max.x, self.width()) {
                let world = self.to_world(Pos2::new(x as f32 + 0.5, y as f32 + 0.5));
                let offset = world - center;
                // Undo the rotation to land in the image's own frame
                let local_x = offset.x * cos - offset.y * sin + image.width / 2.0;
                let local_y = offset.x * sin + offset.y * cos + image.height / 2.0;
                if local_x < 0.0 || local_y < 0.0 || local_x >= image.width || local_y >= image.height {
                    continue;
                }
                let sx = ((local_x * scale_x) as u32).min(source.width() - 1);
                let sy = ((local_y * scale_y) as u32).min(source.height() - 1);
                let [r, g, b, a] = source.get_pixel(sx, sy).0;
                self.blend(x, y, Color32::from_rgba_unmultiplied(r, g, b, a));
            }
        }
    }

    fn read_pixel(&self, pos: Pos2) -> Option<Color32> {
        let pixel = self.to_pixel(pos);
        if !pixel.x.is_finite() || !pixel.y.is_finite() || pixel.x < 0.0 || pixel.y < 0.0 {
            return None;
        }
        let (x, y) = (pixel.x.floor() as u32, pixel.y.floor() as u32);
        if x >= self.width() || y >= self.height() {
            return None;
        }
        let [r, g, b, a] = self.pixels.get_pixel(x, y).0;
        Some(Color32::from_rgba_unmultiplied(r, g, b, a))
    }
}
