use crate::consts::{RESIZE_HANDLE_SIZE, ROTATION_HANDLE_OFFSET, ROTATION_HANDLE_SIZE};
use crate::image::PlacedImage;
use crate::raster::RasterSurface;
use crate::state::Scene;
use crate::stroke::StrokePoint;
use egui::{Color32, Pos2, Rect, Vec2};

// Upper bound on grid lines per axis; denser grids are not drawn
const MAX_GRID_LINES: f32 = 2000.0;

const SELECTION_COLOR: Color32 = Color32::from_rgb(0, 120, 215);

/// Something the scene can be drawn onto. All coordinates are world space;
/// implementations apply their own view mapping.
pub trait Surface {
    fn clear(&mut self, color: Color32);

    /// World-space area this surface shows
    fn visible_rect(&self) -> Rect;

    /// Size in world units of one device pixel
    fn pixel_size(&self) -> f32;

    fn fill_rect(&mut self, rect: Rect, color: Color32);

    fn stroke_rect(&mut self, rect: Rect, width: f32, color: Color32) {
        let corners = [rect.left_top(), rect.right_top(), rect.right_bottom(), rect.left_bottom(), rect.left_top()];
        self.draw_polyline(&corners, width, color);
    }

    fn draw_line(&mut self, from: Pos2, to: Pos2, width: f32, color: Color32);

    fn draw_polyline(&mut self, points: &[Pos2], width: f32, color: Color32) {
        for pair in points.windows(2) {
            self.draw_line(pair[0], pair[1], width, color);
        }
    }

    /// Draw a placed image rotated about its centre
    fn draw_image(&mut self, image: &PlacedImage);

    /// Rendered color at a world position, if it lies on the surface
    fn read_pixel(&self, pos: Pos2) -> Option<Color32>;
}

/// Draws a scene onto any [`Surface`]
#[derive(Debug, Clone, Copy)]
pub struct Renderer {
    /// Grid lines, marquee and selection outlines
    pub overlays: bool,
}

impl Default for Renderer {
    fn default() -> Self {
        Self { overlays: true }
    }
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drawing content only, as used for color picking
    pub fn content_only() -> Self {
        Self { overlays: false }
    }

    pub fn paint(&self, scene: &Scene, surface: &mut impl Surface) {
        surface.clear(scene.settings.background);

        if self.overlays && scene.settings.show_grid {
            self.paint_grid_lines(scene, surface);
        }

        for stroke in scene.document.strokes() {
            paint_stroke(scene, surface, stroke.points());
        }
        if let Some(stroke) = scene.current_stroke() {
            paint_stroke(scene, surface, stroke.points());
        }

        let grid_size = scene.grid_size();
        for cell in scene.visible_cells() {
            surface.fill_rect(cell.coord().rect(grid_size), cell.color);
        }

        for image in scene.visible_images() {
            surface.draw_image(image);
        }

        if self.overlays {
            self.paint_overlays(scene, surface);
        }
    }

    fn paint_grid_lines(&self, scene: &Scene, surface: &mut impl Surface) {
        let visible = surface.visible_rect();
        let size = scene.grid_size() as f32;
        let (Some(columns), Some(rows)) = (
            grid_line_span(visible.min.x, visible.max.x, size),
            grid_line_span(visible.min.y, visible.max.y, size),
        ) else {
            return;
        };
        let width = surface.pixel_size();
        let color = scene.settings.grid_color;

        for i in 0..columns.1 {
            let x = columns.0 + i as f32 * size;
            surface.draw_line(Pos2::new(x, visible.min.y), Pos2::new(x, visible.max.y), width, color);
        }
        for i in 0..rows.1 {
            let y = rows.0 + i as f32 * size;
            surface.draw_line(Pos2::new(visible.min.x, y), Pos2::new(visible.max.x, y), width, color);
        }
    }

    fn paint_overlays(&self, scene: &Scene, surface: &mut impl Surface) {
        let width = surface.pixel_size() * 2.0;

        if let Some(marquee) = scene.interaction.marquee() {
            surface.stroke_rect(marquee, width, SELECTION_COLOR);
        }

        for bounds in scene.selection_bounds() {
            surface.stroke_rect(bounds.to_rect(), width, SELECTION_COLOR);
        }

        for id in scene.selection.images() {
            if let Some(image) = scene.document.image(id) {
                paint_image_handles(image, surface, width);
            }
        }
    }
}

/// First grid line at or before `min` and the number of lines up to `max`.
/// `None` when the range is not finite or needs more than `MAX_GRID_LINES`.
fn grid_line_span(min: f32, max: f32, size: f32) -> Option<(f32, usize)> {
    let first = (min / size).floor();
    let count = ((max / size).floor() - first) + 1.0;
    if !count.is_finite() || !(0.0..=MAX_GRID_LINES).contains(&count) {
        return None;
    }
    Some((first * size, count as usize))
}

/// A stroke and its symmetry mirrors, each with its first point's brush
fn paint_stroke(scene: &Scene, surface: &mut impl Surface, points: &[StrokePoint]) {
    let Some(first) = points.first() else {
        return;
    };
    for variant in scene.symmetry.expand_stroke(points) {
        let positions: Vec<Pos2> = variant.iter().map(StrokePoint::pos).collect();
        if positions.len() == 1 {
            surface.draw_line(positions[0], positions[0], first.size, first.color);
        } else {
            surface.draw_polyline(&positions, first.size, first.color);
        }
    }
}

fn paint_image_handles(image: &PlacedImage, surface: &mut impl Surface, width: f32) {
    let corner = Pos2::new(image.x + image.width, image.y + image.height);
    let resize = Rect::from_center_size(corner, Vec2::splat(RESIZE_HANDLE_SIZE));
    surface.fill_rect(resize, SELECTION_COLOR);

    let top = Pos2::new(image.x + image.width / 2.0, image.y);
    let rotate = Pos2::new(top.x, top.y - ROTATION_HANDLE_OFFSET);
    surface.draw_line(top, rotate, width, SELECTION_COLOR);
    surface.stroke_rect(
        Rect::from_center_size(rotate, Vec2::splat(ROTATION_HANDLE_SIZE)),
        width,
        SELECTION_COLOR,
    );
}

/// Color of the rendered drawing at a world position. Returns `None` for
/// positions that cannot be read back.
pub fn pick_color(scene: &Scene, pos: Pos2) -> Option<Color32> {
    if !pos.x.is_finite() || !pos.y.is_finite() {
        return None;
    }
    let mut surface = RasterSurface::new(1, 1, pos - Vec2::splat(0.5), 1.0);
    Renderer::content_only().paint(scene, &mut surface);
    surface.read_pixel(pos)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::CellCoord;

    #[test]
    fn picks_cell_color() {
        let mut scene = Scene::new();
        scene.settings.grid_size = 10;
        scene.set_or_create_grid_cell(CellCoord::new(10, 10), Color32::RED);
        assert_eq!(pick_color(&scene, Pos2::new(15.0, 15.0)), Some(Color32::RED));
        assert_eq!(pick_color(&scene, Pos2::new(35.0, 15.0)), Some(scene.settings.background));
    }

    #[test]
    fn picks_mirrored_content() {
        let mut scene = Scene::new();
        scene.settings.grid_size = 10;
        scene.symmetry.set_mode(crate::symmetry::SymmetryMode::Vertical);
        scene.set_or_create_grid_cell(CellCoord::new(10, 0), Color32::BLUE);
        assert_eq!(pick_color(&scene, Pos2::new(-5.0, 5.0)), Some(Color32::BLUE));
    }

    /// Counts lines and images over a fixed world window
    struct LineCounter {
        visible: Rect,
        lines: usize,
        images: usize,
    }

    impl Surface for LineCounter {
        fn clear(&mut self, _color: Color32) {}
        fn visible_rect(&self) -> Rect {
            self.visible
        }
        fn pixel_size(&self) -> f32 {
            1.0
        }
        fn fill_rect(&mut self, _rect: Rect, _color: Color32) {}
        fn draw_line(&mut self, _from: Pos2, _to: Pos2, _width: f32, _color: Color32) {
            self.lines += 1;
            assert!(self.lines < 10_000, "grid lines did not stop");
        }
        fn draw_image(&mut self, _image: &PlacedImage) {
            self.images += 1;
        }
        fn read_pixel(&self, _pos: Pos2) -> Option<Color32> {
            None
        }
    }

    fn count_grid_lines(visible: Rect, grid_size: i32) -> usize {
        let mut scene = Scene::new();
        scene.settings.grid_size = grid_size;
        scene.settings.show_grid = true;
        let mut surface = LineCounter { visible, lines: 0, images: 0 };
        Renderer::new().paint(&scene, &mut surface);
        surface.lines
    }

    #[test]
    fn grid_lines_cover_the_visible_area() {
        let visible = Rect::from_min_max(Pos2::new(-5.0, 0.0), Pos2::new(95.0, 40.0));
        // x: -20..=80, y: 0..=40
        assert_eq!(count_grid_lines(visible, 20), 6 + 3);
    }

    #[test]
    fn grid_lines_stop_far_from_the_origin() {
        let visible = Rect::from_min_max(Pos2::new(1.0e9, 0.0), Pos2::new(1.0e9 + 1000.0, 800.0));
        let lines = count_grid_lines(visible, 20);
        assert!((80..=100).contains(&lines), "{lines} lines");
    }

    #[test]
    fn images_on_hidden_layers_are_skipped() {
        use crate::image::ImageSource;
        let mut scene = Scene::new();
        let image = || PlacedImage::new(ImageSource::new(Vec::new()), Pos2::ZERO, Vec2::splat(10.0));
        scene.add_image(image());
        scene.layers.add();
        scene.add_image(image());
        scene.add_image(image());

        let visible = Rect::from_min_max(Pos2::ZERO, Pos2::new(100.0, 100.0));
        let mut surface = LineCounter { visible, lines: 0, images: 0 };
        Renderer::content_only().paint(&scene, &mut surface);
        assert_eq!(surface.images, 3);

        scene.layers.set_visible(1, false);
        surface.images = 0;
        Renderer::content_only().paint(&scene, &mut surface);
        assert_eq!(surface.images, 1);
    }

    #[test]
    fn non_finite_position_picks_nothing() {
        let scene = Scene::new();
        assert_eq!(pick_color(&scene, Pos2::new(f32::NAN, 0.0)), None);
        assert_eq!(pick_color(&scene, Pos2::new(0.0, f32::INFINITY)), None);
    }
}
