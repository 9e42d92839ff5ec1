use crate::document::Document;
use crate::fill::{self, FillOutcome};
use crate::geometry::hit_testing::compute_element_bounds;
use crate::geometry::{BoundingBox, bounding_box, intersects};
use crate::grid::{CellCoord, GridCell};
use crate::image::{ImageId, ImageTransform, PlacedImage};
use crate::layers::Layers;
use crate::selection::{Selection, SelectionEntry};
use crate::stroke::{MutableStroke, StrokeId, StrokePoint};
use crate::symmetry::{GridTransformMode, Symmetry};
use crate::tools::ToolSettings;
use crate::view::ViewTransform;
use egui::{Color32, Pos2, Rect, Vec2};
use log::debug;

/// What the pointer is currently doing. Exactly one gesture is in flight at
/// a time.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum Interaction {
    #[default]
    Idle,
    Drawing,
    GridPainting {
        erase: bool,
        last: CellCoord,
    },
    DraggingImage {
        id: ImageId,
        /// Pointer position relative to the image's top-left corner
        grab: Vec2,
    },
    ResizingImage {
        id: ImageId,
        start: Pos2,
        start_size: Vec2,
    },
    RotatingImage {
        id: ImageId,
    },
    Panning {
        last_screen: Pos2,
    },
    Selecting {
        origin: Pos2,
        current: Pos2,
    },
    MovingSelection {
        last: Pos2,
        /// World movement not yet applied to cells, which only move in whole steps
        cell_residual: Vec2,
    },
}

impl Interaction {
    pub fn is_idle(&self) -> bool {
        matches!(self, Interaction::Idle)
    }

    pub fn is_drawing(&self) -> bool {
        matches!(self, Interaction::Drawing | Interaction::GridPainting { .. })
    }

    pub fn is_panning(&self) -> bool {
        matches!(self, Interaction::Panning { .. })
    }

    /// The marquee rectangle while a rectangle selection is being dragged
    pub fn marquee(&self) -> Option<Rect> {
        match self {
            Interaction::Selecting { origin, current } => Some(Rect::from_two_pos(*origin, *current)),
            _ => None,
        }
    }
}

/// The single live editing state: document content, selection, view and the
/// drawing configuration, plus the in-flight gesture.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    pub document: Document,
    pub selection: Selection,
    pub view: ViewTransform,
    pub settings: ToolSettings,
    pub symmetry: Symmetry,
    pub grid_mode: GridTransformMode,
    pub layers: Layers,
    pub interaction: Interaction,
    current_stroke: Option<MutableStroke>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: ToolSettings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    pub fn grid_size(&self) -> i32 {
        self.settings.grid_size.max(1)
    }

    // Strokes

    pub fn begin_stroke(&mut self, point: StrokePoint) {
        self.current_stroke = Some(MutableStroke::new(point));
    }

    pub fn append_to_stroke(&mut self, point: StrokePoint) {
        if let Some(stroke) = &mut self.current_stroke {
            stroke.add_point(point);
        }
    }

    /// Move the in-progress stroke into the document. Strokes with fewer than
    /// two points are discarded.
    pub fn commit_stroke(&mut self) -> Option<StrokeId> {
        let stroke = self.current_stroke.take()?.into_stroke_ref()?;
        let id = stroke.id();
        self.document.add_stroke(stroke);
        Some(id)
    }

    pub fn current_stroke(&self) -> Option<&MutableStroke> {
        self.current_stroke.as_ref()
    }

    pub(crate) fn discard_stroke(&mut self) {
        self.current_stroke = None;
    }

    // Grid

    pub fn set_or_create_grid_cell(&mut self, coord: CellCoord, color: Color32) {
        self.document.grid_mut().set(coord, color);
    }

    pub fn remove_grid_cell(&mut self, coord: CellCoord) -> bool {
        let removed = self.document.grid_mut().remove(coord).is_some();
        if removed {
            self.selection.retain(|entry| *entry != SelectionEntry::Cell(coord));
        }
        removed
    }

    /// Fill at a world position with the drawing color
    pub fn paint_at(&mut self, pos: Pos2) -> FillOutcome {
        let grid_size = self.grid_size();
        let color = self.settings.color;
        fill::paint_at(self.document.grid_mut(), grid_size, pos, color)
    }

    /// Flood-erase at a world position. Erased cells leave the selection too.
    pub fn erase_at(&mut self, pos: Pos2) -> FillOutcome {
        let grid_size = self.grid_size();
        let outcome = fill::erase_at(self.document.grid_mut(), grid_size, pos);
        if outcome.changed() {
            self.prune_selection();
        }
        outcome
    }

    /// Painted cells after symmetry expansion, in draw order
    pub fn visible_cells(&self) -> Vec<GridCell> {
        let cells = self.document.grid().to_cells();
        match self.grid_mode {
            GridTransformMode::Symmetric => self.symmetry.expand_grid_cells(&cells, self.grid_size()),
            GridTransformMode::Canonical => cells,
        }
    }

    // Images

    /// Place an image on the active layer
    pub fn add_image(&mut self, mut image: PlacedImage) -> ImageId {
        let id = image.id;
        image.layer = self.layers.active_index();
        self.document.add_image(image);
        id
    }

    /// Images on the active layer, bottom to top. Only these can be picked.
    pub fn active_layer_images(&self) -> impl DoubleEndedIterator<Item = &PlacedImage> + '_ {
        let active = self.layers.active_index();
        self.document.images().iter().filter(move |image| image.layer == active)
    }

    /// Switch the active layer. Selected images left behind on the old layer
    /// are unselected.
    pub fn set_active_layer(&mut self, index: usize) -> bool {
        if !self.layers.set_active(index) {
            return false;
        }
        let document = &self.document;
        self.selection.retain(|entry| match entry {
            SelectionEntry::Image(id) => document.image(*id).is_some_and(|image| image.layer == index),
            _ => true,
        });
        true
    }

    /// Images whose layer is shown, bottom to top
    pub fn visible_images(&self) -> impl Iterator<Item = &PlacedImage> + '_ {
        let layers = &self.layers;
        self.document.images().iter().filter(move |image| layers.is_visible(image.layer))
    }

    pub fn remove_image(&mut self, id: ImageId) -> Option<PlacedImage> {
        let removed = self.document.remove_image(id)?;
        self.selection.retain(|entry| *entry != SelectionEntry::Image(id));
        Some(removed)
    }

    pub fn mutate_image_transform(&mut self, id: ImageId, transform: ImageTransform) -> bool {
        match self.document.image_mut(id) {
            Some(image) => {
                image.apply(transform);
                true
            }
            None => false,
        }
    }

    /// Topmost image on the active layer whose unrotated bounds contain the point
    pub fn hit_test_image(&self, pos: Pos2) -> Option<&PlacedImage> {
        self.active_layer_images()
            .rev()
            .find(|image| BoundingBox::from(image.rect()).contains(pos))
    }

    // Selection

    /// Replace the selection. Entries that do not resolve are dropped.
    pub fn set_selection(&mut self, entries: impl IntoIterator<Item = SelectionEntry>) {
        let document = &self.document;
        self.selection = entries
            .into_iter()
            .filter(|entry| document.contains(entry))
            .collect();
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Remove every selected object from the document and empty the selection.
    /// Returns how many objects were removed.
    pub fn delete_selected(&mut self) -> usize {
        let count = self.selection.len();
        if count > 0 {
            self.document.remove_all(self.selection.entries());
            self.selection.clear();
            debug!("Deleted {count} selected objects");
        }
        count
    }

    /// Drop selection entries whose objects no longer exist
    pub fn prune_selection(&mut self) {
        let document = &self.document;
        self.selection.retain(|entry| document.contains(entry));
    }

    /// Every stroke, cell and image whose bounds touch `rect`
    pub fn rect_select(&self, rect: Rect) -> Vec<SelectionEntry> {
        let area = BoundingBox::from(rect);
        let grid_size = self.grid_size();

        let strokes = self
            .document
            .strokes()
            .iter()
            .filter(|stroke| intersects(&bounding_box(stroke.points()), &area))
            .map(|stroke| SelectionEntry::Stroke(stroke.id()));
        let cells = self
            .document
            .grid()
            .iter()
            .filter(|cell| intersects(&BoundingBox::from(cell.coord().rect(grid_size)), &area))
            .map(|cell| SelectionEntry::Cell(cell.coord()));
        let images = self
            .active_layer_images()
            .filter(|image| intersects(&BoundingBox::from(image.rect()), &area))
            .map(|image| SelectionEntry::Image(image.id));

        strokes.chain(cells).chain(images).collect()
    }

    pub fn selection_bounds(&self) -> Vec<BoundingBox> {
        let grid_size = self.grid_size();
        self.selection
            .entries()
            .iter()
            .filter_map(|entry| compute_element_bounds(&self.document, entry, grid_size))
            .collect()
    }

    pub fn selection_contains_point(&self, pos: Pos2) -> bool {
        self.selection_bounds().iter().any(|b| b.contains(pos))
    }

    /// Move selected strokes and images by a world-space delta
    pub fn translate_selection(&mut self, delta: Vec2) {
        let strokes: Vec<StrokeId> = self.selection.strokes().collect();
        for id in strokes {
            if let Some(stroke) = self.document.stroke_mut(id) {
                stroke.translate(delta.x, delta.y);
            }
        }
        let images: Vec<ImageId> = self.selection.images().collect();
        for id in images {
            if let Some(image) = self.document.image_mut(id) {
                image.x += delta.x;
                image.y += delta.y;
            }
        }
    }

    /// Move selected cells by whole grid steps. Unselected cells at the
    /// destination are overwritten.
    pub fn translate_selected_cells(&mut self, steps_x: i32, steps_y: i32) {
        if steps_x == 0 && steps_y == 0 {
            return;
        }
        let grid_size = self.grid_size();
        let (dx, dy) = (steps_x.saturating_mul(grid_size), steps_y.saturating_mul(grid_size));

        let grid = self.document.grid_mut();
        let moving: Vec<GridCell> = self
            .selection
            .cells()
            .filter_map(|coord| grid.get(coord).map(|color| GridCell::new(coord, color)))
            .collect();
        for cell in &moving {
            grid.remove(cell.coord());
        }
        for cell in &moving {
            grid.set(cell.coord().offset(dx, dy), cell.color);
        }
        self.selection.shift_cells(dx, dy);
    }

    // View

    pub fn zoom(&mut self, factor: f32, pivot: Pos2) {
        self.view.zoom_about(factor, pivot);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::ImageSource;

    fn point(x: f32, y: f32) -> StrokePoint {
        StrokePoint::new(Pos2::new(x, y), 2.0, Color32::BLACK)
    }

    fn image_at(x: f32, y: f32) -> PlacedImage {
        PlacedImage::new(ImageSource::new(vec![1, 2, 3]), Pos2::new(x, y), Vec2::new(50.0, 50.0))
    }

    #[test]
    fn single_point_stroke_is_discarded() {
        let mut scene = Scene::new();
        scene.begin_stroke(point(0.0, 0.0));
        assert!(scene.commit_stroke().is_none());
        assert!(scene.document.strokes().is_empty());
        assert!(scene.current_stroke().is_none());
    }

    #[test]
    fn committed_stroke_keeps_its_points() {
        let mut scene = Scene::new();
        scene.begin_stroke(point(0.0, 0.0));
        scene.append_to_stroke(point(5.0, 5.0));
        scene.append_to_stroke(point(9.0, 2.0));
        let id = scene.commit_stroke().unwrap();
        assert_eq!(scene.document.stroke(id).unwrap().points().len(), 3);
    }

    #[test]
    fn hit_test_prefers_topmost_image() {
        let mut scene = Scene::new();
        scene.add_image(image_at(0.0, 0.0));
        let top = scene.add_image(image_at(25.0, 25.0));
        assert_eq!(scene.hit_test_image(Pos2::new(30.0, 30.0)).map(|i| i.id), Some(top));
        assert!(scene.hit_test_image(Pos2::new(200.0, 200.0)).is_none());
    }

    #[test]
    fn images_join_the_active_layer_and_only_those_are_picked() {
        let mut scene = Scene::new();
        let bottom = scene.add_image(image_at(0.0, 0.0));
        scene.layers.add();
        let top = scene.add_image(image_at(0.0, 0.0));
        assert_eq!(scene.document.image(top).map(|i| i.layer), Some(1));

        assert_eq!(scene.hit_test_image(Pos2::new(10.0, 10.0)).map(|i| i.id), Some(top));
        scene.layers.set_active(0);
        assert_eq!(scene.hit_test_image(Pos2::new(10.0, 10.0)).map(|i| i.id), Some(bottom));
        let picked = scene.rect_select(Rect::from_min_max(Pos2::ZERO, Pos2::new(100.0, 100.0)));
        assert_eq!(picked, vec![SelectionEntry::Image(bottom)]);

        scene.set_selection([SelectionEntry::Image(bottom)]);
        assert!(scene.set_active_layer(1));
        assert!(scene.selection.is_empty());
        assert!(!scene.set_active_layer(4));

        scene.layers.set_visible(1, false);
        let shown: Vec<_> = scene.visible_images().map(|i| i.id).collect();
        assert_eq!(shown, vec![bottom]);
    }

    #[test]
    fn rect_select_touching_edge_counts() {
        let mut scene = Scene::new();
        scene.settings.grid_size = 10;
        scene.set_or_create_grid_cell(CellCoord::new(20, 20), Color32::RED);
        scene.set_or_create_grid_cell(CellCoord::new(100, 100), Color32::RED);
        let picked = scene.rect_select(Rect::from_min_max(Pos2::new(0.0, 0.0), Pos2::new(20.0, 20.0)));
        assert_eq!(picked, vec![SelectionEntry::Cell(CellCoord::new(20, 20))]);
    }

    #[test]
    fn set_selection_drops_unknown_entries() {
        let mut scene = Scene::new();
        scene.set_or_create_grid_cell(CellCoord::new(0, 0), Color32::RED);
        scene.set_selection([
            SelectionEntry::Cell(CellCoord::new(0, 0)),
            SelectionEntry::Cell(CellCoord::new(40, 0)),
            SelectionEntry::Image(ImageId::new()),
        ]);
        assert_eq!(scene.selection.len(), 1);
    }

    #[test]
    fn removing_an_image_unselects_it() {
        let mut scene = Scene::new();
        let id = scene.add_image(image_at(0.0, 0.0));
        scene.set_selection([SelectionEntry::Image(id)]);
        assert!(scene.remove_image(id).is_some());
        assert!(scene.selection.is_empty());
    }

    #[test]
    fn moving_cells_overwrites_destination_and_follows_selection() {
        let mut scene = Scene::new();
        scene.settings.grid_size = 10;
        scene.set_or_create_grid_cell(CellCoord::new(0, 0), Color32::RED);
        scene.set_or_create_grid_cell(CellCoord::new(10, 0), Color32::BLUE);
        scene.set_selection([SelectionEntry::Cell(CellCoord::new(0, 0))]);

        scene.translate_selected_cells(1, 0);

        assert_eq!(scene.document.grid().len(), 1);
        assert_eq!(scene.document.grid().get(CellCoord::new(10, 0)), Some(Color32::RED));
        assert_eq!(scene.selection.entries(), &[SelectionEntry::Cell(CellCoord::new(10, 0))]);
    }

    #[test]
    fn translate_selection_moves_strokes_and_images() {
        let mut scene = Scene::new();
        scene.begin_stroke(point(0.0, 0.0));
        scene.append_to_stroke(point(10.0, 0.0));
        let stroke = scene.commit_stroke().unwrap();
        let image = scene.add_image(image_at(5.0, 5.0));
        scene.set_selection([SelectionEntry::Stroke(stroke), SelectionEntry::Image(image)]);

        scene.translate_selection(Vec2::new(3.0, -2.0));

        assert_eq!(scene.document.stroke(stroke).unwrap().points()[1].pos(), Pos2::new(13.0, -2.0));
        let moved = scene.document.image(image).unwrap();
        assert_eq!((moved.x, moved.y), (8.0, 3.0));
    }

    #[test]
    fn canonical_grid_mode_skips_symmetry() {
        let mut scene = Scene::new();
        scene.settings.grid_size = 10;
        scene.symmetry.set_mode(crate::symmetry::SymmetryMode::Vertical);
        scene.set_or_create_grid_cell(CellCoord::new(10, 0), Color32::RED);
        assert_eq!(scene.visible_cells().len(), 2);
        scene.grid_mode = GridTransformMode::Canonical;
        assert_eq!(scene.visible_cells().len(), 1);
    }
}
