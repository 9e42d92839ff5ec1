use crate::grid::Grid;
use crate::image::{ImageId, PlacedImage};
use crate::selection::SelectionEntry;
use crate::stroke::{Stroke, StrokeId, StrokeRef};
use std::collections::HashSet;
use std::sync::Arc;

/// The drawable content of the canvas: committed strokes, painted grid cells
/// and placed images. Cloning is cheap for strokes and image pixels, which
/// are shared with earlier clones.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    strokes: Vec<StrokeRef>,
    grid: Grid,
    images: Vec<PlacedImage>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_parts(strokes: Vec<StrokeRef>, grid: Grid, images: Vec<PlacedImage>) -> Self {
        Self {
            strokes,
            grid,
            images,
        }
    }

    pub fn strokes(&self) -> &[StrokeRef] {
        &self.strokes
    }

    pub fn stroke(&self, id: StrokeId) -> Option<&StrokeRef> {
        self.strokes.iter().find(|s| s.id() == id)
    }

    /// Copy-on-write access; snapshots holding the same stroke are unaffected
    pub(crate) fn stroke_mut(&mut self, id: StrokeId) -> Option<&mut Stroke> {
        self.strokes
            .iter_mut()
            .find(|s| s.id() == id)
            .map(Arc::make_mut)
    }

    pub fn add_stroke(&mut self, stroke: StrokeRef) {
        self.strokes.push(stroke);
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub(crate) fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    pub fn images(&self) -> &[PlacedImage] {
        &self.images
    }

    pub fn image(&self, id: ImageId) -> Option<&PlacedImage> {
        self.images.iter().find(|img| img.id == id)
    }

    pub(crate) fn image_mut(&mut self, id: ImageId) -> Option<&mut PlacedImage> {
        self.images.iter_mut().find(|img| img.id == id)
    }

    pub fn add_image(&mut self, image: PlacedImage) {
        self.images.push(image);
    }

    pub(crate) fn remove_image(&mut self, id: ImageId) -> Option<PlacedImage> {
        let index = self.images.iter().position(|img| img.id == id)?;
        Some(self.images.remove(index))
    }

    /// Whether a selection entry still resolves to a live object
    pub fn contains(&self, entry: &SelectionEntry) -> bool {
        match entry {
            SelectionEntry::Stroke(id) => self.stroke(*id).is_some(),
            SelectionEntry::Cell(coord) => self.grid.contains(*coord),
            SelectionEntry::Image(id) => self.image(*id).is_some(),
        }
    }

    /// Drop every object named by `entries` in one pass per collection
    pub(crate) fn remove_all(&mut self, entries: &[SelectionEntry]) {
        let mut strokes = HashSet::new();
        let mut images = HashSet::new();
        for entry in entries {
            match entry {
                SelectionEntry::Stroke(id) => {
                    strokes.insert(*id);
                }
                SelectionEntry::Cell(coord) => {
                    self.grid.remove(*coord);
                }
                SelectionEntry::Image(id) => {
                    images.insert(*id);
                }
            }
        }
        self.strokes.retain(|s| !strokes.contains(&s.id()));
        self.images.retain(|img| !images.contains(&img.id));
    }

    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty() && self.grid.is_empty() && self.images.is_empty()
    }
}
