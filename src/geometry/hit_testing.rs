use super::{BoundingBox, bounding_box};
use crate::consts::{RESIZE_HANDLE_SIZE, ROTATION_HANDLE_OFFSET, ROTATION_HANDLE_SIZE};
use crate::document::Document;
use crate::image::PlacedImage;
use crate::selection::SelectionEntry;
use egui::Pos2;

/// Which part of an image a pointer press landed on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageHandle {
    Resize,
    Rotate,
    Body,
}

/// Axis-aligned bounds used for selection, marquee tests and outlines
pub fn compute_element_bounds(
    document: &Document,
    entry: &SelectionEntry,
    grid_size: i32,
) -> Option<BoundingBox> {
    match entry {
        SelectionEntry::Stroke(id) => document.stroke(*id).map(|s| bounding_box(s.points())),
        SelectionEntry::Cell(coord) => document
            .grid()
            .contains(*coord)
            .then(|| coord.rect(grid_size).into()),
        SelectionEntry::Image(id) => document.image(*id).map(|img| img.rect().into()),
    }
}

/// Square handle centred on the bottom-right corner
pub fn is_on_resize_handle(pos: Pos2, image: &PlacedImage) -> bool {
    let right = image.x + image.width;
    let bottom = image.y + image.height;
    (pos.x - right).abs() <= RESIZE_HANDLE_SIZE && (pos.y - bottom).abs() <= RESIZE_HANDLE_SIZE
}

/// Square handle floating above the top edge's centre
pub fn is_on_rotation_handle(pos: Pos2, image: &PlacedImage) -> bool {
    let center_x = image.x + image.width / 2.0;
    let center_y = image.y - ROTATION_HANDLE_OFFSET;
    (pos.x - center_x).abs() <= ROTATION_HANDLE_SIZE
        && (pos.y - center_y).abs() <= ROTATION_HANDLE_SIZE
}

/// Classify a press on an image. Handles win over the body.
pub fn image_handle_at(pos: Pos2, image: &PlacedImage) -> Option<ImageHandle> {
    if is_on_resize_handle(pos, image) {
        Some(ImageHandle::Resize)
    } else if is_on_rotation_handle(pos, image) {
        Some(ImageHandle::Rotate)
    } else if BoundingBox::from(image.rect()).contains(pos) {
        Some(ImageHandle::Body)
    } else {
        None
    }
}
