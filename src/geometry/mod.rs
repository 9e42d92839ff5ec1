pub mod hit_testing;

use crate::consts::MAX_SEGMENT_CELLS;
use crate::grid::{CellCoord, snap_axis};
use crate::stroke::StrokePoint;
use egui::{Pos2, Rect};
use serde::{Deserialize, Serialize};

/// Closed axis-aligned box in world coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: f32,
    pub min_y: f32,
    pub max_x: f32,
    pub max_y: f32,
}

impl BoundingBox {
    pub fn new(min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Normalized box spanning two arbitrary corners
    pub fn from_corners(a: Pos2, b: Pos2) -> Self {
        Self::new(a.x.min(b.x), a.y.min(b.y), a.x.max(b.x), a.y.max(b.y))
    }

    pub fn contains(&self, pos: Pos2) -> bool {
        pos.x >= self.min_x && pos.x <= self.max_x && pos.y >= self.min_y && pos.y <= self.max_y
    }

    pub fn to_rect(self) -> Rect {
        Rect::from_min_max(
            Pos2::new(self.min_x, self.min_y),
            Pos2::new(self.max_x, self.max_y),
        )
    }
}

impl From<Rect> for BoundingBox {
    fn from(rect: Rect) -> Self {
        Self::new(rect.min.x, rect.min.y, rect.max.x, rect.max.y)
    }
}

/// Bounding box of a stroke, inflated by half the first point's size
/// (at least one unit). An empty stroke yields a zero box at the origin.
pub fn bounding_box(points: &[StrokePoint]) -> BoundingBox {
    let Some(first) = points.first() else {
        return BoundingBox::default();
    };

    let mut bounds = BoundingBox::new(first.x, first.y, first.x, first.y);
    for point in &points[1..] {
        bounds.min_x = bounds.min_x.min(point.x);
        bounds.min_y = bounds.min_y.min(point.y);
        bounds.max_x = bounds.max_x.max(point.x);
        bounds.max_y = bounds.max_y.max(point.y);
    }

    let half = first.size / 2.0;
    let pad = if half > 0.0 { half } else { 1.0 };
    BoundingBox::new(
        bounds.min_x - pad,
        bounds.min_y - pad,
        bounds.max_x + pad,
        bounds.max_y + pad,
    )
}

/// Closed-interval overlap test: boxes that merely touch intersect
pub fn intersects(a: &BoundingBox, b: &BoundingBox) -> bool {
    a.min_x <= b.max_x && a.max_x >= b.min_x && a.min_y <= b.max_y && a.max_y >= b.min_y
}

/// Cells crossed by the segment between two world points, in traversal order,
/// both endpoint cells included. Bresenham over cell indices.
///
/// A segment spanning more than [`MAX_SEGMENT_CELLS`] steps yields only its
/// two endpoint cells.
pub fn cells_along_segment(from: Pos2, to: Pos2, grid_size: i32) -> Vec<CellCoord> {
    let size = grid_size.max(1);
    let index = |v: f32| i64::from(snap_axis(v, size) / size);
    let (mut ix, mut iy) = (index(from.x), index(from.y));
    let (end_x, end_y) = (index(to.x), index(to.y));
    let cell = |x: i64, y: i64| CellCoord::new((x * i64::from(size)) as i32, (y * i64::from(size)) as i32);

    let dx = (end_x - ix).abs();
    let dy = -(end_y - iy).abs();
    let steps = (dx - dy) as usize;
    if steps > MAX_SEGMENT_CELLS {
        return vec![cell(ix, iy), cell(end_x, end_y)];
    }
    let step_x = if ix < end_x { 1 } else { -1 };
    let step_y = if iy < end_y { 1 } else { -1 };
    let mut err = dx + dy;

    let mut cells = Vec::with_capacity(steps + 1);
    loop {
        cells.push(cell(ix, iy));
        if ix == end_x && iy == end_y {
            break;
        }
        let doubled = 2 * err;
        if doubled >= dy {
            err += dy;
            ix += step_x;
        }
        if doubled <= dx {
            err += dx;
            iy += step_y;
        }
    }
    cells
}
