use crate::consts::MAX_CELL_COORD;
use egui::{Color32, Pos2, Rect};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Grid-aligned coordinate of a paint cell (a multiple of the grid size at
/// the time the cell was created)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CellCoord {
    pub x: i32,
    pub y: i32,
}

impl CellCoord {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Snap a world position onto the grid: `floor(v / size) * size`
    pub fn snap(pos: Pos2, grid_size: i32) -> Self {
        Self {
            x: snap_axis(pos.x, grid_size),
            y: snap_axis(pos.y, grid_size),
        }
    }

    /// The grid-adjacent neighbours, right/left/down/up. Neighbours beyond
    /// [`MAX_CELL_COORD`] do not exist, so the edge acts as a wall.
    pub fn neighbors(self, grid_size: i32) -> impl Iterator<Item = CellCoord> {
        let step = grid_size.max(1);
        [
            (self.x.checked_add(step), Some(self.y)),
            (self.x.checked_sub(step), Some(self.y)),
            (Some(self.x), self.y.checked_add(step)),
            (Some(self.x), self.y.checked_sub(step)),
        ]
        .into_iter()
        .filter_map(|(x, y)| Some(CellCoord::new(x?, y?)))
        .filter(|coord| in_range(coord.x) && in_range(coord.y))
    }

    /// Shift by a world offset, saturating at the integer limits
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x.saturating_add(dx), self.y.saturating_add(dy))
    }

    pub fn rect(self, grid_size: i32) -> Rect {
        let min = Pos2::new(self.x as f32, self.y as f32);
        Rect::from_min_size(min, egui::vec2(grid_size as f32, grid_size as f32))
    }
}

fn in_range(v: i32) -> bool {
    (-MAX_CELL_COORD..=MAX_CELL_COORD).contains(&v)
}

/// `floor(value / size) * size`, clamped to the last grid line inside
/// `±MAX_CELL_COORD`. NaN snaps to 0.
pub(crate) fn snap_axis(value: f32, grid_size: i32) -> i32 {
    let size = grid_size.max(1);
    let limit = f64::from(MAX_CELL_COORD / size);
    let index = (f64::from(value) / f64::from(size)).floor().clamp(-limit, limit);
    if index.is_nan() {
        return 0;
    }
    index as i32 * size
}

/// A painted cell as it appears outside the grid store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridCell {
    pub x: i32,
    pub y: i32,
    pub color: Color32,
}

impl GridCell {
    pub fn new(coord: CellCoord, color: Color32) -> Self {
        Self {
            x: coord.x,
            y: coord.y,
            color,
        }
    }

    pub fn coord(&self) -> CellCoord {
        CellCoord::new(self.x, self.y)
    }
}

/// Sparse, unbounded store of painted cells. At most one color per coordinate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Grid {
    cells: BTreeMap<CellCoord, Color32>,
}

impl Grid {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, coord: CellCoord) -> Option<Color32> {
        self.cells.get(&coord).copied()
    }

    pub fn contains(&self, coord: CellCoord) -> bool {
        self.cells.contains_key(&coord)
    }

    /// Returns the color previously stored at `coord`, if any
    pub fn set(&mut self, coord: CellCoord, color: Color32) -> Option<Color32> {
        self.cells.insert(coord, color)
    }

    pub fn remove(&mut self, coord: CellCoord) -> Option<Color32> {
        self.cells.remove(&coord)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = GridCell> + '_ {
        self.cells
            .iter()
            .map(|(coord, color)| GridCell::new(*coord, *color))
    }

    pub fn to_cells(&self) -> Vec<GridCell> {
        self.iter().collect()
    }
}

// Later duplicates win
impl FromIterator<GridCell> for Grid {
    fn from_iter<I: IntoIterator<Item = GridCell>>(iter: I) -> Self {
        let mut grid = Grid::new();
        for cell in iter {
            grid.set(cell.coord(), cell.color);
        }
        grid
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snap_floors_negative_coordinates() {
        assert_eq!(CellCoord::snap(Pos2::new(49.9, 0.0), 50), CellCoord::new(0, 0));
        assert_eq!(CellCoord::snap(Pos2::new(-0.1, -50.0), 50), CellCoord::new(-50, -50));
        assert_eq!(CellCoord::snap(Pos2::new(-50.1, 120.0), 50), CellCoord::new(-100, 100));
    }

    #[test]
    fn far_positions_snap_to_the_edge() {
        let edge = (MAX_CELL_COORD / 50) * 50;
        assert_eq!(CellCoord::snap(Pos2::new(3.0e9, -3.0e9), 50), CellCoord::new(edge, -edge));
        assert_eq!(CellCoord::snap(Pos2::new(f32::INFINITY, f32::NAN), 50), CellCoord::new(edge, 0));
    }

    #[test]
    fn edge_cells_have_no_outside_neighbours() {
        let edge = (MAX_CELL_COORD / 50) * 50;
        let corner = CellCoord::new(edge, edge);
        let neighbors: Vec<_> = corner.neighbors(50).collect();
        assert_eq!(neighbors, vec![CellCoord::new(edge - 50, edge), CellCoord::new(edge, edge - 50)]);
        assert_eq!(CellCoord::new(0, 0).neighbors(50).count(), 4);

        let extreme = CellCoord::new(i32::MAX, i32::MIN);
        assert_eq!(extreme.neighbors(50).count(), 0);
    }

    #[test]
    fn one_cell_per_coordinate() {
        let mut grid = Grid::new();
        grid.set(CellCoord::new(0, 0), Color32::RED);
        let previous = grid.set(CellCoord::new(0, 0), Color32::BLUE);
        assert_eq!(previous, Some(Color32::RED));
        assert_eq!(grid.len(), 1);
        assert_eq!(grid.get(CellCoord::new(0, 0)), Some(Color32::BLUE));
    }

    #[test]
    fn collecting_duplicates_keeps_last_writer() {
        let grid: Grid = [
            GridCell::new(CellCoord::new(10, 10), Color32::RED),
            GridCell::new(CellCoord::new(10, 10), Color32::GREEN),
        ]
        .into_iter()
        .collect();
        assert_eq!(grid.to_cells(), vec![GridCell::new(CellCoord::new(10, 10), Color32::GREEN)]);
    }
}
