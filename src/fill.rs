//! Flood fills over the sparse paint grid.
//!
//! All fills are 4-connected breadth-first traversals keyed by grid
//! coordinate. None of them can fail: an operation that has nothing to do,
//! or whose region turns out to be unbounded, leaves the grid untouched and
//! reports why through [`FillOutcome`].

use crate::consts::MAX_FILL_CELLS;
use crate::grid::{CellCoord, Grid};
use egui::{Color32, Pos2};
use log::debug;
use std::collections::{HashSet, VecDeque};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillOutcome {
    /// Existing cells were recolored
    Recolored(usize),
    /// New cells were created in an enclosed empty region
    Filled(usize),
    /// Cells were removed
    Erased(usize),
    /// The empty region exceeded the safety bound; nothing was changed
    Abandoned,
    /// Nothing to do (same color, or erasing an empty cell)
    Unchanged,
}

impl FillOutcome {
    pub fn changed(&self) -> bool {
        matches!(
            self,
            FillOutcome::Recolored(_) | FillOutcome::Filled(_) | FillOutcome::Erased(_)
        )
    }
}

/// Fill at a world position: recolor the connected same-colored region when
/// the seed cell is painted, otherwise fill the enclosed empty region.
pub fn paint_at(grid: &mut Grid, grid_size: i32, pos: Pos2, color: Color32) -> FillOutcome {
    let seed = CellCoord::snap(pos, grid_size);
    if grid.contains(seed) {
        flood_fill_same_color(grid, grid_size, seed, color)
    } else {
        flood_fill_empty_region(grid, grid_size, seed, color)
    }
}

/// Remove the connected same-colored region under a world position
pub fn erase_at(grid: &mut Grid, grid_size: i32, pos: Pos2) -> FillOutcome {
    let seed = CellCoord::snap(pos, grid_size);
    flood_erase(grid, grid_size, seed)
}

/// Coordinates of the 4-connected region of cells sharing the seed's color
fn same_color_region(grid: &Grid, grid_size: i32, seed: CellCoord, target: Color32) -> Vec<CellCoord> {
    let mut visited = HashSet::from([seed]);
    let mut queue = VecDeque::from([seed]);
    let mut region = Vec::new();

    while let Some(coord) = queue.pop_front() {
        region.push(coord);
        for neighbor in coord.neighbors(grid_size) {
            if grid.get(neighbor) == Some(target) && visited.insert(neighbor) {
                queue.push_back(neighbor);
            }
        }
    }
    region
}

/// Recolor every cell connected to `seed` that shares its color
pub fn flood_fill_same_color(
    grid: &mut Grid,
    grid_size: i32,
    seed: CellCoord,
    color: Color32,
) -> FillOutcome {
    let Some(target) = grid.get(seed) else {
        return FillOutcome::Unchanged;
    };
    if target == color {
        return FillOutcome::Unchanged;
    }

    let region = same_color_region(grid, grid_size, seed, target);
    for coord in &region {
        grid.set(*coord, color);
    }
    FillOutcome::Recolored(region.len())
}

/// Fill the empty region around `seed`, bounded by painted cells. Regions
/// larger than [`MAX_FILL_CELLS`] count as open canvas and are not filled.
pub fn flood_fill_empty_region(
    grid: &mut Grid,
    grid_size: i32,
    seed: CellCoord,
    color: Color32,
) -> FillOutcome {
    if grid.contains(seed) {
        return FillOutcome::Unchanged;
    }

    let mut visited = HashSet::from([seed]);
    let mut queue = VecDeque::from([seed]);
    let mut region = vec![seed];

    while let Some(coord) = queue.pop_front() {
        for neighbor in coord.neighbors(grid_size) {
            if grid.contains(neighbor) || !visited.insert(neighbor) {
                continue;
            }
            if region.len() == MAX_FILL_CELLS {
                debug!("Fill from {seed:?} abandoned: region exceeds {MAX_FILL_CELLS} cells");
                return FillOutcome::Abandoned;
            }
            region.push(neighbor);
            queue.push_back(neighbor);
        }
    }

    for coord in &region {
        grid.set(*coord, color);
    }
    FillOutcome::Filled(region.len())
}

/// Remove every cell connected to `seed` that shares its color
pub fn flood_erase(grid: &mut Grid, grid_size: i32, seed: CellCoord) -> FillOutcome {
    let Some(target) = grid.get(seed) else {
        return FillOutcome::Unchanged;
    };

    let region = same_color_region(grid, grid_size, seed, target);
    for coord in &region {
        grid.remove(*coord);
    }
    FillOutcome::Erased(region.len())
}
