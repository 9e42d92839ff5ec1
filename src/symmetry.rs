use crate::consts::{DEFAULT_RAY_COUNT, MIN_RAY_COUNT};
use crate::grid::{CellCoord, GridCell, snap_axis};
use crate::stroke::StrokePoint;
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymmetryMode {
    #[default]
    Off,
    Vertical,
    Horizontal,
    Quad,
    Radial,
}

/// Whether painted grid cells follow the active symmetry when drawn to screen
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GridTransformMode {
    #[default]
    Symmetric,
    Canonical,
}

/// Active mirroring configuration. Mirrors are produced when drawing, never
/// stored as separate objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Symmetry {
    mode: SymmetryMode,
    ray_count: u32,
}

impl Default for Symmetry {
    fn default() -> Self {
        Self {
            mode: SymmetryMode::Off,
            ray_count: DEFAULT_RAY_COUNT,
        }
    }
}

impl Symmetry {
    pub fn new(mode: SymmetryMode, ray_count: u32) -> Self {
        Self {
            mode,
            ray_count: ray_count.max(MIN_RAY_COUNT),
        }
    }

    pub fn mode(&self) -> SymmetryMode {
        self.mode
    }

    pub fn ray_count(&self) -> u32 {
        self.ray_count.max(MIN_RAY_COUNT)
    }

    /// Selecting the active mode again turns symmetry off
    pub fn set_mode(&mut self, mode: SymmetryMode) {
        self.mode = if self.mode == mode {
            SymmetryMode::Off
        } else {
            mode
        };
    }

    pub fn set_ray_count(&mut self, count: u32) {
        self.ray_count = count.max(MIN_RAY_COUNT);
    }

    pub fn is_active(&self) -> bool {
        self.mode != SymmetryMode::Off
    }

    /// Rotation angles of the radial copies, excluding the identity
    fn radial_angles(&self) -> impl Iterator<Item = f64> {
        let rays = self.ray_count();
        (1..rays).map(move |i| TAU * f64::from(i) / f64::from(rays))
    }

    /// The stroke itself followed by its mirrors. Mirrors are always added,
    /// even when they coincide with the original.
    pub fn expand_stroke(&self, points: &[StrokePoint]) -> Vec<Vec<StrokePoint>> {
        let mut strokes = vec![points.to_vec()];
        if points.is_empty() {
            return strokes;
        }

        let map = |f: &dyn Fn(f32, f32) -> (f32, f32)| -> Vec<StrokePoint> {
            points
                .iter()
                .map(|p| {
                    let (x, y) = f(p.x, p.y);
                    StrokePoint { x, y, ..*p }
                })
                .collect()
        };

        match self.mode {
            SymmetryMode::Off => {}
            SymmetryMode::Vertical => strokes.push(map(&|x, y| (-x, y))),
            SymmetryMode::Horizontal => strokes.push(map(&|x, y| (x, -y))),
            SymmetryMode::Quad => {
                strokes.push(map(&|x, y| (-x, y)));
                strokes.push(map(&|x, y| (x, -y)));
                strokes.push(map(&|x, y| (-x, -y)));
            }
            SymmetryMode::Radial => {
                for angle in self.radial_angles() {
                    let (sin, cos) = angle.sin_cos();
                    strokes.push(map(&|x, y| {
                        let (x, y) = (f64::from(x), f64::from(y));
                        ((x * cos - y * sin) as f32, (x * sin + y * cos) as f32)
                    }));
                }
            }
        }
        strokes
    }

    /// The cells themselves followed by their mirrors. A mirror is only added
    /// when it lands on a different coordinate than its source cell.
    pub fn expand_grid_cells(&self, cells: &[GridCell], grid_size: i32) -> Vec<GridCell> {
        let mut expanded = cells.to_vec();
        if cells.is_empty() {
            return expanded;
        }
        let size = grid_size.max(1);
        let mirror = |v: i32| v.div_euclid(size).saturating_mul(size).saturating_neg();

        match self.mode {
            SymmetryMode::Off => {}
            SymmetryMode::Vertical => {
                for cell in cells {
                    let x = mirror(cell.x);
                    if x != cell.x {
                        expanded.push(GridCell { x, ..*cell });
                    }
                }
            }
            SymmetryMode::Horizontal => {
                for cell in cells {
                    let y = mirror(cell.y);
                    if y != cell.y {
                        expanded.push(GridCell { y, ..*cell });
                    }
                }
            }
            SymmetryMode::Quad => {
                for cell in cells {
                    let (x, y) = (mirror(cell.x), mirror(cell.y));
                    if x != cell.x {
                        expanded.push(GridCell { x, ..*cell });
                    }
                    if y != cell.y {
                        expanded.push(GridCell { y, ..*cell });
                    }
                    if x != cell.x && y != cell.y {
                        expanded.push(GridCell { x, y, ..*cell });
                    }
                }
            }
            SymmetryMode::Radial => {
                for angle in self.radial_angles() {
                    for cell in cells {
                        let rotated = rotate_cell(cell.coord(), size, angle);
                        if rotated != cell.coord() {
                            expanded.push(GridCell::new(rotated, cell.color));
                        }
                    }
                }
            }
        }
        expanded
    }
}

/// Rotate a cell's centre about the world origin and snap the result back
/// onto the grid.
pub fn rotate_cell(coord: CellCoord, grid_size: i32, angle: f64) -> CellCoord {
    let half = f64::from(grid_size) / 2.0;
    let cx = f64::from(coord.x) + half;
    let cy = f64::from(coord.y) + half;
    let (sin, cos) = angle.sin_cos();
    let rx = cx * cos - cy * sin;
    let ry = cx * sin + cy * cos;
    CellCoord::new(snap_axis(rx as f32, grid_size), snap_axis(ry as f32, grid_size))
}
