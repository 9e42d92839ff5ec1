// History
pub const MAX_UNDO_ENTRIES: usize = 50;

// Grid
/// Cell coordinates are kept within `±MAX_CELL_COORD` so neighbour and
/// mirror arithmetic cannot overflow. Positions further out snap to the edge.
pub const MAX_CELL_COORD: i32 = 1 << 30;
/// Longest pointer segment walked cell by cell while grid painting
pub const MAX_SEGMENT_CELLS: usize = 10_000;

// Fill
/// Largest empty region an enclosed-area fill will paint. Anything bigger is
/// treated as open canvas and left untouched.
pub const MAX_FILL_CELLS: usize = 10_000;

// Playback
pub const MIN_PLAYBACK_SPEED: f32 = 0.25;
pub const MAX_PLAYBACK_SPEED: f32 = 4.0;

// View
pub const MIN_ZOOM: f32 = 1e-6;
pub const ZOOM_IN_STEP: f32 = 1.1;
pub const ZOOM_OUT_STEP: f32 = 0.9;

// Images
/// Largest RGBA buffer an export may allocate
pub const MAX_EXPORT_BYTES: u64 = 512 * 1024 * 1024;
pub const DEFAULT_IMAGE_OFFSET: f32 = 100.0;
pub const MIN_IMAGE_SIZE: f32 = 20.0;
pub const RESIZE_HANDLE_SIZE: f32 = 10.0;
pub const ROTATION_HANDLE_SIZE: f32 = 15.0;
pub const ROTATION_HANDLE_OFFSET: f32 = 20.0;

// Symmetry
pub const MIN_RAY_COUNT: u32 = 2;
pub const DEFAULT_RAY_COUNT: u32 = 8;

// Persistence
pub const DRAWING_STATE_KEY: &str = "drawingState";
