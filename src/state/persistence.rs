use super::Scene;
use crate::consts::DRAWING_STATE_KEY;
use crate::document::Document;
use crate::error::PersistenceError;
use crate::grid::{Grid, GridCell};
use crate::image::PlacedImage;
use crate::layers::{Layer, Layers};
use crate::stroke::StrokeRef;
use crate::symmetry::{GridTransformMode, Symmetry};
use log::{info, warn};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Result type for persistence operations
pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// Opaque string key-value store the drawing is saved into
pub trait BlobStore {
    fn read_blob(&self, key: &str) -> Option<String>;
    fn write_blob(&mut self, key: &str, value: String);
}

impl BlobStore for dyn eframe::Storage + '_ {
    fn read_blob(&self, key: &str) -> Option<String> {
        eframe::Storage::get_string(self, key)
    }

    fn write_blob(&mut self, key: &str, value: String) {
        eframe::Storage::set_string(self, key, value);
    }
}

/// In-memory store for headless use and tests
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    blobs: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BlobStore for MemoryStore {
    fn read_blob(&self, key: &str) -> Option<String> {
        self.blobs.get(key).cloned()
    }

    fn write_blob(&mut self, key: &str, value: String) {
        self.blobs.insert(key.to_owned(), value);
    }
}

/// The persisted part of a scene. Interaction state, selection, view and
/// history are not saved.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedDrawing {
    pub strokes: Vec<StrokeRef>,
    pub grid_cells: Vec<GridCell>,
    pub images: Vec<PlacedImage>,
    pub layers: Vec<Layer>,
    pub active_layer: usize,
    pub symmetry: Symmetry,
    pub grid_transformation_mode: GridTransformMode,
}

impl SavedDrawing {
    pub fn from_scene(scene: &Scene) -> Self {
        Self {
            strokes: scene.document.strokes().to_vec(),
            grid_cells: scene.document.grid().to_cells(),
            images: scene.document.images().to_vec(),
            layers: scene.layers.as_slice().to_vec(),
            active_layer: scene.layers.active_index(),
            symmetry: scene.symmetry,
            grid_transformation_mode: scene.grid_mode,
        }
    }

    /// Replace the scene's content with this drawing
    pub fn apply_to(self, scene: &mut Scene) {
        let strokes = self
            .strokes
            .into_iter()
            .filter(|stroke| stroke.points().len() >= 2)
            .collect();
        let grid: Grid = self.grid_cells.into_iter().collect();
        scene.document = Document::from_parts(strokes, grid, self.images);
        scene.layers = Layers::from_parts(self.layers, self.active_layer);
        scene.symmetry = self.symmetry;
        scene.grid_mode = self.grid_transformation_mode;
        scene.clear_selection();
        scene.discard_stroke();
        scene.interaction = Default::default();
    }

    /// Parse a saved blob. Every field that is missing or malformed falls back
    /// to its default on its own; a blob that is not JSON at all yields an
    /// empty drawing.
    pub fn from_json(json: &str) -> Self {
        let value: serde_json::Value = match serde_json::from_str(json) {
            Ok(value) => value,
            Err(err) => {
                warn!("Saved drawing is not valid JSON, starting empty: {err}");
                return Self::default();
            }
        };
        let Some(fields) = value.as_object() else {
            warn!("Saved drawing is not an object, starting empty");
            return Self::default();
        };

        Self {
            strokes: field_or_default(fields, "strokes"),
            grid_cells: field_or_default(fields, "gridCells"),
            images: field_or_default(fields, "images"),
            layers: field_or_default(fields, "layers"),
            active_layer: field_or_default(fields, "activeLayer"),
            symmetry: field_or_default(fields, "symmetry"),
            grid_transformation_mode: field_or_default(fields, "gridTransformationMode"),
        }
    }

    pub fn to_json(&self) -> PersistenceResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

fn field_or_default<T: DeserializeOwned + Default>(
    fields: &serde_json::Map<String, serde_json::Value>,
    name: &str,
) -> T {
    let Some(value) = fields.get(name) else {
        return T::default();
    };
    match serde_json::from_value(value.clone()) {
        Ok(parsed) => parsed,
        Err(err) => {
            warn!("Ignoring malformed `{name}` in saved drawing: {err}");
            T::default()
        }
    }
}

/// Write the scene's drawing under [`DRAWING_STATE_KEY`]
pub fn save_drawing<S: BlobStore + ?Sized>(scene: &Scene, store: &mut S) -> PersistenceResult<()> {
    let saved = SavedDrawing::from_scene(scene);
    store.write_blob(DRAWING_STATE_KEY, saved.to_json()?);
    info!(
        "Saved drawing: {} strokes, {} cells, {} images",
        saved.strokes.len(),
        saved.grid_cells.len(),
        saved.images.len()
    );
    Ok(())
}

/// Load the saved drawing into the scene. Returns false when nothing was saved.
pub fn load_drawing<S: BlobStore + ?Sized>(scene: &mut Scene, store: &S) -> bool {
    let Some(json) = store.read_blob(DRAWING_STATE_KEY) else {
        return false;
    };
    SavedDrawing::from_json(&json).apply_to(scene);
    info!(
        "Loaded drawing: {} strokes, {} cells, {} images",
        scene.document.strokes().len(),
        scene.document.grid().len(),
        scene.document.images().len()
    );
    true
}
