#![warn(clippy::all, rust_2018_idioms)]
//! A symmetry drawing canvas: freehand strokes, a sparse paint grid with
//! flood fills, placed raster images, selection, and snapshot undo/redo with
//! timeline playback.
//!
//! The engine ([`state::Scene`], [`history::History`], [`gestures::Gestures`])
//! has no UI dependency beyond egui's geometry types and can be driven
//! headlessly; [`PaintApp`] wires it into eframe.

pub mod app;
pub mod consts;
pub mod document;
pub mod error;
pub mod export;
pub mod file_handler;
pub mod fill;
pub mod geometry;
pub mod gestures;
pub mod grid;
pub mod history;
pub mod image;
pub mod input;
pub mod layers;
pub mod panels;
pub mod raster;
pub mod renderer;
pub mod selection;
pub mod state;
pub mod stroke;
pub mod symmetry;
pub mod texture_manager;
pub mod tools;
pub mod util;
pub mod view;

pub use app::PaintApp;
pub use document::Document;
pub use gestures::Gestures;
pub use history::{History, Playback, Snapshot};
pub use input::{InputEvent, InputLocation};
pub use layers::{Layer, Layers};
pub use renderer::{Renderer, Surface};
pub use selection::{Selection, SelectionEntry};
pub use state::Scene;
pub use stroke::Stroke;
pub use symmetry::{GridTransformMode, Symmetry, SymmetryMode};
pub use tools::{Tool, ToolSettings};
