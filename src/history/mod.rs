//! Snapshot-based undo/redo.
//!
//! Every entry is a full copy of the document, selection and view. Strokes
//! and image pixels are reference counted, so consecutive snapshots share
//! everything that did not change and a later edit of the live scene never
//! reaches back into an older snapshot.

mod playback;

pub use playback::Playback;

use crate::consts::MAX_UNDO_ENTRIES;
use crate::document::Document;
use crate::selection::Selection;
use crate::state::{Interaction, Scene};
use crate::view::ViewTransform;
use log::debug;
use std::collections::VecDeque;

/// Immutable copy of the undoable part of a scene
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    document: Document,
    selection: Selection,
    view: ViewTransform,
}

impl Snapshot {
    pub fn capture(scene: &Scene) -> Self {
        Self {
            document: scene.document.clone(),
            selection: scene.selection.clone(),
            view: scene.view,
        }
    }

    /// Replace the scene's content with this snapshot. Any gesture in flight
    /// is abandoned.
    pub fn restore_into(&self, scene: &mut Scene) {
        scene.document = self.document.clone();
        scene.selection = self.selection.clone();
        scene.view = self.view;
        scene.interaction = Interaction::Idle;
        scene.discard_stroke();
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn view(&self) -> ViewTransform {
        self.view
    }

    /// Whether the scene's document differs from the one captured here
    pub fn document_differs(&self, scene: &Scene) -> bool {
        self.document != scene.document
    }
}

/// Linear undo/redo history. The undo stack keeps the most recent
/// [`MAX_UNDO_ENTRIES`] snapshots.
#[derive(Debug, Default)]
pub struct History {
    undo_stack: VecDeque<Snapshot>,
    redo_stack: Vec<Snapshot>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the scene as it is now
    pub fn commit(&mut self, scene: &Scene) {
        self.push(Snapshot::capture(scene));
    }

    /// Record a snapshot taken earlier, typically at the start of a gesture.
    /// Clears the redo stack.
    pub fn push(&mut self, snapshot: Snapshot) {
        self.push_undo(snapshot);
        self.redo_stack.clear();
        debug!("History commit ({} undo entries)", self.undo_stack.len());
    }

    fn push_undo(&mut self, snapshot: Snapshot) {
        self.undo_stack.push_back(snapshot);
        while self.undo_stack.len() > MAX_UNDO_ENTRIES {
            self.undo_stack.pop_front();
        }
    }

    /// Step back one entry. Returns false when there is nothing to undo.
    pub fn undo(&mut self, scene: &mut Scene) -> bool {
        let Some(snapshot) = self.undo_stack.pop_back() else {
            return false;
        };
        self.redo_stack.push(Snapshot::capture(scene));
        snapshot.restore_into(scene);
        debug!(
            "Undo ({} undo / {} redo entries)",
            self.undo_stack.len(),
            self.redo_stack.len()
        );
        true
    }

    /// Step forward one entry. Returns false when there is nothing to redo.
    pub fn redo(&mut self, scene: &mut Scene) -> bool {
        let Some(snapshot) = self.redo_stack.pop() else {
            return false;
        };
        self.push_undo(Snapshot::capture(scene));
        snapshot.restore_into(scene);
        debug!(
            "Redo ({} undo / {} redo entries)",
            self.undo_stack.len(),
            self.redo_stack.len()
        );
        true
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Number of undo entries, which are also the playback frames
    pub fn len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.undo_stack.is_empty()
    }

    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    /// Undo entry `index`, oldest first
    pub fn frame(&self, index: usize) -> Option<&Snapshot> {
        self.undo_stack.get(index)
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}
