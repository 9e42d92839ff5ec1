use crate::grid::CellCoord;
use crate::image::ImageId;
use crate::stroke::StrokeId;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Back-reference into one of the document's collections. Resolved through
/// a lookup, never held as a pointer or a copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SelectionEntry {
    Stroke(StrokeId),
    Cell(CellCoord),
    Image(ImageId),
}

/// Ordered set of selected objects
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    entries: Vec<SelectionEntry>,
    // Same entries as `entries`, for constant-time membership
    members: HashSet<SelectionEntry>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[SelectionEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn contains(&self, entry: &SelectionEntry) -> bool {
        self.members.contains(entry)
    }

    pub fn insert(&mut self, entry: SelectionEntry) {
        if self.members.insert(entry) {
            self.entries.push(entry);
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.members.clear();
    }

    pub fn retain(&mut self, mut keep: impl FnMut(&SelectionEntry) -> bool) {
        let members = &mut self.members;
        self.entries.retain(|entry| {
            let kept = keep(entry);
            if !kept {
                members.remove(entry);
            }
            kept
        });
    }

    pub fn strokes(&self) -> impl Iterator<Item = StrokeId> + '_ {
        self.entries.iter().filter_map(|entry| match entry {
            SelectionEntry::Stroke(id) => Some(*id),
            _ => None,
        })
    }

    pub fn cells(&self) -> impl Iterator<Item = CellCoord> + '_ {
        self.entries.iter().filter_map(|entry| match entry {
            SelectionEntry::Cell(coord) => Some(*coord),
            _ => None,
        })
    }

    pub fn images(&self) -> impl Iterator<Item = ImageId> + '_ {
        self.entries.iter().filter_map(|entry| match entry {
            SelectionEntry::Image(id) => Some(*id),
            _ => None,
        })
    }

    /// Rewrite cell entries after the selected cells moved by a grid offset
    pub(crate) fn shift_cells(&mut self, dx: i32, dy: i32) {
        let entries = std::mem::take(&mut self.entries);
        self.members.clear();
        for entry in entries {
            self.insert(match entry {
                SelectionEntry::Cell(coord) => SelectionEntry::Cell(coord.offset(dx, dy)),
                other => other,
            });
        }
    }
}

impl FromIterator<SelectionEntry> for Selection {
    fn from_iter<I: IntoIterator<Item = SelectionEntry>>(iter: I) -> Self {
        let mut selection = Selection::new();
        for entry in iter {
            selection.insert(entry);
        }
        selection
    }
}
