//! Pointer and keyboard gestures.
//!
//! Each gesture that can change the document captures a snapshot when it
//! starts and pushes it onto the history when it ends, but only if the
//! document actually changed. Undo therefore always returns to the state
//! just before the gesture. Instant actions (fill, delete, image insert)
//! do the same around their single mutation.

use crate::consts::MIN_IMAGE_SIZE;
use crate::geometry::cells_along_segment;
use crate::geometry::hit_testing::{ImageHandle, image_handle_at};
use crate::grid::CellCoord;
use crate::history::{History, Snapshot};
use crate::image::{ImageId, ImageTransform, PlacedImage};
use crate::input::{InputEvent, InputLocation};
use crate::renderer::pick_color;
use crate::selection::SelectionEntry;
use crate::state::{Interaction, Scene};
use crate::stroke::StrokePoint;
use crate::tools::Tool;
use egui::{Key, Modifiers, PointerButton, Pos2, Vec2};
use log::debug;
use std::f32::consts::FRAC_PI_2;

#[derive(Debug, Default)]
pub struct Gestures {
    /// Scene as it was when the current gesture started
    pending: Option<Snapshot>,
    space_held: bool,
}

impl Gestures {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn space_held(&self) -> bool {
        self.space_held
    }

    pub fn handle(&mut self, event: &InputEvent, scene: &mut Scene, history: &mut History) {
        match event {
            InputEvent::PointerDown {
                location,
                button,
                modifiers,
            } => self.pointer_down(*location, *button, *modifiers, scene, history),
            InputEvent::PointerMove {
                location,
                modifiers,
            } => self.pointer_move(*location, *modifiers, scene),
            InputEvent::PointerUp { .. } => self.pointer_up(scene, history),
            InputEvent::KeyDown { key, modifiers } => self.key_down(*key, *modifiers, scene, history),
            InputEvent::KeyUp { key, .. } => {
                if *key == Key::Space {
                    self.space_held = false;
                }
            }
            InputEvent::Zoom { factor, pivot } => scene.zoom(*factor, *pivot),
        }
    }

    /// Place a freshly decoded image and record it as one undoable step
    pub fn insert_image(&mut self, image: PlacedImage, scene: &mut Scene, history: &mut History) {
        let before = Snapshot::capture(scene);
        let id = scene.add_image(image);
        history.push(before);
        debug!("Inserted image {id:?}");
    }

    /// Start a gesture whose undo entry is `before`, captured at the press
    fn begin(&mut self, before: Snapshot, scene: &mut Scene, interaction: Interaction) {
        self.pending = Some(before);
        scene.interaction = interaction;
    }

    fn finish(&mut self, scene: &mut Scene, history: &mut History) {
        if let Some(before) = self.pending.take() {
            if before.document_differs(scene) {
                history.push(before);
            }
        }
        scene.interaction = Interaction::Idle;
    }

    fn pointer_down(
        &mut self,
        location: InputLocation,
        button: PointerButton,
        modifiers: Modifiers,
        scene: &mut Scene,
        history: &mut History,
    ) {
        if !location.is_in_canvas || !scene.interaction.is_idle() {
            return;
        }
        let pos = location.world;
        // Taken before the press clears or replaces the selection
        let before = Snapshot::capture(scene);

        if !scene.selection.is_empty() {
            if modifiers.command && scene.selection_contains_point(pos) {
                self.begin(
                    before,
                    scene,
                    Interaction::MovingSelection {
                        last: pos,
                        cell_residual: Vec2::ZERO,
                    },
                );
                return;
            }
            scene.clear_selection();
        }

        if self.space_held || button == PointerButton::Middle {
            scene.interaction = Interaction::Panning {
                last_screen: location.screen,
            };
            return;
        }

        let tool = scene.settings.tool;
        if tool == Tool::GridDraw {
            let erase = button == PointerButton::Secondary;
            let cell = CellCoord::snap(pos, scene.grid_size());
            self.begin(before, scene, Interaction::GridPainting { erase, last: cell });
            paint_cell(scene, cell, erase);
            return;
        }

        if button == PointerButton::Secondary && tool != Tool::Fill {
            let point = StrokePoint::new(pos, scene.settings.eraser_size, scene.settings.background);
            self.begin(before, scene, Interaction::Drawing);
            scene.begin_stroke(point);
            return;
        }

        match tool {
            Tool::ColorPicker => {
                if let Some(color) = pick_color(scene, pos) {
                    scene.settings.color = color;
                    scene.settings.select_tool(Tool::Pencil);
                }
            }
            Tool::Fill => {
                let outcome = if button == PointerButton::Secondary {
                    scene.erase_at(pos)
                } else {
                    scene.paint_at(pos)
                };
                debug!("Fill at {pos:?}: {outcome:?}");
                if outcome.changed() {
                    history.push(before);
                }
            }
            Tool::Pencil | Tool::Eraser => {
                let settings = &scene.settings;
                let point = if tool == Tool::Eraser {
                    StrokePoint::new(pos, settings.eraser_size, settings.background)
                } else {
                    StrokePoint::new(pos, settings.brush_size, settings.color)
                };
                self.begin(before, scene, Interaction::Drawing);
                scene.begin_stroke(point);
            }
            Tool::Select | Tool::RectSelect => self.select_down(pos, before, scene),
            Tool::GridDraw => {}
        }
    }

    fn select_down(&mut self, pos: Pos2, before: Snapshot, scene: &mut Scene) {
        // Handles stick out of the image, so they are tested on every image
        // rather than only the one under the pointer
        let hit = scene
            .active_layer_images()
            .rev()
            .find_map(|image| image_handle_at(pos, image).map(|handle| (handle, image.clone())));

        let Some((handle, image)) = hit else {
            scene.interaction = Interaction::Selecting {
                origin: pos,
                current: pos,
            };
            return;
        };

        scene.set_selection([SelectionEntry::Image(image.id)]);
        let interaction = match handle {
            ImageHandle::Resize => Interaction::ResizingImage {
                id: image.id,
                start: pos,
                start_size: Vec2::new(image.width, image.height),
            },
            ImageHandle::Rotate => Interaction::RotatingImage { id: image.id },
            ImageHandle::Body => Interaction::DraggingImage {
                id: image.id,
                grab: pos - Pos2::new(image.x, image.y),
            },
        };
        self.begin(before, scene, interaction);
    }

    fn pointer_move(&mut self, location: InputLocation, modifiers: Modifiers, scene: &mut Scene) {
        let pos = location.world;
        match scene.interaction {
            Interaction::Idle => {}
            Interaction::Drawing => {
                let first = scene.current_stroke().and_then(|s| s.points().first().copied());
                if let Some(first) = first {
                    scene.append_to_stroke(StrokePoint::new(pos, first.size, first.color));
                }
            }
            Interaction::GridPainting { erase, last } => {
                let grid_size = scene.grid_size();
                let cell = CellCoord::snap(pos, grid_size);
                if cell != last {
                    let from = Pos2::new(last.x as f32, last.y as f32);
                    for coord in cells_along_segment(from, pos, grid_size).into_iter().skip(1) {
                        paint_cell(scene, coord, erase);
                    }
                    scene.interaction = Interaction::GridPainting { erase, last: cell };
                }
            }
            Interaction::DraggingImage { id, grab } => {
                let top_left = pos - grab;
                scene.mutate_image_transform(
                    id,
                    ImageTransform {
                        x: Some(top_left.x),
                        y: Some(top_left.y),
                        ..Default::default()
                    },
                );
            }
            Interaction::ResizingImage {
                id,
                start,
                start_size,
            } => {
                let delta = pos - start;
                let width = (start_size.x + delta.x).max(MIN_IMAGE_SIZE);
                let height = if modifiers.shift {
                    width * start_size.y / start_size.x
                } else {
                    (start_size.y + delta.y).max(MIN_IMAGE_SIZE)
                };
                scene.mutate_image_transform(
                    id,
                    ImageTransform {
                        width: Some(width),
                        height: Some(height),
                        ..Default::default()
                    },
                );
            }
            Interaction::RotatingImage { id } => rotate_towards(scene, id, pos),
            Interaction::Panning { last_screen } => {
                scene.view.pan_by(location.screen - last_screen);
                scene.interaction = Interaction::Panning {
                    last_screen: location.screen,
                };
            }
            Interaction::Selecting { origin, .. } => {
                scene.interaction = Interaction::Selecting {
                    origin,
                    current: pos,
                };
            }
            Interaction::MovingSelection {
                last,
                cell_residual,
            } => {
                let delta = pos - last;
                scene.translate_selection(delta);

                let grid_size = scene.grid_size() as f32;
                let pending = cell_residual + delta;
                let steps_x = (pending.x / grid_size).trunc();
                let steps_y = (pending.y / grid_size).trunc();
                scene.translate_selected_cells(steps_x as i32, steps_y as i32);

                scene.interaction = Interaction::MovingSelection {
                    last: pos,
                    cell_residual: pending - Vec2::new(steps_x, steps_y) * grid_size,
                };
            }
        }
    }

    fn pointer_up(&mut self, scene: &mut Scene, history: &mut History) {
        match scene.interaction {
            Interaction::Idle => {}
            Interaction::Drawing => {
                scene.commit_stroke();
                self.finish(scene, history);
            }
            Interaction::Panning { .. } => scene.interaction = Interaction::Idle,
            Interaction::Selecting { .. } => {
                if let Some(rect) = scene.interaction.marquee() {
                    let entries = scene.rect_select(rect);
                    scene.set_selection(entries);
                }
                scene.interaction = Interaction::Idle;
            }
            Interaction::GridPainting { .. }
            | Interaction::DraggingImage { .. }
            | Interaction::ResizingImage { .. }
            | Interaction::RotatingImage { .. }
            | Interaction::MovingSelection { .. } => self.finish(scene, history),
        }
    }

    fn key_down(&mut self, key: Key, modifiers: Modifiers, scene: &mut Scene, history: &mut History) {
        match key {
            Key::Space => self.space_held = true,
            Key::Delete | Key::Backspace => {
                if !scene.selection.is_empty() && scene.interaction.is_idle() {
                    let before = Snapshot::capture(scene);
                    scene.delete_selected();
                    history.push(before);
                }
            }
            Key::Z if modifiers.command => {
                self.pending = None;
                if modifiers.shift {
                    history.redo(scene);
                } else {
                    history.undo(scene);
                }
            }
            Key::Y if modifiers.command => {
                self.pending = None;
                history.redo(scene);
            }
            _ => {}
        }
    }
}

fn paint_cell(scene: &mut Scene, coord: CellCoord, erase: bool) {
    if erase {
        scene.remove_grid_cell(coord);
    } else {
        let color = scene.settings.color;
        scene.set_or_create_grid_cell(coord, color);
    }
}

/// Rotate so the rotation handle, which sits above the image, points at `pos`
fn rotate_towards(scene: &mut Scene, id: ImageId, pos: Pos2) {
    let Some(center) = scene.document.image(id).map(|image| image.center()) else {
        return;
    };
    let offset = pos - center;
    scene.mutate_image_transform(
        id,
        ImageTransform {
            rotation: Some(offset.y.atan2(offset.x) + FRAC_PI_2),
            ..Default::default()
        },
    );
}
