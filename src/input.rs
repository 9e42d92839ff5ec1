use crate::consts::{ZOOM_IN_STEP, ZOOM_OUT_STEP};
use crate::view::ViewTransform;
use egui::{Context, Key, Modifiers, PointerButton, Pos2, Rect};

/// Where an input event occurred
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputLocation {
    /// Position relative to the canvas' top-left corner
    pub screen: Pos2,
    /// Position in drawing coordinates
    pub world: Pos2,
    /// Whether this position is within the canvas bounds
    pub is_in_canvas: bool,
}

impl InputLocation {
    /// Location inside the canvas for a canvas-local screen position
    pub fn at(screen: Pos2, view: &ViewTransform) -> Self {
        Self {
            screen,
            world: view.screen_to_world(screen),
            is_in_canvas: true,
        }
    }
}

/// Input the gesture layer reacts to
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Pointer button was pressed
    PointerDown {
        location: InputLocation,
        button: PointerButton,
        modifiers: Modifiers,
    },
    /// Pointer moved (with or without buttons pressed)
    PointerMove {
        location: InputLocation,
        modifiers: Modifiers,
    },
    /// Pointer button was released
    PointerUp {
        location: InputLocation,
        button: PointerButton,
        modifiers: Modifiers,
    },
    /// Key was pressed
    KeyDown { key: Key, modifiers: Modifiers },
    /// Key was released
    KeyUp { key: Key, modifiers: Modifiers },
    /// Scroll zoom around a canvas-local point
    Zoom { factor: f32, pivot: Pos2 },
}

/// Turns raw egui input into [`InputEvent`]s for one canvas
#[derive(Debug, Default)]
pub struct InputHandler {
    last_pointer_pos: Option<Pos2>,
}

impl InputHandler {
    pub fn new() -> Self {
        Self::default()
    }

    fn make_location(canvas_rect: Rect, view: &ViewTransform, pos: Pos2) -> InputLocation {
        let screen = (pos - canvas_rect.min).to_pos2();
        InputLocation {
            screen,
            world: view.screen_to_world(screen),
            is_in_canvas: canvas_rect.contains(pos),
        }
    }

    /// Collect this frame's events. Presses and scrolling only count inside
    /// `canvas_rect`; moves and releases are always reported so gestures
    /// that leave the canvas still finish.
    pub fn process_input(
        &mut self,
        ctx: &Context,
        canvas_rect: Rect,
        view: &ViewTransform,
    ) -> Vec<InputEvent> {
        let mut events = Vec::new();

        ctx.input(|input| {
            let modifiers = input.modifiers;
            let pointer_pos = input.pointer.interact_pos();

            if let Some(pos) = pointer_pos {
                let location = Self::make_location(canvas_rect, view, pos);

                for button in [PointerButton::Primary, PointerButton::Secondary, PointerButton::Middle] {
                    if input.pointer.button_pressed(button) && location.is_in_canvas {
                        events.push(InputEvent::PointerDown {
                            location,
                            button,
                            modifiers,
                        });
                    }
                }

                if Some(pos) != self.last_pointer_pos {
                    events.push(InputEvent::PointerMove {
                        location,
                        modifiers,
                    });
                }

                for button in [PointerButton::Primary, PointerButton::Secondary, PointerButton::Middle] {
                    if input.pointer.button_released(button) {
                        events.push(InputEvent::PointerUp {
                            location,
                            button,
                            modifiers,
                        });
                    }
                }

                let scroll = input.raw_scroll_delta.y;
                if scroll != 0.0 && location.is_in_canvas {
                    let factor = if scroll > 0.0 { ZOOM_IN_STEP } else { ZOOM_OUT_STEP };
                    events.push(InputEvent::Zoom {
                        factor,
                        pivot: location.screen,
                    });
                }
            }
            self.last_pointer_pos = pointer_pos;

            for event in &input.raw.events {
                if let egui::Event::Key {
                    key,
                    pressed,
                    repeat: false,
                    modifiers,
                    ..
                } = event
                {
                    events.push(if *pressed {
                        InputEvent::KeyDown {
                            key: *key,
                            modifiers: *modifiers,
                        }
                    } else {
                        InputEvent::KeyUp {
                            key: *key,
                            modifiers: *modifiers,
                        }
                    });
                }
            }
        });

        events
    }
}
