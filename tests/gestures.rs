use egui::{Color32, Key, Modifiers, PointerButton, Pos2, Vec2};
use symmetry_paint::grid::CellCoord;
use symmetry_paint::image::{ImageSource, PlacedImage};
use symmetry_paint::selection::SelectionEntry;
use symmetry_paint::{Gestures, History, InputEvent, InputLocation, Scene, Tool};

struct Harness {
    scene: Scene,
    history: History,
    gestures: Gestures,
}

impl Harness {
    fn new() -> Self {
        Self {
            scene: Scene::new(),
            history: History::new(),
            gestures: Gestures::new(),
        }
    }

    fn with_tool(tool: Tool) -> Self {
        let mut harness = Self::new();
        harness.scene.settings.select_tool(tool);
        harness
    }

    fn send(&mut self, event: InputEvent) {
        self.gestures.handle(&event, &mut self.scene, &mut self.history);
    }

    fn location(&self, x: f32, y: f32) -> InputLocation {
        InputLocation::at(Pos2::new(x, y), &self.scene.view)
    }

    fn down_with(&mut self, x: f32, y: f32, button: PointerButton, modifiers: Modifiers) {
        let location = self.location(x, y);
        self.send(InputEvent::PointerDown {
            location,
            button,
            modifiers,
        });
    }

    fn down(&mut self, x: f32, y: f32) {
        self.down_with(x, y, PointerButton::Primary, Modifiers::NONE);
    }

    fn move_with(&mut self, x: f32, y: f32, modifiers: Modifiers) {
        let location = self.location(x, y);
        self.send(InputEvent::PointerMove { location, modifiers });
    }

    fn move_to(&mut self, x: f32, y: f32) {
        self.move_with(x, y, Modifiers::NONE);
    }

    fn up(&mut self, x: f32, y: f32) {
        let location = self.location(x, y);
        self.send(InputEvent::PointerUp {
            location,
            button: PointerButton::Primary,
            modifiers: Modifiers::NONE,
        });
    }

    fn key(&mut self, key: Key, modifiers: Modifiers) {
        self.send(InputEvent::KeyDown { key, modifiers });
    }

    fn drag(&mut self, points: &[(f32, f32)]) {
        let (&(x, y), rest) = points.split_first().expect("drag needs a start point");
        self.down(x, y);
        for &(x, y) in rest {
            self.move_to(x, y);
        }
        let &(x, y) = points.last().expect("drag needs an end point");
        self.up(x, y);
    }

    fn place_image(&mut self, x: f32, y: f32, width: f32, height: f32) -> PlacedImage {
        let image = PlacedImage::new(
            ImageSource::new(Vec::new()),
            Pos2::new(x, y),
            Vec2::new(width, height),
        );
        self.gestures
            .insert_image(image.clone(), &mut self.scene, &mut self.history);
        image
    }
}

#[test]
fn test_pencil_stroke_is_one_history_entry() {
    let mut h = Harness::with_tool(Tool::Pencil);
    h.drag(&[(10.0, 10.0), (20.0, 10.0), (30.0, 15.0)]);

    assert_eq!(h.scene.document.strokes().len(), 1);
    assert_eq!(h.scene.document.strokes()[0].points().len(), 3);
    assert_eq!(h.history.len(), 1);
    assert!(h.scene.interaction.is_idle());

    h.key(Key::Z, Modifiers::COMMAND);
    assert!(h.scene.document.strokes().is_empty());
    assert!(h.history.can_redo());
}

#[test]
fn test_single_click_adds_no_history() {
    let mut h = Harness::with_tool(Tool::Pencil);
    h.drag(&[(10.0, 10.0)]);

    assert!(h.scene.document.strokes().is_empty());
    assert!(h.history.is_empty());
}

#[test]
fn test_secondary_button_draws_with_background() {
    let mut h = Harness::with_tool(Tool::Pencil);
    h.down_with(0.0, 0.0, PointerButton::Secondary, Modifiers::NONE);
    h.move_to(40.0, 0.0);
    h.up(40.0, 0.0);

    let stroke = &h.scene.document.strokes()[0];
    assert_eq!(stroke.color(), h.scene.settings.background);
    assert_eq!(stroke.thickness(), h.scene.settings.eraser_size);
}

#[test]
fn test_grid_drag_paints_every_crossed_cell() {
    let mut h = Harness::with_tool(Tool::GridDraw);
    h.scene.settings.color = Color32::RED;
    h.drag(&[(5.0, 5.0), (65.0, 5.0)]);

    let grid = h.scene.document.grid();
    for x in [0, 20, 40, 60] {
        assert_eq!(grid.get(CellCoord::new(x, 0)), Some(Color32::RED), "cell at x={x}");
    }
    assert_eq!(grid.len(), 4);
    assert_eq!(h.history.len(), 1);

    h.key(Key::Z, Modifiers::COMMAND);
    assert!(h.scene.document.grid().is_empty());
}

#[test]
fn test_grid_secondary_drag_erases() {
    let mut h = Harness::with_tool(Tool::GridDraw);
    h.drag(&[(5.0, 5.0), (25.0, 5.0)]);
    assert_eq!(h.scene.document.grid().len(), 2);

    h.down_with(5.0, 5.0, PointerButton::Secondary, Modifiers::NONE);
    h.up(5.0, 5.0);
    assert_eq!(h.scene.document.grid().len(), 1);
    assert_eq!(h.history.len(), 2);
}

#[test]
fn test_open_canvas_fill_adds_no_history() {
    let mut h = Harness::with_tool(Tool::Fill);
    h.down(500.0, 500.0);
    h.up(500.0, 500.0);

    assert!(h.scene.document.grid().is_empty());
    assert!(h.history.is_empty());
}

#[test]
fn test_enclosed_fill_is_undoable() {
    let mut h = Harness::new();
    for coord in [(20, 0), (0, 20), (40, 20), (20, 40)] {
        h.scene
            .set_or_create_grid_cell(CellCoord::new(coord.0, coord.1), Color32::BLACK);
    }
    h.scene.settings.select_tool(Tool::Fill);
    h.scene.settings.color = Color32::BLUE;
    h.down(25.0, 25.0);
    h.up(25.0, 25.0);

    assert_eq!(h.scene.document.grid().get(CellCoord::new(20, 20)), Some(Color32::BLUE));
    assert_eq!(h.history.len(), 1);
    h.key(Key::Z, Modifiers::COMMAND);
    assert!(!h.scene.document.grid().contains(CellCoord::new(20, 20)));
}

#[test]
fn test_fill_secondary_erases_connected_cells() {
    let mut h = Harness::new();
    for x in [0, 20, 40] {
        h.scene.set_or_create_grid_cell(CellCoord::new(x, 0), Color32::RED);
    }
    h.scene.set_or_create_grid_cell(CellCoord::new(60, 0), Color32::BLUE);
    h.scene.settings.select_tool(Tool::Fill);

    h.down_with(5.0, 5.0, PointerButton::Secondary, Modifiers::NONE);
    h.up(5.0, 5.0);

    assert_eq!(h.scene.document.grid().len(), 1);
    assert!(h.scene.document.strokes().is_empty());
    assert_eq!(h.history.len(), 1);
}

#[test]
fn test_color_picker_takes_cell_color_and_returns_to_pencil() {
    let mut h = Harness::new();
    h.scene.set_or_create_grid_cell(CellCoord::new(0, 0), Color32::GREEN);
    h.scene.settings.select_tool(Tool::ColorPicker);
    h.down(10.0, 10.0);
    h.up(10.0, 10.0);

    assert_eq!(h.scene.settings.color, Color32::GREEN);
    assert_eq!(h.scene.settings.tool, Tool::Pencil);
    assert!(h.history.is_empty());
}

#[test]
fn test_dragging_image_body_moves_it() {
    let mut h = Harness::with_tool(Tool::Select);
    let image = h.place_image(100.0, 100.0, 200.0, 100.0);
    assert_eq!(h.history.len(), 1);

    h.drag(&[(150.0, 150.0), (170.0, 160.0), (200.0, 180.0)]);

    let moved = h.scene.document.image(image.id).expect("image still placed");
    assert_eq!((moved.x, moved.y), (150.0, 130.0));
    assert!(h.scene.selection.contains(&SelectionEntry::Image(image.id)));
    assert_eq!(h.history.len(), 2);
}

#[test]
fn test_images_on_other_layers_cannot_be_grabbed() {
    let mut h = Harness::with_tool(Tool::Select);
    let image = h.place_image(100.0, 100.0, 200.0, 100.0);
    h.scene.layers.add();
    let on_top = h.place_image(400.0, 100.0, 50.0, 50.0);
    assert_eq!(h.scene.document.image(on_top.id).map(|i| i.layer), Some(1));

    h.drag(&[(150.0, 150.0), (200.0, 180.0)]);
    let untouched = h.scene.document.image(image.id).expect("image still placed");
    assert_eq!((untouched.x, untouched.y), (100.0, 100.0));
    assert!(!h.scene.selection.contains(&SelectionEntry::Image(image.id)));
    assert_eq!(h.history.len(), 2);
}

#[test]
fn test_clicking_image_without_moving_adds_no_history() {
    let mut h = Harness::with_tool(Tool::Select);
    h.place_image(100.0, 100.0, 200.0, 100.0);
    h.drag(&[(150.0, 150.0)]);
    assert_eq!(h.history.len(), 1);
}

#[test]
fn test_resize_handle_keeps_minimum_size() {
    let mut h = Harness::with_tool(Tool::Select);
    let image = h.place_image(100.0, 100.0, 200.0, 100.0);

    h.drag(&[(300.0, 200.0), (340.0, 220.0)]);
    let resized = h.scene.document.image(image.id).expect("image");
    assert_eq!((resized.width, resized.height), (240.0, 120.0));

    h.drag(&[(340.0, 220.0), (0.0, 0.0)]);
    let shrunk = h.scene.document.image(image.id).expect("image");
    assert_eq!((shrunk.width, shrunk.height), (20.0, 20.0));
}

#[test]
fn test_shift_resize_keeps_aspect_ratio() {
    let mut h = Harness::with_tool(Tool::Select);
    let image = h.place_image(100.0, 100.0, 200.0, 100.0);

    h.down(300.0, 200.0);
    h.move_with(400.0, 210.0, Modifiers::SHIFT);
    h.up(400.0, 210.0);

    let resized = h.scene.document.image(image.id).expect("image");
    assert_eq!((resized.width, resized.height), (300.0, 150.0));
}

#[test]
fn test_rotation_handle_follows_pointer() {
    let mut h = Harness::with_tool(Tool::Select);
    let image = h.place_image(100.0, 100.0, 200.0, 100.0);

    // Handle sits above the top edge; dragging it to the right of the
    // centre turns the image a quarter clockwise
    h.drag(&[(200.0, 80.0), (400.0, 150.0)]);

    let rotated = h.scene.document.image(image.id).expect("image");
    assert!((rotated.rotation - std::f32::consts::FRAC_PI_2).abs() < 1e-5);
    assert_eq!(h.history.len(), 2);
}

#[test]
fn test_marquee_selects_contained_content() {
    let mut h = Harness::with_tool(Tool::RectSelect);
    h.scene.set_or_create_grid_cell(CellCoord::new(20, 20), Color32::RED);
    h.scene
        .set_or_create_grid_cell(CellCoord::new(500, 500), Color32::RED);

    h.drag(&[(0.0, 0.0), (100.0, 100.0)]);

    assert!(h.scene.selection.contains(&SelectionEntry::Cell(CellCoord::new(20, 20))));
    assert!(!h.scene.selection.contains(&SelectionEntry::Cell(CellCoord::new(500, 500))));
    assert!(h.history.is_empty());
}

#[test]
fn test_ctrl_drag_moves_selected_cells_in_grid_steps() {
    let mut h = Harness::with_tool(Tool::RectSelect);
    h.scene.set_or_create_grid_cell(CellCoord::new(20, 20), Color32::RED);
    h.drag(&[(0.0, 0.0), (100.0, 100.0)]);

    h.down_with(25.0, 25.0, PointerButton::Primary, Modifiers::COMMAND);
    h.move_to(35.0, 25.0);
    h.move_to(47.0, 25.0);
    h.up(47.0, 25.0);

    let grid = h.scene.document.grid();
    assert_eq!(grid.get(CellCoord::new(40, 20)), Some(Color32::RED));
    assert!(!grid.contains(CellCoord::new(20, 20)));
    assert!(h.scene.selection.contains(&SelectionEntry::Cell(CellCoord::new(40, 20))));
    assert_eq!(h.history.len(), 1);
}

#[test]
fn test_plain_click_clears_selection() {
    let mut h = Harness::with_tool(Tool::RectSelect);
    h.scene.set_or_create_grid_cell(CellCoord::new(20, 20), Color32::RED);
    h.drag(&[(0.0, 0.0), (100.0, 100.0)]);
    assert!(!h.scene.selection.is_empty());

    h.down(25.0, 25.0);
    assert!(h.scene.selection.is_empty());
}

#[test]
fn test_undo_after_stroke_restores_prior_selection() {
    let mut h = Harness::with_tool(Tool::Pencil);
    h.scene.set_or_create_grid_cell(CellCoord::new(200, 200), Color32::RED);
    let selected = SelectionEntry::Cell(CellCoord::new(200, 200));
    h.scene.set_selection([selected]);

    h.drag(&[(10.0, 10.0), (40.0, 10.0)]);
    assert!(h.scene.selection.is_empty());
    assert_eq!(h.scene.document.strokes().len(), 1);

    h.key(Key::Z, Modifiers::COMMAND);
    assert!(h.scene.document.strokes().is_empty());
    assert_eq!(h.scene.selection.len(), 1);
    assert!(h.scene.selection.contains(&selected));
}

#[test]
fn test_delete_key_removes_selection_as_one_step() {
    let mut h = Harness::with_tool(Tool::Select);
    let image = h.place_image(100.0, 100.0, 50.0, 50.0);
    h.scene.set_or_create_grid_cell(CellCoord::new(0, 0), Color32::RED);
    h.scene.set_selection([
        SelectionEntry::Image(image.id),
        SelectionEntry::Cell(CellCoord::new(0, 0)),
    ]);

    h.key(Key::Delete, Modifiers::NONE);
    assert!(h.scene.document.images().is_empty());
    assert!(h.scene.document.grid().is_empty());
    assert!(h.scene.selection.is_empty());
    assert_eq!(h.history.len(), 2);

    h.key(Key::Z, Modifiers::COMMAND);
    assert_eq!(h.scene.document.images().len(), 1);
    assert_eq!(h.scene.selection.len(), 2);
}

#[test]
fn test_delete_without_selection_does_nothing() {
    let mut h = Harness::new();
    h.key(Key::Backspace, Modifiers::NONE);
    assert!(h.history.is_empty());
}

#[test]
fn test_space_drag_pans_without_history() {
    let mut h = Harness::with_tool(Tool::Pencil);
    h.key(Key::Space, Modifiers::NONE);
    assert!(h.gestures.space_held());
    h.drag(&[(10.0, 10.0), (40.0, 30.0)]);

    assert_eq!(h.scene.view.pan, Vec2::new(30.0, 20.0));
    assert!(h.scene.document.strokes().is_empty());
    assert!(h.history.is_empty());

    h.send(InputEvent::KeyUp {
        key: Key::Space,
        modifiers: Modifiers::NONE,
    });
    assert!(!h.gestures.space_held());
}

#[test]
fn test_middle_button_pans() {
    let mut h = Harness::with_tool(Tool::Pencil);
    h.down_with(0.0, 0.0, PointerButton::Middle, Modifiers::NONE);
    h.move_to(-15.0, 5.0);
    h.up(-15.0, 5.0);
    assert_eq!(h.scene.view.pan, Vec2::new(-15.0, 5.0));
}

#[test]
fn test_zoom_event_keeps_pivot_fixed() {
    let mut h = Harness::new();
    let pivot = Pos2::new(120.0, 80.0);
    let before = h.scene.view.screen_to_world(pivot);
    h.send(InputEvent::Zoom { factor: 1.1, pivot });

    let after = h.scene.view.screen_to_world(pivot);
    assert!((before - after).length() < 1e-4);
    assert!(h.history.is_empty());
}

#[test]
fn test_redo_shortcuts() {
    let mut h = Harness::with_tool(Tool::Pencil);
    h.drag(&[(0.0, 0.0), (10.0, 0.0)]);
    h.drag(&[(0.0, 10.0), (10.0, 10.0)]);

    h.key(Key::Z, Modifiers::COMMAND);
    h.key(Key::Z, Modifiers::COMMAND);
    assert!(h.scene.document.strokes().is_empty());

    h.key(Key::Z, Modifiers::COMMAND | Modifiers::SHIFT);
    assert_eq!(h.scene.document.strokes().len(), 1);
    h.key(Key::Y, Modifiers::COMMAND);
    assert_eq!(h.scene.document.strokes().len(), 2);
    assert!(!h.history.can_redo());
}

#[test]
fn test_new_stroke_after_undo_clears_redo() {
    let mut h = Harness::with_tool(Tool::Pencil);
    h.drag(&[(0.0, 0.0), (10.0, 0.0)]);
    h.key(Key::Z, Modifiers::COMMAND);
    assert!(h.history.can_redo());

    h.drag(&[(0.0, 5.0), (10.0, 5.0)]);
    assert!(!h.history.can_redo());
}

#[test]
fn test_press_outside_canvas_is_ignored() {
    let mut h = Harness::with_tool(Tool::Pencil);
    let mut location = h.location(10.0, 10.0);
    location.is_in_canvas = false;
    h.send(InputEvent::PointerDown {
        location,
        button: PointerButton::Primary,
        modifiers: Modifiers::NONE,
    });
    assert!(h.scene.interaction.is_idle());
}
