use egui::{Color32, Pos2, Rect, Vec2};
use proptest::prelude::*;
use symmetry_paint::grid::CellCoord;
use symmetry_paint::image::{ImageSource, PlacedImage};
use symmetry_paint::selection::SelectionEntry;
use symmetry_paint::stroke::StrokePoint;
use symmetry_paint::view::ViewTransform;
use symmetry_paint::Scene;

fn populated_scene() -> Scene {
    let mut scene = Scene::new();
    for x in 0..5 {
        scene.set_or_create_grid_cell(CellCoord::new(x * 20, 0), Color32::RED);
    }
    scene.begin_stroke(StrokePoint::new(Pos2::new(0.0, 50.0), 2.0, Color32::BLACK));
    scene.append_to_stroke(StrokePoint::new(Pos2::new(40.0, 60.0), 2.0, Color32::BLACK));
    scene.commit_stroke();
    scene.add_image(PlacedImage::new(
        ImageSource::new(Vec::new()),
        Pos2::new(200.0, 200.0),
        Vec2::new(50.0, 50.0),
    ));
    scene
}

fn assert_selection_is_live(scene: &Scene) {
    for entry in scene.selection.entries() {
        assert!(scene.document.contains(entry), "dangling selection entry {entry:?}");
    }
}

#[test]
fn test_delete_selected_leaves_no_dangling_entries() {
    let mut scene = populated_scene();
    let everything = scene.rect_select(Rect::from_min_max(Pos2::new(-10.0, -10.0), Pos2::new(300.0, 300.0)));
    assert_eq!(everything.len(), 7);
    scene.set_selection(everything);

    assert_eq!(scene.delete_selected(), 7);
    assert!(scene.selection.is_empty());
    assert!(scene.document.is_empty());
}

#[test]
fn test_set_selection_drops_missing_entries() {
    let mut scene = populated_scene();
    scene.set_selection([
        SelectionEntry::Cell(CellCoord::new(0, 0)),
        SelectionEntry::Cell(CellCoord::new(999, 999)),
    ]);
    assert_eq!(scene.selection.len(), 1);
    assert_selection_is_live(&scene);
}

#[test]
fn test_erasing_selected_cells_prunes_selection() {
    let mut scene = populated_scene();
    scene.set_selection((0..5).map(|x| SelectionEntry::Cell(CellCoord::new(x * 20, 0))));

    scene.remove_grid_cell(CellCoord::new(40, 0));
    assert_eq!(scene.selection.len(), 4);
    assert_selection_is_live(&scene);

    scene.erase_at(Pos2::new(5.0, 5.0));
    assert_selection_is_live(&scene);
}

#[test]
fn test_removing_selected_image_prunes_selection() {
    let mut scene = populated_scene();
    let id = scene.document.images()[0].id;
    scene.set_selection([SelectionEntry::Image(id)]);

    assert!(scene.remove_image(id).is_some());
    assert!(scene.selection.is_empty());
}

#[test]
fn test_moving_selection_carries_strokes_and_images() {
    let mut scene = populated_scene();
    let stroke_id = scene.document.strokes()[0].id();
    let image_id = scene.document.images()[0].id;
    scene.set_selection([SelectionEntry::Stroke(stroke_id), SelectionEntry::Image(image_id)]);

    scene.translate_selection(Vec2::new(5.0, -5.0));
    let stroke = scene.document.stroke(stroke_id).unwrap();
    assert_eq!(stroke.points()[0].pos(), Pos2::new(5.0, 45.0));
    let image = scene.document.image(image_id).unwrap();
    assert_eq!((image.x, image.y), (205.0, 195.0));
}

#[test]
fn test_moved_cells_overwrite_destination() {
    let mut scene = populated_scene();
    scene.set_selection([SelectionEntry::Cell(CellCoord::new(0, 0))]);
    scene.set_or_create_grid_cell(CellCoord::new(0, 0), Color32::BLUE);

    scene.translate_selected_cells(1, 0);
    let grid = scene.document.grid();
    assert_eq!(grid.get(CellCoord::new(20, 0)), Some(Color32::BLUE));
    assert!(!grid.contains(CellCoord::new(0, 0)));
    assert_eq!(grid.len(), 4);
    assert_selection_is_live(&scene);
}

proptest! {
    #[test]
    fn test_zoom_keeps_pivot_world_point(
        zoom in 0.1f32..10.0,
        pan_x in -500.0f32..500.0,
        pan_y in -500.0f32..500.0,
        factor in 0.5f32..2.0,
        pivot_x in 0.0f32..1000.0,
        pivot_y in 0.0f32..1000.0,
    ) {
        let mut view = ViewTransform { zoom, pan: Vec2::new(pan_x, pan_y) };
        let pivot = Pos2::new(pivot_x, pivot_y);
        let before = view.screen_to_world(pivot);

        view.zoom_about(factor, pivot);
        let after = view.screen_to_world(pivot);
        let tolerance = 1e-3 * (1.0 + before.to_vec2().length());
        prop_assert!((before - after).length() <= tolerance);
    }
}
