use crate::PaintApp;
use crate::symmetry::{GridTransformMode, SymmetryMode};
use crate::tools::Tool;
use crate::util::time;
use egui::Slider;

const SYMMETRY_MODES: [(SymmetryMode, &str); 4] = [
    (SymmetryMode::Vertical, "Vertical"),
    (SymmetryMode::Horizontal, "Horizontal"),
    (SymmetryMode::Quad, "Quad"),
    (SymmetryMode::Radial, "Radial"),
];

pub fn tools_panel(app: &mut PaintApp, ctx: &egui::Context) {
    egui::SidePanel::left("tools_panel")
        .resizable(true)
        .default_width(200.0)
        .show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                tool_section(app, ui);
                ui.separator();
                symmetry_section(app, ui);
                ui.separator();
                history_section(app, ui);
                ui.separator();
                playback_section(app, ui);
                ui.separator();
                layers_section(app, ui);
                ui.separator();

                if ui.button("Export images as PNG").clicked() {
                    app.export();
                }
                if let Some(status) = &app.status {
                    ui.label(status);
                }
            });
        });
}

fn tool_section(app: &mut PaintApp, ui: &mut egui::Ui) {
    ui.heading("Tools");
    let settings = &mut app.scene.settings;

    ui.horizontal_wrapped(|ui| {
        for tool in Tool::ALL {
            if ui.selectable_label(settings.tool == tool, tool.label()).clicked() {
                log::info!("Tool selected from UI: {}", tool.label());
                settings.select_tool(tool);
            }
        }
    });

    ui.horizontal(|ui| {
        ui.label("Color:");
        egui::color_picker::color_edit_button_srgba(
            ui,
            &mut settings.color,
            egui::color_picker::Alpha::OnlyBlend,
        );
    });
    ui.add(Slider::new(&mut settings.brush_size, 1.0..=100.0).text("Brush"));
    ui.add(Slider::new(&mut settings.eraser_size, 1.0..=200.0).text("Eraser"));

    let mut grid_size = settings.grid_size;
    if ui.add(Slider::new(&mut grid_size, 2..=200).text("Grid size")).changed() {
        settings.set_grid_size(grid_size);
    }
    ui.checkbox(&mut settings.show_grid, "Show grid");
    ui.horizontal(|ui| {
        ui.label("Grid lines:");
        egui::color_picker::color_edit_button_srgba(
            ui,
            &mut settings.grid_color,
            egui::color_picker::Alpha::Opaque,
        );
        ui.label("Background:");
        egui::color_picker::color_edit_button_srgba(
            ui,
            &mut settings.background,
            egui::color_picker::Alpha::Opaque,
        );
    });

    ui.horizontal(|ui| {
        if ui.button("Zoom in").clicked() {
            let center = (ui.ctx().screen_rect().size() / 2.0).to_pos2();
            app.scene.zoom(crate::consts::ZOOM_IN_STEP, center);
        }
        if ui.button("Zoom out").clicked() {
            let center = (ui.ctx().screen_rect().size() / 2.0).to_pos2();
            app.scene.zoom(crate::consts::ZOOM_OUT_STEP, center);
        }
        ui.label(format!("{:.0}%", app.scene.view.zoom * 100.0));
    });
}

fn symmetry_section(app: &mut PaintApp, ui: &mut egui::Ui) {
    ui.heading("Symmetry");
    let symmetry = &mut app.scene.symmetry;

    ui.horizontal_wrapped(|ui| {
        for (mode, label) in SYMMETRY_MODES {
            if ui.selectable_label(symmetry.mode() == mode, label).clicked() {
                symmetry.set_mode(mode);
            }
        }
    });

    if symmetry.mode() == SymmetryMode::Radial {
        let mut rays = symmetry.ray_count();
        if ui.add(Slider::new(&mut rays, 2..=32).text("Rays")).changed() {
            symmetry.set_ray_count(rays);
        }
    }

    let mut mirror_cells = app.scene.grid_mode == GridTransformMode::Symmetric;
    if ui.checkbox(&mut mirror_cells, "Mirror grid cells").changed() {
        app.scene.grid_mode = if mirror_cells {
            GridTransformMode::Symmetric
        } else {
            GridTransformMode::Canonical
        };
    }
}

fn history_section(app: &mut PaintApp, ui: &mut egui::Ui) {
    ui.horizontal(|ui| {
        let reviewing = app.playback.is_reviewing();
        let can_undo = app.history.can_undo() && !reviewing;
        let can_redo = app.history.can_redo() && !reviewing;

        if ui.add_enabled(can_undo, egui::Button::new("Undo")).clicked() {
            app.undo();
        }
        if ui.add_enabled(can_redo, egui::Button::new("Redo")).clicked() {
            app.redo();
        }
    });
    ui.horizontal(|ui| {
        ui.label(format!("Undo stack size: {}", app.history.len()));
        ui.label(format!("Redo stack size: {}", app.history.redo_len()));
    });

    if !app.scene.selection.is_empty() {
        ui.label(format!("{} selected", app.scene.selection.len()));
    }
}

fn layers_section(app: &mut PaintApp, ui: &mut egui::Ui) {
    ui.horizontal(|ui| {
        ui.heading("Layers");
        if ui.button("Add layer").clicked() {
            let index = app.scene.layers.add();
            app.scene.set_active_layer(index);
        }
    });

    let active = app.scene.layers.active_index();
    let mut activate = None;
    let mut visibility = None;
    for (index, layer) in app.scene.layers.as_slice().iter().enumerate() {
        ui.horizontal(|ui| {
            let mut visible = layer.visible;
            if ui.checkbox(&mut visible, "").changed() {
                visibility = Some((index, visible));
            }
            if ui.selectable_label(index == active, layer.name.as_str()).clicked() {
                activate = Some(index);
            }
        });
    }
    if let Some((index, visible)) = visibility {
        app.scene.layers.set_visible(index, visible);
    }
    if let Some(index) = activate {
        app.scene.set_active_layer(index);
    }
}

fn playback_section(app: &mut PaintApp, ui: &mut egui::Ui) {
    ui.heading("Playback");
    let now = time::now_secs();
    let total = app.playback.total_frames(&app.history);

    ui.horizontal(|ui| {
        if app.playback.is_playing() {
            if ui.button("Pause").clicked() {
                app.playback.pause();
            }
        } else {
            if ui.add_enabled(total > 0, egui::Button::new("Play")).clicked() {
                app.play();
            }
            if ui
                .add_enabled(app.playback.is_reviewing(), egui::Button::new("Resume"))
                .clicked()
            {
                app.playback.resume(now);
            }
        }
        if ui
            .add_enabled(app.playback.is_reviewing(), egui::Button::new("Stop"))
            .clicked()
        {
            app.stop_playback();
        }
    });

    let mut speed = app.playback.speed();
    if ui.add(Slider::new(&mut speed, 0.25..=4.0).text("Speed")).changed() {
        app.playback.set_speed(speed, now);
    }

    if total > 0 {
        let mut frame = app.playback.current_frame().min(total - 1);
        if ui.add(Slider::new(&mut frame, 0..=total - 1).text("Frame")).changed() {
            app.playback.scrub_to(frame, &app.history, &mut app.scene);
        }
    }

    if app.playback.is_playing() {
        let (frame, total) = app.playback_progress.get();
        ui.label(format!("Frame {} / {}", frame + 1, total));
    }
}
