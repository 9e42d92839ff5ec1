use crate::export::export_png;
use crate::file_handler::FileHandler;
use crate::gestures::Gestures;
use crate::history::{History, Playback};
use crate::image::PlacedImage;
use crate::input::{InputEvent, InputHandler};
use crate::panels::tools_panel;
use crate::renderer::{Renderer, Surface};
use crate::state::{Scene, load_drawing, save_drawing};
use crate::texture_manager::TextureManager;
use crate::tools::ToolSettings;
use crate::util::time;
use crate::view::ViewTransform;
use egui::{Color32, Pos2, Rect, Shape};
use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

const TEXTURE_CACHE_SIZE: usize = 64;

pub struct PaintApp {
    pub(crate) scene: Scene,
    pub(crate) history: History,
    pub(crate) playback: Playback,
    /// Last `(frame, total)` reported by playback
    pub(crate) playback_progress: Rc<Cell<(usize, usize)>>,
    pub(crate) status: Option<String>,
    gestures: Gestures,
    input_handler: InputHandler,
    file_handler: FileHandler,
    texture_manager: TextureManager,
    renderer: Renderer,
}

impl Default for PaintApp {
    fn default() -> Self {
        Self {
            scene: Scene::new(),
            history: History::new(),
            playback: Playback::new(),
            playback_progress: Rc::new(Cell::new((0, 0))),
            status: None,
            gestures: Gestures::new(),
            input_handler: InputHandler::new(),
            file_handler: FileHandler::new(),
            texture_manager: TextureManager::new(TEXTURE_CACHE_SIZE),
            renderer: Renderer::new(),
        }
    }
}

impl PaintApp {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let mut app = Self::default();
        if let Some(storage) = cc.storage {
            let settings: ToolSettings = eframe::get_value(storage, eframe::APP_KEY).unwrap_or_default();
            app.scene.settings = settings;
            load_drawing(&mut app.scene, storage);
        }
        app
    }

    // Undo and redo act on the live scene, never on a frame under review

    pub fn undo(&mut self) {
        if !self.playback.is_reviewing() {
            self.history.undo(&mut self.scene);
        }
    }

    pub fn redo(&mut self) {
        if !self.playback.is_reviewing() {
            self.history.redo(&mut self.scene);
        }
    }

    pub fn play(&mut self) {
        let progress = Rc::clone(&self.playback_progress);
        self.playback.play(time::now_secs(), &self.scene, move |frame, total| {
            progress.set((frame, total))
        });
    }

    /// Leave playback or scrubbing and return to the live drawing
    pub fn stop_playback(&mut self) {
        self.playback.stop(&mut self.scene);
    }

    pub fn export(&mut self) {
        let message = match export_png(&self.scene.document, self.scene.layers.active_index()) {
            Ok(bytes) => write_export(&bytes),
            Err(err) => {
                log::warn!("Export failed: {err}");
                format!("Export failed: {err}")
            }
        };
        self.status = Some(message);
    }

    fn receive_images(&mut self) {
        for result in self.file_handler.drain_completed() {
            match result {
                Ok(loaded) => {
                    log::info!(
                        "Loaded image {} ({}x{})",
                        loaded.name,
                        loaded.size.x,
                        loaded.size.y
                    );
                    self.gestures
                        .insert_image(loaded.into_placed(), &mut self.scene, &mut self.history);
                }
                Err(err) => {
                    log::warn!("Failed to load dropped file: {err}");
                    self.status = Some(err.to_string());
                }
            }
        }
    }

    fn canvas_ui(&mut self, ui: &mut egui::Ui) {
        let (response, painter) = ui.allocate_painter(ui.available_size(), egui::Sense::click_and_drag());
        let rect = response.rect;

        let events = self.input_handler.process_input(ui.ctx(), rect, &self.scene.view);
        let typing = ui.ctx().wants_keyboard_input();
        for event in &events {
            let is_key = matches!(event, InputEvent::KeyDown { .. } | InputEvent::KeyUp { .. });
            if (is_key && typing) || self.playback.is_reviewing() {
                continue;
            }
            self.gestures.handle(event, &mut self.scene, &mut self.history);
        }

        self.texture_manager.begin_frame();
        self.texture_manager.retain_images(self.scene.document.images());
        let mut surface = PainterSurface {
            painter: &painter,
            canvas: rect,
            view: self.scene.view,
            textures: &mut self.texture_manager,
        };
        self.renderer.paint(&self.scene, &mut surface);
    }
}

impl eframe::App for PaintApp {
    /// Called by the frame work to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, eframe::APP_KEY, &self.scene.settings);
        if let Err(err) = save_drawing(&self.scene, storage) {
            log::error!("Failed to save drawing: {err}");
        }
    }

    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.file_handler.check_for_dropped_files(ctx);
        self.receive_images();

        let now = time::now_secs();
        self.playback.poll(now, &self.history, &mut self.scene);
        if let Some(wait) = self.playback.time_until_tick(now) {
            ctx.request_repaint_after(Duration::from_secs_f64(wait));
        }

        tools_panel(self, ctx);

        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| self.canvas_ui(ui));

        self.file_handler.preview_files_being_dropped(ctx);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn write_export(bytes: &[u8]) -> String {
    let path = "drawing-export.png";
    match std::fs::write(path, bytes) {
        Ok(()) => format!("Exported to {path}"),
        Err(err) => {
            log::error!("Failed to write {path}: {err}");
            format!("Failed to write {path}: {err}")
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn write_export(bytes: &[u8]) -> String {
    format!("Rendered {} bytes; saving files is not supported on the web", bytes.len())
}

/// [`Surface`] over an egui painter clipped to the canvas
struct PainterSurface<'a> {
    painter: &'a egui::Painter,
    canvas: Rect,
    view: ViewTransform,
    textures: &'a mut TextureManager,
}

impl PainterSurface<'_> {
    fn to_screen(&self, world: Pos2) -> Pos2 {
        self.canvas.min + self.view.world_to_screen(world).to_vec2()
    }

    fn stroke(&self, width: f32, color: Color32) -> egui::Stroke {
        egui::Stroke::new(width * self.view.zoom, color)
    }
}

impl Surface for PainterSurface<'_> {
    fn clear(&mut self, color: Color32) {
        self.painter.rect_filled(self.canvas, 0.0, color);
    }

    fn visible_rect(&self) -> Rect {
        Rect::from_min_max(
            self.view.screen_to_world(Pos2::ZERO),
            self.view.screen_to_world(self.canvas.size().to_pos2()),
        )
    }

    fn pixel_size(&self) -> f32 {
        1.0 / self.view.zoom
    }

    fn fill_rect(&mut self, rect: Rect, color: Color32) {
        let screen = Rect::from_min_max(self.to_screen(rect.min), self.to_screen(rect.max));
        self.painter.rect_filled(screen, 0.0, color);
    }

    fn draw_line(&mut self, from: Pos2, to: Pos2, width: f32, color: Color32) {
        let (a, b) = (self.to_screen(from), self.to_screen(to));
        if a == b {
            self.painter.circle_filled(a, width * self.view.zoom / 2.0, color);
        } else {
            self.painter.line_segment([a, b], self.stroke(width, color));
        }
    }

    fn draw_polyline(&mut self, points: &[Pos2], width: f32, color: Color32) {
        let screen: Vec<Pos2> = points.iter().map(|p| self.to_screen(*p)).collect();
        let radius = width * self.view.zoom / 2.0;
        // Round the joints the way a canvas line with round caps would look
        for point in &screen {
            self.painter.circle_filled(*point, radius, color);
        }
        self.painter.add(Shape::line(screen, self.stroke(width, color)));
    }

    fn draw_image(&mut self, image: &PlacedImage) {
        let texture = match self.textures.get_or_create_texture(image, self.painter.ctx()) {
            Ok(texture) => texture,
            Err(err) => {
                log::warn!("Cannot draw image {:?}: {err}", image.id);
                return;
            }
        };
        let rect = Rect::from_min_max(
            self.to_screen(Pos2::new(image.x, image.y)),
            self.to_screen(Pos2::new(image.x + image.width, image.y + image.height)),
        );
        let uv = Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0));
        let mut mesh = egui::Mesh::with_texture(texture);
        mesh.add_rect_with_uv(rect, uv, Color32::WHITE);
        mesh.rotate(egui::emath::Rot2::from_angle(image.rotation), rect.center());
        self.painter.add(Shape::mesh(mesh));
    }

    fn read_pixel(&self, _pos: Pos2) -> Option<Color32> {
        // GPU output is not readable; picking renders through a raster surface
        None
    }
}

impl std::fmt::Debug for PaintApp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaintApp")
            .field("scene", &self.scene)
            .field("history_len", &self.history.len())
            .field("playback", &self.playback)
            .finish()
    }
}
