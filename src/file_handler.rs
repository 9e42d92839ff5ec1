use crate::consts::DEFAULT_IMAGE_OFFSET;
use crate::error::ImageLoadError;
use crate::image::{ImageSource, PlacedImage};
use egui::{Pos2, Vec2};
use futures::channel::mpsc::{UnboundedReceiver, UnboundedSender, unbounded};

/// A dropped file that decoded successfully
#[derive(Debug, Clone)]
pub struct LoadedImage {
    pub name: String,
    pub source: ImageSource,
    pub size: Vec2,
}

impl LoadedImage {
    /// Place at the default offset with the decoded pixel size
    pub fn into_placed(self) -> PlacedImage {
        PlacedImage::new(
            self.source,
            Pos2::new(DEFAULT_IMAGE_OFFSET, DEFAULT_IMAGE_OFFSET),
            self.size,
        )
    }
}

pub type LoadResult = Result<LoadedImage, ImageLoadError>;

/// Decodes dropped image files off the UI thread and hands the results back
/// through a channel that is drained once per frame.
pub struct FileHandler {
    sender: UnboundedSender<LoadResult>,
    receiver: UnboundedReceiver<LoadResult>,
}

impl Default for FileHandler {
    fn default() -> Self {
        let (sender, receiver) = unbounded();
        Self { sender, receiver }
    }
}

impl FileHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start decoding any files dropped onto the window this frame
    pub fn check_for_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        for file in dropped {
            self.load(file, ctx.clone());
        }
    }

    fn load(&self, file: egui::DroppedFile, ctx: egui::Context) {
        let sender = self.sender.clone();
        let task = move || {
            let result = read_dropped_file(&file);
            // The receiver only goes away with the app itself
            let _ = sender.unbounded_send(result);
            ctx.request_repaint();
        };

        #[cfg(not(target_arch = "wasm32"))]
        std::thread::spawn(task);

        // No threads on the web; decode on the next turn of the event loop
        #[cfg(target_arch = "wasm32")]
        wasm_bindgen_futures::spawn_local(async move { task() });
    }

    /// Completed loads, successful or not, in completion order
    pub fn drain_completed(&mut self) -> Vec<LoadResult> {
        let mut completed = Vec::new();
        while let Ok(result) = self.receiver.try_recv() {
            completed.push(result);
        }
        completed
    }

    /// Preview files being dragged over the application
    pub fn preview_files_being_dropped(&self, ctx: &egui::Context) {
        use egui::{Align2, Color32, FontId, Id, LayerId, Order};

        if ctx.input(|i| i.raw.hovered_files.is_empty()) {
            return;
        }

        let text = ctx.input(|i| {
            let mut text = "Dropping images:\n".to_owned();
            for file in &i.raw.hovered_files {
                if let Some(path) = &file.path {
                    text += &format!("\n{}", path.display());
                } else if !file.mime.is_empty() {
                    text += &format!("\n{}", file.mime);
                }
            }
            text
        });

        let painter = ctx.layer_painter(LayerId::new(Order::Foreground, Id::new("file_drop_target")));
        let screen_rect = ctx.screen_rect();
        painter.rect_filled(screen_rect, 0.0, Color32::from_black_alpha(192));
        painter.text(
            screen_rect.center(),
            Align2::CENTER_CENTER,
            text,
            FontId::proportional(20.0),
            Color32::WHITE,
        );
    }
}

fn file_name(file: &egui::DroppedFile) -> String {
    if let Some(path) = &file.path {
        path.display().to_string()
    } else if !file.name.is_empty() {
        file.name.clone()
    } else {
        "unknown".to_owned()
    }
}

/// Check if a file is an image based on MIME type or extension
fn is_image_file(file: &egui::DroppedFile) -> bool {
    if !file.mime.is_empty() {
        return file.mime.starts_with("image/");
    }
    let path = file
        .path
        .as_ref()
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_else(|| file.name.clone());
    let ext = path.rsplit('.').next().unwrap_or_default().to_lowercase();
    matches!(ext.as_str(), "png" | "jpg" | "jpeg" | "gif" | "webp" | "bmp")
}

fn read_dropped_file(file: &egui::DroppedFile) -> LoadResult {
    let name = file_name(file);
    if !is_image_file(file) {
        return Err(ImageLoadError::Unsupported(name));
    }

    let bytes = if let Some(bytes) = &file.bytes {
        bytes.to_vec()
    } else {
        read_path(file, &name)?
    };
    decode(name, bytes)
}

#[cfg(not(target_arch = "wasm32"))]
fn read_path(file: &egui::DroppedFile, name: &str) -> Result<Vec<u8>, ImageLoadError> {
    let Some(path) = &file.path else {
        return Err(ImageLoadError::NoData(name.to_owned()));
    };
    std::fs::read(path).map_err(|source| ImageLoadError::ReadFailed {
        name: name.to_owned(),
        source,
    })
}

// Browsers only hand over bytes, never paths
#[cfg(target_arch = "wasm32")]
fn read_path(_file: &egui::DroppedFile, name: &str) -> Result<Vec<u8>, ImageLoadError> {
    Err(ImageLoadError::NoData(name.to_owned()))
}

/// Decode once to learn the pixel size; the encoded bytes are what gets kept
pub fn decode(name: String, bytes: Vec<u8>) -> LoadResult {
    let source = ImageSource::new(bytes);
    match source.decode() {
        Ok(pixels) => Ok(LoadedImage {
            name,
            size: Vec2::new(pixels.width() as f32, pixels.height() as f32),
            source,
        }),
        Err(source) => Err(ImageLoadError::DecodeFailed { name, source }),
    }
}
