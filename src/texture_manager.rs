use crate::image::{ImageId, PlacedImage};
use egui::{ColorImage, Context, TextureHandle, TextureId, TextureOptions};
use std::collections::{HashMap, HashSet};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TextureGenerationError {
    #[error("Failed to decode image pixels: {0}")]
    DecodeFailed(#[from] ::image::ImageError),
    #[error("Invalid texture dimensions")]
    InvalidDimensions,
}

struct CachedTexture {
    handle: TextureHandle,
    /// Frame on which the texture was last drawn
    last_used: u64,
}

/// GPU textures for placed images, uploaded on first use and evicted least
/// recently drawn first
pub struct TextureManager {
    textures: HashMap<ImageId, CachedTexture>,
    frame: u64,
    capacity: usize,
}

impl TextureManager {
    pub fn new(capacity: usize) -> Self {
        Self {
            textures: HashMap::new(),
            frame: 0,
            capacity: capacity.max(1),
        }
    }

    /// Call once per frame before drawing
    pub fn begin_frame(&mut self) {
        self.frame += 1;
    }

    pub fn get_or_create_texture(
        &mut self,
        image: &PlacedImage,
        ctx: &Context,
    ) -> Result<TextureId, TextureGenerationError> {
        if let Some(cached) = self.textures.get_mut(&image.id) {
            cached.last_used = self.frame;
            return Ok(cached.handle.id());
        }

        let color_image = decode_color_image(image)?;
        self.make_room();
        let handle = ctx.load_texture(format!("image_{:?}", image.id), color_image, TextureOptions::LINEAR);
        let id = handle.id();
        self.textures.insert(
            image.id,
            CachedTexture {
                handle,
                last_used: self.frame,
            },
        );
        Ok(id)
    }

    /// Drop textures of images that are no longer placed
    pub fn retain_images<'a>(&mut self, live: impl IntoIterator<Item = &'a PlacedImage>) {
        let live: HashSet<ImageId> = live.into_iter().map(|image| image.id).collect();
        self.textures.retain(|id, _| live.contains(id));
    }

    /// Evict the stalest textures so one more fits
    fn make_room(&mut self) {
        while self.textures.len() >= self.capacity {
            let stalest = self
                .textures
                .iter()
                .min_by_key(|(_, cached)| cached.last_used)
                .map(|(id, _)| *id);
            match stalest {
                Some(id) => {
                    self.textures.remove(&id);
                }
                None => break,
            }
        }
    }

    pub fn cache_size(&self) -> usize {
        self.textures.len()
    }
}

impl std::fmt::Debug for TextureManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextureManager")
            .field("cached", &self.textures.len())
            .field("capacity", &self.capacity)
            .finish()
    }
}

fn decode_color_image(image: &PlacedImage) -> Result<ColorImage, TextureGenerationError> {
    let rgba = image.source.decode()?;
    let size = [rgba.width() as usize, rgba.height() as usize];
    if size[0] == 0 || size[1] == 0 {
        return Err(TextureGenerationError::InvalidDimensions);
    }
    Ok(ColorImage::from_rgba_unmultiplied(size, rgba.as_raw()))
}
