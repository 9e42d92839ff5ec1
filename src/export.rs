use crate::consts::MAX_EXPORT_BYTES;
use crate::document::Document;
use crate::error::ExportError;
use crate::image::PlacedImage;
use crate::raster::RasterSurface;
use crate::renderer::Surface;
use ::image::{DynamicImage, ImageFormat, RgbaImage};
use egui::Rect;
use log::info;
use std::io::Cursor;

fn layer_images(document: &Document, layer: usize) -> impl Iterator<Item = &PlacedImage> + '_ {
    document.images().iter().filter(move |image| image.layer == layer)
}

/// World-space area covered by the images on `layer`, rotation included
pub fn export_bounds(document: &Document, layer: usize) -> Option<Rect> {
    layer_images(document, layer)
        .map(|image| image.rotated_bounds())
        .reduce(|a, b| a.union(b))
}

/// Render the images on `layer` into a transparent raster exactly covering
/// [`export_bounds`], at one pixel per world unit. Layer visibility does not
/// matter here.
pub fn render_images(document: &Document, layer: usize) -> Result<RgbaImage, ExportError> {
    let bounds = export_bounds(document, layer).ok_or(ExportError::NothingToExport)?;
    let width = bounds.width().ceil();
    let height = bounds.height().ceil();
    if !(width >= 1.0 && height >= 1.0) {
        return Err(ExportError::EmptyBounds { width, height });
    }
    let (Some(pixel_width), Some(pixel_height)) = (pixel_extent(width), pixel_extent(height)) else {
        return Err(ExportError::TooLarge { width, height });
    };
    let fits = pixel_width
        .checked_mul(pixel_height)
        .and_then(|pixels| pixels.checked_mul(4))
        .is_some_and(|bytes| bytes <= MAX_EXPORT_BYTES);
    if !fits {
        return Err(ExportError::TooLarge { width, height });
    }

    let mut surface = RasterSurface::new(pixel_width as u32, pixel_height as u32, bounds.min, 1.0);
    for image in layer_images(document, layer) {
        surface.draw_image(image);
    }
    Ok(surface.into_image())
}

fn pixel_extent(size: f32) -> Option<u64> {
    (size.is_finite() && size <= u32::MAX as f32).then_some(size as u64)
}

/// PNG-encoded rendering of the images on `layer`
pub fn export_png(document: &Document, layer: usize) -> Result<Vec<u8>, ExportError> {
    let pixels = render_images(document, layer)?;
    let (width, height) = pixels.dimensions();

    let mut bytes = Vec::new();
    DynamicImage::ImageRgba8(pixels).write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    info!("Exported {width}x{height} PNG ({} bytes)", bytes.len());
    Ok(bytes)
}
