use thiserror::Error;

/// Errors that can occur while writing the drawing to a blob store
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("Failed to serialize drawing: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Errors that can occur while exporting placed images to an encoded raster
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("No images to export")]
    NothingToExport,

    #[error("Export bounds are empty: {width}x{height}")]
    EmptyBounds { width: f32, height: f32 },

    #[error("Export area is too large: {width}x{height}")]
    TooLarge { width: f32, height: f32 },

    #[error("Failed to encode image: {0}")]
    EncodeFailed(#[from] ::image::ImageError),
}

/// Errors that can occur while turning an uploaded file into a placed image
#[derive(Debug, Error)]
pub enum ImageLoadError {
    #[error("Not an image file: {0}")]
    Unsupported(String),

    #[error("Failed to read {name}: {source}")]
    ReadFailed {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to decode {name}: {source}")]
    DecodeFailed {
        name: String,
        #[source]
        source: ::image::ImageError,
    },

    #[error("Dropped file has no accessible data: {0}")]
    NoData(String),
}
