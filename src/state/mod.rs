mod persistence;
mod scene;

pub use persistence::{
    BlobStore, MemoryStore, PersistenceResult, SavedDrawing, load_drawing, save_drawing,
};
pub use scene::{Interaction, Scene};
