//! Level data model
//!
//! Deserializes the parts of a Tiled JSON map that collision geometry is built
//! from: layers, the objects of object layers, and their custom properties.

mod map;
mod properties;

pub use map::{LayerType, MapLayer, MapObject, MapPoint, ObjectKind, TileMap};
pub use properties::{ShapeProperties, Side};

use thiserror::Error;

/// Errors raised while loading level data
#[derive(Error, Debug)]
pub enum LevelError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The document is not a valid map
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
}
