use std::path::PathBuf;
use std::{error, fmt, io};

/// Everything that can stop a map from loading.
#[derive(Debug)]
pub enum MapError {
    /// The map or an external tileset could not be read.
    Io {
        /// File that failed to open.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
    /// The document is not valid JSON or a required field is missing / mistyped.
    Json {
        /// Document that failed to parse.
        path: PathBuf,
        /// Underlying serde error (names the field, line and column).
        source: serde_json::Error,
    },
    /// A tile layer's `data` length does not match `width * height`.
    InvalidLayerSize {
        /// Layer name as declared in the document.
        layer: String,
        /// `width * height`.
        expected: usize,
        /// Actual number of cells.
        actual: usize,
    },
    /// A collision object declares itself an ellipse but lacks a bounding box.
    MalformedShape {
        /// Tileset index in document order.
        tileset: usize,
        /// Tileset-local tile id.
        tile: u32,
        /// Object index inside the tile's object group.
        object: usize,
        /// Missing field.
        field: &'static str,
    },
    /// A tile id that pushes its global id past `u32::MAX`.
    TileIdOverflow {
        /// Tileset index in document order.
        tileset: usize,
        /// Tileset-local tile id.
        tile: u32,
    },
    /// A tile layer whose `width * height` does not fit in memory addressing.
    LayerTooLarge {
        layer: String,
        width: usize,
        height: usize,
    },
    /// External tileset reference that is not a JSON tileset.
    UnsupportedTileset {
        /// The `source` value as written in the map.
        path: String,
    },
}

impl fmt::Display for MapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapError::Io { path, source } => {
                write!(f, "Unable to open {}: {}", path.display(), source)
            }
            MapError::Json { path, source } => {
                write!(f, "Malformed map document {}: {}", path.display(), source)
            }
            MapError::InvalidLayerSize {
                layer,
                expected,
                actual,
            } => write!(
                f,
                "Invalid layer size for layer '{}': expected {} cells, found {}",
                layer, expected, actual
            ),
            MapError::MalformedShape {
                tileset,
                tile,
                object,
                field,
            } => write!(
                f,
                "Tileset #{} tile {} object #{}: ellipse is missing '{}'",
                tileset, tile, object, field
            ),
            MapError::TileIdOverflow { tileset, tile } => write!(
                f,
                "Tileset #{} tile {}: global tile id out of range",
                tileset, tile
            ),
            MapError::LayerTooLarge {
                layer,
                width,
                height,
            } => write!(f, "Layer '{}' is too large: {}x{}", layer, width, height),
            MapError::UnsupportedTileset { path } => {
                write!(f, "External tileset must be JSON: {}", path)
            }
        }
    }
}

impl error::Error for MapError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            MapError::Io { source, .. } => Some(source),
            MapError::Json { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl MapError {
    /// True for the "file is not there" category, as opposed to a broken document.
    pub fn is_missing_file(&self) -> bool {
        matches!(self, MapError::Io { .. })
    }
}
