//! Session-owned texture cache.

use macroquad::prelude::*;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Index of a texture inside a [`TextureCache`]. Stable for the cache's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(pub u32);

/// Result of a successful load.
#[derive(Clone)]
pub struct LoadedTexture {
    /// GPU handle. `None` when the loader only measures images (tests, tooling).
    pub texture: Option<Texture2D>,
    /// Pixel width.
    pub width: u32,
    /// Pixel height.
    pub height: u32,
}

/// Turns a file path into a texture. Returns `None` on any failure.
pub trait TextureLoader {
    /// Loads the image at `path`.
    fn load(&mut self, path: &Path) -> Option<LoadedTexture>;
}

/// Reads the file, decodes it and uploads it with nearest filtering.
///
/// Needs a live macroquad context.
pub struct GpuTextureLoader;

impl TextureLoader for GpuTextureLoader {
    fn load(&mut self, path: &Path) -> Option<LoadedTexture> {
        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(err) => {
                log::warn!("Texture {} not readable: {}", path.display(), err);
                return None;
            }
        };
        let image = match Image::from_file_with_format(&bytes, None) {
            Ok(image) => image,
            Err(err) => {
                log::warn!("Texture {} not decodable: {}", path.display(), err);
                return None;
            }
        };

        let tex = Texture2D::from_image(&image);
        tex.set_filter(FilterMode::Nearest);
        Some(LoadedTexture {
            texture: Some(tex),
            width: image.width() as u32,
            height: image.height() as u32,
        })
    }
}

/// One cache slot. Failed loads are cached too, as invalid entries.
pub struct TextureEntry {
    /// Path the texture was requested with.
    pub path: PathBuf,
    loaded: Option<LoadedTexture>,
}

impl TextureEntry {
    /// True if the load succeeded.
    pub fn is_valid(&self) -> bool {
        self.loaded.is_some()
    }

    /// GPU handle, if the load succeeded and produced one.
    pub fn texture(&self) -> Option<&Texture2D> {
        self.loaded.as_ref().and_then(|l| l.texture.as_ref())
    }

    /// Pixel size, `(0, 0)` for invalid entries.
    pub fn size(&self) -> (u32, u32) {
        self.loaded
            .as_ref()
            .map(|l| (l.width, l.height))
            .unwrap_or((0, 0))
    }
}

/// Path-keyed texture store. One load per unique path.
///
/// Owned by the game session; [`TextureCache::teardown`] consumes it so it
/// cannot be touched after the textures are released.
pub struct TextureCache {
    loader: Box<dyn TextureLoader>,
    entries: Vec<TextureEntry>,
    by_path: HashMap<PathBuf, TextureId>,
}

impl TextureCache {
    /// Creates an empty cache that loads through `loader`.
    pub fn new(loader: impl TextureLoader + 'static) -> Self {
        TextureCache {
            loader: Box::new(loader),
            entries: Vec::new(),
            by_path: HashMap::new(),
        }
    }

    /// Returns the cached id for `path`, loading it on first request.
    pub fn load(&mut self, path: impl AsRef<Path>) -> TextureId {
        let path = path.as_ref();
        if let Some(&id) = self.by_path.get(path) {
            return id;
        }

        let loaded = if path.as_os_str().is_empty() {
            None
        } else {
            self.loader.load(path)
        };
        if loaded.is_none() {
            log::warn!("Missing texture: {}", path.display());
        }

        let id = TextureId(self.entries.len() as u32);
        self.entries.push(TextureEntry {
            path: path.to_path_buf(),
            loaded,
        });
        self.by_path.insert(path.to_path_buf(), id);
        id
    }

    /// Entry for `id`. Ids always come from this cache, so this never misses.
    pub fn get(&self, id: TextureId) -> &TextureEntry {
        &self.entries[id.0 as usize]
    }

    /// True if `id` refers to a successfully loaded texture.
    pub fn is_valid(&self, id: TextureId) -> bool {
        self.get(id).is_valid()
    }

    /// Pixel size of `id`, `(0, 0)` when invalid.
    pub fn size(&self, id: TextureId) -> (u32, u32) {
        self.get(id).size()
    }

    /// GPU handle for `id`, if any.
    pub fn texture(&self, id: TextureId) -> Option<&Texture2D> {
        self.get(id).texture()
    }

    /// Number of unique paths requested so far.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if nothing has been requested yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Releases every texture at once.
    pub fn teardown(self) {
        let valid = self.entries.iter().filter(|e| e.is_valid()).count();
        log::info!(
            "Releasing {} textures ({} failed loads)",
            valid,
            self.entries.len() - valid
        );
    }
}
