//! Resolving a bone's `image_path` to pixels.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use image::RgbaImage;

/// Source of drawable images for bone attachments.
pub trait AssetLoader {
    /// The decoded image for `path`, or `None` when it cannot be loaded.
    fn load(&mut self, path: &str) -> Option<&RgbaImage>;
}

/// Loader that never returns an image; attachments are skipped.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoAssets;

impl AssetLoader for NoAssets {
    fn load(&mut self, _path: &str) -> Option<&RgbaImage> {
        None
    }
}

/// Filesystem loader with a per-path cache. Relative paths resolve against
/// `root` when one is set. Failures are logged once and remembered.
#[derive(Debug, Default)]
pub struct FsAssetLoader {
    root: Option<PathBuf>,
    cache: HashMap<String, Option<RgbaImage>>,
}

fn resolve(root: Option<&Path>, path: &str) -> PathBuf {
    let p = Path::new(path);
    match root {
        Some(root) if p.is_relative() => root.join(p),
        _ => p.to_path_buf(),
    }
}

impl FsAssetLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
            cache: HashMap::new(),
        }
    }

    /// Pre-seed the cache, e.g. with an image already decoded by a front-end.
    pub fn insert(&mut self, path: impl Into<String>, image: RgbaImage) {
        self.cache.insert(path.into(), Some(image));
    }

    pub fn cached(&self) -> usize {
        self.cache.len()
    }
}

impl AssetLoader for FsAssetLoader {
    fn load(&mut self, path: &str) -> Option<&RgbaImage> {
        let root = self.root.as_deref();
        self.cache
            .entry(path.to_owned())
            .or_insert_with(|| {
                let full = resolve(root, path);
                match image::open(&full) {
                    Ok(img) => Some(img.to_rgba8()),
                    Err(e) => {
                        log::warn!("could not load image {}: {e}", full.display());
                        None
                    }
                }
            })
            .as_ref()
    }
}
