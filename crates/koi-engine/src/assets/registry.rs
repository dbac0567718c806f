use std::collections::HashMap;

use crate::assets::manifest::{ManifestError, SpriteManifest};
use crate::core::pixmap::Pixmap;

/// Registry of named pixmaps, built from a SpriteManifest or populated
/// directly. This is the "load image by logical name" seam game code leans
/// on when assigning entity images.
pub struct PixmapRegistry {
    pixmaps: HashMap<String, Pixmap>,
}

impl PixmapRegistry {
    pub fn new() -> Self {
        Self {
            pixmaps: HashMap::new(),
        }
    }

    /// Decode every sprite in a manifest. Fails fast on the first invalid
    /// palette entry or grid.
    pub fn from_manifest(manifest: &SpriteManifest) -> Result<Self, ManifestError> {
        let palette = manifest.decode_palette()?;
        let mut pixmaps = HashMap::with_capacity(manifest.sprites.len());
        for (name, grid) in &manifest.sprites {
            let pixmap = manifest.decode_sprite(name, grid, &palette)?;
            pixmaps.insert(name.clone(), pixmap);
        }
        Ok(Self { pixmaps })
    }

    /// Register a pixmap under a name, replacing any previous holder.
    pub fn insert(&mut self, name: impl Into<String>, pixmap: Pixmap) {
        let name = name.into();
        if self.pixmaps.insert(name.clone(), pixmap).is_some() {
            log::warn!("pixmap {name:?} was replaced in the registry");
        }
    }

    /// Look up a pixmap by name. Returns None if not found.
    pub fn get(&self, name: &str) -> Option<&Pixmap> {
        self.pixmaps.get(name)
    }

    pub fn len(&self) -> usize {
        self.pixmaps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pixmaps.is_empty()
    }
}

impl Default for PixmapRegistry {
    fn default() -> Self {
        Self::new()
    }
}
