//! Texture-by-name lookup for compositor inputs.
//!
//! Loading and caching policy belongs to the asset provider; the pipeline only
//! requires "a valid bound handle, possibly updated later". Until a named
//! texture is inserted, lookups resolve to a neutral placeholder so no frame
//! is ever skipped or blocked on a pending load.

use std::collections::HashMap;

use crate::gpu::GpuContext;
use crate::texture::Texture;

/// A registry of named textures with a placeholder fallback.
pub struct AssetLibrary {
    textures: HashMap<String, Texture>,
    placeholder: Texture,
}

impl AssetLibrary {
    pub fn new(gpu: &GpuContext) -> Self {
        Self {
            textures: HashMap::new(),
            placeholder: Texture::placeholder(gpu),
        }
    }

    /// Insert or replace a texture under `name`.
    ///
    /// Call this when an asynchronous load resolves; the next frame samples
    /// the real texture instead of the placeholder.
    pub fn insert(&mut self, name: impl Into<String>, texture: Texture) {
        let name = name.into();
        log::debug!("asset `{name}` resolved ({}x{})", texture.width, texture.height);
        self.textures.insert(name, texture);
    }

    /// Look up a texture by name, falling back to the placeholder while the
    /// asset is still loading.
    pub fn texture(&self, name: &str) -> &Texture {
        match self.textures.get(name) {
            Some(texture) => texture,
            None => {
                log::warn!("asset `{name}` not resolved yet, using placeholder");
                &self.placeholder
            }
        }
    }

    /// Whether a named texture has resolved.
    pub fn contains(&self, name: &str) -> bool {
        self.textures.contains_key(name)
    }
}
