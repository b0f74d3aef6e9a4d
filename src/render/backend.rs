use std::collections::BTreeSet;

use crate::foundation::error::{MediaError, MediaResult};

/// Opaque handle to a texture living on the GPU-owning thread.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TextureId(pub u64);

/// GPU side of texture lifetime.
///
/// Implementations are owned by the thread that owns the GPU context. [`crate::Image`] never
/// talks to a backend directly; uploads go through [`crate::TextureManager`], and deletions are
/// deferred through its [`crate::DeletionQueue`].
pub trait TextureBackend {
    /// Allocate a texture and upload tightly packed RGBA8 pixels into it.
    fn create_texture(&mut self, width: u32, height: u32, rgba: &[u8]) -> MediaResult<TextureId>;

    /// Release a texture previously returned by [`TextureBackend::create_texture`].
    fn delete_texture(&mut self, id: TextureId);
}

/// Backend that hands out ids without touching a GPU.
///
/// Useful for tools and tests that need the texture bookkeeping but no device; it records what
/// is live so leaks and double frees are observable.
#[derive(Debug, Default)]
pub struct HeadlessBackend {
    next_id: u64,
    live: BTreeSet<TextureId>,
    created: u64,
    deleted: u64,
}

impl HeadlessBackend {
    /// Create an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of textures created so far.
    pub fn created(&self) -> u64 {
        self.created
    }

    /// Number of textures deleted so far.
    pub fn deleted(&self) -> u64 {
        self.deleted
    }

    /// Number of textures currently alive.
    pub fn live_textures(&self) -> usize {
        self.live.len()
    }

    /// Return `true` when `id` was created and not yet deleted.
    pub fn is_live(&self, id: TextureId) -> bool {
        self.live.contains(&id)
    }
}

impl TextureBackend for HeadlessBackend {
    fn create_texture(&mut self, width: u32, height: u32, rgba: &[u8]) -> MediaResult<TextureId> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|px| px.checked_mul(4))
            .ok_or_else(|| MediaError::validation("texture dimensions overflow"))?;
        if width == 0 || height == 0 || rgba.len() != expected {
            return Err(MediaError::validation(format!(
                "texture upload expects {width}x{height} rgba8 ({expected} bytes), got {} bytes",
                rgba.len()
            )));
        }

        // 0 is reserved, as in GL.
        self.next_id += 1;
        let id = TextureId(self.next_id);
        self.live.insert(id);
        self.created += 1;
        Ok(id)
    }

    fn delete_texture(&mut self, id: TextureId) {
        if self.live.remove(&id) {
            self.deleted += 1;
        } else {
            tracing::warn!(texture = id.0, "delete of unknown texture");
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/backend.rs"]
mod tests;
