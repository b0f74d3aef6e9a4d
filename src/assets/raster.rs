use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::foundation::error::{MediaError, MediaResult};
use crate::render::backend::{TextureBackend, TextureId};
use crate::render::texture::{TextureLease, TextureManager};

struct SharedPixels {
    rgba: Vec<u8>,
    // At most one texture per pixel buffer; every clone of the image sees the same slot.
    texture: Mutex<Option<TextureLease>>,
}

impl SharedPixels {
    fn texture_slot(&self) -> MutexGuard<'_, Option<TextureLease>> {
        self.texture.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Decoded RGBA8 raster with shared pixels and lazily uploaded GPU texture.
///
/// Cloning is cheap: clones share the pixel buffer and its texture. The buffer is released with
/// the last clone, and the texture is then queued on the [`crate::DeletionQueue`] of the manager
/// that created it; it is freed on that manager's next
/// [`delete_pending`](crate::TextureManager::delete_pending).
///
/// The default value is the empty image (`0x0`, no pixels), which decoders return on failure.
#[derive(Clone, Default)]
pub struct Image {
    width: u32,
    height: u32,
    shared: Option<Arc<SharedPixels>>,
}

impl Image {
    /// The empty sentinel image.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Wrap a tightly packed RGBA8 buffer of `width * height * 4` bytes.
    ///
    /// Zero dimensions produce the empty image only when the buffer is empty too.
    pub fn from_rgba(width: u32, height: u32, rgba: Vec<u8>) -> MediaResult<Self> {
        if width == 0 || height == 0 {
            if rgba.is_empty() {
                return Ok(Self::empty());
            }
            return Err(MediaError::validation(format!(
                "{width}x{height} image cannot hold {} bytes",
                rgba.len()
            )));
        }
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|px| px.checked_mul(4))
            .ok_or_else(|| MediaError::validation("image dimensions overflow"))?;
        if rgba.len() != expected {
            return Err(MediaError::validation(format!(
                "{width}x{height} image needs {expected} rgba bytes, got {}",
                rgba.len()
            )));
        }
        Ok(Self {
            width,
            height,
            shared: Some(Arc::new(SharedPixels {
                rgba,
                texture: Mutex::new(None),
            })),
        })
    }

    /// Take ownership of an [`image::RgbaImage`].
    pub fn from_rgba_image(img: image::RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        if width == 0 || height == 0 {
            return Self::empty();
        }
        Self {
            width,
            height,
            shared: Some(Arc::new(SharedPixels {
                rgba: img.into_raw(),
                texture: Mutex::new(None),
            })),
        }
    }

    /// Width in pixels (0 for the empty image).
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels (0 for the empty image).
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Return `true` unless this is the empty sentinel.
    pub fn is_valid(&self) -> bool {
        self.shared.is_some()
    }

    /// Return `true` for the empty sentinel.
    pub fn is_empty(&self) -> bool {
        !self.is_valid()
    }

    /// Tightly packed RGBA8 pixels, row-major. Empty for the empty image.
    pub fn pixels(&self) -> &[u8] {
        self.shared.as_deref().map_or(&[], |s| s.rgba.as_slice())
    }

    /// Texture id, once [`ensure_texture_uploaded`](Self::ensure_texture_uploaded) has succeeded.
    pub fn texture(&self) -> Option<TextureId> {
        let shared = self.shared.as_deref()?;
        shared.texture_slot().as_ref().map(TextureLease::id)
    }

    /// Upload the pixels if no clone of this image has done so yet.
    ///
    /// Returns `true` when a texture was created by this call. `false` means there was nothing to
    /// do (empty image, already uploaded) or the upload failed, which is logged.
    pub fn ensure_texture_uploaded<B: TextureBackend>(&self, mgr: &mut TextureManager<B>) -> bool {
        let Some(shared) = self.shared.as_deref() else {
            return false;
        };
        let mut slot = shared.texture_slot();
        if slot.is_some() {
            return false;
        }
        match mgr.lease(self.width, self.height, &shared.rgba) {
            Ok(lease) => {
                *slot = Some(lease);
                tracing::trace!(target: "trance_media::progress", marker = ":");
                true
            }
            Err(e) => {
                tracing::warn!(
                    width = self.width,
                    height = self.height,
                    "texture upload failed: {e}"
                );
                false
            }
        }
    }

    /// Return `true` when both images share one pixel buffer (and so one texture).
    pub fn shares_pixels_with(&self, other: &Image) -> bool {
        match (&self.shared, &other.shared) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Copy the pixels out into an [`image::RgbaImage`].
    pub fn to_rgba_image(&self) -> Option<image::RgbaImage> {
        image::RgbaImage::from_raw(self.width, self.height, self.pixels().to_vec())
            .filter(|_| self.is_valid())
    }
}

impl std::fmt::Debug for Image {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Image")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("texture", &self.texture())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/raster.rs"]
mod tests;
