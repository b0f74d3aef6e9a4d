use std::collections::HashMap;

use crate::foundation::error::{MediaError, MediaResult};
use crate::render::backend::{TextureBackend, TextureId};

/// [`TextureBackend`] that uploads into `Rgba8UnormSrgb` textures on a `wgpu` device.
///
/// Must be driven from the thread that owns `device`/`queue`.
pub struct WgpuBackend {
    device: wgpu::Device,
    queue: wgpu::Queue,
    next_id: u64,
    textures: HashMap<TextureId, wgpu::Texture>,
}

impl WgpuBackend {
    /// Wrap an existing device/queue pair.
    pub fn new(device: wgpu::Device, queue: wgpu::Queue) -> Self {
        Self {
            device,
            queue,
            next_id: 0,
            textures: HashMap::new(),
        }
    }

    /// Look up the texture behind `id`.
    pub fn texture(&self, id: TextureId) -> Option<&wgpu::Texture> {
        self.textures.get(&id)
    }

    /// Number of textures currently alive.
    pub fn live_textures(&self) -> usize {
        self.textures.len()
    }
}

impl TextureBackend for WgpuBackend {
    fn create_texture(&mut self, width: u32, height: u32, rgba: &[u8]) -> MediaResult<TextureId> {
        if width == 0 || height == 0 || rgba.len() != width as usize * height as usize * 4 {
            return Err(MediaError::validation(format!(
                "texture upload expects {width}x{height} rgba8, got {} bytes",
                rgba.len()
            )));
        }
        let limit = self.device.limits().max_texture_dimension_2d;
        if width > limit || height > limit {
            return Err(MediaError::unsupported(format!(
                "{width}x{height} exceeds max texture dimension {limit}"
            )));
        }

        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };
        let texture = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("trance_media.image"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        self.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            rgba,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * width),
                rows_per_image: Some(height),
            },
            size,
        );

        self.next_id += 1;
        let id = TextureId(self.next_id);
        self.textures.insert(id, texture);
        Ok(id)
    }

    fn delete_texture(&mut self, id: TextureId) {
        match self.textures.remove(&id) {
            Some(texture) => texture.destroy(),
            None => tracing::warn!(texture = id.0, "delete of unknown texture"),
        }
    }
}
