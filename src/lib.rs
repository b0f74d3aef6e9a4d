//! trance-media normalizes animated GIF and WebM/VP8 sources into sequences of RGBA frames, and
//! exports RGBA frames back out as a VP8 `.webm` file or a numbered still sequence.
//!
//! - Load stills with [`load_image`] and animations with [`load_animation`]; both degrade to an
//!   empty value on failure, while the `try_*` variants return a [`MediaError`].
//! - Decoded [`Image`]s upload themselves lazily through a [`TextureManager`]; textures of dropped
//!   images are freed on the manager's thread by [`TextureManager::delete_pending`].
//! - Export with [`WebmExporter`] or [`FrameExporter`], or drive either through [`FrameSink`].
#![deny(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod codec;
mod container;
mod foundation;

/// Frame exporters.
pub mod encode;
pub(crate) mod render;

pub use crate::foundation::core::{Fps, MediaKind};
pub use crate::foundation::error::{MediaError, MediaResult};

pub use crate::assets::color::{
    InputColor, Yuv420Mut, Yuv420Ref, rgb_to_yuv, rgba_to_yuv420, yuv_to_rgb, yuv420_to_rgba,
};
pub use crate::assets::gif_anim::{decode_gif, is_gif_animated};
pub use crate::assets::media::{AnimationSummary, load_animation, summarize, try_load_animation};
pub use crate::assets::raster::Image;
pub use crate::assets::still::{load_image, try_load_image};
pub use crate::assets::webm_anim::decode_webm;

pub use crate::codec::{CxPacket, Deadline, EncodedFrame};
pub use crate::container::demux::Vp8TrackReader;
pub use crate::container::mux::{MuxerConfig, WebmMuxer};

pub use crate::encode::frames::FrameExporter;
pub use crate::encode::sink::{FrameSink, InMemorySink, SinkConfig, export_images};
pub use crate::encode::webm::{WebmExporter, WebmExporterOpts};

pub use crate::render::backend::{HeadlessBackend, TextureBackend, TextureId};
pub use crate::render::texture::{DeletionQueue, TextureManager};
#[cfg(feature = "gpu")]
pub use crate::render::wgpu_backend::WgpuBackend;
