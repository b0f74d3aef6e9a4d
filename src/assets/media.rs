use std::path::Path;

use crate::assets::gif_anim::decode_gif;
use crate::assets::raster::Image;
use crate::assets::webm_anim::decode_webm;
use crate::foundation::core::MediaKind;
use crate::foundation::error::{MediaError, MediaResult};

/// Decode an animation, or return an empty sequence and log why not.
///
/// `.gif` and `.webm` are recognized; anything else yields an empty sequence. A file that fails
/// part-way never yields a partial sequence.
pub fn load_animation(path: impl AsRef<Path>) -> Vec<Image> {
    let path = path.as_ref();
    match try_load_animation(path) {
        Ok(frames) => frames,
        Err(e) => {
            tracing::warn!(path = %path.display(), "couldn't load animation: {e}");
            Vec::new()
        }
    }
}

/// Decode an animation, dispatching on the file extension.
pub fn try_load_animation(path: impl AsRef<Path>) -> MediaResult<Vec<Image>> {
    let path = path.as_ref();
    match MediaKind::from_path(path) {
        MediaKind::Gif => decode_gif(path),
        MediaKind::Webm => decode_webm(path),
        kind => Err(MediaError::unsupported(format!(
            "{} is not an animation ({kind:?})",
            path.display()
        ))),
    }
}

/// Shape of a decoded asset.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AnimationSummary {
    /// Format chosen from the extension.
    pub kind: MediaKind,
    /// Number of frames (1 for stills).
    pub frames: usize,
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
}

impl AnimationSummary {
    /// Summarize already decoded frames.
    pub fn from_frames(kind: MediaKind, frames: &[Image]) -> Self {
        let first = frames.first();
        Self {
            kind,
            frames: frames.len(),
            width: first.map_or(0, Image::width),
            height: first.map_or(0, Image::height),
        }
    }
}

/// Decode `path` as an animation or a still and report its shape.
pub fn summarize(path: impl AsRef<Path>) -> MediaResult<AnimationSummary> {
    let path = path.as_ref();
    let kind = MediaKind::from_path(path);
    let frames = if kind.is_animation() {
        try_load_animation(path)?
    } else {
        vec![crate::assets::still::try_load_image(path)?]
    };
    Ok(AnimationSummary::from_frames(kind, &frames))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/media.rs"]
mod tests;
