use std::path::Path;

use crate::assets::raster::Image;
use crate::foundation::core::Fps;
use crate::foundation::error::{MediaError, MediaResult};

/// Frame geometry and rate shared by a producer and a [`FrameSink`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SinkConfig {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Frames per second.
    pub fps: Fps,
}

impl SinkConfig {
    /// Byte length of one tightly packed RGBA8 frame.
    pub fn frame_len(&self) -> usize {
        self.width as usize * self.height as usize * 4
    }
}

/// Consumer of raw RGBA8 frames in presentation order.
///
/// Unlike the fire-and-forget `encode_frame` methods of the exporters, sink methods surface
/// every failure.
pub trait FrameSink: Send {
    /// Push one tightly packed RGBA8 frame.
    fn push_frame(&mut self, rgba: &[u8]) -> MediaResult<()>;
    /// Flush and close. Pushing after `finish` is an error.
    fn finish(&mut self) -> MediaResult<()>;
}

/// In-memory sink for tests and debugging.
#[derive(Debug)]
pub struct InMemorySink {
    cfg: SinkConfig,
    frames: Vec<Vec<u8>>,
    finished: bool,
}

impl InMemorySink {
    /// Create a sink that accepts frames matching `cfg`.
    pub fn new(cfg: SinkConfig) -> Self {
        Self {
            cfg,
            frames: Vec::new(),
            finished: false,
        }
    }

    /// The configuration frames are checked against.
    pub fn config(&self) -> SinkConfig {
        self.cfg
    }

    /// Borrow the captured frames.
    pub fn frames(&self) -> &[Vec<u8>] {
        &self.frames
    }

    /// Return `true` once [`FrameSink::finish`] has run.
    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl FrameSink for InMemorySink {
    fn push_frame(&mut self, rgba: &[u8]) -> MediaResult<()> {
        if self.finished {
            return Err(MediaError::validation("push after finish"));
        }
        check_frame_len(rgba, self.cfg.width, self.cfg.height)?;
        self.frames.push(rgba.to_vec());
        Ok(())
    }

    fn finish(&mut self) -> MediaResult<()> {
        self.finished = true;
        Ok(())
    }
}

/// Push every frame of `frames` into `sink`, then finish it. Returns the number of frames pushed.
///
/// All frames must be valid images of one size.
pub fn export_images(frames: &[Image], sink: &mut dyn FrameSink) -> MediaResult<usize> {
    let Some(first) = frames.first() else {
        sink.finish()?;
        return Ok(0);
    };
    for (i, img) in frames.iter().enumerate() {
        if !img.is_valid() || (img.width(), img.height()) != (first.width(), first.height()) {
            return Err(MediaError::validation(format!(
                "frame {i} is {}x{}, expected {}x{}",
                img.width(),
                img.height(),
                first.width(),
                first.height()
            )));
        }
        sink.push_frame(img.pixels())?;
    }
    sink.finish()?;
    Ok(frames.len())
}

pub(crate) fn check_frame_len(rgba: &[u8], width: u32, height: u32) -> MediaResult<()> {
    let expected = width as usize * height as usize * 4;
    if rgba.len() != expected {
        return Err(MediaError::validation(format!(
            "{width}x{height} frame needs {expected} rgba bytes, got {}",
            rgba.len()
        )));
    }
    Ok(())
}

pub(crate) fn ensure_parent_dir(path: &Path) -> MediaResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        use anyhow::Context as _;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/encode/sink.rs"]
mod tests;
