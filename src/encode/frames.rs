use std::path::{Path, PathBuf};

use crate::encode::sink::{FrameSink, check_frame_len, ensure_parent_dir};
use crate::foundation::error::{MediaError, MediaResult};

/// Writes each frame to its own numbered still image.
///
/// For an output path `dir/name.ext`, frame `n` goes to `dir/name_<n>.ext` with `n` zero-padded
/// to the number of digits in the total frame count. A file name without a dot gets no
/// extension and is written as PNG.
#[derive(Debug)]
pub struct FrameExporter {
    dir: PathBuf,
    stem: String,
    ext: Option<String>,
    width: u32,
    height: u32,
    pad: usize,
    next: u64,
}

impl FrameExporter {
    /// Create an exporter for `total_frames` frames of `width x height`.
    pub fn new(path: impl AsRef<Path>, width: u32, height: u32, total_frames: u64) -> Self {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let (stem, ext) = match name.rsplit_once('.') {
            Some((stem, ext)) => (stem.to_owned(), Some(ext.to_owned())),
            None => (name, None),
        };
        Self {
            dir: path.parent().map(Path::to_path_buf).unwrap_or_default(),
            stem,
            ext,
            width,
            height,
            pad: total_frames.max(1).to_string().len(),
            next: 0,
        }
    }

    /// Index the next [`encode_frame`](Self::encode_frame) call writes.
    pub fn next_index(&self) -> u64 {
        self.next
    }

    /// Output path of frame `index`.
    pub fn frame_path(&self, index: u64) -> PathBuf {
        let mut name = format!("{}_{:0width$}", self.stem, index, width = self.pad);
        if let Some(ext) = &self.ext {
            name.push('.');
            name.push_str(ext);
        }
        self.dir.join(name)
    }

    /// Write the next frame. Failures are logged, not returned; the index advances regardless.
    pub fn encode_frame(&mut self, rgba: &[u8]) {
        if let Err(e) = self.try_encode_frame(rgba) {
            tracing::warn!("couldn't export frame: {e}");
        }
    }

    /// Write the next frame and return its path. The index advances even on failure.
    pub fn try_encode_frame(&mut self, rgba: &[u8]) -> MediaResult<PathBuf> {
        let path = self.frame_path(self.next);
        self.next += 1;
        check_frame_len(rgba, self.width, self.height)?;
        ensure_parent_dir(&path)?;

        let format = self
            .ext
            .as_deref()
            .and_then(image::ImageFormat::from_extension)
            .unwrap_or(image::ImageFormat::Png);
        let saved = if format == image::ImageFormat::Jpeg {
            let rgb: Vec<u8> = rgba
                .chunks_exact(4)
                .flat_map(|p| [p[0], p[1], p[2]])
                .collect();
            image::save_buffer_with_format(
                &path,
                &rgb,
                self.width,
                self.height,
                image::ColorType::Rgb8,
                format,
            )
        } else {
            image::save_buffer_with_format(
                &path,
                rgba,
                self.width,
                self.height,
                image::ColorType::Rgba8,
                format,
            )
        };
        saved.map_err(|e| MediaError::io(format!("write frame '{}': {e}", path.display())))?;
        Ok(path)
    }
}

impl FrameSink for FrameExporter {
    fn push_frame(&mut self, rgba: &[u8]) -> MediaResult<()> {
        self.try_encode_frame(rgba).map(drop)
    }

    fn finish(&mut self) -> MediaResult<()> {
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/frames.rs"]
mod tests;
