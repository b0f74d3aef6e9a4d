use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use matroska_demuxer::{Frame, MatroskaFile, TrackType};

use crate::foundation::error::{MediaError, MediaResult};

/// Reads the compressed payloads of the first VP8 video track of a WebM file, in file order.
pub struct Vp8TrackReader<R: Read + Seek> {
    file: MatroskaFile<R>,
    track: u64,
    width: u32,
    height: u32,
    frame: Frame,
}

impl Vp8TrackReader<BufReader<File>> {
    /// Open `path` and locate its VP8 track.
    pub fn open(path: &Path) -> MediaResult<Self> {
        let file =
            File::open(path).map_err(|e| MediaError::open(format!("{}: {e}", path.display())))?;
        Self::new(BufReader::new(file))
    }
}

impl<R: Read + Seek> Vp8TrackReader<R> {
    /// Parse the container header and locate the VP8 track.
    pub fn new(reader: R) -> MediaResult<Self> {
        let file = MatroskaFile::open(reader)
            .map_err(|e| MediaError::open(format!("webm container: {e}")))?;

        let Some(entry) = file
            .tracks()
            .iter()
            .find(|t| t.track_type() == TrackType::Video && t.codec_id() == "V_VP8")
        else {
            return Err(MediaError::unsupported("no VP8 video track"));
        };
        let track = entry.track_number().get();
        let (width, height) = entry.video().map_or((0, 0), |v| {
            (
                u32::try_from(v.pixel_width().get()).unwrap_or(0),
                u32::try_from(v.pixel_height().get()).unwrap_or(0),
            )
        });
        tracing::debug!(track, width, height, "found vp8 track");

        Ok(Self {
            file,
            track,
            width,
            height,
            frame: Frame::default(),
        })
    }

    /// Track pixel size as declared by the container (`0` if absent).
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Next VP8 payload, or `None` at end of stream. Frames of other tracks are skipped.
    pub fn next_packet(&mut self) -> MediaResult<Option<&[u8]>> {
        loop {
            let more = self
                .file
                .next_frame(&mut self.frame)
                .map_err(|e| MediaError::open(format!("webm block: {e}")))?;
            if !more {
                return Ok(None);
            }
            if self.frame.track == self.track {
                return Ok(Some(&self.frame.data));
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/container/demux.rs"]
mod tests;
