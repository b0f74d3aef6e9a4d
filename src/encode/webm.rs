use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use crate::assets::color::{InputColor, rgba_to_yuv420};
use crate::codec::vp8::{Vp8Encoder, Yuv420Image};
use crate::codec::{CxPacket, Deadline};
use crate::container::mux::{MuxerConfig, WebmMuxer};
use crate::encode::sink::{FrameSink, check_frame_len, ensure_parent_dir};
use crate::foundation::core::Fps;
use crate::foundation::error::{MediaError, MediaResult};

/// Options for [`WebmExporter`].
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct WebmExporterOpts {
    /// Output `.webm` path.
    pub out_path: PathBuf,
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Output frame rate.
    pub fps: Fps,
    /// Target bitrate in kbit/s.
    pub bitrate_kbps: u32,
    /// WritingApp tag stored in the file.
    pub writing_app: String,
    /// Interpretation of the pushed bytes.
    pub input: InputColor,
    /// Per-frame encoder deadline.
    pub deadline: Deadline,
}

impl WebmExporterOpts {
    /// Options with the default color handling, deadline and application tag.
    pub fn new(
        out_path: impl Into<PathBuf>,
        width: u32,
        height: u32,
        fps: Fps,
        bitrate_kbps: u32,
    ) -> Self {
        Self {
            out_path: out_path.into(),
            width,
            height,
            fps,
            bitrate_kbps,
            writing_app: "trance".to_owned(),
            input: InputColor::default(),
            deadline: Deadline::default(),
        }
    }
}

struct Session {
    scratch: Option<Yuv420Image>,
    encoder: Vp8Encoder,
    muxer: WebmMuxer<BufWriter<File>>,
}

/// Encodes RGBA8 frames to a single-track VP8 `.webm` file.
///
/// Construction never fails outright; check [`success`](Self::success). The file is complete
/// only after [`finish`](Self::finish) or drop, which flush the encoder and finalize the
/// container. A failure along the way leaves whatever was already written on disk.
pub struct WebmExporter {
    opts: WebmExporterOpts,
    session: Option<Session>,
    success: bool,
    pts: i64,
}

impl WebmExporter {
    /// Open `path` for `width x height` frames at `fps`, targeting `bitrate_kbps`.
    pub fn new(
        path: impl Into<PathBuf>,
        width: u32,
        height: u32,
        fps: Fps,
        bitrate_kbps: u32,
    ) -> Self {
        Self::with_opts(WebmExporterOpts::new(path, width, height, fps, bitrate_kbps))
    }

    /// Open an exporter from options. Failures are logged and reflected by [`Self::success`].
    pub fn with_opts(opts: WebmExporterOpts) -> Self {
        match open_session(&opts) {
            Ok(session) => Self {
                opts,
                session: Some(session),
                success: true,
                pts: 0,
            },
            Err(e) => {
                tracing::warn!(path = %opts.out_path.display(), "couldn't start webm export: {e}");
                Self {
                    opts,
                    session: None,
                    success: false,
                    pts: 0,
                }
            }
        }
    }

    /// Open an exporter, returning the setup error instead of logging it.
    pub fn try_new(opts: WebmExporterOpts) -> MediaResult<Self> {
        let session = open_session(&opts)?;
        Ok(Self {
            opts,
            session: Some(session),
            success: true,
            pts: 0,
        })
    }

    /// Whether every setup step succeeded.
    pub fn success(&self) -> bool {
        self.success
    }

    /// Options the exporter was opened with.
    pub fn opts(&self) -> &WebmExporterOpts {
        &self.opts
    }

    /// Encode one frame. Failures are logged, not returned.
    pub fn encode_frame(&mut self, rgba: &[u8]) {
        if let Err(e) = self.try_encode_frame(rgba) {
            tracing::warn!(path = %self.opts.out_path.display(), "couldn't encode frame: {e}");
        }
    }

    /// Encode one frame and mux every packet the encoder releases.
    pub fn try_encode_frame(&mut self, rgba: &[u8]) -> MediaResult<()> {
        let Some(session) = self.session.as_mut() else {
            return Err(MediaError::io("webm exporter is not open"));
        };
        let Some(scratch) = session.scratch.as_mut() else {
            return Err(MediaError::io("webm exporter is finishing"));
        };
        check_frame_len(rgba, self.opts.width, self.opts.height)?;

        rgba_to_yuv420(rgba, self.opts.input, &mut scratch.planes_mut())?;
        let packets = session
            .encoder
            .encode(Some(&*scratch), self.pts, self.opts.deadline)?;
        self.pts += 1;
        write_packets(&mut session.muxer, self.opts.fps, packets)
    }

    /// Flush the encoder and finalize the file. Later calls are no-ops.
    ///
    /// Every step runs even if an earlier one fails; the first error is returned.
    pub fn finish(&mut self) -> MediaResult<()> {
        let Some(mut session) = self.session.take() else {
            return Ok(());
        };
        drop(session.scratch.take());

        let mut first_err = None;
        loop {
            let flushed = session.encoder.encode(None, self.pts, self.opts.deadline);
            self.pts += 1;
            match flushed {
                Ok(packets) if packets.is_empty() => break,
                Ok(packets) => {
                    if let Err(e) = write_packets(&mut session.muxer, self.opts.fps, packets) {
                        first_err.get_or_insert(e);
                        break;
                    }
                }
                Err(e) => {
                    first_err.get_or_insert(e);
                    break;
                }
            }
        }

        if let Err(e) = session.encoder.close() {
            tracing::warn!(path = %self.opts.out_path.display(), "{e}");
            first_err.get_or_insert(e);
        }
        if let Err(e) = session.muxer.finalize() {
            first_err.get_or_insert(e);
        }

        match first_err {
            Some(e) => Err(e),
            None => {
                tracing::debug!(path = %self.opts.out_path.display(), "webm export finished");
                Ok(())
            }
        }
    }
}

impl FrameSink for WebmExporter {
    fn push_frame(&mut self, rgba: &[u8]) -> MediaResult<()> {
        self.try_encode_frame(rgba)
    }

    fn finish(&mut self) -> MediaResult<()> {
        WebmExporter::finish(self)
    }
}

impl Drop for WebmExporter {
    fn drop(&mut self) {
        if let Err(e) = self.finish() {
            tracing::warn!(path = %self.opts.out_path.display(), "couldn't finish webm export: {e}");
        }
    }
}

fn open_session(opts: &WebmExporterOpts) -> MediaResult<Session> {
    if opts.width == 0 || opts.height == 0 {
        return Err(MediaError::validation("webm export needs non-zero dimensions"));
    }
    ensure_parent_dir(&opts.out_path)?;
    let file = File::create(&opts.out_path)
        .map_err(|e| MediaError::io(format!("{}: {e}", opts.out_path.display())))?;
    let muxer = WebmMuxer::new(
        BufWriter::new(file),
        MuxerConfig {
            width: opts.width,
            height: opts.height,
            fps: opts.fps,
            writing_app: opts.writing_app.clone(),
        },
    )?;
    let encoder = Vp8Encoder::new(opts.width, opts.height, opts.fps, opts.bitrate_kbps)?;
    let scratch = Yuv420Image::alloc(opts.width, opts.height)?;
    Ok(Session {
        scratch: Some(scratch),
        encoder,
        muxer,
    })
}

fn write_packets(
    muxer: &mut WebmMuxer<BufWriter<File>>,
    fps: Fps,
    packets: Vec<CxPacket>,
) -> MediaResult<()> {
    for packet in packets {
        if let CxPacket::Frame(frame) = packet {
            let ts_ns = fps.pts_to_ns(u64::try_from(frame.pts).unwrap_or(0));
            muxer.add_frame(&frame.data, ts_ns, frame.keyframe)?;
        }
    }
    Ok(())
}

#[cfg(all(test, feature = "vpx"))]
#[path = "../../tests/unit/encode/webm.rs"]
mod tests;
