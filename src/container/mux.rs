use std::io::{Seek, SeekFrom, Write};

use byteorder::{BigEndian, ByteOrder};

use crate::container::ebml::{self, UNKNOWN_SIZE, id};
use crate::foundation::core::Fps;
use crate::foundation::error::{MediaError, MediaResult};

const TRACK_NUMBER: u64 = 1;
const TRACK_UID: u64 = 0x7472_616E_6365; // "trance"
const SEEK_HEAD_RESERVE: usize = 128;
const MUXING_APP: &str = concat!("trance-media-", env!("CARGO_PKG_VERSION"));

/// Static description of the single VP8 video track.
#[derive(Clone, Debug)]
pub struct MuxerConfig {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Nominal frame rate.
    pub fps: Fps,
    /// Value of the segment's WritingApp element.
    pub writing_app: String,
}

struct OpenCluster {
    timecode_ms: u64,
    starts_on_key: bool,
    body: Vec<u8>,
}

/// WebM writer for one VP8 video track.
///
/// Layout: EBML header, then one Segment holding a SeekHead, Info, Tracks, the clusters and
/// finally Cues. Timecodes are in milliseconds. Clusters, Info, Tracks, Cues and the SeekHead
/// each carry a CRC-32.
pub struct WebmMuxer<W: Write + Seek> {
    out: W,
    cfg: MuxerConfig,
    segment_size_at: u64,
    segment_data_at: u64,
    seek_head_at: u64,
    info_at: u64,
    tracks_at: u64,
    cluster: Option<OpenCluster>,
    cues: Vec<(u64, u64)>,
    end_ns: u64,
    frames: u64,
}

fn io(what: &'static str) -> impl FnOnce(std::io::Error) -> MediaError {
    move |e| MediaError::io(format!("{what}: {e}"))
}

impl<W: Write + Seek> WebmMuxer<W> {
    /// Write the header, track description and placeholders.
    pub fn new(mut out: W, cfg: MuxerConfig) -> MediaResult<Self> {
        let mut head = Vec::new();
        let mut ebml_body = Vec::new();
        ebml::put_uint(&mut ebml_body, id::EBML_VERSION, 1);
        ebml::put_uint(&mut ebml_body, id::EBML_READ_VERSION, 1);
        ebml::put_uint(&mut ebml_body, id::EBML_MAX_ID_LENGTH, 4);
        ebml::put_uint(&mut ebml_body, id::EBML_MAX_SIZE_LENGTH, 8);
        ebml::put_str(&mut ebml_body, id::DOC_TYPE, "webm");
        ebml::put_uint(&mut ebml_body, id::DOC_TYPE_VERSION, 4);
        ebml::put_uint(&mut ebml_body, id::DOC_TYPE_READ_VERSION, 2);
        ebml::put_bytes(&mut head, id::EBML, &ebml_body);
        ebml::put_id(&mut head, id::SEGMENT);

        let start = out.stream_position().map_err(io("webm header"))?;
        let segment_size_at = start + head.len() as u64;
        let mut raw = [0u8; 8];
        BigEndian::write_u64(&mut raw, UNKNOWN_SIZE);
        head.extend_from_slice(&raw);
        let segment_data_at = start + head.len() as u64;

        let seek_head_at = segment_data_at;
        ebml::put_void(&mut head, SEEK_HEAD_RESERVE);

        let info_at = start + head.len() as u64;
        head.extend_from_slice(&info_element(&cfg, 0.0));

        let tracks_at = start + head.len() as u64;
        head.extend_from_slice(&tracks_element(&cfg));

        out.write_all(&head).map_err(io("webm header"))?;
        Ok(Self {
            out,
            cfg,
            segment_size_at,
            segment_data_at,
            seek_head_at,
            info_at,
            tracks_at,
            cluster: None,
            cues: Vec::new(),
            end_ns: 0,
            frames: 0,
        })
    }

    /// Number of frames written so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Append one compressed frame with its presentation time in nanoseconds.
    ///
    /// A keyframe always opens a new cluster, as does a timestamp that no longer fits the
    /// cluster-relative 16-bit offset.
    pub fn add_frame(&mut self, data: &[u8], ts_ns: u64, keyframe: bool) -> MediaResult<()> {
        let ts_ms = ts_ns / 1_000_000;
        let fits = |c: &OpenCluster| {
            i16::try_from(i128::from(ts_ms) - i128::from(c.timecode_ms)).is_ok()
        };
        if keyframe || !self.cluster.as_ref().is_some_and(fits) {
            self.flush_cluster()?;
            let mut body = Vec::new();
            ebml::put_uint(&mut body, id::TIMECODE, ts_ms);
            self.cluster = Some(OpenCluster {
                timecode_ms: ts_ms,
                starts_on_key: keyframe,
                body,
            });
        }
        let Some(cluster) = self.cluster.as_mut() else {
            return Err(MediaError::io("webm cluster missing"));
        };

        let rel = (ts_ms as i64 - cluster.timecode_ms as i64) as i16;
        let mut block = Vec::with_capacity(data.len() + 4);
        block.push(0x80 | TRACK_NUMBER as u8);
        let mut rel_raw = [0u8; 2];
        BigEndian::write_i16(&mut rel_raw, rel);
        block.extend_from_slice(&rel_raw);
        block.push(if keyframe { 0x80 } else { 0x00 });
        block.extend_from_slice(data);
        ebml::put_bytes(&mut cluster.body, id::SIMPLE_BLOCK, &block);

        self.end_ns = self
            .end_ns
            .max(ts_ns + self.cfg.fps.frame_duration_ns());
        self.frames += 1;
        Ok(())
    }

    fn flush_cluster(&mut self) -> MediaResult<()> {
        let Some(cluster) = self.cluster.take() else {
            return Ok(());
        };
        let at = self.out.stream_position().map_err(io("webm cluster"))?;
        if cluster.starts_on_key {
            self.cues.push((cluster.timecode_ms, at - self.segment_data_at));
        }
        let mut buf = Vec::with_capacity(cluster.body.len() + 16);
        ebml::put_master_crc(&mut buf, id::CLUSTER, &cluster.body);
        self.out.write_all(&buf).map_err(io("webm cluster"))
    }

    /// Write the last cluster and the cues, then patch sizes, duration and the seek head.
    ///
    /// Returns the underlying writer.
    pub fn finalize(mut self) -> MediaResult<W> {
        self.flush_cluster()?;

        let cues_at = self.out.stream_position().map_err(io("webm cues"))?;
        if !self.cues.is_empty() {
            let mut points = Vec::new();
            for &(time, cluster_pos) in &self.cues {
                let mut positions = Vec::new();
                ebml::put_uint(&mut positions, id::CUE_TRACK, TRACK_NUMBER);
                ebml::put_uint(&mut positions, id::CUE_CLUSTER_POSITION, cluster_pos);
                let mut point = Vec::new();
                ebml::put_uint(&mut point, id::CUE_TIME, time);
                ebml::put_bytes(&mut point, id::CUE_TRACK_POSITIONS, &positions);
                ebml::put_bytes(&mut points, id::CUE_POINT, &point);
            }
            let mut buf = Vec::new();
            ebml::put_master_crc(&mut buf, id::CUES, &points);
            self.out.write_all(&buf).map_err(io("webm cues"))?;
        }
        let end = self.out.stream_position().map_err(io("webm finalize"))?;

        let mut size = Vec::new();
        ebml::put_size_fixed(&mut size, end - self.segment_data_at, 8);
        self.patch(self.segment_size_at, &size)?;

        let duration_ms = self.end_ns as f64 / 1e6;
        let info = info_element(&self.cfg, duration_ms);
        self.patch(self.info_at, &info)?;

        let rel = |at: u64| at - self.segment_data_at;
        let mut targets = vec![(id::INFO, rel(self.info_at)), (id::TRACKS, rel(self.tracks_at))];
        if !self.cues.is_empty() {
            targets.push((id::CUES, rel(cues_at)));
        }
        let mut area = seek_head_element(&targets);
        let pad = SEEK_HEAD_RESERVE - area.len().min(SEEK_HEAD_RESERVE);
        if pad >= 2 {
            ebml::put_void(&mut area, pad);
            self.patch(self.seek_head_at, &area)?;
        } else {
            tracing::warn!(len = area.len(), "webm seek head does not fit its reserve");
        }

        self.out.seek(SeekFrom::Start(end)).map_err(io("webm finalize"))?;
        self.out.flush().map_err(io("webm finalize"))?;
        tracing::debug!(frames = self.frames, bytes = end, "webm finalized");
        Ok(self.out)
    }

    fn patch(&mut self, at: u64, bytes: &[u8]) -> MediaResult<()> {
        self.out
            .seek(SeekFrom::Start(at))
            .map_err(io("webm patch"))?;
        self.out.write_all(bytes).map_err(io("webm patch"))
    }
}

fn info_element(cfg: &MuxerConfig, duration_ms: f64) -> Vec<u8> {
    let mut body = Vec::new();
    ebml::put_uint(&mut body, id::TIMECODE_SCALE, 1_000_000);
    ebml::put_float(&mut body, id::DURATION, duration_ms);
    ebml::put_str(&mut body, id::MUXING_APP, MUXING_APP);
    ebml::put_str(&mut body, id::WRITING_APP, &cfg.writing_app);
    let mut out = Vec::new();
    ebml::put_master_crc(&mut out, id::INFO, &body);
    out
}

fn tracks_element(cfg: &MuxerConfig) -> Vec<u8> {
    let mut video = Vec::new();
    ebml::put_uint(&mut video, id::PIXEL_WIDTH, u64::from(cfg.width));
    ebml::put_uint(&mut video, id::PIXEL_HEIGHT, u64::from(cfg.height));
    ebml::put_float(&mut video, id::FRAME_RATE, cfg.fps.as_f64());

    let mut entry = Vec::new();
    ebml::put_uint(&mut entry, id::TRACK_NUMBER, TRACK_NUMBER);
    ebml::put_uint(&mut entry, id::TRACK_UID, TRACK_UID);
    ebml::put_uint(&mut entry, id::TRACK_TYPE, 1);
    ebml::put_uint(&mut entry, id::FLAG_LACING, 0);
    ebml::put_str(&mut entry, id::CODEC_ID, "V_VP8");
    ebml::put_uint(&mut entry, id::DEFAULT_DURATION, cfg.fps.frame_duration_ns());
    ebml::put_bytes(&mut entry, id::VIDEO, &video);

    let mut body = Vec::new();
    ebml::put_bytes(&mut body, id::TRACK_ENTRY, &entry);
    let mut out = Vec::new();
    ebml::put_master_crc(&mut out, id::TRACKS, &body);
    out
}

fn seek_head_element(targets: &[(u32, u64)]) -> Vec<u8> {
    let mut body = Vec::new();
    for &(target, pos) in targets {
        let mut target_id = Vec::new();
        ebml::put_id(&mut target_id, target);
        let mut seek = Vec::new();
        ebml::put_bytes(&mut seek, id::SEEK_ID, &target_id);
        ebml::put_uint(&mut seek, id::SEEK_POSITION, pos);
        ebml::put_bytes(&mut body, id::SEEK, &seek);
    }
    let mut out = Vec::new();
    ebml::put_master_crc(&mut out, id::SEEK_HEAD, &body);
    out
}

#[cfg(test)]
#[path = "../../tests/unit/container/mux.rs"]
mod tests;
