//! VP8 codec sessions.
//!
//! With the `vpx` feature the sessions wrap libvpx; without it every constructor fails with
//! [`crate::MediaError::Unsupported`].

#[cfg(feature = "vpx")]
#[allow(unsafe_code)]
pub(crate) mod vp8;

#[cfg(not(feature = "vpx"))]
#[path = "vp8_disabled.rs"]
pub(crate) mod vp8;

/// Encoder speed/quality trade-off for each submitted frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Deadline {
    /// Lowest latency, lowest quality.
    Realtime,
    /// Balanced.
    #[default]
    GoodQuality,
    /// Slowest, best quality.
    BestQuality,
}

/// One compressed frame produced by the encoder.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodedFrame {
    /// VP8 bitstream for one frame.
    pub data: Vec<u8>,
    /// Presentation index in `1/fps` units.
    pub pts: i64,
    /// Whether this is a keyframe.
    pub keyframe: bool,
}

/// Encoder output packet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CxPacket {
    /// Compressed frame data.
    Frame(EncodedFrame),
    /// Stats, PSNR or other non-frame packet; not muxed.
    Other,
}
