use crate::assets::color::{Yuv420Mut, Yuv420Ref};
use crate::codec::{CxPacket, Deadline};
use crate::foundation::core::Fps;
use crate::foundation::error::{MediaError, MediaResult};

fn disabled() -> MediaError {
    MediaError::unsupported("vp8 support requires the `vpx` cargo feature")
}

/// VP8 decoder (unavailable: built without `vpx`).
pub enum Vp8Decoder {}

impl Vp8Decoder {
    /// Always fails without the `vpx` feature.
    pub fn new() -> MediaResult<Self> {
        Err(disabled())
    }

    /// Unreachable.
    pub fn decode(&mut self, _data: &[u8]) -> MediaResult<()> {
        match *self {}
    }

    /// Unreachable.
    pub fn next_picture(&mut self) -> MediaResult<Option<Yuv420Ref<'_>>> {
        match *self {}
    }

    /// Unreachable.
    pub fn close(&mut self) -> MediaResult<()> {
        match *self {}
    }
}

/// Scratch I420 image (unavailable: built without `vpx`).
pub enum Yuv420Image {}

impl Yuv420Image {
    /// Always fails without the `vpx` feature.
    pub fn alloc(_width: u32, _height: u32) -> MediaResult<Self> {
        Err(disabled())
    }

    /// Unreachable.
    pub fn planes_mut(&mut self) -> Yuv420Mut<'_> {
        match *self {}
    }
}

/// VP8 encoder (unavailable: built without `vpx`).
pub enum Vp8Encoder {}

impl Vp8Encoder {
    /// Always fails without the `vpx` feature.
    pub fn new(_width: u32, _height: u32, _fps: Fps, _bitrate_kbps: u32) -> MediaResult<Self> {
        Err(disabled())
    }

    /// Unreachable.
    pub fn encode(
        &mut self,
        _img: Option<&Yuv420Image>,
        _pts: i64,
        _deadline: Deadline,
    ) -> MediaResult<Vec<CxPacket>> {
        match *self {}
    }

    /// Unreachable.
    pub fn close(&mut self) -> MediaResult<()> {
        match *self {}
    }
}
