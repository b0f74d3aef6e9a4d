//! EBML element encoding into byte buffers.

use byteorder::{BigEndian, ByteOrder, LittleEndian};

/// Size field value meaning "unknown size", written as 8 bytes.
pub(crate) const UNKNOWN_SIZE: u64 = 0x01FF_FFFF_FFFF_FFFF;

pub(crate) mod id {
    pub const EBML: u32 = 0x1A45_DFA3;
    pub const EBML_VERSION: u32 = 0x4286;
    pub const EBML_READ_VERSION: u32 = 0x42F7;
    pub const EBML_MAX_ID_LENGTH: u32 = 0x42F2;
    pub const EBML_MAX_SIZE_LENGTH: u32 = 0x42F3;
    pub const DOC_TYPE: u32 = 0x4282;
    pub const DOC_TYPE_VERSION: u32 = 0x4287;
    pub const DOC_TYPE_READ_VERSION: u32 = 0x4285;

    pub const SEGMENT: u32 = 0x1853_8067;

    pub const SEEK_HEAD: u32 = 0x114D_9B74;
    pub const SEEK: u32 = 0x4DBB;
    pub const SEEK_ID: u32 = 0x53AB;
    pub const SEEK_POSITION: u32 = 0x53AC;

    pub const INFO: u32 = 0x1549_A966;
    pub const TIMECODE_SCALE: u32 = 0x2A_D7B1;
    pub const DURATION: u32 = 0x4489;
    pub const MUXING_APP: u32 = 0x4D80;
    pub const WRITING_APP: u32 = 0x5741;

    pub const TRACKS: u32 = 0x1654_AE6B;
    pub const TRACK_ENTRY: u32 = 0xAE;
    pub const TRACK_NUMBER: u32 = 0xD7;
    pub const TRACK_UID: u32 = 0x73C5;
    pub const TRACK_TYPE: u32 = 0x83;
    pub const FLAG_LACING: u32 = 0x9C;
    pub const CODEC_ID: u32 = 0x86;
    pub const DEFAULT_DURATION: u32 = 0x23_E383;
    pub const VIDEO: u32 = 0xE0;
    pub const PIXEL_WIDTH: u32 = 0xB0;
    pub const PIXEL_HEIGHT: u32 = 0xBA;
    pub const FRAME_RATE: u32 = 0x23_83E3;

    pub const CLUSTER: u32 = 0x1F43_B675;
    pub const TIMECODE: u32 = 0xE7;
    pub const SIMPLE_BLOCK: u32 = 0xA3;

    pub const CUES: u32 = 0x1C53_BB6B;
    pub const CUE_POINT: u32 = 0xBB;
    pub const CUE_TIME: u32 = 0xB3;
    pub const CUE_TRACK_POSITIONS: u32 = 0xB7;
    pub const CUE_TRACK: u32 = 0xF7;
    pub const CUE_CLUSTER_POSITION: u32 = 0xF1;

    pub const CRC32: u32 = 0xBF;
    pub const VOID: u32 = 0xEC;
}

/// Append an element id; ids already carry their length marker.
pub(crate) fn put_id(buf: &mut Vec<u8>, id: u32) {
    let mut raw = [0u8; 4];
    BigEndian::write_u32(&mut raw, id);
    let skip = match id {
        0..=0xFF => 3,
        0x100..=0xFFFF => 2,
        0x1_0000..=0xFF_FFFF => 1,
        _ => 0,
    };
    buf.extend_from_slice(&raw[skip..]);
}

/// Append a data size using the shortest vint that can hold it.
pub(crate) fn put_size(buf: &mut Vec<u8>, size: u64) {
    // All-ones is reserved for "unknown", so each length holds up to 2^(7n) - 2.
    let len = (1..=8usize)
        .find(|&n| size < (1u64 << (7 * n)) - 1)
        .unwrap_or(8);
    put_size_fixed(buf, size, len);
}

/// Append a data size as a vint of exactly `len` bytes.
pub(crate) fn put_size_fixed(buf: &mut Vec<u8>, size: u64, len: usize) {
    let mut raw = [0u8; 8];
    BigEndian::write_u64(&mut raw, size | (1u64 << (7 * len)));
    buf.extend_from_slice(&raw[8 - len..]);
}

pub(crate) fn put_uint(buf: &mut Vec<u8>, id: u32, value: u64) {
    let mut raw = [0u8; 8];
    BigEndian::write_u64(&mut raw, value);
    let skip = (value.leading_zeros() as usize / 8).min(7);
    put_id(buf, id);
    put_size(buf, (8 - skip) as u64);
    buf.extend_from_slice(&raw[skip..]);
}

pub(crate) fn put_float(buf: &mut Vec<u8>, id: u32, value: f64) {
    let mut raw = [0u8; 8];
    BigEndian::write_f64(&mut raw, value);
    put_id(buf, id);
    put_size(buf, 8);
    buf.extend_from_slice(&raw);
}

pub(crate) fn put_str(buf: &mut Vec<u8>, id: u32, value: &str) {
    put_bytes(buf, id, value.as_bytes());
}

/// Append a binary element or a master element whose children are already encoded.
pub(crate) fn put_bytes(buf: &mut Vec<u8>, id: u32, body: &[u8]) {
    put_id(buf, id);
    put_size(buf, body.len() as u64);
    buf.extend_from_slice(body);
}

/// Append a master element whose first child is a CRC-32 over the remaining children.
pub(crate) fn put_master_crc(buf: &mut Vec<u8>, id: u32, children: &[u8]) {
    let mut crc = [0u8; 4];
    LittleEndian::write_u32(&mut crc, crc32fast::hash(children));
    put_id(buf, id);
    put_size(buf, (children.len() + 6) as u64);
    put_bytes(buf, id::CRC32, &crc);
    buf.extend_from_slice(children);
}

/// Append a Void element occupying exactly `total` bytes (`total >= 2`).
pub(crate) fn put_void(buf: &mut Vec<u8>, total: usize) {
    debug_assert!(total >= 2);
    put_id(buf, id::VOID);
    let body = if total >= 9 {
        put_size_fixed(buf, (total - 9) as u64, 8);
        total - 9
    } else {
        put_size_fixed(buf, (total - 2) as u64, 1);
        total - 2
    };
    buf.resize(buf.len() + body, 0);
}

#[cfg(test)]
#[path = "../../tests/unit/container/ebml.rs"]
mod tests;
