use std::io::Cursor;

use super::*;
use crate::container::ebml::{self, id};

#[test]
fn garbage_is_an_open_error() {
    let err = Vp8TrackReader::new(Cursor::new(b"not a webm file at all".to_vec()))
        .err()
        .unwrap();
    assert!(matches!(err, MediaError::Open(_)), "{err}");
}

#[test]
fn missing_file_is_an_open_error() {
    let err = Vp8TrackReader::open(Path::new("/no/such/clip.webm")).err().unwrap();
    assert!(matches!(err, MediaError::Open(_)));
}

#[test]
fn non_vp8_track_is_unsupported() {
    let mut header = Vec::new();
    ebml::put_uint(&mut header, id::EBML_VERSION, 1);
    ebml::put_uint(&mut header, id::EBML_READ_VERSION, 1);
    ebml::put_uint(&mut header, id::EBML_MAX_ID_LENGTH, 4);
    ebml::put_uint(&mut header, id::EBML_MAX_SIZE_LENGTH, 8);
    ebml::put_str(&mut header, id::DOC_TYPE, "webm");
    ebml::put_uint(&mut header, id::DOC_TYPE_VERSION, 4);
    ebml::put_uint(&mut header, id::DOC_TYPE_READ_VERSION, 2);

    let mut info = Vec::new();
    ebml::put_uint(&mut info, id::TIMECODE_SCALE, 1_000_000);
    ebml::put_str(&mut info, id::MUXING_APP, "t");
    ebml::put_str(&mut info, id::WRITING_APP, "t");

    let mut video = Vec::new();
    ebml::put_uint(&mut video, id::PIXEL_WIDTH, 2);
    ebml::put_uint(&mut video, id::PIXEL_HEIGHT, 2);
    let mut entry = Vec::new();
    ebml::put_uint(&mut entry, id::TRACK_NUMBER, 1);
    ebml::put_uint(&mut entry, id::TRACK_UID, 1);
    ebml::put_uint(&mut entry, id::TRACK_TYPE, 1);
    ebml::put_str(&mut entry, id::CODEC_ID, "V_VP9");
    ebml::put_bytes(&mut entry, id::VIDEO, &video);
    let mut tracks = Vec::new();
    ebml::put_bytes(&mut tracks, id::TRACK_ENTRY, &entry);

    let mut cluster = Vec::new();
    ebml::put_uint(&mut cluster, id::TIMECODE, 0);
    ebml::put_bytes(&mut cluster, id::SIMPLE_BLOCK, &[0x81, 0, 0, 0x80, 1, 2, 3]);

    let mut segment = Vec::new();
    ebml::put_bytes(&mut segment, id::INFO, &info);
    ebml::put_bytes(&mut segment, id::TRACKS, &tracks);
    ebml::put_bytes(&mut segment, id::CLUSTER, &cluster);

    let mut file = Vec::new();
    ebml::put_bytes(&mut file, id::EBML, &header);
    ebml::put_bytes(&mut file, id::SEGMENT, &segment);

    let err = Vp8TrackReader::new(Cursor::new(file)).err().unwrap();
    assert!(matches!(err, MediaError::Unsupported(_)), "{err}");
}
