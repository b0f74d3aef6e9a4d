use super::*;

fn enc(f: impl FnOnce(&mut Vec<u8>)) -> Vec<u8> {
    let mut buf = Vec::new();
    f(&mut buf);
    buf
}

#[test]
fn ids_keep_their_natural_width() {
    assert_eq!(enc(|b| put_id(b, id::SIMPLE_BLOCK)), [0xA3]);
    assert_eq!(enc(|b| put_id(b, id::SEEK)), [0x4D, 0xBB]);
    assert_eq!(enc(|b| put_id(b, id::TIMECODE_SCALE)), [0x2A, 0xD7, 0xB1]);
    assert_eq!(enc(|b| put_id(b, id::SEGMENT)), [0x18, 0x53, 0x80, 0x67]);
}

#[test]
fn sizes_use_shortest_vint_and_avoid_reserved_all_ones() {
    assert_eq!(enc(|b| put_size(b, 0)), [0x80]);
    assert_eq!(enc(|b| put_size(b, 126)), [0xFE]);
    // 127 in one byte would read as "unknown".
    assert_eq!(enc(|b| put_size(b, 127)), [0x40, 0x7F]);
    assert_eq!(enc(|b| put_size(b, 300)), [0x41, 0x2C]);
    assert_eq!(
        enc(|b| put_size_fixed(b, 5, 8)),
        [0x01, 0, 0, 0, 0, 0, 0, 5]
    );
}

#[test]
fn uints_are_minimal_big_endian() {
    assert_eq!(enc(|b| put_uint(b, id::TRACK_NUMBER, 0)), [0xD7, 0x81, 0x00]);
    assert_eq!(enc(|b| put_uint(b, id::TRACK_NUMBER, 1)), [0xD7, 0x81, 0x01]);
    assert_eq!(
        enc(|b| put_uint(b, id::TIMECODE_SCALE, 1_000_000)),
        [0x2A, 0xD7, 0xB1, 0x83, 0x0F, 0x42, 0x40]
    );
}

#[test]
fn floats_and_strings() {
    let f = enc(|b| put_float(b, id::DURATION, 1.5));
    assert_eq!(&f[..3], &[0x44, 0x89, 0x88]);
    assert_eq!(BigEndian::read_f64(&f[3..]), 1.5);
    assert_eq!(enc(|b| put_str(b, id::CODEC_ID, "V_VP8")), b"\x86\x85V_VP8");
}

#[test]
fn crc_master_checks_its_children() {
    let children = enc(|b| put_uint(b, id::TIMECODE, 42));
    let m = enc(|b| put_master_crc(b, id::CLUSTER, &children));
    assert_eq!(&m[..4], &[0x1F, 0x43, 0xB6, 0x75]);
    assert_eq!(m[4], 0x80 | (6 + children.len() as u8));
    assert_eq!(&m[5..7], &[0xBF, 0x84]);
    assert_eq!(LittleEndian::read_u32(&m[7..11]), crc32fast::hash(&children));
    assert_eq!(&m[11..], children.as_slice());
}

#[test]
fn void_fills_exact_lengths() {
    for total in [2usize, 5, 8, 9, 10, 128] {
        let v = enc(|b| put_void(b, total));
        assert_eq!(v.len(), total, "total {total}");
        assert_eq!(v[0], 0xEC);
    }
    assert_eq!(enc(|b| put_void(b, 2)), [0xEC, 0x80]);
    assert_eq!(enc(|b| put_void(b, 9))[1], 0x01);
}
