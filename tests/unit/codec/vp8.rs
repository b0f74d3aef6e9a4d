use super::*;

fn fill(img: &mut Yuv420Image, y: u8, u: u8, v: u8) {
    let planes = img.planes_mut();
    planes.y.fill(y);
    planes.u.fill(u);
    planes.v.fill(v);
}

#[test]
fn encoder_output_decodes_to_matching_pictures() {
    let fps = Fps::whole(30).unwrap();
    let mut enc = Vp8Encoder::new(20, 14, fps, 500).unwrap();
    let mut img = Yuv420Image::alloc(20, 14).unwrap();
    fill(&mut img, 120, 90, 160);

    let mut frames = Vec::new();
    for pts in 0..4 {
        for p in enc.encode(Some(&img), pts, Deadline::Realtime).unwrap() {
            if let CxPacket::Frame(f) = p {
                frames.push(f);
            }
        }
    }
    let mut pts = 4;
    loop {
        let flushed = enc.encode(None, pts, Deadline::Realtime).unwrap();
        pts += 1;
        if flushed.is_empty() {
            break;
        }
        frames.extend(flushed.into_iter().filter_map(|p| match p {
            CxPacket::Frame(f) => Some(f),
            CxPacket::Other => None,
        }));
    }
    enc.close().unwrap();
    enc.close().unwrap();

    assert_eq!(frames.len(), 4);
    assert!(frames[0].keyframe);
    assert_eq!(frames.iter().map(|f| f.pts).collect::<Vec<_>>(), [0, 1, 2, 3]);

    let mut dec = Vp8Decoder::new().unwrap();
    let mut pictures = 0;
    for f in &frames {
        dec.decode(&f.data).unwrap();
        while let Some(pic) = dec.next_picture().unwrap() {
            assert_eq!((pic.width, pic.height), (20, 14));
            let luma = pic.y[pic.y_stride * 7 + 10];
            assert!((i32::from(luma) - 120).abs() <= 4, "luma {luma}");
            pictures += 1;
        }
    }
    assert_eq!(pictures, 4);
    dec.close().unwrap();
}

#[test]
fn garbage_bitstream_is_a_codec_error() {
    let mut dec = Vp8Decoder::new().unwrap();
    let err = dec.decode(&[0xFF; 3]).unwrap_err();
    assert!(matches!(err, MediaError::Codec(_)), "{err}");
}

#[test]
fn zero_sized_encoder_is_rejected() {
    assert!(Vp8Encoder::new(0, 10, Fps::whole(30).unwrap(), 100).is_err());
}
