use super::*;

#[test]
fn fps_rejects_zero_parts() {
    assert!(Fps::new(0, 1).is_err());
    assert!(Fps::new(30, 0).is_err());
    assert_eq!(Fps::whole(25).unwrap(), Fps { num: 25, den: 1 });
}

#[test]
fn pts_to_ns_truncates_like_integer_division() {
    let fps = Fps::whole(30).unwrap();
    assert_eq!(fps.pts_to_ns(0), 0);
    assert_eq!(fps.pts_to_ns(1), 33_333_333);
    assert_eq!(fps.pts_to_ns(30), 1_000_000_000);

    let ntsc = Fps::new(30000, 1001).unwrap();
    assert_eq!(ntsc.pts_to_ns(30000), 1_001_000_000_000);
    assert_eq!(fps.frame_duration_ns(), 33_333_333);
}

#[test]
fn media_kind_dispatches_on_extension_only() {
    assert_eq!(MediaKind::from_path(Path::new("a/b.gif")), MediaKind::Gif);
    assert_eq!(MediaKind::from_path(Path::new("clip.WEBM")), MediaKind::Webm);
    assert_eq!(MediaKind::from_path(Path::new("x.jpg")), MediaKind::Jpeg);
    assert_eq!(MediaKind::from_path(Path::new("x.JPEG")), MediaKind::Jpeg);
    assert_eq!(MediaKind::from_path(Path::new("x.png")), MediaKind::Other);
    assert_eq!(MediaKind::from_path(Path::new("gif")), MediaKind::Other);
    assert!(MediaKind::Gif.is_animation());
    assert!(!MediaKind::Jpeg.is_animation());
}
