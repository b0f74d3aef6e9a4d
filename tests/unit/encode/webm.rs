use super::*;

fn temp_path(name: &str) -> PathBuf {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir()
        .join(format!("trance_webm_{}_{}", std::process::id(), nanos))
        .join(name)
}

#[test]
fn opts_defaults() {
    let o = WebmExporterOpts::new("x.webm", 8, 8, Fps::whole(30).unwrap(), 500);
    assert_eq!(o.writing_app, "trance");
    assert_eq!(o.input, InputColor::Rgba);
    assert_eq!(o.deadline, Deadline::GoodQuality);
}

#[test]
fn zero_size_fails_setup_without_panicking() {
    let mut ex = WebmExporter::new(temp_path("z.webm"), 0, 8, Fps::whole(30).unwrap(), 500);
    assert!(!ex.success());
    ex.encode_frame(&[]);
    assert!(ex.try_encode_frame(&[]).is_err());
    assert!(ex.finish().is_ok());
}

#[test]
fn wrong_frame_len_is_rejected_but_export_continues() {
    let path = temp_path("len.webm");
    let mut ex = WebmExporter::new(&path, 16, 16, Fps::whole(10).unwrap(), 200);
    assert!(ex.success());
    assert!(matches!(
        ex.try_encode_frame(&[0u8; 5]),
        Err(MediaError::Validation(_))
    ));
    ex.encode_frame(&[128u8; 16 * 16 * 4]);
    ex.finish().unwrap();
    assert!(ex.finish().is_ok());
    assert!(ex.try_encode_frame(&[128u8; 16 * 16 * 4]).is_err());

    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(&bytes[..4], &[0x1A, 0x45, 0xDF, 0xA3]);
}

#[test]
fn drop_finalizes_the_file() {
    let path = temp_path("drop.webm");
    {
        let mut ex = WebmExporter::new(&path, 8, 8, Fps::whole(25).unwrap(), 100);
        for _ in 0..3 {
            ex.encode_frame(&[40u8; 8 * 8 * 4]);
        }
    }
    let frames = crate::assets::webm_anim::decode_webm(&path).unwrap();
    assert_eq!(frames.len(), 3);
}
