use super::*;
use crate::render::backend::HeadlessBackend;

fn solid(w: u32, h: u32, px: [u8; 4]) -> Image {
    Image::from_rgba(w, h, px.repeat((w * h) as usize)).unwrap()
}

#[test]
fn empty_image_is_the_zero_sentinel() {
    let img = Image::empty();
    assert_eq!((img.width(), img.height()), (0, 0));
    assert!(!img.is_valid());
    assert!(img.pixels().is_empty());
    assert!(img.texture().is_none());
    assert!(img.to_rgba_image().is_none());
    assert!(Image::from_rgba(0, 0, Vec::new()).unwrap().is_empty());
}

#[test]
fn from_rgba_checks_buffer_len() {
    assert!(Image::from_rgba(2, 2, vec![0; 15]).is_err());
    assert!(Image::from_rgba(0, 3, vec![0; 4]).is_err());
    let img = solid(3, 2, [1, 2, 3, 4]);
    assert_eq!(img.pixels().len(), 24);
    assert_eq!(&img.pixels()[..4], &[1, 2, 3, 4]);
}

#[test]
fn second_upload_is_a_noop() {
    let mut mgr = TextureManager::new(HeadlessBackend::new());
    let img = solid(4, 4, [255, 0, 0, 255]);
    assert!(img.ensure_texture_uploaded(&mut mgr));
    let id = img.texture().unwrap();
    assert!(!img.ensure_texture_uploaded(&mut mgr));
    assert_eq!(img.texture(), Some(id));
    assert_eq!(mgr.backend().created(), 1);
}

#[test]
fn clones_share_pixels_and_texture() {
    let mut mgr = TextureManager::new(HeadlessBackend::new());
    let a = solid(2, 2, [0, 255, 0, 255]);
    let b = a.clone();
    assert!(a.shares_pixels_with(&b));
    assert!(b.ensure_texture_uploaded(&mut mgr));
    assert!(!a.ensure_texture_uploaded(&mut mgr));
    assert_eq!(a.texture(), b.texture());

    let other = solid(2, 2, [0, 255, 0, 255]);
    assert!(!a.shares_pixels_with(&other));
}

#[test]
fn empty_image_upload_has_nothing_to_do() {
    let mut mgr = TextureManager::new(HeadlessBackend::new());
    assert!(!Image::empty().ensure_texture_uploaded(&mut mgr));
    assert_eq!(mgr.backend().created(), 0);
}

#[test]
fn last_clone_drop_enqueues_one_deletion() {
    let mut mgr = TextureManager::new(HeadlessBackend::new());
    let a = solid(1, 1, [0, 0, 0, 255]);
    let b = a.clone();
    a.ensure_texture_uploaded(&mut mgr);
    let id = a.texture().unwrap();

    drop(a);
    assert!(mgr.queue().is_empty());
    drop(b);
    assert_eq!(mgr.queue().len(), 1);

    assert_eq!(mgr.delete_pending(), 1);
    assert!(!mgr.backend().is_live(id));
    assert_eq!(mgr.backend().deleted(), 1);
}

#[test]
fn images_dropped_on_other_threads_are_swept_on_owner() {
    let mut mgr = TextureManager::new(HeadlessBackend::new());
    let images: Vec<Image> = (0..16).map(|i| solid(1, 1, [i, 0, 0, 255])).collect();
    for img in &images {
        assert!(img.ensure_texture_uploaded(&mut mgr));
    }

    let handles: Vec<_> = images
        .into_iter()
        .map(|img| std::thread::spawn(move || drop(img)))
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    assert_eq!(mgr.delete_pending(), 16);
    assert_eq!(mgr.backend().live_textures(), 0);
}
