use super::*;

#[test]
fn video_black_and_white_levels() {
    assert_eq!(yuv_to_rgb(16, 128, 128), [0, 0, 0]);
    let [r, g, b] = yuv_to_rgb(235, 128, 128);
    assert!(r >= 254 && g >= 254 && b >= 254, "got {r},{g},{b}");
}

#[test]
fn every_yuv_input_is_clamped_and_luma_is_monotonic() {
    for u in (0..=255u8).step_by(15) {
        for v in (0..=255u8).step_by(15) {
            let mut prev = [0u8; 3];
            for y in 0..=255u8 {
                // Outputs are u8, so the range check is the absence of wraparound.
                let rgb = yuv_to_rgb(y, u, v);
                for c in 0..3 {
                    assert!(rgb[c] >= prev[c], "y={y} u={u} v={v} channel {c}");
                }
                prev = rgb;
            }
        }
    }
    assert_eq!(yuv_to_rgb(0, 0, 0)[0], 0);
    assert_eq!(yuv_to_rgb(255, 255, 255)[2], 255);
}

#[test]
fn forward_then_inverse_is_close_for_primaries() {
    for rgb in [[0u8, 0, 0], [255, 255, 255], [200, 30, 40], [10, 180, 90], [64, 64, 220]] {
        let [y, u, v] = rgb_to_yuv(rgb[0], rgb[1], rgb[2]);
        let back = yuv_to_rgb(y, u, v);
        for c in 0..3 {
            let d = (i32::from(back[c]) - i32::from(rgb[c])).abs();
            assert!(d <= 3, "{rgb:?} -> {back:?}");
        }
    }
}

fn planes(w: usize, h: usize) -> (Vec<u8>, Vec<u8>, Vec<u8>) {
    let cw = w.div_ceil(2);
    let ch = h.div_ceil(2);
    (vec![0; w * h], vec![0; cw * ch], vec![0; cw * ch])
}

#[test]
fn packed_yuv_chroma_is_truncating_box_average() {
    // 2x2 block with G = 1,2,2,2 (mean 1.75) and B = 10,10,10,13 (mean 10.75).
    let rgba = [
        50, 1, 10, 255, //
        60, 2, 10, 255, //
        70, 2, 10, 255, //
        80, 2, 13, 255,
    ];
    let (mut y, mut u, mut v) = planes(2, 2);
    let mut dst = Yuv420Mut {
        width: 2,
        height: 2,
        y: &mut y,
        u: &mut u,
        v: &mut v,
        y_stride: 2,
        u_stride: 1,
        v_stride: 1,
    };
    rgba_to_yuv420(&rgba, InputColor::PackedYuv, &mut dst).unwrap();
    assert_eq!(y, vec![50, 60, 70, 80]);
    assert_eq!(u, vec![1]);
    assert_eq!(v, vec![10]);
}

#[test]
fn odd_dimensions_reuse_edge_texels() {
    let rgba: Vec<u8> = [200u8, 30, 40, 255].repeat(3 * 3);
    let (mut y, mut u, mut v) = planes(3, 3);
    let mut dst = Yuv420Mut {
        width: 3,
        height: 3,
        y: &mut y,
        u: &mut u,
        v: &mut v,
        y_stride: 3,
        u_stride: 2,
        v_stride: 2,
    };
    rgba_to_yuv420(&rgba, InputColor::Rgba, &mut dst).unwrap();
    let [ey, eu, ev] = rgb_to_yuv(200, 30, 40);
    assert!(y.iter().all(|&s| s == ey));
    assert!(u.iter().all(|&s| s == eu));
    assert!(v.iter().all(|&s| s == ev));
}

#[test]
fn yuv420_to_rgba_maps_chroma_by_halving_coords() {
    // 4x2 luma, 2x1 chroma; left half neutral, right half strong red chroma.
    let y = [128u8; 8];
    let u = [128u8, 128];
    let v = [128u8, 240];
    let src = Yuv420Ref {
        width: 4,
        height: 2,
        y: &y,
        u: &u,
        v: &v,
        y_stride: 4,
        u_stride: 2,
        v_stride: 2,
    };
    let out = yuv420_to_rgba(&src);
    assert_eq!(out.len(), 4 * 2 * 4);
    let px = |x: usize, y: usize| &out[(y * 4 + x) * 4..(y * 4 + x) * 4 + 4];
    assert_eq!(px(0, 0), px(1, 1));
    assert_eq!(px(2, 0), px(3, 1));
    assert!(px(2, 0)[0] > px(0, 0)[0]);
    assert!(out.chunks_exact(4).all(|p| p[3] == 255));
}

#[test]
fn strided_planes_ignore_padding() {
    let y = [16u8, 16, 99, 99, 16, 16, 99, 99];
    let u = [128u8, 77];
    let v = [128u8, 77];
    let src = Yuv420Ref {
        width: 2,
        height: 2,
        y: &y,
        u: &u,
        v: &v,
        y_stride: 4,
        u_stride: 2,
        v_stride: 2,
    };
    let out = yuv420_to_rgba(&src);
    assert_eq!(out, [0, 0, 0, 255].repeat(4));
}

#[test]
fn short_buffers_are_rejected_not_indexed() {
    let (mut y, mut u, mut v) = planes(4, 4);
    let mut dst = Yuv420Mut {
        width: 4,
        height: 4,
        y: &mut y,
        u: &mut u,
        v: &mut v,
        y_stride: 4,
        u_stride: 2,
        v_stride: 2,
    };
    let short = [0u8; 4 * 4 * 4 - 4];
    let err = rgba_to_yuv420(&short, InputColor::Rgba, &mut dst).unwrap_err();
    assert!(matches!(err, MediaError::Validation(_)), "{err}");

    let (mut y, mut u, mut v) = planes(4, 4);
    let mut narrow = Yuv420Mut {
        width: 4,
        height: 4,
        y: &mut y[..10],
        u: &mut u,
        v: &mut v,
        y_stride: 4,
        u_stride: 2,
        v_stride: 2,
    };
    let full = [0u8; 4 * 4 * 4];
    assert!(rgba_to_yuv420(&full, InputColor::Rgba, &mut narrow).is_err());
    assert!(rgba_to_yuv420(&full, InputColor::Rgba, &mut dst).is_ok());
}
