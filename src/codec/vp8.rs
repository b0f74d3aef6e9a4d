use std::ffi::CStr;
use std::mem::MaybeUninit;
use std::os::raw::{c_int, c_uint};
use std::ptr;

use vpx_sys::{
    VPX_DECODER_ABI_VERSION, VPX_DL_BEST_QUALITY, VPX_DL_GOOD_QUALITY, VPX_DL_REALTIME,
    VPX_ENCODER_ABI_VERSION, VPX_FRAME_IS_KEY, vpx_codec_ctx_t, vpx_codec_cx_pkt_kind,
    vpx_codec_dec_init_ver, vpx_codec_decode, vpx_codec_destroy, vpx_codec_enc_cfg_t,
    vpx_codec_enc_config_default, vpx_codec_enc_init_ver, vpx_codec_encode, vpx_codec_err_t,
    vpx_codec_error, vpx_codec_error_detail, vpx_codec_get_cx_data, vpx_codec_get_frame,
    vpx_codec_iter_t, vpx_codec_vp8_cx, vpx_codec_vp8_dx, vpx_image_t, vpx_img_alloc,
    vpx_img_fmt, vpx_img_free,
};

use crate::assets::color::{Yuv420Mut, Yuv420Ref};
use crate::codec::{CxPacket, Deadline, EncodedFrame};
use crate::foundation::core::Fps;
use crate::foundation::error::{MediaError, MediaResult};

fn codec_error(ctx: &vpx_codec_ctx_t, what: &str) -> MediaError {
    // SAFETY: both calls return either null or a NUL-terminated string owned by `ctx`.
    let (msg, detail) = unsafe {
        let msg = vpx_codec_error(ctx);
        let detail = vpx_codec_error_detail(ctx);
        (
            (!msg.is_null()).then(|| CStr::from_ptr(msg).to_string_lossy().into_owned()),
            (!detail.is_null()).then(|| CStr::from_ptr(detail).to_string_lossy().into_owned()),
        )
    };
    let msg = msg.unwrap_or_else(|| "unknown error".to_owned());
    match detail {
        Some(d) => MediaError::codec(format!("{what}: {msg} ({d})")),
        None => MediaError::codec(format!("{what}: {msg}")),
    }
}

fn zeroed_ctx() -> Box<vpx_codec_ctx_t> {
    // SAFETY: vpx_codec_ctx_t is a plain C struct; all-zero is its documented pre-init state.
    Box::new(unsafe { MaybeUninit::zeroed().assume_init() })
}

/// libvpx VP8 decoder session.
pub struct Vp8Decoder {
    ctx: Box<vpx_codec_ctx_t>,
    iter: vpx_codec_iter_t,
    open: bool,
}

// The context is only touched through `&mut self`.
unsafe impl Send for Vp8Decoder {}

impl Vp8Decoder {
    /// Initialise a decoder session.
    pub fn new() -> MediaResult<Self> {
        let mut ctx = zeroed_ctx();
        // SAFETY: ctx is a zeroed, heap-pinned context; a null cfg selects defaults.
        let res = unsafe {
            vpx_codec_dec_init_ver(
                &mut *ctx,
                vpx_codec_vp8_dx(),
                ptr::null(),
                0,
                VPX_DECODER_ABI_VERSION as c_int,
            )
        };
        if res != vpx_codec_err_t::VPX_CODEC_OK {
            return Err(codec_error(&ctx, "vp8 decoder init"));
        }
        Ok(Self {
            ctx,
            iter: ptr::null(),
            open: true,
        })
    }

    /// Feed one compressed frame. Pictures become available through [`Self::next_picture`].
    pub fn decode(&mut self, data: &[u8]) -> MediaResult<()> {
        let len = c_uint::try_from(data.len())
            .map_err(|_| MediaError::codec("vp8 packet too large"))?;
        // SAFETY: `data` outlives the call; libvpx copies what it keeps.
        let res = unsafe {
            vpx_codec_decode(&mut *self.ctx, data.as_ptr(), len, ptr::null_mut(), 0)
        };
        self.iter = ptr::null();
        if res != vpx_codec_err_t::VPX_CODEC_OK {
            return Err(codec_error(&self.ctx, "vp8 decode"));
        }
        Ok(())
    }

    /// Next decoded picture from the last [`Self::decode`] call, in codec output order.
    pub fn next_picture(&mut self) -> MediaResult<Option<Yuv420Ref<'_>>> {
        // SAFETY: the iterator was reset by `decode`; the returned image lives until the next
        // decode call, which needs `&mut self` and so cannot overlap the returned borrow.
        let img = unsafe { vpx_codec_get_frame(&mut *self.ctx, &mut self.iter) };
        if img.is_null() {
            return Ok(None);
        }
        // SAFETY: non-null images from libvpx are valid until the next decode.
        let img: &vpx_image_t = unsafe { &*img };
        if img.fmt != vpx_img_fmt::VPX_IMG_FMT_I420 {
            return Err(MediaError::unsupported(format!(
                "decoded picture format {:?}",
                img.fmt
            )));
        }
        // SAFETY: I420 planes hold `stride * rows` bytes for the luma and chroma heights.
        Ok(Some(unsafe { i420_view(img) }))
    }

    /// Tear the session down. Subsequent calls are no-ops.
    pub fn close(&mut self) -> MediaResult<()> {
        if !std::mem::replace(&mut self.open, false) {
            return Ok(());
        }
        // SAFETY: the context was initialised and is destroyed once.
        let res = unsafe { vpx_codec_destroy(&mut *self.ctx) };
        if res != vpx_codec_err_t::VPX_CODEC_OK {
            return Err(MediaError::codec(format!("vp8 decoder teardown: {res:?}")));
        }
        Ok(())
    }
}

impl Drop for Vp8Decoder {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            tracing::warn!("{e}");
        }
    }
}

unsafe fn i420_view(img: &vpx_image_t) -> Yuv420Ref<'_> {
    let (w, h) = (img.d_w, img.d_h);
    let ch = h.div_ceil(2) as usize;
    let stride = |i: usize| img.stride[i].max(0) as usize;
    // SAFETY: forwarded from the caller.
    unsafe {
        Yuv420Ref {
            width: w,
            height: h,
            y: std::slice::from_raw_parts(img.planes[0], stride(0) * h as usize),
            u: std::slice::from_raw_parts(img.planes[1], stride(1) * ch),
            v: std::slice::from_raw_parts(img.planes[2], stride(2) * ch),
            y_stride: stride(0),
            u_stride: stride(1),
            v_stride: stride(2),
        }
    }
}

/// Scratch I420 image owned by libvpx's allocator.
pub struct Yuv420Image {
    img: *mut vpx_image_t,
}

unsafe impl Send for Yuv420Image {}

impl Yuv420Image {
    /// Allocate a `width x height` I420 image with 16-byte aligned rows.
    pub fn alloc(width: u32, height: u32) -> MediaResult<Self> {
        // SAFETY: a null `img` asks libvpx to allocate the descriptor too.
        let img =
            unsafe { vpx_img_alloc(ptr::null_mut(), vpx_img_fmt::VPX_IMG_FMT_I420, width, height, 16) };
        if img.is_null() {
            return Err(MediaError::codec(format!(
                "couldn't allocate {width}x{height} i420 image"
            )));
        }
        Ok(Self { img })
    }

    /// Mutable plane view for filling the image.
    pub fn planes_mut(&mut self) -> Yuv420Mut<'_> {
        // SAFETY: `img` is a live allocation owned by self; planes do not overlap.
        unsafe {
            let img = &*self.img;
            let (w, h) = (img.d_w, img.d_h);
            let ch = h.div_ceil(2) as usize;
            let stride = |i: usize| img.stride[i].max(0) as usize;
            Yuv420Mut {
                width: w,
                height: h,
                y: std::slice::from_raw_parts_mut(img.planes[0], stride(0) * h as usize),
                u: std::slice::from_raw_parts_mut(img.planes[1], stride(1) * ch),
                v: std::slice::from_raw_parts_mut(img.planes[2], stride(2) * ch),
                y_stride: stride(0),
                u_stride: stride(1),
                v_stride: stride(2),
            }
        }
    }
}

impl Drop for Yuv420Image {
    fn drop(&mut self) {
        // SAFETY: allocated by vpx_img_alloc and freed once.
        unsafe { vpx_img_free(self.img) };
    }
}

/// libvpx VP8 encoder session.
pub struct Vp8Encoder {
    ctx: Box<vpx_codec_ctx_t>,
    open: bool,
}

unsafe impl Send for Vp8Encoder {}

impl Vp8Encoder {
    /// Initialise an encoder for `width x height` frames at `fps`, targeting `bitrate_kbps`.
    pub fn new(width: u32, height: u32, fps: Fps, bitrate_kbps: u32) -> MediaResult<Self> {
        if width == 0 || height == 0 {
            return Err(MediaError::validation("vp8 encoder needs non-zero dimensions"));
        }
        let num = c_int::try_from(fps.num).map_err(|_| MediaError::validation("fps too large"))?;
        let den = c_int::try_from(fps.den).map_err(|_| MediaError::validation("fps too large"))?;

        // SAFETY: the config is plain data, filled in by libvpx before use.
        let mut cfg: vpx_codec_enc_cfg_t = unsafe { MaybeUninit::zeroed().assume_init() };
        let res = unsafe { vpx_codec_enc_config_default(vpx_codec_vp8_cx(), &mut cfg, 0) };
        if res != vpx_codec_err_t::VPX_CODEC_OK {
            return Err(MediaError::codec(format!("vp8 encoder config: {res:?}")));
        }
        cfg.g_w = width;
        cfg.g_h = height;
        // Timebase is one frame.
        cfg.g_timebase.num = den;
        cfg.g_timebase.den = num;
        cfg.rc_target_bitrate = bitrate_kbps;

        let mut ctx = zeroed_ctx();
        // SAFETY: ctx is zeroed and heap-pinned; cfg outlives the call.
        let res = unsafe {
            vpx_codec_enc_init_ver(
                &mut *ctx,
                vpx_codec_vp8_cx(),
                &cfg,
                0,
                VPX_ENCODER_ABI_VERSION as c_int,
            )
        };
        if res != vpx_codec_err_t::VPX_CODEC_OK {
            return Err(codec_error(&ctx, "vp8 encoder init"));
        }
        Ok(Self { ctx, open: true })
    }

    /// Submit one picture (or `None` to flush) and collect every packet the encoder emits.
    pub fn encode(
        &mut self,
        img: Option<&Yuv420Image>,
        pts: i64,
        deadline: Deadline,
    ) -> MediaResult<Vec<CxPacket>> {
        let deadline = match deadline {
            Deadline::Realtime => VPX_DL_REALTIME,
            Deadline::GoodQuality => VPX_DL_GOOD_QUALITY,
            Deadline::BestQuality => VPX_DL_BEST_QUALITY,
        };
        let raw = img.map_or(ptr::null(), |i| i.img.cast_const());
        // SAFETY: `raw` is null or a live I420 image matching the configured size.
        let res = unsafe { vpx_codec_encode(&mut *self.ctx, raw, pts, 1, 0, deadline as _) };
        if res != vpx_codec_err_t::VPX_CODEC_OK {
            return Err(codec_error(&self.ctx, "vp8 encode"));
        }

        let mut packets = Vec::new();
        let mut iter: vpx_codec_iter_t = ptr::null();
        loop {
            // SAFETY: packets are valid until the next encode call.
            let pkt = unsafe { vpx_codec_get_cx_data(&mut *self.ctx, &mut iter) };
            if pkt.is_null() {
                break;
            }
            let pkt = unsafe { &*pkt };
            if pkt.kind != vpx_codec_cx_pkt_kind::VPX_CODEC_CX_FRAME_PKT {
                packets.push(CxPacket::Other);
                continue;
            }
            // SAFETY: `frame` is the active union member for frame packets.
            let frame = unsafe { &pkt.data.frame };
            let data = unsafe { std::slice::from_raw_parts(frame.buf as *const u8, frame.sz as usize) };
            packets.push(CxPacket::Frame(EncodedFrame {
                data: data.to_vec(),
                pts: frame.pts,
                keyframe: frame.flags & VPX_FRAME_IS_KEY != 0,
            }));
        }
        Ok(packets)
    }

    /// Tear the session down. Subsequent calls are no-ops.
    pub fn close(&mut self) -> MediaResult<()> {
        if !std::mem::replace(&mut self.open, false) {
            return Ok(());
        }
        // SAFETY: initialised context, destroyed once.
        let res = unsafe { vpx_codec_destroy(&mut *self.ctx) };
        if res != vpx_codec_err_t::VPX_CODEC_OK {
            return Err(MediaError::codec(format!("vp8 encoder teardown: {res:?}")));
        }
        Ok(())
    }
}

impl Drop for Vp8Encoder {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            tracing::warn!("{e}");
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/codec/vp8.rs"]
mod tests;
