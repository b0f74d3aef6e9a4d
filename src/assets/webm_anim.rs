use std::path::Path;

use crate::assets::color::yuv420_to_rgba;
use crate::assets::raster::Image;
use crate::codec::vp8::Vp8Decoder;
use crate::container::demux::Vp8TrackReader;
use crate::foundation::error::MediaResult;

/// Decode every picture of the first VP8 track of a WebM file into an [`Image`].
///
/// Any container or bitstream error fails the whole file. A failing decoder teardown is logged
/// and the decoded frames are kept.
#[tracing::instrument(level = "debug", skip_all, fields(path = %path.display()))]
pub fn decode_webm(path: &Path) -> MediaResult<Vec<Image>> {
    let mut reader = Vp8TrackReader::open(path)?;
    let mut decoder = Vp8Decoder::new()?;
    let mut out = Vec::new();

    while let Some(packet) = reader.next_packet()? {
        decoder.decode(packet)?;
        while let Some(pic) = decoder.next_picture()? {
            let rgba = yuv420_to_rgba(&pic);
            out.push(Image::from_rgba(pic.width, pic.height, rgba)?);
            tracing::trace!(target: "trance_media::progress", marker = ";");
        }
    }

    if let Err(e) = decoder.close() {
        tracing::warn!(path = %path.display(), "{e}");
    }
    Ok(out)
}

#[cfg(all(test, feature = "vpx"))]
#[path = "../../tests/unit/assets/webm_anim.rs"]
mod tests;
