use std::io::BufReader;
use std::path::Path;

use crate::assets::raster::Image;
use crate::foundation::core::MediaKind;
use crate::foundation::error::{MediaError, MediaResult};

/// Decode a single still image, or return [`Image::empty`] and log why not.
pub fn load_image(path: impl AsRef<Path>) -> Image {
    let path = path.as_ref();
    match try_load_image(path) {
        Ok(img) => {
            tracing::trace!(target: "trance_media::progress", marker = ".");
            img
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), "couldn't load image: {e}");
            Image::empty()
        }
    }
}

/// Decode a single still image.
///
/// `.jpg`/`.jpeg` go through a progressive-capable JPEG decoder; everything else through the
/// general `image` decoder (format guessed from the extension).
#[tracing::instrument(level = "debug", skip_all, fields(path = %path.as_ref().display()))]
pub fn try_load_image(path: impl AsRef<Path>) -> MediaResult<Image> {
    let path = path.as_ref();
    if MediaKind::from_path(path) == MediaKind::Jpeg {
        return decode_jpeg(path);
    }
    let dyn_img = image::open(path).map_err(|e| match e {
        image::ImageError::IoError(io) => MediaError::open(format!("{}: {io}", path.display())),
        image::ImageError::Unsupported(u) => MediaError::unsupported(u.to_string()),
        other => MediaError::codec(other.to_string()),
    })?;
    Ok(Image::from_rgba_image(dyn_img.to_rgba8()))
}

fn decode_jpeg(path: &Path) -> MediaResult<Image> {
    let file = std::fs::File::open(path)
        .map_err(|e| MediaError::open(format!("{}: {e}", path.display())))?;
    let mut decoder = jpeg_decoder::Decoder::new(BufReader::new(file));
    let data = decoder
        .decode()
        .map_err(|e| MediaError::codec(format!("jpeg decode: {e}")))?;
    let info = decoder
        .info()
        .ok_or_else(|| MediaError::codec("jpeg decoder produced no image info"))?;

    let rgba = jpeg_to_rgba(&data, info.pixel_format)?;
    Image::from_rgba(u32::from(info.width), u32::from(info.height), rgba)
}

fn jpeg_to_rgba(data: &[u8], format: jpeg_decoder::PixelFormat) -> MediaResult<Vec<u8>> {
    use jpeg_decoder::PixelFormat;

    let rgba = match format {
        PixelFormat::RGB24 => data
            .chunks_exact(3)
            .flat_map(|p| [p[0], p[1], p[2], 255])
            .collect(),
        PixelFormat::L8 => data.iter().flat_map(|&l| [l, l, l, 255]).collect(),
        // Big-endian samples; keep the high byte.
        PixelFormat::L16 => data
            .chunks_exact(2)
            .flat_map(|p| [p[0], p[0], p[0], 255])
            .collect(),
        PixelFormat::CMYK32 => data
            .chunks_exact(4)
            .flat_map(|p| {
                let k = 255 - u16::from(p[3]);
                let ch = |c: u8| ((255 - u16::from(c)) * k / 255) as u8;
                [ch(p[0]), ch(p[1]), ch(p[2]), 255]
            })
            .collect(),
        #[allow(unreachable_patterns)]
        _ => return Err(MediaError::unsupported("jpeg pixel format")),
    };
    Ok(rgba)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/still.rs"]
mod tests;
