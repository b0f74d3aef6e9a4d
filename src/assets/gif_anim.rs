use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::assets::raster::Image;
use crate::foundation::error::{MediaError, MediaResult};

/// Fully parsed GIF: logical screen, palettes and every stored frame, read before compositing.
struct Slurped {
    width: u32,
    height: u32,
    global_palette: Option<Vec<u8>>,
    background: [u8; 4],
    frames: Vec<gif::Frame<'static>>,
}

fn slurp(path: &Path) -> MediaResult<Slurped> {
    let file =
        File::open(path).map_err(|e| MediaError::open(format!("{}: {e}", path.display())))?;
    let mut opts = gif::DecodeOptions::new();
    opts.set_color_output(gif::ColorOutput::Indexed);
    let mut decoder = opts
        .read_info(BufReader::new(file))
        .map_err(|e| MediaError::open(format!("gif header: {e}")))?;

    let global_palette = decoder.global_palette().map(<[u8]>::to_vec);
    let background = decoder
        .bg_color()
        .and_then(|i| global_palette.as_deref()?.get(i * 3..i * 3 + 3))
        .map_or([0, 0, 0, 0], |c| [c[0], c[1], c[2], 255]);

    let mut frames = Vec::new();
    while let Some(frame) = decoder
        .read_next_frame()
        .map_err(|e| MediaError::codec(format!("gif frame {}: {e}", frames.len())))?
    {
        frames.push(frame.clone());
    }

    Ok(Slurped {
        width: u32::from(decoder.width()),
        height: u32::from(decoder.height()),
        global_palette,
        background,
        frames,
    })
}

/// Decode every stored frame of a GIF into a full-canvas [`Image`].
///
/// Frames are composited on a persistent canvas. Disposal "restore to background" clears the whole
/// canvas to the background color before the frame that carries it is drawn; other disposal
/// methods leave the canvas alone. Transparent indices keep the canvas pixel underneath. Frame
/// delays are not read.
#[tracing::instrument(level = "debug", skip_all, fields(path = %path.display()))]
pub fn decode_gif(path: &Path) -> MediaResult<Vec<Image>> {
    let gif = slurp(path)?;
    let (cw, ch) = (gif.width as usize, gif.height as usize);
    let mut canvas: Vec<u8> = gif.background.repeat(cw * ch);
    let mut out = Vec::with_capacity(gif.frames.len());

    for (n, frame) in gif.frames.iter().enumerate() {
        if frame.dispose == gif::DisposalMethod::Background {
            for px in canvas.chunks_exact_mut(4) {
                px.copy_from_slice(&gif.background);
            }
        }

        let palette = frame
            .palette
            .as_deref()
            .or(gif.global_palette.as_deref())
            .ok_or_else(|| MediaError::codec(format!("gif frame {n} has no color table")))?;

        let (left, top) = (usize::from(frame.left), usize::from(frame.top));
        let fw = usize::from(frame.width);
        for (row, line) in frame.buffer.chunks(fw.max(1)).enumerate() {
            let cy = top + row;
            if cy >= ch {
                break;
            }
            for (col, &index) in line.iter().enumerate() {
                let cx = left + col;
                if cx >= cw {
                    break;
                }
                if frame.transparent == Some(index) {
                    continue;
                }
                let i = usize::from(index) * 3;
                let Some(rgb) = palette.get(i..i + 3) else {
                    continue;
                };
                let at = (cy * cw + cx) * 4;
                canvas[at..at + 4].copy_from_slice(&[rgb[0], rgb[1], rgb[2], 255]);
            }
        }

        out.push(Image::from_rgba(gif.width, gif.height, canvas.clone())?);
        tracing::trace!(target: "trance_media::progress", marker = ";");
    }

    Ok(out)
}

/// Return `true` when `path` parses as a GIF with at least one stored frame.
///
/// Read errors are logged and reported as `false`.
pub fn is_gif_animated(path: impl AsRef<Path>) -> bool {
    let path = path.as_ref();
    match slurp(path) {
        Ok(gif) => !gif.frames.is_empty(),
        Err(e) => {
            tracing::warn!(path = %path.display(), "couldn't read gif: {e}");
            false
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/gif_anim.rs"]
mod tests;
