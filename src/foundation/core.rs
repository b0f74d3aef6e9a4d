use std::path::Path;

use crate::foundation::error::{MediaError, MediaResult};

/// Frames-per-second represented as a rational `num/den`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    /// Numerator (frames).
    pub num: u32,
    /// Denominator (seconds), must be non-zero.
    pub den: u32, // must be > 0
}

impl Fps {
    /// Create a validated FPS value.
    pub fn new(num: u32, den: u32) -> MediaResult<Self> {
        if den == 0 {
            return Err(MediaError::validation("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(MediaError::validation("Fps num must be > 0"));
        }
        Ok(Self { num, den })
    }

    /// Whole-number frame rate, e.g. `Fps::whole(30)`.
    pub fn whole(fps: u32) -> MediaResult<Self> {
        Self::new(fps, 1)
    }

    /// Convert to floating-point FPS.
    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    /// Duration of one frame in nanoseconds, truncated.
    pub fn frame_duration_ns(self) -> u64 {
        1_000_000_000u64 * u64::from(self.den) / u64::from(self.num)
    }

    /// Presentation timestamp in nanoseconds for a presentation index counted in `1/fps` units.
    ///
    /// Integer math, truncating: `pts * 1e9 * den / num`.
    pub fn pts_to_ns(self, pts: u64) -> u64 {
        let ns = u128::from(pts) * 1_000_000_000u128 * u128::from(self.den) / u128::from(self.num);
        u64::try_from(ns).unwrap_or(u64::MAX)
    }
}

/// Source format, chosen purely from the file extension.
///
/// Content is never sniffed: a mislabeled file goes to the decoder its extension names.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    /// `.gif`
    Gif,
    /// `.webm`
    Webm,
    /// `.jpg` / `.jpeg`
    Jpeg,
    /// Anything else (handled by the general-purpose still decoder).
    Other,
}

impl MediaKind {
    /// Classify `path` by its extension (ASCII case-insensitive).
    pub fn from_path(path: &Path) -> Self {
        if ext_is(path, "gif") {
            Self::Gif
        } else if ext_is(path, "webm") {
            Self::Webm
        } else if ext_is(path, "jpg") || ext_is(path, "jpeg") {
            Self::Jpeg
        } else {
            Self::Other
        }
    }

    /// Return `true` for formats that [`crate::load_animation`] accepts.
    pub fn is_animation(self) -> bool {
        matches!(self, Self::Gif | Self::Webm)
    }
}

/// Return `true` when the extension of `path` equals `ext`, ignoring ASCII case.
pub fn ext_is(path: &Path, ext: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(ext))
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
