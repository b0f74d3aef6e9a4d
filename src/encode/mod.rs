//! Frame exporters.
//!
//! Exporters consume raw RGBA8 frames, independent of [`crate::Image`], and persist them either as
//! a numbered still sequence or as a VP8 `.webm` file.

/// Numbered still-image sequence output.
pub mod frames;
/// Generic frame sink trait and built-in sinks.
pub mod sink;
/// WebM/VP8 output.
pub mod webm;
