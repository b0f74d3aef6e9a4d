pub(crate) mod color;
pub(crate) mod gif_anim;
pub(crate) mod media;
pub(crate) mod raster;
pub(crate) mod still;
pub(crate) mod webm_anim;
