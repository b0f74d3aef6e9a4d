pub(crate) mod backend;
pub(crate) mod texture;
#[cfg(feature = "gpu")]
pub(crate) mod wgpu_backend;
