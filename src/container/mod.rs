pub(crate) mod demux;
pub(crate) mod ebml;
pub(crate) mod mux;
