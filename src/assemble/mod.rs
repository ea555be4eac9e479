pub(crate) mod codec;
pub(crate) mod container;
pub(crate) mod heif;
