pub(crate) mod blend;
pub(crate) mod buffer;
pub(crate) mod shift;
