pub(crate) mod document;
pub(crate) mod sequence;
pub(crate) mod timestamp;
