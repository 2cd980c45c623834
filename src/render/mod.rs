pub(crate) mod controller;
pub(crate) mod session;
pub(crate) mod source;
