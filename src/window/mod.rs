pub(crate) mod focus;
