pub(crate) mod color;
pub(crate) mod opts;
pub(crate) mod pixmap;
pub(crate) mod registry;
pub(crate) mod store;
