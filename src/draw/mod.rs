pub(crate) mod color;
pub(crate) mod display;
pub(crate) mod painter;
