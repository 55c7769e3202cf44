pub mod curve;
pub mod overlay;

mod axes_draw;
