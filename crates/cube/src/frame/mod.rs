mod buffer;
mod shapes;

pub use buffer::{CHANNELS_PER_CELL, Framebuffer, GRID_DIM, quantize};
pub use shapes::{blend_column_fractional, render_blob};
