pub mod constants;
pub mod pixel;
pub mod pixel_buffer;
