pub mod capture;
pub mod cropping;
pub mod persistence;
pub mod pipeline;
pub mod shared;
