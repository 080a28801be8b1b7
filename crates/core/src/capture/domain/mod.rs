pub mod capture_size;
pub mod capture_source;
