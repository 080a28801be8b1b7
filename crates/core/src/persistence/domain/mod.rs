pub mod image_reader;
pub mod image_writer;
pub mod output_name;
