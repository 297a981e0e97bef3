pub mod metadata;
pub mod output_file;
