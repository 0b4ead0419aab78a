pub mod contents_json;
pub mod error;
pub mod generate;
pub mod rasterize;
pub mod spec;
