pub mod extractor;
pub mod stats;
pub mod types;
