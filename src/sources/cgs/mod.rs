pub mod adapter;
pub mod extractor;
pub mod label;
pub mod parser;
