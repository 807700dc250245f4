pub mod adapter;
pub mod identifier;
pub mod parser;
