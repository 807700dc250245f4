pub mod content;
pub mod corpus;
pub mod designator;
pub mod ingest;
pub mod runtime;
pub mod sources;
pub mod text;
pub mod types;
