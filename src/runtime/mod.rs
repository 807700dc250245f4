pub mod callbacks;
pub mod logging;
pub mod mirror;
pub mod orchestrator;
pub mod types;
