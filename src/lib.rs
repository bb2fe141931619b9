pub mod backend;
pub mod cli;
pub mod config;
pub mod error;
pub mod loader;
pub mod progress;
pub mod render;
pub mod workflow;
