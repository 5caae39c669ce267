// file: src/pipeline/mod.rs
// description: import pipeline module exports
// reference: Internal module structure

pub mod orchestrator;
pub mod progress;

pub use orchestrator::ImportPipeline;
pub use progress::{ImportStats, ProgressTracker};
