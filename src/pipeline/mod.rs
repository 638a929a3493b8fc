pub mod runner;

pub use runner::{BatchSummary, Pipeline, PipelineError};
