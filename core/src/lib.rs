//! Slide image generation: prompt composition, generation jobs, run orchestration and reporting.

pub mod error;
pub mod plan;
pub mod prompt;
pub mod report;
pub mod resolver;
pub mod runner;
pub mod style;

#[cfg(test)]
pub(crate) mod test_support;

pub use error::{Result, SlideError};
pub use plan::load_plan;
pub use prompt::{compose, Layout};
pub use resolver::{AssetResolver, GenerationJob};
pub use runner::{FixedDelay, Orchestrator, Pacer, RunOptions};
pub use style::StyleTemplate;
