//! Service layer for batch analysis.
//!
//! This module contains domain logic separated from UI concerns.
//! Services can be used by the CLI or embedded in other interfaces.

pub mod analysis;
pub mod batch;

pub use analysis::{detect_year, source_label, word_count, FileAnalyzer, UNKNOWN_YEAR};
pub use batch::{
    BatchError, BatchOptions, BatchRunner, NoProgress, ProgressSink, TaskOutcome, DEFAULT_WORKERS,
};
