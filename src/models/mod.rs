//! Data models for batch report analysis.

mod record;
mod task;

pub use record::{FileRecord, RecordStatus, TopicCount};
pub use task::{DocumentKind, ExtractionOutcome, FileTask};
pub(crate) use task::bare_name;
