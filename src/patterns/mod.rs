//! Keyword taxonomy and compiled topic matchers.
//!
//! Two pattern sets are compiled once per process: a single-language set
//! built from the base taxonomy and a bilingual set that also matches the
//! Indonesian overlay. Both are read-only and shared across workers.

mod compiler;
mod taxonomy;

pub use compiler::{PatternError, PatternLibrary, PatternSet, TopicMatcher};
pub use taxonomy::{base_taxonomy, indonesian_overlay, topic_labels, Overlay, TopicTerms, TOPICS};
