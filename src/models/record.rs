//! Per-document analysis records.

use serde::{Deserialize, Serialize};

/// Outcome status of a single document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordStatus {
    #[serde(rename = "SUCCESS")]
    Success,
    #[serde(rename = "SKIPPED (Scan)")]
    SkippedScan,
    #[serde(rename = "ERROR")]
    Error,
}

impl RecordStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "SUCCESS",
            Self::SkippedScan => "SKIPPED (Scan)",
            Self::Error => "ERROR",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "SUCCESS" => Some(Self::Success),
            "SKIPPED (Scan)" => Some(Self::SkippedScan),
            "ERROR" => Some(Self::Error),
            _ => None,
        }
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::SkippedScan)
    }
}

impl std::fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Occurrence count for one topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicCount {
    pub topic: String,
    pub count: u64,
}

/// Result row for one input file.
///
/// Topic counts are kept in taxonomy order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    /// Archive name without extension.
    pub source_label: String,
    /// First `19xx`/`20xx` token from the file or archive name, or `Unknown`.
    pub year: String,
    pub file_name: String,
    pub total_word_count: u64,
    pub status: RecordStatus,
    pub topics: Vec<TopicCount>,
}

impl FileRecord {
    /// Record for a file whose worker failed: zero counts for every topic.
    pub fn error<'a>(
        source_label: String,
        year: String,
        file_name: String,
        topics: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        Self {
            source_label,
            year,
            file_name,
            total_word_count: 0,
            status: RecordStatus::Error,
            topics: topics
                .into_iter()
                .map(|topic| TopicCount {
                    topic: topic.to_string(),
                    count: 0,
                })
                .collect(),
        }
    }

    /// Count for a topic label, if the record carries it.
    pub fn count(&self, topic: &str) -> Option<u64> {
        self.topics
            .iter()
            .find(|t| t.topic == topic)
            .map(|t| t.count)
    }

    /// Topic with the highest count; the first one in taxonomy order wins ties.
    pub fn top_topic(&self) -> Option<&TopicCount> {
        let mut best: Option<&TopicCount> = None;
        for t in &self.topics {
            if best.map_or(true, |b| t.count > b.count) {
                best = Some(t);
            }
        }
        best
    }

    pub fn total_hits(&self) -> u64 {
        self.topics.iter().map(|t| t.count).sum()
    }
}
