//! Compiles the taxonomy into case-insensitive, word-bounded matchers.

use std::sync::Arc;

use regex::Regex;
use thiserror::Error;

use super::taxonomy::{base_taxonomy, indonesian_overlay, Overlay, TopicTerms};
use crate::models::TopicCount;

#[derive(Debug, Error)]
pub enum PatternError {
    #[error("Topic {0} has no alternatives")]
    EmptyTopic(String),

    #[error("Invalid pattern for topic {topic}: {source}")]
    Regex {
        topic: String,
        #[source]
        source: regex::Error,
    },
}

/// One topic and its compiled matcher.
#[derive(Debug, Clone)]
pub struct TopicMatcher {
    topic: String,
    regex: Regex,
}

impl TopicMatcher {
    fn compile(topic: &str, terms: &[String]) -> Result<Self, PatternError> {
        let mut alternatives: Vec<String> = terms
            .iter()
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .map(|t| regex::escape(t))
            .collect();

        if alternatives.is_empty() {
            return Err(PatternError::EmptyTopic(topic.to_string()));
        }

        // Longer phrases first so "digital services" wins over "digital service".
        alternatives.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        alternatives.dedup();

        let pattern = format!(r"(?i)\b(?:{})\b", alternatives.join("|"));
        let regex = Regex::new(&pattern).map_err(|source| PatternError::Regex {
            topic: topic.to_string(),
            source,
        })?;

        Ok(Self {
            topic: topic.to_string(),
            regex,
        })
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    /// Number of non-overlapping matches in `text`.
    pub fn count(&self, text: &str) -> u64 {
        self.regex.find_iter(text).count() as u64
    }
}

/// Ordered topic matchers for one language mode.
#[derive(Debug, Clone)]
pub struct PatternSet {
    matchers: Vec<TopicMatcher>,
}

impl PatternSet {
    /// Compile `base`, merging `overlay` terms into topics that already exist.
    ///
    /// Overlay entries whose label is not in `base` are ignored.
    pub fn compile(base: &[TopicTerms], overlay: Option<&Overlay>) -> Result<Self, PatternError> {
        if let Some(overlay) = overlay {
            for label in overlay.keys() {
                if !base.iter().any(|t| t.topic == label.as_str()) {
                    tracing::debug!("Ignoring overlay terms for unknown topic {}", label);
                }
            }
        }

        let matchers = base
            .iter()
            .map(|entry| {
                let mut terms = entry.terms.clone();
                if let Some(extra) = overlay.and_then(|o| o.get(entry.topic)) {
                    terms.extend(extra.iter().cloned());
                }
                TopicMatcher::compile(entry.topic, &terms)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { matchers })
    }

    pub fn matchers(&self) -> &[TopicMatcher] {
        &self.matchers
    }

    pub fn topics(&self) -> impl Iterator<Item = &str> {
        self.matchers.iter().map(|m| m.topic())
    }

    pub fn len(&self) -> usize {
        self.matchers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matchers.is_empty()
    }

    /// Count matches for every topic, in taxonomy order.
    pub fn count_all(&self, text: &str) -> Vec<TopicCount> {
        self.matchers
            .iter()
            .map(|m| TopicCount {
                topic: m.topic().to_string(),
                count: m.count(text),
            })
            .collect()
    }

    /// Zero count for every topic, in taxonomy order.
    pub fn zero_counts(&self) -> Vec<TopicCount> {
        self.matchers
            .iter()
            .map(|m| TopicCount {
                topic: m.topic().to_string(),
                count: 0,
            })
            .collect()
    }
}

/// The two process-wide pattern sets.
#[derive(Debug, Clone)]
pub struct PatternLibrary {
    single: Arc<PatternSet>,
    bilingual: Arc<PatternSet>,
}

impl PatternLibrary {
    /// Build both sets from the base taxonomy and the built-in overlay.
    pub fn new() -> Result<Self, PatternError> {
        Self::with_overlay(&Overlay::new())
    }

    /// Build both sets, extending the built-in overlay with `extra` terms.
    pub fn with_overlay(extra: &Overlay) -> Result<Self, PatternError> {
        let base = base_taxonomy();
        let mut overlay = indonesian_overlay();
        for (topic, terms) in extra {
            overlay
                .entry(topic.clone())
                .or_default()
                .extend(terms.iter().cloned());
        }

        let single = PatternSet::compile(&base, None)?;
        let bilingual = PatternSet::compile(&base, Some(&overlay))?;
        tracing::debug!(
            "Compiled {} topic matchers ({} overlay topics)",
            single.len(),
            overlay.len()
        );

        Ok(Self {
            single: Arc::new(single),
            bilingual: Arc::new(bilingual),
        })
    }

    pub fn select(&self, bilingual: bool) -> &PatternSet {
        if bilingual {
            &self.bilingual
        } else {
            &self.single
        }
    }

    pub fn single(&self) -> &PatternSet {
        &self.single
    }

    pub fn bilingual(&self) -> &PatternSet {
        &self.bilingual
    }
}
