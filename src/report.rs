//! Batch report export: CSV, JSON and the summary figures.
//!
//! The CSV layout is a fixed contract: `source_label, year, file_name,
//! status`, one column per topic in taxonomy order, then `total_word_count`.
//! Every field is double-quoted.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{FileRecord, RecordStatus, TopicCount};
use crate::patterns::TOPICS;

const LEADING_COLUMNS: [&str; 4] = ["source_label", "year", "file_name", "status"];
const WORD_COUNT_COLUMN: &str = "total_word_count";

/// Errors reading a CSV export back in.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Empty report")]
    Empty,

    #[error("Unexpected header: {0}")]
    Header(String),

    #[error("Line {line}: {reason}")]
    Row { line: usize, reason: String },
}

/// File name for a report exported from `archive_name`.
pub fn default_report_name(archive_name: &str) -> String {
    let stem = Path::new(archive_name)
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| archive_name.to_string());
    format!("{}_Analysis.csv", stem)
}

fn header() -> Vec<&'static str> {
    LEADING_COLUMNS
        .iter()
        .copied()
        .chain(TOPICS.iter().copied())
        .chain(std::iter::once(WORD_COUNT_COLUMN))
        .collect()
}

fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

fn push_row<'a>(out: &mut String, fields: impl IntoIterator<Item = &'a str>) {
    let row: Vec<String> = fields.into_iter().map(quote).collect();
    out.push_str(&row.join(","));
    out.push('\n');
}

/// Render records as CSV. Skipped records carry zero in every topic column.
pub fn to_csv(records: &[FileRecord]) -> String {
    let mut out = String::new();
    push_row(&mut out, header());

    for record in records {
        let skipped = record.status.is_skipped();
        let counts: Vec<String> = TOPICS
            .iter()
            .map(|topic| {
                if skipped {
                    0
                } else {
                    record.count(topic).unwrap_or(0)
                }
            })
            .map(|count| count.to_string())
            .collect();
        let words = record.total_word_count.to_string();

        let fields = [
            record.source_label.as_str(),
            record.year.as_str(),
            record.file_name.as_str(),
            record.status.as_str(),
        ]
        .into_iter()
        .chain(counts.iter().map(String::as_str))
        .chain(std::iter::once(words.as_str()));
        push_row(&mut out, fields);
    }

    out
}

/// Split one CSV line into fields, honouring quotes and `""` escapes.
fn split_fields(line: &str) -> Result<Vec<String>, String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match (c, in_quotes) {
            ('"', true) if chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            ('"', true) => in_quotes = false,
            ('"', false) if current.is_empty() => in_quotes = true,
            (',', false) => fields.push(std::mem::take(&mut current)),
            (c, _) => current.push(c),
        }
    }

    if in_quotes {
        return Err("unterminated quoted field".to_string());
    }
    fields.push(current);
    Ok(fields)
}

/// Read a CSV produced by [`to_csv`] back into records.
pub fn parse_csv(text: &str) -> Result<Vec<FileRecord>, ReportError> {
    let mut lines = text.lines().enumerate().filter(|(_, l)| !l.trim().is_empty());

    let (_, header_line) = lines.next().ok_or(ReportError::Empty)?;
    let columns = split_fields(header_line).map_err(ReportError::Header)?;
    if columns != header() {
        return Err(ReportError::Header(header_line.to_string()));
    }

    let mut records = Vec::new();
    for (index, line) in lines {
        let line_no = index + 1;
        let row_err = |reason: String| ReportError::Row {
            line: line_no,
            reason,
        };

        let fields = split_fields(line).map_err(row_err)?;
        if fields.len() != columns.len() {
            return Err(row_err(format!(
                "expected {} fields, found {}",
                columns.len(),
                fields.len()
            )));
        }

        let status = RecordStatus::from_str(&fields[3])
            .ok_or_else(|| row_err(format!("unknown status {:?}", fields[3])))?;
        let parse_count = |value: &str| {
            value
                .parse::<u64>()
                .map_err(|e| row_err(format!("bad count {:?}: {}", value, e)))
        };

        let topic_fields = &fields[LEADING_COLUMNS.len()..LEADING_COLUMNS.len() + TOPICS.len()];
        let mut topics = Vec::with_capacity(TOPICS.len());
        for (topic, value) in TOPICS.iter().zip(topic_fields) {
            topics.push(TopicCount {
                topic: topic.to_string(),
                count: parse_count(value)?,
            });
        }

        records.push(FileRecord {
            source_label: fields[0].clone(),
            year: fields[1].clone(),
            file_name: fields[2].clone(),
            status,
            topics,
            total_word_count: parse_count(&fields[fields.len() - 1])?,
        });
    }

    Ok(records)
}

/// Headline figures for a finished batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub total_files: usize,
    /// Files not skipped as scans (errors included).
    pub processed_files: usize,
    pub skipped_files: usize,
    /// Topic with the most hits across processed files.
    pub top_topic: Option<String>,
    pub top_topic_count: u64,
    /// Words across processed files.
    pub total_words: u64,
}

impl BatchSummary {
    /// Summarise `records`. `taxonomy` fixes the tie-break order for the top topic.
    pub fn from_records(records: &[FileRecord], taxonomy: &[&str]) -> Self {
        let processed: Vec<&FileRecord> = records
            .iter()
            .filter(|r| !r.status.is_skipped())
            .collect();

        let mut top: Option<(&str, u64)> = None;
        if !processed.is_empty() {
            for topic in taxonomy {
                let sum: u64 = processed.iter().filter_map(|r| r.count(topic)).sum();
                if top.map_or(true, |(_, best)| sum > best) {
                    top = Some((*topic, sum));
                }
            }
        }

        Self {
            total_files: records.len(),
            processed_files: processed.len(),
            skipped_files: records.len() - processed.len(),
            top_topic: top.map(|(t, _)| t.to_string()),
            top_topic_count: top.map(|(_, c)| c).unwrap_or(0),
            total_words: processed.iter().map(|r| r.total_word_count).sum(),
        }
    }
}

/// JSON export shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    pub archive: String,
    pub summary: BatchSummary,
    pub records: Vec<FileRecord>,
}

impl BatchReport {
    pub fn new(archive: impl Into<String>, records: Vec<FileRecord>) -> Self {
        let summary = BatchSummary::from_records(&records, &TOPICS);
        Self {
            archive: archive.into(),
            summary,
            records,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, status: RecordStatus, hits: &[(&str, u64)], words: u64) -> FileRecord {
        FileRecord {
            source_label: "Bank2020".to_string(),
            year: "2020".to_string(),
            file_name: name.to_string(),
            total_word_count: words,
            status,
            topics: TOPICS
                .iter()
                .map(|topic| TopicCount {
                    topic: topic.to_string(),
                    count: hits
                        .iter()
                        .find(|(t, _)| t == topic)
                        .map(|(_, c)| *c)
                        .unwrap_or(0),
                })
                .collect(),
        }
    }

    #[test]
    fn test_default_report_name() {
        assert_eq!(default_report_name("Bank2020.zip"), "Bank2020_Analysis.csv");
        assert_eq!(default_report_name("reports"), "reports_Analysis.csv");
    }

    #[test]
    fn test_header_layout() {
        let csv = to_csv(&[]);
        let first = csv.lines().next().unwrap();
        assert!(first.starts_with("\"source_label\",\"year\",\"file_name\",\"status\",\"Fintech\",\"AI\""));
        assert!(first.ends_with("\"Digital Service\",\"total_word_count\""));
        assert_eq!(first.split(',').count(), 17);
    }

    #[test]
    fn test_fields_are_quoted_and_escaped() {
        let r = record("say \"hi\", 2020.txt", RecordStatus::Success, &[("AI", 3)], 10);
        let csv = to_csv(&[r]);
        let row = csv.lines().nth(1).unwrap();
        assert!(row.starts_with("\"Bank2020\",\"2020\",\"say \"\"hi\"\", 2020.txt\",\"SUCCESS\",\"0\",\"3\""));
        assert!(row.ends_with(",\"10\""));
    }

    #[test]
    fn test_skipped_rows_export_zero_counts() {
        let mut r = record("scan.pdf", RecordStatus::SkippedScan, &[("Fintech", 9)], 0);
        r.topics[0].count = 9;
        let csv = to_csv(&[r]);
        let row = csv.lines().nth(1).unwrap();
        let fields = split_fields(row).unwrap();
        assert_eq!(fields[3], "SKIPPED (Scan)");
        assert!(fields[4..16].iter().all(|f| f == "0"));
    }

    #[test]
    fn test_csv_round_trip() {
        let records = vec![
            record("a.pdf", RecordStatus::Success, &[("Fintech", 4), ("Cybersecurity", 2)], 120),
            record("b, \"quoted\".txt", RecordStatus::Error, &[], 0),
            record("c.docx", RecordStatus::Success, &[("E-Payment", 1)], 7),
        ];
        let parsed = parse_csv(&to_csv(&records)).unwrap();
        assert_eq!(parsed, records);
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(matches!(parse_csv(""), Err(ReportError::Empty)));
        assert!(matches!(parse_csv("\"a\",\"b\"\n"), Err(ReportError::Header(_))));

        let mut csv = to_csv(&[record("a.pdf", RecordStatus::Success, &[], 1)]);
        csv = csv.replace("SUCCESS", "UNKNOWN");
        assert!(matches!(parse_csv(&csv), Err(ReportError::Row { line: 2, .. })));
    }

    #[test]
    fn test_summary() {
        let records = vec![
            record("a.pdf", RecordStatus::Success, &[("AI", 2), ("Fintech", 5)], 100),
            record("b.pdf", RecordStatus::Success, &[("AI", 4)], 50),
            record("scan.pdf", RecordStatus::SkippedScan, &[], 0),
        ];
        let summary = BatchSummary::from_records(&records, &TOPICS);
        assert_eq!(summary.total_files, 3);
        assert_eq!(summary.processed_files, 2);
        assert_eq!(summary.skipped_files, 1);
        assert_eq!(summary.top_topic.as_deref(), Some("AI"));
        assert_eq!(summary.top_topic_count, 6);
        assert_eq!(summary.total_words, 150);
    }

    #[test]
    fn test_summary_ties_follow_taxonomy_order() {
        let records = vec![record(
            "a.pdf",
            RecordStatus::Success,
            &[("Cybersecurity", 3), ("Blockchain", 3)],
            9,
        )];
        let summary = BatchSummary::from_records(&records, &TOPICS);
        assert_eq!(summary.top_topic.as_deref(), Some("Blockchain"));
    }

    #[test]
    fn test_summary_without_processed_files() {
        let records = vec![record("scan.pdf", RecordStatus::SkippedScan, &[], 0)];
        let summary = BatchSummary::from_records(&records, &TOPICS);
        assert_eq!(summary.processed_files, 0);
        assert_eq!(summary.top_topic, None);
        assert_eq!(summary.top_topic_count, 0);
    }

    #[test]
    fn test_json_report() {
        let report = BatchReport::new(
            "Bank2020.zip",
            vec![record("a.pdf", RecordStatus::Success, &[("AI", 1)], 3)],
        );
        let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(json["archive"], "Bank2020.zip");
        assert_eq!(json["summary"]["top_topic"], "AI");
        assert_eq!(json["records"][0]["status"], "SUCCESS");
        assert_eq!(json["records"][0]["topics"][1]["topic"], "AI");
    }
}
