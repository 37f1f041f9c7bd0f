//! reportscan - batch document analysis for annual-report archives.
//!
//! Takes a zip of PDF, DOCX and TXT files, extracts text from each (falling
//! back to OCR for scanned PDFs when asked), counts technology-topic
//! mentions with an English or English+Indonesian pattern set, and produces
//! one [`models::FileRecord`] per file.
//!
//! ```no_run
//! use std::sync::Arc;
//! use reportscan::config::Config;
//! use reportscan::ocr::{BatchArchive, TesseractBackend};
//! use reportscan::services::{BatchOptions, NoProgress};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let runner = Config::default().build_runner(Arc::new(TesseractBackend::new()))?;
//! let mut archive = BatchArchive::open("Bank2020.zip".as_ref())?;
//! let records = runner.run(&mut archive, BatchOptions::default(), &NoProgress).await?;
//! println!("{}", reportscan::report::to_csv(&records));
//! # Ok(())
//! # }
//! ```

#![allow(clippy::should_implement_trait)]

pub mod cli;
pub mod config;
pub mod models;
pub mod ocr;
pub mod patterns;
pub mod report;
pub mod services;

#[cfg(test)]
mod testing;

pub use config::Config;
pub use models::{FileRecord, FileTask, RecordStatus, TopicCount};
pub use report::{BatchReport, BatchSummary};
pub use services::{BatchOptions, BatchRunner, FileAnalyzer, ProgressSink};
