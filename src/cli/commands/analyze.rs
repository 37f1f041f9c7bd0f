//! Batch analysis and tool check commands.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use console::style;

use super::ReportFormat;
use crate::cli::progress::BatchProgress;
use crate::config::Config;
use crate::models::FileRecord;
use crate::ocr::{check_tools, BatchArchive, OcrBackend, TesseractBackend};
use crate::patterns::TOPICS;
use crate::report::{default_report_name, to_csv, BatchReport, BatchSummary};
use crate::services::BatchOptions;

pub struct AnalyzeArgs {
    pub archive: PathBuf,
    pub bilingual: bool,
    pub include_scanned: bool,
    pub output: Option<PathBuf>,
    pub format: ReportFormat,
}

/// Check OCR tool availability.
pub async fn cmd_check() -> anyhow::Result<()> {
    println!("\n{}", style("OCR Tool Status").bold());
    println!("{}", "-".repeat(50));

    println!("\n{}", style("External Tools:").cyan());
    for (tool, available) in check_tools() {
        let status = if available {
            style("✓ found").green()
        } else {
            style("✗ not found").red()
        };
        println!("  {:<15} {}", tool, status);
    }

    println!("\n{}", style("OCR Backend:").cyan());
    let tesseract = TesseractBackend::new();
    if tesseract.is_available() {
        println!("  {:<15} {}", tesseract.name(), style("✓ available").green());
    } else {
        println!("  {:<15} {}", tesseract.name(), style("✗ not available").red());
        println!(
            "                  {}",
            style(tesseract.availability_hint()).dim()
        );
        println!(
            "\n{}",
            style("Scanned PDFs will score as empty when --include-scanned is used.").yellow()
        );
    }

    Ok(())
}

/// Analyze an archive and write the report.
pub async fn cmd_analyze(config: &Config, args: AnalyzeArgs) -> anyhow::Result<()> {
    let mut archive = BatchArchive::open(&args.archive)?;

    let ocr: Arc<dyn OcrBackend> = Arc::new(TesseractBackend::new());
    if args.include_scanned && !ocr.is_available() {
        println!(
            "{} {}",
            style("!").yellow(),
            style(ocr.availability_hint()).dim()
        );
    }
    let runner = config.build_runner(ocr)?;

    println!(
        "{} Analyzing {} with {} workers{}",
        style("→").cyan(),
        style(archive.name()).bold(),
        runner.workers(),
        if args.bilingual { " (bilingual)" } else { "" }
    );

    let options = BatchOptions {
        bilingual: args.bilingual,
        include_scanned: args.include_scanned,
    };
    let progress = BatchProgress::new();
    let records = runner.run(&mut archive, options, &progress).await;
    progress.finish();
    let records = records?;

    if records.is_empty() {
        println!(
            "{} No PDF, DOCX or TXT files found in {}",
            style("!").yellow(),
            archive.name()
        );
        return Ok(());
    }

    let output = args
        .output
        .unwrap_or_else(|| default_output(&args.archive, archive.name(), args.format));
    let contents = match args.format {
        ReportFormat::Csv => to_csv(&records),
        ReportFormat::Json => BatchReport::new(archive.name(), records.clone()).to_json()?,
    };
    tokio::fs::write(&output, contents).await?;

    print_summary(&records);
    println!(
        "\n{} Report written to {}",
        style("✓").green(),
        style(output.display()).bold()
    );
    Ok(())
}

fn default_output(archive_path: &Path, archive_name: &str, format: ReportFormat) -> PathBuf {
    let name = PathBuf::from(default_report_name(archive_name));
    let name = match format {
        ReportFormat::Csv => name,
        ReportFormat::Json => name.with_extension("json"),
    };
    match archive_path.parent() {
        Some(dir) => dir.join(name),
        None => name,
    }
}

fn print_summary(records: &[FileRecord]) {
    let summary = BatchSummary::from_records(records, &TOPICS);

    println!("\n{}", style("Analysis Complete").bold());
    println!("{}", "-".repeat(50));
    println!(
        "  {:<20} {}/{} (scans skipped: {})",
        "Reports analyzed",
        summary.processed_files,
        summary.total_files,
        summary.skipped_files
    );
    match &summary.top_topic {
        Some(topic) => println!(
            "  {:<20} {} ({} occurrences)",
            "Global top topic",
            style(topic).cyan(),
            summary.top_topic_count
        ),
        None => println!("  {:<20} {}", "Global top topic", style("N/A").dim()),
    }
    println!("  {:<20} {}", "Total words", summary.total_words);

    println!();
    for record in records {
        let status = match record.status {
            crate::models::RecordStatus::Success => style(record.status.as_str()).green(),
            crate::models::RecordStatus::SkippedScan => style(record.status.as_str()).yellow(),
            crate::models::RecordStatus::Error => style(record.status.as_str()).red(),
        };
        let top = if record.status.is_skipped() {
            String::new()
        } else {
            record
                .top_topic()
                .map(|t| format!("{} ({})", t.topic, t.count))
                .unwrap_or_default()
        };
        println!(
            "  {:<40} {:<6} {:<16} {}",
            record.file_name,
            record.year,
            status,
            style(top).dim()
        );
    }
}
