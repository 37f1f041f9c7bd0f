//! End-to-end batch tests: zip in, records and CSV out.

mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use reportscan::config::Config;
use reportscan::models::{FileRecord, RecordStatus};
use reportscan::ocr::{BatchArchive, OcrBackend, OcrError, OcrOptions, OcrResult};
use reportscan::patterns::TOPICS;
use reportscan::report::{parse_csv, to_csv, BatchSummary};
use reportscan::services::{BatchOptions, BatchRunner, NoProgress, ProgressSink};

const NATIVE_TEXT: &str =
    "Our fintech arm expanded digital banking and mobile banking with AI in 2021.";

/// Recognises every scan as the same fixed sentence.
#[derive(Default)]
struct CannedOcr {
    calls: AtomicUsize,
}

impl OcrBackend for CannedOcr {
    fn name(&self) -> &'static str {
        "canned"
    }

    fn is_available(&self) -> bool {
        true
    }

    fn availability_hint(&self) -> String {
        String::new()
    }

    fn ocr_pdf(&self, _pdf: &[u8], options: &OcrOptions) -> Result<OcrResult, OcrError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        assert_eq!(options.languages, "eng+ind");
        Ok(OcrResult {
            text: "Laporan keamanan siber dan cybersecurity".to_string(),
            pages_processed: 1,
            backend: "canned",
            processing_time_ms: 0,
        })
    }
}

#[derive(Default)]
struct Recorder {
    calls: Mutex<Vec<(usize, usize, String)>>,
}

impl ProgressSink for Recorder {
    fn on_progress(&self, completed: usize, total: usize, member_name: &str) {
        self.calls
            .lock()
            .unwrap()
            .push((completed, total, member_name.to_string()));
    }
}

fn runner(ocr: Arc<CannedOcr>) -> BatchRunner {
    Config::default().build_runner(ocr).unwrap()
}

fn sample_archive() -> BatchArchive {
    let bytes = common::zip(&[
        ("Bank2020/", Vec::new()),
        ("Bank2020/AnnualReport_2021.pdf", common::text_pdf(&[NATIVE_TEXT])),
        ("Bank2020/scanned_2019.pdf", common::blank_pdf(2)),
        (
            "Bank2020/memo.docx",
            common::docx(&["Blockchain pilot", "Strategi teknologi finansial"]),
        ),
        ("Bank2020/notes.txt", b"cloud computing and cloud-based big data".to_vec()),
        ("__MACOSX/Bank2020/._notes.txt", b"resource fork".to_vec()),
        ("Bank2020/readme.md", b"fintech".to_vec()),
    ]);
    BatchArchive::from_bytes("Bank2020.zip", bytes).unwrap()
}

fn by_name<'a>(records: &'a [FileRecord], name: &str) -> &'a FileRecord {
    records
        .iter()
        .find(|r| r.file_name == name)
        .unwrap_or_else(|| panic!("no record for {}", name))
}

#[tokio::test]
async fn test_one_record_per_supported_member() {
    let mut archive = sample_archive();
    let records = runner(Arc::default())
        .run(&mut archive, BatchOptions::default(), &NoProgress)
        .await
        .unwrap();

    assert_eq!(records.len(), 4);
    for record in &records {
        assert_eq!(record.source_label, "Bank2020");
        assert_eq!(record.topics.len(), TOPICS.len());
    }

    let pdf = by_name(&records, "AnnualReport_2021.pdf");
    assert_eq!(pdf.status, RecordStatus::Success);
    assert_eq!(pdf.year, "2021");
    assert_eq!(pdf.count("Fintech"), Some(1));
    assert_eq!(pdf.count("Digital Banking"), Some(1));
    assert_eq!(pdf.count("Mobile Banking"), Some(1));
    assert_eq!(pdf.count("AI"), Some(1));
    assert!(pdf.total_word_count > 0);

    let scan = by_name(&records, "scanned_2019.pdf");
    assert_eq!(scan.status, RecordStatus::SkippedScan);
    assert_eq!(scan.year, "2019");
    assert_eq!(scan.total_word_count, 0);

    let memo = by_name(&records, "memo.docx");
    assert_eq!(memo.year, "2020");
    assert_eq!(memo.count("Blockchain"), Some(1));
    assert_eq!(memo.count("Fintech"), Some(0));

    let notes = by_name(&records, "notes.txt");
    assert_eq!(notes.count("Cloud Computing"), Some(2));
    assert_eq!(notes.count("Big Data"), Some(1));
    assert_eq!(notes.total_word_count, 6);
}

#[tokio::test]
async fn test_bilingual_and_ocr() {
    let ocr = Arc::new(CannedOcr::default());
    let mut archive = sample_archive();
    let options = BatchOptions {
        bilingual: true,
        include_scanned: true,
    };
    let records = runner(ocr.clone())
        .run(&mut archive, options, &NoProgress)
        .await
        .unwrap();

    assert_eq!(ocr.calls.load(Ordering::SeqCst), 1);

    let scan = by_name(&records, "scanned_2019.pdf");
    assert_eq!(scan.status, RecordStatus::Success);
    assert_eq!(scan.count("Cybersecurity"), Some(2));
    assert_eq!(scan.total_word_count, 5);

    let memo = by_name(&records, "memo.docx");
    assert_eq!(memo.count("Fintech"), Some(1));
}

#[tokio::test]
async fn test_unknown_year() {
    let bytes = common::zip(&[("report.txt", b"e-payment".to_vec())]);
    let mut archive = BatchArchive::from_bytes("MiscBank.zip", bytes).unwrap();
    let records = runner(Arc::default())
        .run(&mut archive, BatchOptions::default(), &NoProgress)
        .await
        .unwrap();

    assert_eq!(records[0].year, "Unknown");
    assert_eq!(records[0].source_label, "MiscBank");
    assert_eq!(records[0].count("E-Payment"), Some(1));
}

#[tokio::test]
async fn test_empty_archive() {
    let bytes = common::zip(&[("docs/", Vec::new()), ("image.png", vec![0, 1, 2])]);
    let mut archive = BatchArchive::from_bytes("Empty.zip", bytes).unwrap();
    let progress = Recorder::default();
    let records = runner(Arc::default())
        .run(&mut archive, BatchOptions::default(), &progress)
        .await
        .unwrap();

    assert!(records.is_empty());
    assert!(progress.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_progress_callback() {
    let mut archive = sample_archive();
    let progress = Recorder::default();
    runner(Arc::default())
        .run(&mut archive, BatchOptions::default(), &progress)
        .await
        .unwrap();

    let calls = progress.calls.lock().unwrap();
    assert_eq!(calls.len(), 4);
    for (i, (done, total, _)) in calls.iter().enumerate() {
        assert_eq!(*done, i + 1);
        assert_eq!(*total, 4);
    }
}

#[tokio::test]
async fn test_csv_round_trip() {
    let mut archive = sample_archive();
    let records = runner(Arc::default())
        .run(&mut archive, BatchOptions::default(), &NoProgress)
        .await
        .unwrap();

    let csv = to_csv(&records);
    assert_eq!(csv.lines().count(), records.len() + 1);

    let parsed = parse_csv(&csv).unwrap();
    assert_eq!(parsed.len(), records.len());
    for (original, row) in records.iter().zip(&parsed) {
        assert_eq!(original.file_name, row.file_name);
        assert_eq!(original.status, row.status);
        if original.status.is_skipped() {
            assert!(row.topics.iter().all(|t| t.count == 0));
        } else {
            assert_eq!(original.topics, row.topics);
            assert_eq!(original.total_word_count, row.total_word_count);
        }
    }
}

#[tokio::test]
async fn test_repeat_runs_agree() {
    let mut first = runner(Arc::default())
        .run(&mut sample_archive(), BatchOptions::default(), &NoProgress)
        .await
        .unwrap();
    let mut second = runner(Arc::default())
        .with_workers(1)
        .run(&mut sample_archive(), BatchOptions::default(), &NoProgress)
        .await
        .unwrap();

    first.sort_by(|a, b| a.file_name.cmp(&b.file_name));
    second.sort_by(|a, b| a.file_name.cmp(&b.file_name));
    assert_eq!(first, second);

    let summary = BatchSummary::from_records(&first, &TOPICS);
    assert_eq!(summary.total_files, 4);
    assert_eq!(summary.skipped_files, 1);
    assert_eq!(summary.top_topic.as_deref(), Some("Cloud Computing"));
    assert_eq!(summary.top_topic_count, 2);
}

#[tokio::test]
async fn test_archive_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("Bank2018.zip");
    std::fs::write(&path, common::zip(&[("q1.txt", b"AI and said".to_vec())])).unwrap();

    let mut archive = BatchArchive::open(&path).unwrap();
    let records = runner(Arc::default())
        .run(&mut archive, BatchOptions::default(), &NoProgress)
        .await
        .unwrap();

    assert_eq!(records[0].year, "2018");
    assert_eq!(records[0].count("AI"), Some(1));
}
