//! Batch processing service.
//!
//! Fans archive members out over a bounded pool of blocking workers and
//! collects one [`FileRecord`] per member in completion order. Separated from
//! UI concerns: progress goes through a [`ProgressSink`].

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use super::analysis::{detect_year, source_label, FileAnalyzer};
use crate::models::{FileRecord, FileTask};
use crate::ocr::{ArchiveError, BatchArchive};

/// Number of files analysed concurrently.
pub const DEFAULT_WORKERS: usize = 2;

/// Errors surfaced by a batch run. Per-file problems never reach here.
#[derive(Debug, Error)]
pub enum BatchError {
    #[error("Archive error: {0}")]
    Archive(#[from] ArchiveError),
}

/// Receives a call after every completed file.
///
/// `member_name` is the member's full path inside the archive. Called from a single collecting loop, so implementations never see two
/// calls at once. Must return quickly.
pub trait ProgressSink: Send + Sync {
    fn on_progress(&self, completed: usize, total: usize, member_name: &str);
}

impl<F> ProgressSink for F
where
    F: Fn(usize, usize, &str) + Send + Sync,
{
    fn on_progress(&self, completed: usize, total: usize, member_name: &str) {
        self(completed, total, member_name)
    }
}

/// Progress sink that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn on_progress(&self, _completed: usize, _total: usize, _member_name: &str) {}
}

/// Caller-supplied switches applied to every file in a batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchOptions {
    pub bilingual: bool,
    pub include_scanned: bool,
}

/// What a worker handed back for one task.
#[derive(Debug)]
pub enum TaskOutcome {
    Completed(FileRecord),
    Failed {
        archive_name: String,
        member_name: String,
        bilingual: bool,
        error: String,
    },
}

impl TaskOutcome {
    /// Best available name for the member: the archive path for failures,
    /// the recorded file name otherwise.
    fn member_name(&self) -> &str {
        match self {
            TaskOutcome::Completed(record) => &record.file_name,
            TaskOutcome::Failed { member_name, .. } => member_name,
        }
    }
}

/// Runs batches of files through a [`FileAnalyzer`].
#[derive(Clone)]
pub struct BatchRunner {
    analyzer: Arc<FileAnalyzer>,
    workers: usize,
}

impl BatchRunner {
    pub fn new(analyzer: Arc<FileAnalyzer>) -> Self {
        Self {
            analyzer,
            workers: DEFAULT_WORKERS,
        }
    }

    /// Override the pool size. Zero is treated as one.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn analyzer(&self) -> &FileAnalyzer {
        &self.analyzer
    }

    /// Read every supported member of `archive` and analyse it.
    ///
    /// Member bytes are materialised up front on the calling task. Only a
    /// failure to read the archive itself is an error; a member whose data
    /// cannot be read becomes an ERROR record like any other per-file failure.
    pub async fn run(
        &self,
        archive: &mut BatchArchive,
        options: BatchOptions,
        progress: &dyn ProgressSink,
    ) -> Result<Vec<FileRecord>, BatchError> {
        let members = archive.read_members()?;
        let archive_name = archive.name().to_string();

        let mut tasks = Vec::with_capacity(members.len());
        let mut unreadable = Vec::new();
        for member in members {
            match member.contents {
                Ok(bytes) => tasks.push(FileTask {
                    archive_name: archive_name.clone(),
                    member_name: member.path,
                    bytes,
                    bilingual: options.bilingual,
                    include_scanned: options.include_scanned,
                }),
                Err(e) => unreadable.push(TaskOutcome::Failed {
                    archive_name: archive_name.clone(),
                    member_name: member.path,
                    bilingual: options.bilingual,
                    error: e.to_string(),
                }),
            }
        }

        Ok(self.execute(tasks, unreadable, progress).await)
    }

    /// Analyse prepared tasks. Returns exactly one record per task, in
    /// completion order.
    pub async fn run_tasks(&self, tasks: Vec<FileTask>, progress: &dyn ProgressSink) -> Vec<FileRecord> {
        self.execute(tasks, Vec::new(), progress).await
    }

    /// Record `failed` first, then run `tasks` through the pool. Progress
    /// counts both.
    async fn execute(
        &self,
        tasks: Vec<FileTask>,
        failed: Vec<TaskOutcome>,
        progress: &dyn ProgressSink,
    ) -> Vec<FileRecord> {
        let total = tasks.len() + failed.len();
        if total == 0 {
            return Vec::new();
        }
        tracing::info!("Analysing {} files with {} workers", total, self.workers);

        let mut records = Vec::with_capacity(total);
        for outcome in failed {
            let member_name = outcome.member_name().to_string();
            records.push(self.record_for(outcome));
            progress.on_progress(records.len(), total, &member_name);
        }

        let semaphore = Arc::new(Semaphore::new(self.workers));
        let mut join_set = JoinSet::new();
        // Tasks still in flight, used if a task vanishes without an outcome.
        let mut outstanding: HashMap<usize, (String, String, bool)> = HashMap::with_capacity(tasks.len());

        for (index, task) in tasks.into_iter().enumerate() {
            outstanding.insert(
                index,
                (
                    task.archive_name.clone(),
                    task.member_name.clone(),
                    task.bilingual,
                ),
            );
            let analyzer = self.analyzer.clone();
            let semaphore = semaphore.clone();

            join_set.spawn(async move {
                let outcome = run_one(analyzer, semaphore, task).await;
                (index, outcome)
            });
        }

        while let Some(joined) = join_set.join_next().await {
            let (index, outcome) = match joined {
                Ok(done) => done,
                Err(e) => {
                    tracing::warn!("Batch task aborted: {}", e);
                    continue;
                }
            };
            let member_name = match outstanding.remove(&index) {
                Some((_, member_name, _)) => member_name,
                None => outcome.member_name().to_string(),
            };

            records.push(self.record_for(outcome));
            progress.on_progress(records.len(), total, &member_name);
        }

        // Tasks that died outside the worker still get a row.
        let mut lost: Vec<_> = outstanding.into_iter().collect();
        lost.sort_by_key(|(index, _)| *index);
        for (_, (archive_name, member_name, bilingual)) in lost {
            records.push(self.record_for(TaskOutcome::Failed {
                archive_name,
                member_name: member_name.clone(),
                bilingual,
                error: "task aborted".to_string(),
            }));
            progress.on_progress(records.len(), total, &member_name);
        }

        records
    }

    fn record_for(&self, outcome: TaskOutcome) -> FileRecord {
        match outcome {
            TaskOutcome::Completed(record) => record,
            TaskOutcome::Failed {
                archive_name,
                member_name,
                bilingual,
                error,
            } => {
                tracing::warn!("Worker failed on {}: {}", member_name, error);
                let file_name = crate::models::bare_name(&member_name).to_string();
                let year = detect_year(&file_name, &archive_name);
                FileRecord::error(
                    source_label(&archive_name),
                    year,
                    file_name,
                    self.analyzer.pattern_set(bilingual).topics(),
                )
            }
        }
    }
}

/// Wait for a pool slot, then analyse on the blocking thread pool.
async fn run_one(analyzer: Arc<FileAnalyzer>, semaphore: Arc<Semaphore>, task: FileTask) -> TaskOutcome {
    let archive_name = task.archive_name.clone();
    let member_name = task.member_name.clone();
    let bilingual = task.bilingual;

    let _permit = match semaphore.acquire_owned().await {
        Ok(permit) => permit,
        Err(e) => {
            return TaskOutcome::Failed {
                archive_name,
                member_name,
                bilingual,
                error: e.to_string(),
            }
        }
    };

    let handle = tokio::task::spawn_blocking(move || analyzer.analyze(&task));
    match handle.await {
        Ok(record) => TaskOutcome::Completed(record),
        Err(e) => TaskOutcome::Failed {
            archive_name,
            member_name,
            bilingual,
            error: e.to_string(),
        },
    }
}
