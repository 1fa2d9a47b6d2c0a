// File processing lifecycle.
//
// A submitted file is read and aggregated on the blocking thread pool; the
// outcome comes back over an mpsc channel tagged with the generation of the
// submission that produced it. Submitting a new file while another is still
// in flight supersedes it: the older outcome is discarded on arrival.

use std::path::{Path, PathBuf};

use batavg_baseball::batting::{self, IngestError, StatsResult};
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ProcessError {
    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error("processing task failed: {0}")]
    Task(String),

    #[error("processing channel closed before a result arrived")]
    ChannelClosed,
}

/// Everything produced from one input file.
#[derive(Debug, Clone)]
pub struct ProcessedFile {
    pub source: PathBuf,
    pub stats: StatsResult,
    pub rows_read: usize,
    pub rows_skipped: usize,
}

/// Outcome of one submission, posted back to the owning [`Processor`].
#[derive(Debug)]
pub struct JobEvent {
    pub generation: u64,
    pub outcome: Result<ProcessedFile, ProcessError>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum ProcessingState {
    Idle,
    Processing { generation: u64, source: PathBuf },
}

/// Tracks the file currently being processed and the latest result.
pub struct Processor {
    state: ProcessingState,
    /// Incremented on every submission. Outcomes from older generations are
    /// discarded in `handle_event`.
    generation: u64,
    latest: Option<ProcessedFile>,
    last_error: Option<ProcessError>,
    events_tx: mpsc::Sender<JobEvent>,
}

// ---------------------------------------------------------------------------
// Processor
// ---------------------------------------------------------------------------

impl Processor {
    pub fn new(events_tx: mpsc::Sender<JobEvent>) -> Self {
        Processor {
            state: ProcessingState::Idle,
            generation: 0,
            latest: None,
            last_error: None,
            events_tx,
        }
    }

    /// Start processing `path`, superseding any submission still in flight.
    /// Clears the previous result. Must be called within a tokio runtime.
    pub fn submit(&mut self, path: PathBuf) -> u64 {
        self.generation += 1;
        let generation = self.generation;

        if let ProcessingState::Processing { source, .. } = &self.state {
            debug!("superseding in-flight processing of {}", source.display());
        }
        info!("processing {} (generation {})", path.display(), generation);

        self.state = ProcessingState::Processing {
            generation,
            source: path.clone(),
        };
        self.latest = None;
        self.last_error = None;

        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let outcome = match tokio::task::spawn_blocking(move || process_file(&path)).await {
                Ok(outcome) => outcome,
                Err(e) => Err(ProcessError::Task(e.to_string())),
            };
            if tx.send(JobEvent { generation, outcome }).await.is_err() {
                debug!("processor dropped before generation {} finished", generation);
            }
        });

        generation
    }

    /// Apply an outcome. Returns `false` (and changes nothing) when the event
    /// belongs to a superseded submission or nothing is in flight.
    pub fn handle_event(&mut self, event: JobEvent) -> bool {
        let current = match &self.state {
            ProcessingState::Processing { generation, .. } => *generation,
            ProcessingState::Idle => {
                debug!("ignoring outcome for generation {} while idle", event.generation);
                return false;
            }
        };
        if event.generation != current {
            debug!(
                "discarding stale outcome (generation {}, current {})",
                event.generation, current
            );
            return false;
        }

        match event.outcome {
            Ok(processed) => {
                info!(
                    "{}: {} rows, {} skipped, {} groups",
                    processed.source.display(),
                    processed.rows_read,
                    processed.rows_skipped,
                    processed.stats.averages.len()
                );
                self.latest = Some(processed);
            }
            Err(e) => {
                warn!("processing failed: {}", e);
                self.last_error = Some(e);
            }
        }
        self.state = ProcessingState::Idle;
        true
    }

    pub fn is_processing(&self) -> bool {
        matches!(self.state, ProcessingState::Processing { .. })
    }

    pub fn take_latest(&mut self) -> Option<ProcessedFile> {
        self.latest.take()
    }

    pub fn take_error(&mut self) -> Option<ProcessError> {
        self.last_error.take()
    }
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Read and aggregate one batting file synchronously.
pub fn process_file(path: &Path) -> Result<ProcessedFile, ProcessError> {
    let ingested = batting::load_rows(path)?;
    let stats = batting::compute_averages(&ingested.rows);
    Ok(ProcessedFile {
        source: path.to_path_buf(),
        stats,
        rows_read: ingested.rows.len(),
        rows_skipped: ingested.skipped,
    })
}

/// Process a single file through a [`Processor`] and wait for its outcome.
pub async fn process(path: PathBuf) -> Result<ProcessedFile, ProcessError> {
    let (tx, mut rx) = mpsc::channel(8);
    let mut processor = Processor::new(tx);
    processor.submit(path);

    while processor.is_processing() {
        let event = rx.recv().await.ok_or(ProcessError::ChannelClosed)?;
        if !processor.handle_event(event) {
            continue;
        }
        if let Some(err) = processor.take_error() {
            return Err(err);
        }
    }

    processor.take_latest().ok_or(ProcessError::ChannelClosed)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use batavg_baseball::batting::{compute_averages, Row};
    use std::fs;

    fn write_csv(name: &str, body: &str) -> PathBuf {
        let path = std::env::temp_dir().join(name);
        fs::write(&path, body).unwrap();
        path
    }

    fn fake_outcome(source: &str, rows: &[Row]) -> Result<ProcessedFile, ProcessError> {
        Ok(ProcessedFile {
            source: PathBuf::from(source),
            stats: compute_averages(rows),
            rows_read: rows.len(),
            rows_skipped: 0,
        })
    }

    #[test]
    fn process_file_reads_and_aggregates() {
        let path = write_csv(
            "batavg_processor_sync.csv",
            "playerID,yearID,teamID,H,AB\np1,2001,T1,3,10\np1,2001,T1,2,5\nbad,2001,T1,x,1\n",
        );

        let processed = process_file(&path).unwrap();
        assert_eq!(processed.rows_read, 2);
        assert_eq!(processed.rows_skipped, 1);
        assert_eq!(processed.stats.averages.len(), 1);
        assert_eq!(processed.stats.averages[0].at_bats, 15);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn process_file_missing_file_is_error() {
        let path = std::env::temp_dir().join("batavg_processor_missing.csv");
        let err = process_file(&path).unwrap_err();
        assert!(matches!(err, ProcessError::Ingest(IngestError::Io { .. })));
    }

    #[tokio::test]
    async fn submit_then_handle_event_stores_result() {
        let path = write_csv(
            "batavg_processor_async.csv",
            "playerID,yearID,teamID,H,AB\np1,2001,T1,30,100\np2,2001,T1,25,100\n",
        );
        let (tx, mut rx) = mpsc::channel(8);
        let mut processor = Processor::new(tx);
        assert_eq!(&processor.state, &ProcessingState::Idle);

        let generation = processor.submit(path.clone());
        assert_eq!(generation, 1);
        assert!(processor.is_processing());
        assert!(processor.latest.is_none());

        let event = rx.recv().await.unwrap();
        assert_eq!(event.generation, 1);
        assert!(processor.handle_event(event));

        assert!(!processor.is_processing());
        let latest = processor.latest.as_ref().expect("result should be stored");
        assert_eq!(latest.stats.averages.len(), 2);
        assert_eq!(latest.stats.averages[0].player_id.as_deref(), Some("p1"));
        assert!(processor.last_error.is_none());

        let _ = fs::remove_file(&path);
    }

    #[tokio::test]
    async fn stale_outcome_is_discarded() {
        let (tx, _rx) = mpsc::channel(8);
        let mut processor = Processor::new(tx);

        let first = processor.submit(std::env::temp_dir().join("batavg_stale_first.csv"));
        let second = processor.submit(std::env::temp_dir().join("batavg_stale_second.csv"));
        assert_eq!((first, second), (1, 2));
        assert_eq!(processor.generation, 2);

        let stale = JobEvent {
            generation: first,
            outcome: fake_outcome("first.csv", &[Row::new("old", 2001, "T1", 1, 2)]),
        };
        assert!(!processor.handle_event(stale));
        assert!(processor.is_processing());
        assert!(processor.latest.is_none());

        let fresh = JobEvent {
            generation: second,
            outcome: fake_outcome("second.csv", &[Row::new("new", 2002, "T2", 1, 3)]),
        };
        assert!(processor.handle_event(fresh));
        assert!(!processor.is_processing());
        let latest = processor.latest.as_ref().unwrap();
        assert_eq!(latest.source, PathBuf::from("second.csv"));
        assert_eq!(latest.stats.player_ids, vec![Some("new".to_string())]);
    }

    #[tokio::test]
    async fn outcome_while_idle_is_ignored() {
        let (tx, _rx) = mpsc::channel(8);
        let mut processor = Processor::new(tx);
        let event = JobEvent {
            generation: 0,
            outcome: fake_outcome("x.csv", &[]),
        };
        assert!(!processor.handle_event(event));
        assert!(processor.latest.is_none());
    }

    #[tokio::test]
    async fn failure_leaves_result_unset() {
        let (tx, mut rx) = mpsc::channel(8);
        let mut processor = Processor::new(tx);
        processor.submit(std::env::temp_dir().join("batavg_processor_nope.csv"));

        let event = rx.recv().await.unwrap();
        assert!(processor.handle_event(event));
        assert!(!processor.is_processing());
        assert!(processor.latest.is_none());
        assert!(processor
            .last_error
            .as_ref()
            .is_some_and(|e| e.to_string().contains("batavg_processor_nope.csv")));
    }

    #[tokio::test]
    async fn resubmitting_clears_previous_result() {
        let path = write_csv(
            "batavg_processor_resubmit.csv",
            "playerID,yearID,teamID,H,AB\np1,2001,T1,1,4\n",
        );
        let (tx, mut rx) = mpsc::channel(8);
        let mut processor = Processor::new(tx);

        processor.submit(path.clone());
        let event = rx.recv().await.unwrap();
        processor.handle_event(event);
        assert!(processor.latest.is_some());

        processor.submit(path.clone());
        assert!(processor.latest.is_none());
        let event = rx.recv().await.unwrap();
        assert_eq!(event.generation, 2);
        assert!(processor.handle_event(event));
        assert!(processor.latest.is_some());

        let _ = fs::remove_file(&path);
    }

    #[tokio::test]
    async fn process_runs_to_completion() {
        let path = write_csv(
            "batavg_processor_process.csv",
            "playerID,yearID,teamID,H,AB\np1,2001,T1,0,0\n",
        );
        let processed = process(path.clone()).await.unwrap();
        assert_eq!(processed.stats.averages.len(), 1);
        assert_eq!(processed.stats.averages[0].avg, None);

        let _ = fs::remove_file(&path);
    }

    #[tokio::test]
    async fn process_reports_failure() {
        let path = std::env::temp_dir().join("batavg_processor_process_missing.csv");
        assert!(process(path).await.is_err());
    }
}
