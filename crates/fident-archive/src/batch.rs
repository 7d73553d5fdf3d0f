//! Batch extraction of dropped files.
//!
//! Every dropped file becomes its own task on a bounded pool. Tasks report
//! over a channel; the collector is the only writer of the final report.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::{Semaphore, mpsc};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::data::report::{BatchReport, Extraction, Notification};
use crate::error::{Error, Result};
use crate::extract::dispatch;
use crate::format::ArchiveFormat;
use crate::options::ExtractOptions;

/// Outcome of one dropped file, tagged with its position in the batch.
#[derive(Debug)]
pub struct BatchEvent {
    pub index: usize,
    pub source: PathBuf,
    pub outcome: Result<Extraction>,
}

pub struct ArchiveExtractor {
    options: Arc<ExtractOptions>,
    semaphore: Arc<Semaphore>,
}

impl ArchiveExtractor {
    pub fn new(options: ExtractOptions) -> Self {
        let semaphore = Arc::new(Semaphore::new(options.max_concurrent.max(1)));
        Self {
            options: Arc::new(options),
            semaphore,
        }
    }

    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    /// Start one task per path and stream their outcomes as they finish.
    ///
    /// Must be called from within a tokio runtime. The channel closes once
    /// every task has reported.
    pub fn spawn_batch(
        &self,
        paths: Vec<PathBuf>,
        cancel: CancellationToken,
    ) -> mpsc::Receiver<BatchEvent> {
        let (tx, rx) = mpsc::channel(paths.len().max(1));

        for (index, source) in paths.into_iter().enumerate() {
            let tx = tx.clone();
            let options = Arc::clone(&self.options);
            let semaphore = Arc::clone(&self.semaphore);
            let cancel = cancel.clone();

            tokio::spawn(async move {
                let outcome = run_one(source.clone(), options, semaphore, cancel).await;
                // The receiver may be gone; the outcome and its session are dropped then.
                let _ = tx
                    .send(BatchEvent {
                        index,
                        source,
                        outcome,
                    })
                    .await;
            });
        }

        rx
    }

    /// Extract a whole batch and merge the outcomes in submission order.
    ///
    /// Per-file failures become notifications. A cancelled batch waits for
    /// its in-flight tasks to unwind, drops every partial result and returns
    /// [`Error::Cancelled`].
    pub async fn extract_batch(
        &self,
        paths: Vec<PathBuf>,
        cancel: &CancellationToken,
    ) -> Result<BatchReport> {
        self.extract_batch_with(paths, cancel, |_| {}).await
    }

    /// Like [`ArchiveExtractor::extract_batch`], calling `on_event` as each
    /// file finishes, in completion order.
    pub async fn extract_batch_with<F>(
        &self,
        paths: Vec<PathBuf>,
        cancel: &CancellationToken,
        mut on_event: F,
    ) -> Result<BatchReport>
    where
        F: FnMut(&BatchEvent),
    {
        let mut slots: Vec<Option<BatchEvent>> = paths.iter().map(|_| None).collect();
        let mut rx = self.spawn_batch(paths, cancel.clone());
        let mut cancelled = false;

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled(), if !cancelled => {
                    debug!("batch cancelled, waiting for in-flight extractions");
                    cancelled = true;
                }
                event = rx.recv() => match event {
                    Some(event) if !cancelled => {
                        on_event(&event);
                        let index = event.index;
                        slots[index] = Some(event);
                    }
                    Some(_) => {}
                    None => break,
                },
            }
        }

        if cancelled {
            return Err(Error::Cancelled);
        }

        let mut report = BatchReport::default();
        for event in slots.into_iter().flatten() {
            match event.outcome {
                Ok(extraction) => report.extractions.push(extraction),
                Err(err) => {
                    warn!(archive = %event.source.display(), error = %err, "extraction failed");
                    let format = ArchiveFormat::from_path(&event.source);
                    report
                        .notifications
                        .push(Notification::from_error(event.source, format, &err));
                }
            }
        }
        Ok(report)
    }
}

async fn run_one(
    source: PathBuf,
    options: Arc<ExtractOptions>,
    semaphore: Arc<Semaphore>,
    cancel: CancellationToken,
) -> Result<Extraction> {
    let _permit = tokio::select! {
        permit = semaphore.acquire_owned() => permit.map_err(|_| Error::Cancelled)?,
        _ = cancel.cancelled() => return Err(Error::Cancelled),
    };

    let task = tokio::task::spawn_blocking(move || dispatch(&source, &options, &cancel));
    match task.await {
        Ok(outcome) => outcome,
        Err(join) => Err(Error::WorkerFailed {
            reason: join.to_string(),
        }),
    }
}
