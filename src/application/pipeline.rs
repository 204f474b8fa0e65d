use crate::domain::config::ImbConfig;
use crate::domain::imb;
use crate::domain::ports::AddressNormalizerBox;
use crate::domain::queue::RecordQueue;
use crate::domain::record::{NormalizedAddress, RecordId};
use futures::future::join_all;
use tracing::{debug, info, warn};

/// Maximum number of normalizer calls in flight at once.
pub const BATCH_SIZE: usize = 3;

/// A record picked up by [`BatchPipeline::begin_batch`].
#[derive(Debug, Clone, PartialEq)]
pub struct BatchItem {
    pub id: RecordId,
    pub sequence_number: u64,
    pub original: String,
}

/// Result of normalizing one [`BatchItem`].
#[derive(Debug, Clone, PartialEq)]
pub enum BatchOutcome {
    Normalized {
        id: RecordId,
        sequence_number: u64,
        address: NormalizedAddress,
    },
    Failed {
        id: RecordId,
    },
}

/// What one batch step did to the queue.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchReport {
    pub completed: usize,
    pub failed: usize,
    /// Outcomes whose record was no longer in the queue (replaced by a new ingestion).
    pub discarded: usize,
}

impl BatchReport {
    pub fn is_empty(&self) -> bool {
        self.completed + self.failed + self.discarded == 0
    }
}

/// Totals for a full [`BatchPipeline::run`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub completed: usize,
    pub failed: usize,
    pub batches: usize,
}

/// Drives pending records through the normalizer and the payload encoder.
///
/// The pipeline never owns the queue. Each step borrows it, so the caller stays the single owner
/// and may replace its contents between [`begin_batch`](Self::begin_batch) and
/// [`finish_batch`](Self::finish_batch).
pub struct BatchPipeline {
    normalizer: AddressNormalizerBox,
    config: ImbConfig,
}

impl BatchPipeline {
    /// Creates a pipeline. Batches are at most [`BATCH_SIZE`] records.
    pub fn new(normalizer: AddressNormalizerBox, config: ImbConfig) -> Self {
        Self { normalizer, config }
    }

    pub fn config(&self) -> &ImbConfig {
        &self.config
    }

    /// Moves up to one window of pending records to `processing`.
    ///
    /// Returns nothing while any record is still processing, so batches never overlap.
    pub fn begin_batch(&self, queue: &mut RecordQueue) -> Vec<BatchItem> {
        if !queue.is_ready_for_batch() {
            return Vec::new();
        }

        let mut items = Vec::new();
        for id in queue.next_batch(BATCH_SIZE) {
            if !queue.mark_processing(id) {
                continue;
            }
            if let Some(record) = queue.get(id) {
                items.push(BatchItem {
                    id,
                    sequence_number: record.sequence_number,
                    original: record.original.clone(),
                });
            }
        }
        debug!(size = items.len(), "Started batch");
        items
    }

    /// Calls the normalizer for every item concurrently and waits for all of them.
    ///
    /// Failures are logged and turned into [`BatchOutcome::Failed`]; they never cut the batch
    /// short.
    pub async fn normalize_batch(&self, items: &[BatchItem]) -> Vec<BatchOutcome> {
        let calls = items.iter().map(|item| async move {
            match self.normalizer.normalize(&item.original).await {
                Ok(address) => BatchOutcome::Normalized {
                    id: item.id,
                    sequence_number: item.sequence_number,
                    address,
                },
                Err(e) => {
                    warn!(
                        record = %item.id,
                        sequence_number = item.sequence_number,
                        error = %e,
                        "Address normalization failed"
                    );
                    BatchOutcome::Failed { id: item.id }
                }
            }
        });
        join_all(calls).await
    }

    /// Applies normalizer outcomes to the queue, encoding a payload for each success.
    pub fn finish_batch(
        &self,
        queue: &mut RecordQueue,
        outcomes: Vec<BatchOutcome>,
    ) -> BatchReport {
        let mut report = BatchReport::default();
        for outcome in outcomes {
            match outcome {
                BatchOutcome::Normalized {
                    id,
                    sequence_number,
                    address,
                } => {
                    let payload = imb::encode(
                        &self.config,
                        sequence_number,
                        &address.zip,
                        Some(&address.plus4),
                        Some(&address.delivery_point),
                    );
                    if queue.complete(id, address, payload) {
                        report.completed += 1;
                    } else {
                        report.discarded += 1;
                    }
                }
                BatchOutcome::Failed { id } => {
                    if queue.fail(id) {
                        report.failed += 1;
                    } else {
                        report.discarded += 1;
                    }
                }
            }
        }
        debug!(
            completed = report.completed,
            failed = report.failed,
            discarded = report.discarded,
            "Finished batch"
        );
        report
    }

    /// One batch step: begin, normalize concurrently, finish.
    pub async fn run_once(&self, queue: &mut RecordQueue) -> BatchReport {
        let items = self.begin_batch(queue);
        if items.is_empty() {
            return BatchReport::default();
        }
        let outcomes = self.normalize_batch(&items).await;
        self.finish_batch(queue, outcomes)
    }

    /// Runs batch steps until no record is pending.
    pub async fn run(&self, queue: &mut RecordQueue) -> RunSummary {
        let mut summary = RunSummary::default();
        while queue.is_ready_for_batch() {
            let report = self.run_once(queue).await;
            if report.is_empty() {
                break;
            }
            summary.completed += report.completed;
            summary.failed += report.failed;
            summary.batches += 1;
        }
        info!(
            completed = summary.completed,
            failed = summary.failed,
            batches = summary.batches,
            status = ?queue.status(),
            "Processing run finished"
        );
        summary
    }
}
