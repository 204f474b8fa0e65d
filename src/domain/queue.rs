use super::record::{AddressRecord, NormalizedAddress, RecordId, RecordStatus};
use serde::Serialize;
use tracing::debug;

/// Overall status of the current ingestion.
#[derive(Debug, Serialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "UPPERCASE")]
pub enum ProcessingStatus {
    /// Nothing has been ingested.
    Idle,
    /// At least one record is pending or processing.
    Processing,
    /// Every record reached a terminal state.
    Completed,
}

/// Owns the address records of one ingestion session.
///
/// All status changes go through the queue. Transitions that the record lifecycle forbids, or
/// that target a record which is no longer in the queue, are refused and return `false`.
#[derive(Debug, Default, Clone)]
pub struct RecordQueue {
    records: Vec<AddressRecord>,
}

impl RecordQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole queue with fresh pending records.
    ///
    /// Sequence numbers are assigned in order starting at `start_sequence_number` and saturate
    /// at `u64::MAX`. Returns the number of records ingested.
    pub fn ingest<I, S>(&mut self, raw_addresses: I, start_sequence_number: u64) -> usize
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let discarded = self.records.len();
        self.records = raw_addresses
            .into_iter()
            .zip(0u64..)
            .map(|(raw, offset)| {
                AddressRecord::new(raw, start_sequence_number.saturating_add(offset))
            })
            .collect();
        debug!(
            discarded,
            ingested = self.records.len(),
            "Replaced record queue"
        );
        self.records.len()
    }

    pub fn records(&self) -> &[AddressRecord] {
        &self.records
    }

    pub fn get(&self, id: RecordId) -> Option<&AddressRecord> {
        self.records.iter().find(|record| record.id == id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn count(&self, status: RecordStatus) -> usize {
        self.records
            .iter()
            .filter(|record| record.status == status)
            .count()
    }

    pub fn status(&self) -> ProcessingStatus {
        if self.records.is_empty() {
            ProcessingStatus::Idle
        } else if self.records.iter().all(|record| record.status.is_terminal()) {
            ProcessingStatus::Completed
        } else {
            ProcessingStatus::Processing
        }
    }

    /// True when a new batch may start: something is pending and nothing is in flight.
    pub fn is_ready_for_batch(&self) -> bool {
        self.count(RecordStatus::Pending) > 0 && self.count(RecordStatus::Processing) == 0
    }

    /// Ids of up to `limit` pending records, in ingestion order.
    pub fn next_batch(&self, limit: usize) -> Vec<RecordId> {
        self.records
            .iter()
            .filter(|record| record.status == RecordStatus::Pending)
            .take(limit)
            .map(|record| record.id)
            .collect()
    }

    pub fn mark_processing(&mut self, id: RecordId) -> bool {
        self.apply(id, |record| record.start_processing())
    }

    pub fn complete(&mut self, id: RecordId, address: NormalizedAddress, imb_data: String) -> bool {
        self.apply(id, |record| record.complete(address, imb_data))
    }

    pub fn fail(&mut self, id: RecordId) -> bool {
        self.apply(id, |record| record.fail())
    }

    fn apply<F>(&mut self, id: RecordId, transition: F) -> bool
    where
        F: FnOnce(&mut AddressRecord) -> crate::error::Result<()>,
    {
        let Some(record) = self.records.iter_mut().find(|record| record.id == id) else {
            debug!(%id, "Ignoring transition for record not in queue");
            return false;
        };
        match transition(record) {
            Ok(()) => true,
            Err(e) => {
                debug!(error = %e, "Refused record transition");
                false
            }
        }
    }
}
