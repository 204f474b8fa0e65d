use crate::domain::ports::AddressNormalizer;
use crate::domain::record::NormalizedAddress;
use crate::error::{ImbError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

type AddressTable = HashMap<String, NormalizedAddress>;

/// A deterministic normalizer backed by a lookup table.
///
/// Raw addresses are matched exactly; anything not in the table fails. `Clone` shares the table
/// and the call counters, so a test can keep a handle after boxing the normalizer.
///
/// The table lock is only taken for a lookup or an insert, never across an `.await`.
#[derive(Default, Clone)]
pub struct InMemoryNormalizer {
    addresses: Arc<RwLock<AddressTable>>,
    latency: Option<Duration>,
    calls: Arc<AtomicUsize>,
    in_flight: Arc<AtomicUsize>,
    max_in_flight: Arc<AtomicUsize>,
}

impl InMemoryNormalizer {
    /// Creates an empty normalizer. Every call fails until addresses are added.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a normalizer from a JSON object mapping raw addresses to standardized ones.
    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self> {
        let table: AddressTable = serde_json::from_reader(reader)?;
        Ok(Self {
            addresses: Arc::new(RwLock::new(table)),
            ..Self::default()
        })
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        Self::from_json_reader(std::io::BufReader::new(file))
    }

    pub fn with_address(self, raw: impl Into<String>, address: NormalizedAddress) -> Self {
        self.insert(raw, address);
        self
    }

    /// Makes every call wait before answering, so overlapping calls can be observed.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Adds an address; visible to every clone.
    pub fn insert(&self, raw: impl Into<String>, address: NormalizedAddress) {
        self.addresses
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(raw.into(), address);
    }

    fn lookup(&self, raw_address: &str) -> Option<NormalizedAddress> {
        self.addresses
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(raw_address)
            .cloned()
    }

    /// Number of `normalize` calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Number of calls currently in flight.
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Highest number of calls observed in flight at the same time.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

/// Counts one call as in flight until dropped, including when the call is cancelled.
struct InFlightGuard<'a> {
    in_flight: &'a AtomicUsize,
}

impl<'a> InFlightGuard<'a> {
    fn enter(in_flight: &'a AtomicUsize, max_in_flight: &AtomicUsize) -> Self {
        let current = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        max_in_flight.fetch_max(current, Ordering::SeqCst);
        Self { in_flight }
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl AddressNormalizer for InMemoryNormalizer {
    async fn normalize(&self, raw_address: &str) -> Result<NormalizedAddress> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let _guard = InFlightGuard::enter(&self.in_flight, &self.max_in_flight);

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        self.lookup(raw_address).ok_or_else(|| {
            ImbError::Normalizer(format!("no standardized address for '{raw_address}'"))
        })
    }
}
