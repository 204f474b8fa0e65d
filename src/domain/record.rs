use crate::error::{ImbError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

pub type RecordId = Uuid;

/// Lifecycle of a single address record.
///
/// `Pending -> Processing -> Completed | Error`. The last two are terminal.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum RecordStatus {
    Pending,
    Processing,
    Completed,
    Error,
}

impl RecordStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, RecordStatus::Completed | RecordStatus::Error)
    }
}

impl fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RecordStatus::Pending => "pending",
            RecordStatus::Processing => "processing",
            RecordStatus::Completed => "completed",
            RecordStatus::Error => "error",
        };
        f.write_str(name)
    }
}

/// Standardized address as returned by an address normalizer.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedAddress {
    pub street: String,
    pub city: String,
    /// Two-letter state abbreviation.
    pub state: String,
    /// 5-digit ZIP code.
    pub zip: String,
    /// 4-digit ZIP+4 add-on.
    pub plus4: String,
    /// 2-digit delivery point.
    pub delivery_point: String,
}

/// One mailpiece address moving through the pipeline.
#[derive(Debug, Serialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct AddressRecord {
    pub id: RecordId,
    /// Raw address string as ingested.
    pub original: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub plus4: String,
    pub delivery_point: String,
    pub status: RecordStatus,
    pub sequence_number: u64,
    /// The 31-digit payload, set only once the record is completed.
    pub imb_data: Option<String>,
}

impl AddressRecord {
    pub fn new(original: impl Into<String>, sequence_number: u64) -> Self {
        Self {
            id: Uuid::new_v4(),
            original: original.into(),
            street: String::new(),
            city: String::new(),
            state: String::new(),
            zip: String::new(),
            plus4: String::new(),
            delivery_point: String::new(),
            status: RecordStatus::Pending,
            sequence_number,
            imb_data: None,
        }
    }

    /// Picks the record up for normalization.
    pub fn start_processing(&mut self) -> Result<()> {
        self.transition(RecordStatus::Pending, RecordStatus::Processing)
    }

    /// Stores the standardized fields and the payload built from them.
    pub fn complete(&mut self, address: NormalizedAddress, imb_data: String) -> Result<()> {
        self.transition(RecordStatus::Processing, RecordStatus::Completed)?;
        self.street = address.street;
        self.city = address.city;
        self.state = address.state;
        self.zip = address.zip;
        self.plus4 = address.plus4;
        self.delivery_point = address.delivery_point;
        self.imb_data = Some(imb_data);
        Ok(())
    }

    /// Marks normalization as failed. Address fields stay blank.
    pub fn fail(&mut self) -> Result<()> {
        self.transition(RecordStatus::Processing, RecordStatus::Error)
    }

    fn transition(&mut self, from: RecordStatus, to: RecordStatus) -> Result<()> {
        if self.status != from {
            return Err(ImbError::InvalidTransition(format!(
                "record {} is {}, cannot move to {}",
                self.id, self.status, to
            )));
        }
        self.status = to;
        Ok(())
    }
}
