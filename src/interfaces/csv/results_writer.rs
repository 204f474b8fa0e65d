use crate::domain::record::{AddressRecord, RecordStatus};
use crate::error::Result;
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Serialize)]
struct ResultRow<'a> {
    #[serde(rename = "Original Address")]
    original: &'a str,
    #[serde(rename = "Standardized Street")]
    street: &'a str,
    #[serde(rename = "City")]
    city: &'a str,
    #[serde(rename = "State")]
    state: &'a str,
    #[serde(rename = "ZIP")]
    zip: &'a str,
    #[serde(rename = "Plus 4")]
    plus4: &'a str,
    #[serde(rename = "Delivery Point")]
    delivery_point: &'a str,
    #[serde(rename = "IMB Payload")]
    imb_data: &'a str,
    #[serde(rename = "Sequence Number")]
    sequence_number: u64,
    #[serde(rename = "Status", skip_serializing_if = "Option::is_none")]
    status: Option<RecordStatus>,
}

impl<'a> ResultRow<'a> {
    fn new(record: &'a AddressRecord, with_status: bool) -> Self {
        Self {
            original: &record.original,
            street: &record.street,
            city: &record.city,
            state: &record.state,
            zip: &record.zip,
            plus4: &record.plus4,
            delivery_point: &record.delivery_point,
            imb_data: record.imb_data.as_deref().unwrap_or(""),
            sequence_number: record.sequence_number,
            status: with_status.then_some(record.status),
        }
    }
}

/// Writes processed records as CSV, one row per record in queue order.
pub struct ResultsWriter<W: Write> {
    writer: csv::Writer<W>,
    with_status: bool,
}

impl<W: Write> ResultsWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
            with_status: false,
        }
    }

    /// Appends a `Status` column.
    pub fn with_status(mut self, with_status: bool) -> Self {
        self.with_status = with_status;
        self
    }

    pub fn write_records<'a, I>(&mut self, records: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a AddressRecord>,
    {
        for record in records {
            self.writer
                .serialize(ResultRow::new(record, self.with_status))?;
        }
        self.writer.flush()?;
        Ok(())
    }
}
