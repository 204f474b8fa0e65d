use serde::{Deserialize, Serialize};

/// Mailer-level settings shared by every payload in a run.
///
/// Values are kept exactly as entered. Width and digit rules are applied only when a payload is
/// encoded, so a malformed value never prevents a run from starting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImbConfig {
    /// Barcode identifier, nominally 2 digits.
    pub barcode_id: String,
    /// Service Type ID (STID), nominally 3 digits.
    pub service_type_id: String,
    /// Mailer ID (MID), nominally 6 or 9 digits.
    pub mailer_id: String,
    /// Sequence number given to the first record of an ingestion.
    pub start_sequence_number: u64,
}

impl Default for ImbConfig {
    fn default() -> Self {
        Self {
            barcode_id: "00".to_string(),
            service_type_id: "300".to_string(),
            mailer_id: "123456".to_string(),
            start_sequence_number: 1,
        }
    }
}
