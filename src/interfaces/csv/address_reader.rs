use crate::error::{ImbError, Result};
use csv::StringRecord;
use std::io::Read;
use tracing::debug;

/// Which column holds each address part. `None` means the part is not present in the sheet.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMapping {
    pub street: Option<usize>,
    pub city: Option<usize>,
    pub state: Option<usize>,
    pub zip: Option<usize>,
    pub plus4: Option<usize>,
}

impl ColumnMapping {
    /// Guesses the mapping from header names.
    ///
    /// Each header is assigned to at most one part; when several headers match the same part
    /// the last one wins. A sheet with a single unrecognised column is read as full addresses.
    pub fn detect<'a, I>(headers: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut mapping = Self::default();
        let mut columns = 0;
        for (idx, header) in headers.into_iter().enumerate() {
            columns += 1;
            let lower = header.to_lowercase();
            let has = |needle: &str| lower.contains(needle);

            if has("street") || has("address") || has("addr") || has("line 1") {
                mapping.street = Some(idx);
            } else if has("city") || has("town") {
                mapping.city = Some(idx);
            } else if has("state") || has("province") || lower == "st" {
                mapping.state = Some(idx);
            } else if (has("zip") || has("postal") || has("code")) && !has("plus") && !has("+") {
                mapping.zip = Some(idx);
            } else if has("plus") || has("+4") || has("add-on") || has("addon") {
                mapping.plus4 = Some(idx);
            }
        }

        if mapping.street.is_none() && columns == 1 {
            mapping.street = Some(0);
        }
        mapping
    }

    /// Joins the mapped cells of `row` into one address string.
    ///
    /// Returns `None` when the row has no street value.
    pub fn compose(&self, row: &StringRecord) -> Option<String> {
        let cell = |idx: Option<usize>| idx.and_then(|i| row.get(i)).unwrap_or("");

        let street = cell(self.street);
        if street.is_empty() {
            return None;
        }
        let zip = cell(self.zip);
        let plus4 = cell(self.plus4);
        let zip_part = match (zip.is_empty(), plus4.is_empty()) {
            (_, true) => zip.to_string(),
            (false, false) => format!("{zip}-{plus4}"),
            (true, false) => format!("ZIP+4:{plus4}"),
        };

        let parts = [street, cell(self.city), cell(self.state), zip_part.as_str()];
        Some(
            parts
                .iter()
                .filter(|part| !part.is_empty())
                .copied()
                .collect::<Vec<_>>()
                .join(", "),
        )
    }
}

/// Reads raw address strings from a CSV source with a header row.
///
/// Whitespace is trimmed and rows may have differing lengths. Rows without a street value are
/// skipped.
pub struct AddressReader<R: Read> {
    reader: csv::Reader<R>,
    mapping: Option<ColumnMapping>,
}

impl<R: Read> AddressReader<R> {
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self {
            reader,
            mapping: None,
        }
    }

    /// Uses `mapping` instead of detecting one from the headers.
    pub fn with_mapping(mut self, mapping: ColumnMapping) -> Self {
        self.mapping = Some(mapping);
        self
    }

    /// Reads the header row and returns a lazy iterator over composed addresses.
    pub fn addresses(mut self) -> Result<impl Iterator<Item = Result<String>>> {
        let mapping = match self.mapping {
            Some(mapping) => mapping,
            None => ColumnMapping::detect(self.reader.headers()?.iter()),
        };
        debug!(?mapping, "Using column mapping");

        Ok(self
            .reader
            .into_records()
            .filter_map(move |result| match result {
                Ok(row) => mapping.compose(&row).map(Ok),
                Err(e) => Some(Err(ImbError::from(e))),
            }))
    }
}
