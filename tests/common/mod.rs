#![allow(dead_code)]

use imb_architect::domain::record::NormalizedAddress;
use std::collections::HashMap;
use std::fs::File;
use std::io::Error;
use std::path::Path;

pub fn standardized(street: &str, zip: &str, plus4: &str, delivery_point: &str) -> NormalizedAddress {
    NormalizedAddress {
        street: street.to_string(),
        city: "SPRINGFIELD".to_string(),
        state: "IL".to_string(),
        zip: zip.to_string(),
        plus4: plus4.to_string(),
        delivery_point: delivery_point.to_string(),
    }
}

/// Writes a sheet with `rows` addresses: `<n> Main St, Springfield, IL, 62701`.
pub fn generate_csv(path: &Path, rows: usize) -> Result<(), Error> {
    let file = File::create(path)?;
    let mut wtr = csv::WriterBuilder::new().from_writer(file);

    wtr.write_record(["Street", "City", "State", "Zip"])?;
    for i in 1..=rows {
        let street = format!("{i} Main St");
        wtr.write_record([street.as_str(), "Springfield", "IL", "62701"])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Writes a lookup table matching the sheet from [`generate_csv`], leaving out `missing` rows.
pub fn generate_lookup(path: &Path, rows: usize, missing: &[usize]) -> Result<(), Error> {
    let table: HashMap<String, NormalizedAddress> = (1..=rows)
        .filter(|i| !missing.contains(i))
        .map(|i| {
            (
                format!("{i} Main St, Springfield, IL, 62701"),
                standardized(
                    &format!("{i} MAIN ST"),
                    "62701",
                    "1234",
                    &format!("{:02}", i % 100),
                ),
            )
        })
        .collect();

    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, &table)?;
    Ok(())
}
