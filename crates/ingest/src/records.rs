use crate::error::IngestError;
use core_types::FinancialRecord;
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::Path;

/// Serializes records as the processed CSV, one row per bank-period.
pub fn write_records_to<W: Write>(writer: W, records: &[FinancialRecord]) -> Result<(), IngestError> {
    let mut wtr = csv::Writer::from_writer(writer);
    for record in records {
        wtr.serialize(record)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Writes the processed CSV to `path`, creating parent directories as needed.
pub fn write_records(path: &Path, records: &[FinancialRecord]) -> Result<(), IngestError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let file = File::create(path)?;
    write_records_to(file, records)?;
    tracing::info!(path = %path.display(), records = records.len(), "Wrote processed records.");
    Ok(())
}

pub fn read_records_from<R: Read>(reader: R) -> Result<Vec<FinancialRecord>, IngestError> {
    let mut rdr = csv::Reader::from_reader(reader);
    let records = rdr
        .deserialize::<FinancialRecord>()
        .collect::<Result<Vec<_>, _>>()?;
    Ok(records)
}

/// Loads a processed CSV written by [`write_records`].
pub fn read_records(path: &Path) -> Result<Vec<FinancialRecord>, IngestError> {
    let file = File::open(path)?;
    let records = read_records_from(file)?;
    tracing::info!(path = %path.display(), records = records.len(), "Loaded processed records.");
    Ok(records)
}
