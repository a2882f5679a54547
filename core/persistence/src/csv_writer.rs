//! FILENAME: core/persistence/src/csv_writer.rs
//! Delimited-text export of the active record subset.

use crate::{PersistenceError, EXPORT_HEADERS};
use csv::{QuoteStyle, WriterBuilder};
use engine::Record;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Writes `records` as CSV with every field quoted.
pub fn export_csv<'a, W, I>(writer: W, records: I) -> Result<usize, PersistenceError>
where
    W: Write,
    I: IntoIterator<Item = &'a Record>,
{
    let mut csv = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .from_writer(writer);

    csv.write_record(EXPORT_HEADERS)?;

    let mut written = 0;
    for record in records {
        csv.write_record([
            record.name.clone(),
            record.division.clone(),
            record.focus_area.clone(),
            record.stage.clone(),
            record.smv.to_string(),
            record.oh.to_string(),
            record.other.to_string(),
            record.total().to_string(),
        ])?;
        written += 1;
    }

    csv.flush()?;
    Ok(written)
}

/// Writes `records` to a CSV file at `path`, replacing it.
pub fn export_csv_file<'a, I>(path: &Path, records: I) -> Result<usize, PersistenceError>
where
    I: IntoIterator<Item = &'a Record>,
{
    let file = File::create(path)?;
    export_csv(file, records)
}
