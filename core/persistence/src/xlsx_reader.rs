// FILENAME: core\persistence\src\xlsx_reader.rs

use crate::PersistenceError;
use calamine::{open_workbook, Data, Reader, Xlsx};
use engine::{canonicalize, ColumnKeys, RawRecord, RawValue, Record};
use std::io::{Cursor, Read, Seek};
use std::path::Path;

/// Reads one worksheet as a header row followed by data rows.
/// `sheet` defaults to the first sheet in the workbook.
pub fn load_raw_records(path: &Path, sheet: Option<&str>) -> Result<Vec<RawRecord>, PersistenceError> {
    let mut workbook: Xlsx<_> = open_workbook(path)?;
    read_sheet(&mut workbook, sheet)
}

/// Same as `load_raw_records`, for a workbook already in memory.
pub fn load_raw_records_from_bytes(
    bytes: &[u8],
    sheet: Option<&str>,
) -> Result<Vec<RawRecord>, PersistenceError> {
    let mut workbook = Xlsx::new(Cursor::new(bytes))?;
    read_sheet(&mut workbook, sheet)
}

/// Loads and normalizes a snapshot of solution records.
pub fn load_records(
    path: &Path,
    sheet: Option<&str>,
    keys: &ColumnKeys,
) -> Result<Vec<Record>, PersistenceError> {
    let raw = load_raw_records(path, sheet)?;
    Ok(canonicalize(&raw, keys))
}

pub fn load_records_from_bytes(
    bytes: &[u8],
    sheet: Option<&str>,
    keys: &ColumnKeys,
) -> Result<Vec<Record>, PersistenceError> {
    let raw = load_raw_records_from_bytes(bytes, sheet)?;
    Ok(canonicalize(&raw, keys))
}

fn read_sheet<RS: Read + Seek>(
    workbook: &mut Xlsx<RS>,
    sheet: Option<&str>,
) -> Result<Vec<RawRecord>, PersistenceError> {
    let sheet_names = workbook.sheet_names().to_vec();

    let sheet_name = match sheet {
        Some(name) => sheet_names
            .iter()
            .find(|s| s.as_str() == name)
            .cloned()
            .ok_or_else(|| PersistenceError::SheetNotFound(name.to_string()))?,
        None => sheet_names.first().cloned().ok_or_else(|| {
            PersistenceError::InvalidFormat("Workbook contains no sheets".to_string())
        })?,
    };

    let range = workbook.worksheet_range(&sheet_name)?;
    let mut rows = range.rows();

    let headers: Vec<String> = match rows.next() {
        Some(header_row) => header_row
            .iter()
            .map(|cell| data_to_raw(cell).display_value().trim().to_string())
            .collect(),
        None => return Ok(Vec::new()),
    };

    let mut records = Vec::new();
    for row in rows {
        let mut raw = RawRecord::new();
        for (col_idx, header) in headers.iter().enumerate() {
            if header.is_empty() {
                continue;
            }
            let value = row.get(col_idx).map(data_to_raw).unwrap_or(RawValue::Empty);
            raw.insert(header, value);
        }

        // Blank rows between or after the data are not records
        if raw.is_empty() {
            continue;
        }
        records.push(raw);
    }

    Ok(records)
}

fn data_to_raw(cell: &Data) -> RawValue {
    match cell {
        Data::Empty => RawValue::Empty,
        Data::String(s) => RawValue::Text(s.clone()),
        Data::Float(f) => RawValue::Number(*f),
        Data::Int(i) => RawValue::Number(*i as f64),
        Data::Bool(b) => RawValue::Boolean(*b),
        // An error cell carries no usable value
        Data::Error(_) => RawValue::Empty,
        Data::DateTime(dt) => RawValue::Number(dt.as_f64()),
        Data::DateTimeIso(s) => RawValue::Text(s.clone()),
        Data::DurationIso(s) => RawValue::Text(s.clone()),
    }
}
