//! FILENAME: core/persistence/src/lib.rs
//! Persistence Module
//!
//! Loads solution snapshots from XLSX workbooks and exports record subsets
//! as CSV or XLSX. Every load returns a complete replacement snapshot.

mod csv_writer;
mod error;
mod xlsx_reader;
mod xlsx_writer;

pub use csv_writer::{export_csv, export_csv_file};
pub use error::PersistenceError;
pub use xlsx_reader::{
    load_raw_records, load_raw_records_from_bytes, load_records, load_records_from_bytes,
};
pub use xlsx_writer::{export_xlsx, export_xlsx_to_buffer, EXPORT_SHEET_NAME};

use serde::{Deserialize, Serialize};
use std::path::Path;

use engine::Record;

/// Column headers of every export, in order.
pub const EXPORT_HEADERS: [&str; 8] = [
    "Solution Name",
    "Division",
    "Focus Area",
    "Stage",
    "SMV Unlock",
    "OH Reduction",
    "Other Savings",
    "Total",
];

/// Output format for `export_records`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ExportFormat {
    #[default]
    Csv,
    Xlsx,
}

impl ExportFormat {
    /// Picks the format from a file extension; anything but `.xlsx` is CSV.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("xlsx") => ExportFormat::Xlsx,
            _ => ExportFormat::Csv,
        }
    }
}

/// Writes `records` to `path` in `format`. Returns the number of data rows.
pub fn export_records<'a, I>(
    path: &Path,
    format: ExportFormat,
    records: I,
) -> Result<usize, PersistenceError>
where
    I: IntoIterator<Item = &'a Record>,
{
    match format {
        ExportFormat::Csv => export_csv_file(path, records),
        ExportFormat::Xlsx => export_xlsx(path, records),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine::{ColumnKeys, UNSPECIFIED};
    use rust_xlsxwriter::Workbook as XlsxWorkbook;

    fn record(name: &str, division: &str, smv: f64, oh: f64, other: f64) -> Record {
        Record {
            source_row: 0,
            division: division.to_string(),
            name: name.to_string(),
            focus_area: "Cost".to_string(),
            stage: "Pilot".to_string(),
            smv,
            oh,
            other,
        }
    }

    /// Builds a source workbook the way the solution list is laid out.
    fn source_workbook() -> Vec<u8> {
        let mut wb = XlsxWorkbook::new();
        let ws = wb.add_worksheet();
        let headers = [
            " Division ",
            "Solution Name",
            "Focus Area",
            "Stage",
            "SMV Unlock",
            "OH Reduction",
            "Other Savings",
        ];
        for (c, h) in headers.iter().enumerate() {
            ws.write_string(0, c as u16, *h).unwrap();
        }
        ws.write_string(1, 0, "Ops").unwrap();
        ws.write_string(1, 1, "Line Balancing").unwrap();
        ws.write_string(1, 3, "Pilot").unwrap();
        ws.write_number(1, 4, 2.5).unwrap();
        ws.write_string(1, 5, "$1,000").unwrap();
        // Row 2 left blank
        ws.write_string(3, 0, "  ").unwrap();
        ws.write_number(3, 6, 4.0).unwrap();
        wb.save_to_buffer().unwrap()
    }

    #[test]
    fn test_load_from_bytes() {
        let bytes = source_workbook();
        let records = load_records_from_bytes(&bytes, None, &ColumnKeys::default()).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].division, "Ops");
        assert_eq!(records[0].focus_area, UNSPECIFIED);
        assert_eq!(records[0].smv, 2.5);
        assert_eq!(records[0].oh, 1000.0);
        assert_eq!(records[1].division, UNSPECIFIED);
        assert_eq!(records[1].other, 4.0);
        assert_eq!(records[1].source_row, 1);
    }

    #[test]
    fn test_load_missing_sheet() {
        let bytes = source_workbook();
        let err = load_raw_records_from_bytes(&bytes, Some("Nope")).unwrap_err();
        assert!(matches!(err, PersistenceError::SheetNotFound(ref s) if s == "Nope"));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Solution List.xlsx");
        std::fs::write(&path, source_workbook()).unwrap();

        let records = load_records(&path, Some("Sheet1"), &ColumnKeys::default()).unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_load_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_records(&dir.path().join("absent.xlsx"), None, &ColumnKeys::default());
        assert!(result.is_err());
    }

    #[test]
    fn test_export_csv_quotes_every_field() {
        let records = vec![record("Say \"hi\"", "Ops", 1.5, 2.0, 0.0)];
        let mut out = Vec::new();
        let written = export_csv(&mut out, &records).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(written, 1);
        assert_eq!(
            lines[0],
            "\"Solution Name\",\"Division\",\"Focus Area\",\"Stage\",\"SMV Unlock\",\"OH Reduction\",\"Other Savings\",\"Total\""
        );
        assert_eq!(
            lines[1],
            "\"Say \"\"hi\"\"\",\"Ops\",\"Cost\",\"Pilot\",\"1.5\",\"2\",\"0\",\"3.5\""
        );
    }

    #[test]
    fn test_export_xlsx_round_trip() {
        let records = vec![
            record("A", "Ops", 1.0, 2.0, 3.0),
            record("B", "IT", 0.5, 0.0, 0.0),
        ];
        let bytes = export_xlsx_to_buffer(&records).unwrap();

        let keys = ColumnKeys::default();
        let loaded = load_records_from_bytes(&bytes, Some(EXPORT_SHEET_NAME), &keys).unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].name, "A");
        assert_eq!(loaded[0].total(), 6.0);
        assert_eq!(loaded[1].division, "IT");
    }

    #[test]
    fn test_export_records_by_format() {
        let dir = tempfile::tempdir().unwrap();
        let records = vec![record("A", "Ops", 1.0, 0.0, 0.0)];

        let csv_path = dir.path().join("out.csv");
        assert_eq!(ExportFormat::from_path(&csv_path), ExportFormat::Csv);
        assert_eq!(export_records(&csv_path, ExportFormat::Csv, &records).unwrap(), 1);
        assert!(std::fs::read_to_string(&csv_path).unwrap().contains("\"Ops\""));

        let xlsx_path = dir.path().join("out.XLSX");
        assert_eq!(ExportFormat::from_path(&xlsx_path), ExportFormat::Xlsx);
        assert_eq!(export_records(&xlsx_path, ExportFormat::Xlsx, &records).unwrap(), 1);
        assert!(xlsx_path.exists());
    }
}
