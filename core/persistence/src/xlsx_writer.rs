//! FILENAME: core/persistence/src/xlsx_writer.rs

use crate::{PersistenceError, EXPORT_HEADERS};
use engine::{metric_decimals, Metric, Record};
use rust_xlsxwriter::{Format, Workbook as XlsxWorkbook, Worksheet};
use std::path::Path;

/// Name of the single worksheet written by the exporter.
pub const EXPORT_SHEET_NAME: &str = "Solutions";

/// Writes `records` to an XLSX workbook at `path`.
pub fn export_xlsx<'a, I>(path: &Path, records: I) -> Result<usize, PersistenceError>
where
    I: IntoIterator<Item = &'a Record>,
{
    let mut xlsx = XlsxWorkbook::new();
    let written = write_sheet(xlsx.add_worksheet(), records)?;
    xlsx.save(path)?;
    Ok(written)
}

/// Writes `records` to an in-memory XLSX workbook.
pub fn export_xlsx_to_buffer<'a, I>(records: I) -> Result<Vec<u8>, PersistenceError>
where
    I: IntoIterator<Item = &'a Record>,
{
    let mut xlsx = XlsxWorkbook::new();
    write_sheet(xlsx.add_worksheet(), records)?;
    Ok(xlsx.save_to_buffer()?)
}

fn write_sheet<'a, I>(worksheet: &mut Worksheet, records: I) -> Result<usize, PersistenceError>
where
    I: IntoIterator<Item = &'a Record>,
{
    worksheet.set_name(EXPORT_SHEET_NAME)?;

    let header_format = Format::new().set_bold();
    for (col, header) in EXPORT_HEADERS.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *header, &header_format)?;
        worksheet.set_column_width(col as u16, 18)?;
    }

    let metric_formats: Vec<(Metric, Format)> = [Metric::Smv, Metric::Oh, Metric::Other, Metric::Total]
        .into_iter()
        .map(|m| (m, Format::new().set_num_format(number_format_code(m))))
        .collect();

    let mut written = 0;
    for (i, record) in records.into_iter().enumerate() {
        let row = (i + 1) as u32;
        worksheet.write_string(row, 0, &record.name)?;
        worksheet.write_string(row, 1, &record.division)?;
        worksheet.write_string(row, 2, &record.focus_area)?;
        worksheet.write_string(row, 3, &record.stage)?;

        for (offset, (metric, format)) in metric_formats.iter().enumerate() {
            worksheet.write_number_with_format(
                row,
                (4 + offset) as u16,
                record.metric(*metric),
                format,
            )?;
        }
        written += 1;
    }

    Ok(written)
}

/// Excel number format matching the on-screen precision of `metric`.
fn number_format_code(metric: Metric) -> String {
    match metric_decimals(metric) {
        0 => "#,##0".to_string(),
        d => format!("#,##0.{}", "0".repeat(d)),
    }
}
