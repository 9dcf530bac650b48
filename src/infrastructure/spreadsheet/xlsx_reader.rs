use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, Reader};

use super::headers::unique_headers;
use crate::domain::error::{AppError, Result};
use crate::domain::records::{CellValue, RawRow};

/// Read the first worksheet of a workbook.
///
/// The first sheet row is the header row. Rows with no non-empty cell are
/// skipped; cells to the right of the last header are ignored.
pub fn read_workbook(bytes: &[u8]) -> Result<Vec<RawRow>> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec())).map_err(|e| {
        tracing::error!(error = %e, "Failed to open workbook");
        AppError::FileRead(format!("Failed to open Excel file: {}", e))
    })?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| AppError::FileRead("No worksheet found".to_string()))?
        .map_err(|e| AppError::FileRead(format!("Failed to read Excel range: {}", e)))?;

    let mut sheet_rows = range.rows();
    let headers = match sheet_rows.next() {
        Some(header_row) => unique_headers(header_row.iter().map(header_text)),
        None => return Ok(Vec::new()),
    };

    let rows: Vec<RawRow> = sheet_rows
        .map(|cells| to_raw_row(&headers, cells))
        .filter(|row| !is_blank(row))
        .collect();

    tracing::debug!(columns = headers.len(), rows = rows.len(), "Workbook decoded");
    Ok(rows)
}

fn header_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        other => cell_value(other).to_display_string(),
    }
}

fn cell_value(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Bool(b) => CellValue::Bool(*b),
        other => CellValue::Text(other.to_string()),
    }
}

fn to_raw_row(headers: &[String], cells: &[Data]) -> RawRow {
    headers
        .iter()
        .enumerate()
        .map(|(idx, header)| {
            let value = cells.get(idx).map(cell_value).unwrap_or(CellValue::Empty);
            (header.clone(), value)
        })
        .collect()
}

fn is_blank(row: &RawRow) -> bool {
    row.headers()
        .all(|header| row.get(header).map_or(true, CellValue::is_empty))
}
