// ============================================================
// SPREADSHEET INFRASTRUCTURE LAYER
// ============================================================
// Decoding uploaded sheets into raw rows and encoding cleaned exports

mod csv_reader;
mod headers;
mod xlsx_reader;
mod xlsx_writer;

pub use csv_reader::read_csv;
pub use xlsx_reader::read_workbook;
pub use xlsx_writer::{write_records, EXPORT_FILE_NAME, EXPORT_SHEET_NAME};

use crate::domain::error::{AppError, Result};
use crate::domain::records::RawRow;

/// Upload formats accepted by the reader
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetFormat {
    Workbook,
    Csv,
}

impl SheetFormat {
    pub fn from_file_name(file_name: &str) -> Result<Self> {
        let extension = file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "xlsx" | "xlsm" | "xls" | "ods" => Ok(SheetFormat::Workbook),
            "csv" => Ok(SheetFormat::Csv),
            _ => Err(AppError::Validation(format!(
                "Unsupported file '{}': please select an Excel file (.xlsx)",
                file_name
            ))),
        }
    }
}

/// Decode an uploaded file into rows keyed by the header row
pub fn read_rows(file_name: &str, bytes: &[u8]) -> Result<Vec<RawRow>> {
    match SheetFormat::from_file_name(file_name)? {
        SheetFormat::Workbook => read_workbook(bytes),
        SheetFormat::Csv => read_csv(bytes),
    }
}
