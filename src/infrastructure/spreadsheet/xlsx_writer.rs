use rust_xlsxwriter::{Workbook, Worksheet, XlsxError};

use crate::domain::error::{AppError, Result};
use crate::domain::records::{CanonicalField, NormalizedRecord};

pub const EXPORT_SHEET_NAME: &str = "Datos Procesados";
pub const EXPORT_FILE_NAME: &str = "datos_procesados.xlsx";

/// Serialize kept records into a single-sheet workbook.
///
/// Columns follow the key order of a record: the six canonical fields, then `ID`.
pub fn write_records(records: &[NormalizedRecord]) -> Result<Vec<u8>> {
    if records.is_empty() {
        return Err(AppError::Validation("There are no records to export".to_string()));
    }

    build_workbook(records).map_err(|e| {
        tracing::error!(error = %e, "Failed to build export workbook");
        AppError::Internal(format!("Failed to build Excel file: {}", e))
    })
}

fn build_workbook(records: &[NormalizedRecord]) -> std::result::Result<Vec<u8>, XlsxError> {
    let mut workbook = Workbook::new();
    let mut worksheet = Worksheet::new();
    worksheet.set_name(EXPORT_SHEET_NAME)?;

    for (col, title) in NormalizedRecord::COLUMNS.iter().enumerate() {
        worksheet.write_string(0, col as u16, *title)?;
    }

    let id_col = CanonicalField::ALL.len() as u16;
    for (idx, record) in records.iter().enumerate() {
        let row = (idx + 1) as u32;
        for (col, field) in CanonicalField::ALL.iter().enumerate() {
            worksheet.write_string(row, col as u16, record.get(*field))?;
        }
        worksheet.write_number(row, id_col, record.id as f64)?;
    }

    workbook.push_worksheet(worksheet);
    workbook.save_to_buffer()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::records::CellValue;
    use crate::infrastructure::spreadsheet::read_workbook;

    #[test]
    fn test_export_is_readable_with_expected_columns() {
        let mut record = NormalizedRecord::with_id(4);
        record.set(CanonicalField::Nombre, "Ana".to_string());
        record.set(CanonicalField::Telefono, "612345678".to_string());

        let bytes = write_records(&[record]).unwrap();
        let rows = read_workbook(&bytes).unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(
            rows[0].headers().collect::<Vec<_>>(),
            NormalizedRecord::COLUMNS.to_vec()
        );
        assert_eq!(rows[0].get("ID"), Some(&CellValue::Number(4.0)));
        assert_eq!(rows[0].get("Nombre"), Some(&CellValue::Text("Ana".to_string())));
    }

    #[test]
    fn test_empty_export_rejected() {
        assert!(matches!(write_records(&[]), Err(AppError::Validation(_))));
    }
}
