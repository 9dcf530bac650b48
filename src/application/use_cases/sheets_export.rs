use std::sync::Arc;

use crate::domain::error::{AppError, Result};
use crate::domain::records::NormalizedRecord;
use crate::infrastructure::remote_clients::SheetsAppender;

/// Fixed 8-column layout of the call sheet:
/// `ID, DNI, Nombre, <empty>, Dirección, CUPS, Teléfono, <empty>`
pub fn sheet_row(record: &NormalizedRecord) -> Vec<String> {
    vec![
        record.id.to_string(),
        record.dni.clone(),
        record.nombre.clone(),
        String::new(),
        record.direccion.clone(),
        record.cups.clone(),
        record.telefono.clone(),
        String::new(),
    ]
}

pub struct SheetsExportUseCase {
    appender: Arc<dyn SheetsAppender>,
}

impl SheetsExportUseCase {
    pub fn new(appender: Arc<dyn SheetsAppender>) -> Self {
        Self { appender }
    }

    /// Append the records to the remote sheet; returns the updated row count
    pub async fn execute(&self, records: &[NormalizedRecord]) -> Result<usize> {
        if records.is_empty() {
            return Err(AppError::Validation(
                "There are no records to upload".to_string(),
            ));
        }

        let values = records.iter().map(sheet_row).collect();
        let updated = self.appender.append_rows(values).await?;
        tracing::info!(rows = records.len(), updated, "Records appended to sheet");
        Ok(updated)
    }
}
