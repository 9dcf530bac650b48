// ============================================================
// UPLOAD PROCESSOR USE CASE
// ============================================================
// Decode the uploaded file, normalize it and plan call batches

use std::time::Instant;

use chrono::Utc;
use uuid::Uuid;

use super::call_batches::CallBatchPlanner;
use super::record_normalizer::RecordNormalizer;
use crate::domain::error::Result;
use crate::domain::records::{RawRow, UploadResult};
use crate::infrastructure::spreadsheet;

#[derive(Debug, Clone, Copy, Default)]
pub struct UploadProcessor {
    normalizer: RecordNormalizer,
    planner: CallBatchPlanner,
}

impl UploadProcessor {
    /// Process raw upload bytes; the file name decides the decoder
    pub fn process_file(&self, file_name: &str, bytes: &[u8]) -> Result<UploadResult> {
        let start = Instant::now();
        let rows = spreadsheet::read_rows(file_name, bytes)?;
        let result = self.process_rows(file_name, &rows)?;

        tracing::info!(
            file_name,
            bytes = bytes.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Upload processed"
        );
        Ok(result)
    }

    pub fn process_rows(&self, file_name: &str, rows: &[RawRow]) -> Result<UploadResult> {
        let outcome = self.normalizer.normalize(rows)?;
        let batches = self.planner.plan(&outcome.records);
        let stats = self.planner.stats(&outcome.records);

        Ok(UploadResult {
            upload_id: Uuid::new_v4(),
            file_name: file_name.to_string(),
            uploaded_at: Utc::now(),
            records: outcome.records,
            summary: outcome.summary,
            batches,
            stats,
        })
    }
}
