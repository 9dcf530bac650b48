use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{CallBatch, CallStats, NormalizedRecord, ProcessingSummary};

/// Everything produced by one successful upload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResult {
    pub upload_id: Uuid,
    pub file_name: String,
    pub uploaded_at: DateTime<Utc>,
    pub records: Vec<NormalizedRecord>,
    pub summary: ProcessingSummary,
    pub batches: Vec<CallBatch>,
    pub stats: CallStats,
}
