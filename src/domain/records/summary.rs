use serde::{Deserialize, Serialize};

use super::{CanonicalField, FieldMapping, NormalizedRecord};

/// Diagnostic counts for one normalization pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessingSummary {
    pub total_rows: usize,
    pub valid_rows: usize,
    pub unique_rows: usize,
    pub duplicates_removed: usize,
    pub mapping: FieldMapping,
    pub found_fields: Vec<CanonicalField>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizationOutcome {
    pub records: Vec<NormalizedRecord>,
    pub summary: ProcessingSummary,
}
