// ============================================================
// RECORD NORMALIZER USE CASE
// ============================================================
// Header matching -> record construction -> empty-row filter -> phone dedup

use std::collections::HashSet;

use crate::domain::error::{AppError, Result};
use crate::domain::records::{
    CanonicalField, FieldMapping, NormalizationOutcome, NormalizedRecord, ProcessingSummary,
    RawRow,
};

/// Turns raw sheet rows into cleaned, deduplicated contact records
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordNormalizer;

impl RecordNormalizer {
    pub fn new() -> Self {
        Self
    }

    /// Normalize one uploaded sheet.
    ///
    /// The field mapping is computed from the headers of the first row only.
    /// Either a full outcome is returned or an error; nothing partial.
    pub fn normalize(&self, rows: &[RawRow]) -> Result<NormalizationOutcome> {
        let first_row = rows.first().ok_or(AppError::EmptyInput)?;

        let mapping = match_fields(first_row.headers());
        if mapping.is_empty() {
            tracing::warn!(
                headers = ?first_row.headers().collect::<Vec<_>>(),
                "No canonical field matched the sheet headers"
            );
            return Err(AppError::UnrecognizedSchedule);
        }

        let valid: Vec<NormalizedRecord> = rows
            .iter()
            .enumerate()
            .map(|(index, row)| build_record(row, index + 1, &mapping))
            .filter(|record| !record.is_blank())
            .collect();
        let valid_rows = valid.len();

        let (records, duplicates_removed) = dedupe_by_phone(valid);

        let summary = ProcessingSummary {
            total_rows: rows.len(),
            valid_rows,
            unique_rows: records.len(),
            duplicates_removed,
            found_fields: mapping.found_fields(),
            mapping,
        };

        tracing::info!(
            total_rows = summary.total_rows,
            valid_rows = summary.valid_rows,
            unique_rows = summary.unique_rows,
            duplicates_removed = summary.duplicates_removed,
            "Sheet normalized"
        );

        Ok(NormalizationOutcome { records, summary })
    }
}

/// Comparison key for a column header: lower-case, accent-free, `[a-z0-9]` only
pub fn normalize_header(name: &str) -> String {
    name.to_lowercase()
        .trim()
        .chars()
        .map(fold_accent)
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        .collect()
}

fn fold_accent(c: char) -> char {
    match c {
        'á' | 'à' | 'ä' | 'â' => 'a',
        'é' | 'è' | 'ë' | 'ê' => 'e',
        'í' | 'ì' | 'ï' | 'î' => 'i',
        'ó' | 'ò' | 'ö' | 'ô' => 'o',
        'ú' | 'ù' | 'ü' | 'û' => 'u',
        'ñ' => 'n',
        'ç' => 'c',
        other => other,
    }
}

/// For each canonical field pick the first header whose key contains one of
/// the field's candidates. A header may serve more than one field.
pub fn match_fields<'a>(headers: impl IntoIterator<Item = &'a str>) -> FieldMapping {
    let keyed: Vec<(&str, String)> = headers
        .into_iter()
        .map(|header| (header, normalize_header(header)))
        .collect();

    let mut mapping = FieldMapping::new();
    for field in CanonicalField::ALL {
        let found = keyed.iter().find(|(_, key)| {
            field
                .candidates()
                .iter()
                .any(|candidate| key.contains(candidate))
        });

        if let Some((header, _)) = found {
            tracing::debug!(field = %field, column = %header, "Mapped column");
            mapping.insert(field, *header);
        }
    }
    mapping
}

fn build_record(row: &RawRow, id: usize, mapping: &FieldMapping) -> NormalizedRecord {
    let mut record = NormalizedRecord::with_id(id);
    for field in CanonicalField::ALL {
        let value = mapping
            .source_column(field)
            .and_then(|column| row.get(column))
            .filter(|cell| !cell.is_falsy())
            .map(|cell| cell.to_display_string().trim().to_string())
            .unwrap_or_default();
        record.set(field, value);
    }
    record
}

/// Keep the first record per digits-only phone; records without a phone are
/// always kept. Returns the kept records and how many were dropped.
fn dedupe_by_phone(records: Vec<NormalizedRecord>) -> (Vec<NormalizedRecord>, usize) {
    let mut seen_phones: HashSet<String> = HashSet::new();
    let mut duplicates_removed = 0;
    let mut unique = Vec::with_capacity(records.len());

    for record in records {
        let phone = record.phone_key();
        if !phone.is_empty() && !seen_phones.insert(phone) {
            duplicates_removed += 1;
            tracing::debug!(id = record.id, phone = %record.telefono, "Dropped duplicate phone");
            continue;
        }
        unique.push(record);
    }

    (unique, duplicates_removed)
}
