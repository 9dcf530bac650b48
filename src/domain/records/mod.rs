// ============================================================
// CONTACT RECORD DOMAIN LAYER
// ============================================================
// Value objects for uploaded contact sheets and their cleaned form
// No I/O, no async

mod call_batch;
mod canonical_field;
mod cell_value;
mod normalized_record;
mod summary;
mod upload;

pub use call_batch::{CallBatch, CallStats, CallStatus};
pub use canonical_field::{CanonicalField, FieldMapping};
pub use cell_value::{CellValue, RawRow};
pub use normalized_record::NormalizedRecord;
pub use summary::{NormalizationOutcome, ProcessingSummary};
pub use upload::UploadResult;
