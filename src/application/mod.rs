pub mod use_cases;

pub use use_cases::call_batches::CallBatchPlanner;
pub use use_cases::record_normalizer::RecordNormalizer;
pub use use_cases::sheets_export::SheetsExportUseCase;
pub use use_cases::start_workflow::StartWorkflowUseCase;
pub use use_cases::upload_processor::UploadProcessor;
pub use use_cases::upload_session::{UploadSession, UploadSlot};
