pub mod call_batches;
pub mod record_normalizer;
pub mod sheets_export;
pub mod start_workflow;
pub mod upload_processor;
pub mod upload_session;
