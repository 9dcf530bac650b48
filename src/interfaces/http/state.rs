use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::application::{
    SheetsExportUseCase, StartWorkflowUseCase, UploadProcessor, UploadSession,
};
use crate::domain::app_config::WorkflowConfig;
use crate::infrastructure::remote_clients::{SheetsAppender, WorkflowTrigger};

use super::LogEntry;

/// Everything the HTTP handlers share
pub struct HttpState {
    pub session: Arc<Mutex<UploadSession>>,
    pub processor: UploadProcessor,
    pub sheets_export: SheetsExportUseCase,
    pub start_workflow: StartWorkflowUseCase,
    pub logs: Arc<Mutex<Vec<LogEntry>>>,
}

impl HttpState {
    pub fn new(
        sheets: Arc<dyn SheetsAppender>,
        workflow: Arc<dyn WorkflowTrigger>,
        workflow_config: &WorkflowConfig,
        logs: Arc<Mutex<Vec<LogEntry>>>,
    ) -> Self {
        Self {
            session: Arc::new(Mutex::new(UploadSession::new())),
            processor: UploadProcessor::default(),
            sheets_export: SheetsExportUseCase::new(sheets),
            start_workflow: StartWorkflowUseCase::new(workflow, workflow_config),
            logs,
        }
    }

    /// A panicked handler must not wedge the session for everyone else
    pub fn session(&self) -> MutexGuard<'_, UploadSession> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
