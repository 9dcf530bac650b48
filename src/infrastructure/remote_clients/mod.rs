pub mod google_auth;
pub mod google_sheets;
pub mod workflow_webhook;

#[cfg(test)]
pub(crate) mod fake_server;

use crate::domain::error::Result;
use crate::domain::workflow::WorkflowPayload;
use async_trait::async_trait;

pub use google_auth::{token_source, AccessTokenSource, ServiceAccountTokenProvider, StaticToken};
pub use google_sheets::GoogleSheetsClient;
pub use workflow_webhook::WebhookWorkflowClient;

/// Remote tabular service that accepts rows appended to a named range
#[async_trait]
pub trait SheetsAppender: Send + Sync {
    /// Append rows and return how many the service reports as updated
    async fn append_rows(&self, values: Vec<Vec<String>>) -> Result<usize>;
}

/// Endpoint that starts the external call workflow
#[async_trait]
pub trait WorkflowTrigger: Send + Sync {
    async fn trigger(&self, payload: &WorkflowPayload) -> Result<serde_json::Value>;
}
