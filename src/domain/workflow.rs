use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

pub const START_WORKFLOW_ACTION: &str = "start_workflow";
pub const ANONYMOUS_USER: &str = "anonymous";

/// Body POSTed to the call-automation webhook
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowPayload {
    pub action: String,
    pub timestamp: String,
    pub metadata: WorkflowMetadata,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowMetadata {
    pub source: String,
    pub version: String,
    pub user_id: String,
}

impl WorkflowPayload {
    pub fn start(source: &str, version: &str, user_id: Option<&str>, at: DateTime<Utc>) -> Self {
        let user_id = user_id
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .unwrap_or(ANONYMOUS_USER);

        Self {
            action: START_WORKFLOW_ACTION.to_string(),
            timestamp: at.to_rfc3339_opts(SecondsFormat::Millis, true),
            metadata: WorkflowMetadata {
                source: source.to_string(),
                version: version.to_string(),
                user_id: user_id.to_string(),
            },
        }
    }
}
