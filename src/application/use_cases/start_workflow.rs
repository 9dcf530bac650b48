use std::sync::Arc;

use chrono::Utc;

use crate::domain::app_config::WorkflowConfig;
use crate::domain::error::Result;
use crate::domain::workflow::WorkflowPayload;
use crate::infrastructure::remote_clients::WorkflowTrigger;

pub struct StartWorkflowUseCase {
    trigger: Arc<dyn WorkflowTrigger>,
    source: String,
    version: String,
}

impl StartWorkflowUseCase {
    pub fn new(trigger: Arc<dyn WorkflowTrigger>, config: &WorkflowConfig) -> Self {
        Self {
            trigger,
            source: config.source.clone(),
            version: config.version.clone(),
        }
    }

    pub async fn execute(&self, user_id: Option<&str>) -> Result<serde_json::Value> {
        let payload = WorkflowPayload::start(&self.source, &self.version, user_id, Utc::now());
        let response = self.trigger.trigger(&payload).await?;
        tracing::info!(user_id = %payload.metadata.user_id, "Call workflow started");
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct CapturingTrigger {
        seen: Mutex<Vec<WorkflowPayload>>,
    }

    #[async_trait]
    impl WorkflowTrigger for CapturingTrigger {
        async fn trigger(&self, payload: &WorkflowPayload) -> Result<serde_json::Value> {
            self.seen.lock().unwrap().push(payload.clone());
            Ok(serde_json::json!({"ok": true}))
        }
    }

    #[actix_web::test]
    async fn test_execute_uses_configured_source_and_version() {
        let trigger = Arc::new(CapturingTrigger::default());
        let config = WorkflowConfig {
            version: "2.1.0".to_string(),
            ..WorkflowConfig::default()
        };
        let use_case = StartWorkflowUseCase::new(trigger.clone(), &config);

        let response = use_case.execute(None).await.unwrap();

        assert_eq!(response["ok"], true);
        let seen = trigger.seen.lock().unwrap();
        assert_eq!(seen[0].metadata.source, "dealvox-webapp");
        assert_eq!(seen[0].metadata.version, "2.1.0");
        assert_eq!(seen[0].metadata.user_id, "anonymous");
    }
}
