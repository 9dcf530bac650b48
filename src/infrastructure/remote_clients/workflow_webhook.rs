use super::WorkflowTrigger;
use crate::domain::app_config::WorkflowConfig;
use crate::domain::error::{AppError, Result};
use crate::domain::workflow::WorkflowPayload;
use async_trait::async_trait;

/// Starts the call workflow with a single POST to a webhook; no retries
pub struct WebhookWorkflowClient {
    client: reqwest::Client,
    config: WorkflowConfig,
}

impl WebhookWorkflowClient {
    pub fn new(config: WorkflowConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }
}

#[async_trait]
impl WorkflowTrigger for WebhookWorkflowClient {
    async fn trigger(&self, payload: &WorkflowPayload) -> Result<serde_json::Value> {
        let url = self
            .config
            .webhook_url
            .as_deref()
            .ok_or_else(|| AppError::Config("Missing workflow webhook URL".to_string()))?;

        tracing::info!(user_id = %payload.metadata.user_id, "Triggering call workflow");

        let mut request = self.client.post(url).json(payload);
        if let Some(api_key) = self.config.effective_api_key() {
            request = request.bearer_auth(api_key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AppError::RemoteService(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            tracing::error!(status = %status, "Workflow webhook rejected the request");
            return Err(AppError::RemoteService(format!(
                "HTTP {}: {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown")
            )));
        }

        let text = response.text().await.unwrap_or_default();
        Ok(serde_json::from_str(&text).unwrap_or(serde_json::Value::Null))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::remote_clients::fake_server;
    use actix_web::{web, HttpRequest, HttpResponse};
    use chrono::Utc;

    fn webhook_routes(cfg: &mut web::ServiceConfig) {
        cfg.route(
            "/webhook/start",
            web::post().to(|req: HttpRequest, body: web::Json<WorkflowPayload>| async move {
                let auth = req
                    .headers()
                    .get("authorization")
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_string);
                HttpResponse::Ok().json(serde_json::json!({
                    "received": body.action,
                    "user": body.metadata.user_id,
                    "auth": auth,
                }))
            }),
        )
        .route(
            "/webhook/broken",
            web::post().to(|| async { HttpResponse::ServiceUnavailable().finish() }),
        );
    }

    fn client(webhook_url: String, api_key: Option<&str>) -> WebhookWorkflowClient {
        WebhookWorkflowClient::new(WorkflowConfig {
            webhook_url: Some(webhook_url),
            api_key: api_key.map(str::to_string),
            ..WorkflowConfig::default()
        })
    }

    fn payload() -> WorkflowPayload {
        WorkflowPayload::start("dealvox-webapp", "1.0.0", Some("uid-1"), Utc::now())
    }

    #[actix_web::test]
    async fn test_trigger_posts_payload_with_api_key() {
        let base = fake_server::spawn(webhook_routes);
        let response = client(format!("{}/webhook/start", base), Some("k-123"))
            .trigger(&payload())
            .await
            .unwrap();

        assert_eq!(response["received"], "start_workflow");
        assert_eq!(response["user"], "uid-1");
        assert_eq!(response["auth"], "Bearer k-123");
    }

    #[actix_web::test]
    async fn test_placeholder_key_not_sent() {
        let base = fake_server::spawn(webhook_routes);
        let response = client(format!("{}/webhook/start", base), Some("tu-api-key-aqui"))
            .trigger(&payload())
            .await
            .unwrap();

        assert!(response["auth"].is_null());
    }

    #[actix_web::test]
    async fn test_non_success_reports_status() {
        let base = fake_server::spawn(webhook_routes);
        let err = client(format!("{}/webhook/broken", base), None)
            .trigger(&payload())
            .await
            .unwrap_err();

        assert_eq!(
            err,
            AppError::RemoteService("HTTP 503: Service Unavailable".to_string())
        );
    }

    #[actix_web::test]
    async fn test_missing_url_is_config_error() {
        let client = WebhookWorkflowClient::new(WorkflowConfig::default());
        assert!(matches!(
            client.trigger(&payload()).await,
            Err(AppError::Config(_))
        ));
    }
}
