use std::sync::Arc;

use super::google_auth::AccessTokenSource;
use super::SheetsAppender;
use crate::domain::app_config::SheetsConfig;
use crate::domain::error::{AppError, Result};
use async_trait::async_trait;
use serde_json::json;
use url::Url;

/// Appends rows through the Google Sheets `values:append` API
pub struct GoogleSheetsClient {
    client: reqwest::Client,
    config: SheetsConfig,
    tokens: Arc<dyn AccessTokenSource>,
}

impl GoogleSheetsClient {
    pub fn new(config: SheetsConfig, tokens: Arc<dyn AccessTokenSource>) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
            tokens,
        }
    }

    fn append_url(&self) -> Result<Url> {
        let spreadsheet_id = self
            .config
            .spreadsheet_id
            .as_deref()
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| AppError::Config("Missing spreadsheet id".to_string()))?;

        let range_segment = format!("{}:append", self.config.range);
        let mut url = Url::parse(&self.config.base_url)
            .map_err(|e| AppError::Config(format!("Invalid Sheets base URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| AppError::Config("Sheets base URL cannot have a path".to_string()))?
            .pop_if_empty()
            .extend(&[
                "v4",
                "spreadsheets",
                spreadsheet_id,
                "values",
                range_segment.as_str(),
            ]);
        url.query_pairs_mut().append_pair("valueInputOption", "RAW");
        Ok(url)
    }
}

#[async_trait]
impl SheetsAppender for GoogleSheetsClient {
    async fn append_rows(&self, values: Vec<Vec<String>>) -> Result<usize> {
        let url = self.append_url()?;
        let token = self.tokens.access_token().await?;
        let sent = values.len();

        tracing::info!(rows = sent, range = %self.config.range, "Appending rows to Google Sheets");

        let response = self
            .client
            .post(url)
            .bearer_auth(&token)
            .json(&json!({ "values": values }))
            .send()
            .await
            .map_err(|e| AppError::RemoteService(format!("Request failed: {}", e)))?;

        let status = response.status();
        let body: serde_json::Value = response.json().await.unwrap_or(serde_json::Value::Null);

        if !status.is_success() {
            let message = body["error"]["message"]
                .as_str()
                .unwrap_or("unknown error")
                .to_string();
            tracing::error!(status = %status, message = %message, "Google Sheets append failed");
            return Err(AppError::RemoteService(format!(
                "Error writing to Google Sheets: {}",
                message
            )));
        }

        Ok(body["updates"]["updatedRows"]
            .as_u64()
            .map(|n| n as usize)
            .unwrap_or(sent))
    }
}
