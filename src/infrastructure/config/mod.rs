// ============================================================
// CONFIGURATION
// ============================================================
// defaults <- dealvox.toml <- DEALVOX_* env vars, secrets from the keyring

use std::path::{Path, PathBuf};
use std::sync::Arc;

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use validator::Validate;

use crate::domain::app_config::AppConfig;
use crate::domain::error::{AppError, Result};
use crate::infrastructure::security::keyring::KeyringManager;
use crate::infrastructure::security::SecretStore;

pub const CONFIG_FILE: &str = "dealvox.toml";
pub const CONFIG_PATH_VAR: &str = "DEALVOX_CONFIG";
pub const ENV_PREFIX: &str = "DEALVOX_";
pub const KEYRING_SERVICE: &str = "DealVox";

/// Secrets that may live in the OS keyring instead of the config file
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum SecretName {
    SheetsAccessToken,
    SheetsPrivateKey,
    WorkflowApiKey,
}

impl SecretName {
    pub fn key(self) -> &'static str {
        match self {
            SecretName::SheetsAccessToken => "sheets_access_token",
            SecretName::SheetsPrivateKey => "sheets_private_key",
            SecretName::WorkflowApiKey => "workflow_api_key",
        }
    }
}

pub struct ConfigService {
    secrets: Arc<dyn SecretStore>,
}

impl Default for ConfigService {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigService {
    pub fn new() -> Self {
        Self::with_store(Arc::new(KeyringManager::new(KEYRING_SERVICE)))
    }

    pub fn with_store(secrets: Arc<dyn SecretStore>) -> Self {
        Self { secrets }
    }

    /// Load the runtime configuration.
    ///
    /// A `.env` file is read first so its values show up as env vars. Secrets
    /// missing from file and env are looked up in the OS keyring.
    pub fn load(&self) -> Result<AppConfig> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!(path = %path.display(), "Loaded .env");
        }

        let path = std::env::var(CONFIG_PATH_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(CONFIG_FILE));

        let mut config = extract(figment(&path))?;
        self.fill_secrets(&mut config);

        tracing::info!(
            config_file = %path.display(),
            sheets_configured = config.sheets.spreadsheet_id.is_some(),
            webhook_configured = config.workflow.webhook_url.is_some(),
            "Configuration loaded"
        );
        Ok(config)
    }

    fn fill_secrets(&self, config: &mut AppConfig) {
        if config.sheets.access_token.is_none() {
            config.sheets.access_token = self.lookup_secret(SecretName::SheetsAccessToken);
        }
        if config.sheets.private_key.is_none() {
            config.sheets.private_key = self.lookup_secret(SecretName::SheetsPrivateKey);
        }
        if config.workflow.api_key.is_none() {
            config.workflow.api_key = self.lookup_secret(SecretName::WorkflowApiKey);
        }
    }

    fn lookup_secret(&self, name: SecretName) -> Option<String> {
        match self.secrets.get_secret(name.key()) {
            Ok(secret) => Some(secret),
            Err(e) => {
                tracing::debug!(key = name.key(), error = %e, "Secret not available from keyring");
                None
            }
        }
    }

    pub fn save_secret(&self, name: SecretName, secret: &str) -> Result<()> {
        self.secrets.set_secret(name.key(), secret)?;
        tracing::info!(key = name.key(), "Secret stored");
        Ok(())
    }

    pub fn delete_secret(&self, name: SecretName) -> Result<()> {
        self.secrets.delete_secret(name.key())?;
        tracing::info!(key = name.key(), "Secret deleted");
        Ok(())
    }
}

/// Layered provider: built-in defaults, then the TOML file, then env vars.
/// `DEALVOX_SHEETS__SPREADSHEET_ID` sets `sheets.spreadsheet_id`.
pub fn figment(path: &Path) -> Figment {
    Figment::from(Serialized::defaults(AppConfig::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
}

/// Extract and validate
pub fn extract(figment: Figment) -> Result<AppConfig> {
    let config: AppConfig = figment
        .extract()
        .map_err(|e| AppError::Config(format!("Failed to load configuration: {}", e)))?;
    config
        .validate()
        .map_err(|e| AppError::Config(format!("Invalid configuration: {}", e)))?;
    Ok(config)
}
