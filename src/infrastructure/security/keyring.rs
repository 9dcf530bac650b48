use super::SecretStore;
use crate::domain::error::{AppError, Result};
use keyring::Entry;

/// Secrets stored in the OS credential store under one service name
pub struct KeyringManager {
    service: String,
}

impl KeyringManager {
    pub fn new(service: &str) -> Self {
        Self {
            service: service.to_string(),
        }
    }

    fn entry(&self, key: &str) -> Result<Entry> {
        Entry::new(&self.service, key)
            .map_err(|e| AppError::Security(format!("Failed to create entry: {}", e)))
    }
}

impl SecretStore for KeyringManager {
    fn get_secret(&self, key: &str) -> Result<String> {
        self.entry(key)?
            .get_password()
            .map_err(|e| AppError::Security(format!("Failed to get password: {}", e)))
    }

    fn set_secret(&self, key: &str, secret: &str) -> Result<()> {
        self.entry(key)?
            .set_password(secret)
            .map_err(|e| AppError::Security(format!("Failed to set password: {}", e)))
    }

    fn delete_secret(&self, key: &str) -> Result<()> {
        self.entry(key)?
            .delete_credential()
            .map_err(|e| AppError::Security(format!("Failed to delete password: {}", e)))
    }
}
