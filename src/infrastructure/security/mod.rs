pub mod keyring;

use crate::domain::error::Result;

/// Named secrets kept outside the config file
pub trait SecretStore: Send + Sync {
    fn get_secret(&self, key: &str) -> Result<String>;
    fn set_secret(&self, key: &str, secret: &str) -> Result<()>;
    fn delete_secret(&self, key: &str) -> Result<()>;
}
