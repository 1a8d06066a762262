use async_trait::async_trait;

use super::SettingsError;

/// Raw byte store under the typed [`SettingsProvider`](super::SettingsProvider).
#[async_trait]
pub trait SettingsBackend: Send + Sync {
    async fn load(&self, key: &str) -> Result<Option<Vec<u8>>, SettingsError>;

    async fn store(&self, key: &str, value: Vec<u8>) -> Result<(), SettingsError>;

    /// Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> Result<(), SettingsError>;
}
