//! Typed key-value settings.
//!
//! Values are bincode-encoded so any serde type can be stored under a
//! dotted key such as `api.url`.

mod backend;
mod memory;
mod sqlite;

pub use backend::SettingsBackend;
pub use memory::MemoryBackend;
pub use sqlite::SqliteBackend;

use std::sync::Arc;

use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("database error: {0}")]
    Database(#[from] async_sqlite::Error),
    #[error("cannot encode {key}: {source}")]
    Encode { key: String, source: bincode::Error },
    #[error("cannot decode {key}: {source}")]
    Decode { key: String, source: bincode::Error },
}

#[derive(Clone)]
pub struct SettingsProvider {
    backend: Arc<dyn SettingsBackend>,
}

impl SettingsProvider {
    pub fn new(backend: impl SettingsBackend + 'static) -> Self {
        Self {
            backend: Arc::new(backend),
        }
    }

    /// Provider that forgets everything on exit.
    pub fn in_memory() -> Self {
        Self::new(MemoryBackend::default())
    }

    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, SettingsError> {
        let Some(bytes) = self.backend.load(key).await? else {
            return Ok(None);
        };
        bincode::deserialize(&bytes)
            .map(Some)
            .map_err(|source| SettingsError::Decode {
                key: key.to_string(),
                source,
            })
    }

    pub async fn get_or<T: DeserializeOwned>(&self, key: &str, default: T) -> Result<T, SettingsError> {
        Ok(self.get(key).await?.unwrap_or(default))
    }

    pub async fn set<T: Serialize + Sync>(&self, key: &str, value: &T) -> Result<(), SettingsError> {
        let bytes = bincode::serialize(value).map_err(|source| SettingsError::Encode {
            key: key.to_string(),
            source,
        })?;
        log::debug!("settings: {} updated", key);
        self.backend.store(key, bytes).await
    }

    pub async fn delete(&self, key: &str) -> Result<(), SettingsError> {
        self.backend.remove(key).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_typed_values() {
        let settings = SettingsProvider::in_memory();
        settings.set("table.page_size", &25usize).await.unwrap();
        settings
            .set("api.url", &"http://localhost:8080/api".to_string())
            .await
            .unwrap();

        assert_eq!(settings.get::<usize>("table.page_size").await.unwrap(), Some(25));
        assert_eq!(
            settings.get::<String>("api.url").await.unwrap().as_deref(),
            Some("http://localhost:8080/api")
        );
        assert_eq!(settings.get_or("api.timeout_secs", 30u64).await.unwrap(), 30);
    }

    #[tokio::test]
    async fn test_delete() {
        let settings = SettingsProvider::in_memory();
        settings.set("api.token", &"secret".to_string()).await.unwrap();
        settings.delete("api.token").await.unwrap();
        assert_eq!(settings.get::<String>("api.token").await.unwrap(), None);
        settings.delete("api.token").await.unwrap();
    }

    #[tokio::test]
    async fn test_wrong_type_names_the_key() {
        let settings = SettingsProvider::in_memory();
        settings.set("table.page_size", &true).await.unwrap();
        let err = settings.get::<String>("table.page_size").await.unwrap_err();
        match err {
            SettingsError::Decode { key, .. } => assert_eq!(key, "table.page_size"),
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
