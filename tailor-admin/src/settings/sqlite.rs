//! Settings persisted in a SQLite file.

use std::path::Path;

use async_sqlite::{Client, ClientBuilder};
use async_trait::async_trait;
use dashmap::DashMap;
use rusqlite::params;

use super::{SettingsBackend, SettingsError};

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS admin_settings (
    key        TEXT PRIMARY KEY,
    value      BLOB NOT NULL,
    updated_at TEXT NOT NULL
)";

/// SQLite store. Every row is read into memory on open, so reads never
/// touch the database; writes go to both.
pub struct SqliteBackend {
    client: Client,
    values: DashMap<String, Vec<u8>>,
}

impl SqliteBackend {
    pub async fn new(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let client = ClientBuilder::new().path(path).open().await?;

        let rows = client
            .conn(|conn| {
                conn.execute(SCHEMA, [])?;
                let mut stmt = conn.prepare("SELECT key, value FROM admin_settings")?;
                let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;
                rows.collect::<Result<Vec<(String, Vec<u8>)>, _>>()
            })
            .await?;
        log::debug!("settings: {} stored values", rows.len());

        Ok(Self {
            client,
            values: rows.into_iter().collect(),
        })
    }
}

#[async_trait]
impl SettingsBackend for SqliteBackend {
    async fn load(&self, key: &str) -> Result<Option<Vec<u8>>, SettingsError> {
        Ok(self.values.get(key).map(|v| v.clone()))
    }

    async fn store(&self, key: &str, value: Vec<u8>) -> Result<(), SettingsError> {
        let row = (key.to_string(), value.clone());
        let now = chrono::Utc::now().to_rfc3339();
        self.client
            .conn(move |conn| {
                conn.execute(
                    "INSERT INTO admin_settings (key, value, updated_at) VALUES (?1, ?2, ?3)
                     ON CONFLICT(key) DO UPDATE
                     SET value = excluded.value, updated_at = excluded.updated_at",
                    params![row.0, row.1, now],
                )
            })
            .await?;
        self.values.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), SettingsError> {
        let owned = key.to_string();
        self.client
            .conn(move |conn| conn.execute("DELETE FROM admin_settings WHERE key = ?1", [owned]))
            .await?;
        self.values.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_values_survive_reopen() {
        let path = std::env::temp_dir().join(format!("tailor-settings-{}.db", uuid::Uuid::new_v4()));

        let backend = SqliteBackend::new(&path).await.unwrap();
        backend.store("api.url", b"one".to_vec()).await.unwrap();
        backend.store("api.url", b"two".to_vec()).await.unwrap();
        backend.store("api.token", b"t".to_vec()).await.unwrap();
        backend.remove("api.token").await.unwrap();
        backend.remove("never.set").await.unwrap();
        drop(backend);

        let reopened = SqliteBackend::new(&path).await.unwrap();
        assert_eq!(reopened.load("api.url").await.unwrap(), Some(b"two".to_vec()));
        assert_eq!(reopened.load("api.token").await.unwrap(), None);

        drop(reopened);
        let _ = std::fs::remove_file(&path);
    }
}
