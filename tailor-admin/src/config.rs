//! Application configuration.
//!
//! Values live in the settings store. The API URL and token can be
//! overridden from the environment without touching the store.

use std::time::Duration;

use tailor_client::TailorClient;
use tailor_client::auth::StaticTokenProvider;
use tailor_ui::table::DEFAULT_PAGE_SIZE;

use crate::error::AppError;
use crate::settings::{SettingsError, SettingsProvider};

pub const API_URL: &str = "api.url";
pub const API_TOKEN: &str = "api.token";
pub const REQUEST_TIMEOUT: &str = "api.timeout_secs";
pub const PAGE_SIZE: &str = "table.page_size";

pub const ENV_API_URL: &str = "TAILOR_API_URL";
pub const ENV_API_TOKEN: &str = "TAILOR_API_TOKEN";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Base URL of the REST API. Pages use their seed rows when unset.
    pub api_url: Option<String>,
    pub api_token: Option<String>,
    pub page_size: usize,
    pub request_timeout: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_url: None,
            api_token: None,
            page_size: DEFAULT_PAGE_SIZE,
            request_timeout: tailor_client::DEFAULT_TIMEOUT,
        }
    }
}

impl AppConfig {
    /// Load from settings, then apply `TAILOR_API_URL` / `TAILOR_API_TOKEN`.
    pub async fn load(settings: &SettingsProvider) -> Result<Self, SettingsError> {
        Self::load_with_env(settings, |name| std::env::var(name).ok()).await
    }

    async fn load_with_env(
        settings: &SettingsProvider,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, SettingsError> {
        let defaults = Self::default();

        let mut page_size = settings.get_or(PAGE_SIZE, defaults.page_size).await?;
        if page_size == 0 {
            log::warn!("ignoring {} = 0", PAGE_SIZE);
            page_size = defaults.page_size;
        }
        let timeout_secs = settings
            .get_or(REQUEST_TIMEOUT, defaults.request_timeout.as_secs())
            .await?;

        let config = Self {
            api_url: non_empty(env(ENV_API_URL)).or(settings.get(API_URL).await?),
            api_token: non_empty(env(ENV_API_TOKEN)).or(settings.get(API_TOKEN).await?),
            page_size,
            request_timeout: Duration::from_secs(timeout_secs.max(1)),
        };
        log::info!(
            "config: api_url={:?} token={} page_size={} timeout={:?}",
            config.api_url,
            config.api_token.is_some(),
            config.page_size,
            config.request_timeout
        );
        Ok(config)
    }

    pub async fn save(&self, settings: &SettingsProvider) -> Result<(), SettingsError> {
        match &self.api_url {
            Some(url) => settings.set(API_URL, url).await?,
            None => settings.delete(API_URL).await?,
        }
        match &self.api_token {
            Some(token) => settings.set(API_TOKEN, token).await?,
            None => settings.delete(API_TOKEN).await?,
        }
        settings.set(PAGE_SIZE, &self.page_size).await?;
        settings
            .set(REQUEST_TIMEOUT, &self.request_timeout.as_secs())
            .await
    }

    /// Build the API client, or `None` when no URL is configured.
    pub fn client(&self) -> Result<Option<TailorClient>, AppError> {
        let Some(url) = &self.api_url else {
            return Ok(None);
        };
        let mut builder = TailorClient::builder()
            .url(url)
            .timeout(self.request_timeout);
        if let Some(token) = &self.api_token {
            builder = builder.token_provider(StaticTokenProvider::new(token));
        }
        Ok(Some(builder.build()?))
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[tokio::test]
    async fn test_defaults_without_settings() {
        let settings = SettingsProvider::in_memory();
        let config = AppConfig::load_with_env(&settings, no_env).await.unwrap();
        assert_eq!(config, AppConfig::default());
        assert!(config.client().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let settings = SettingsProvider::in_memory();
        let saved = AppConfig {
            api_url: Some("http://localhost:8080/api".into()),
            api_token: Some("secret".into()),
            page_size: 25,
            request_timeout: Duration::from_secs(5),
        };
        saved.save(&settings).await.unwrap();

        let loaded = AppConfig::load_with_env(&settings, no_env).await.unwrap();
        assert_eq!(loaded, saved);

        let client = loaded.client().unwrap().unwrap();
        assert_eq!(client.base_url(), "http://localhost:8080/api");
        assert_eq!(client.timeout(), Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_env_overrides_settings() {
        let settings = SettingsProvider::in_memory();
        settings.set(API_URL, &"http://stored/api".to_string()).await.unwrap();

        let config = AppConfig::load_with_env(&settings, |name| match name {
            ENV_API_URL => Some("http://env/api".into()),
            ENV_API_TOKEN => Some("   ".into()),
            _ => None,
        })
        .await
        .unwrap();
        assert_eq!(config.api_url.as_deref(), Some("http://env/api"));
        assert_eq!(config.api_token, None);
    }

    #[tokio::test]
    async fn test_zero_page_size_falls_back() {
        let settings = SettingsProvider::in_memory();
        settings.set(PAGE_SIZE, &0usize).await.unwrap();
        let config = AppConfig::load_with_env(&settings, no_env).await.unwrap();
        assert_eq!(config.page_size, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_bad_url_is_error() {
        let config = AppConfig {
            api_url: Some("not a url".into()),
            ..AppConfig::default()
        };
        assert!(matches!(config.client(), Err(AppError::Client(_))));
    }
}
