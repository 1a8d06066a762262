//! Application error type.

use tailor_ui::table::TableError;
use thiserror::Error;

use crate::settings::SettingsError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("terminal error: {0}")]
    Io(#[from] std::io::Error),

    #[error("settings error: {0}")]
    Settings(#[from] SettingsError),

    #[error("API client error: {0}")]
    Client(#[from] tailor_client::error::Error),

    #[error("table error: {0}")]
    Table(#[from] TableError),

    #[error("address data error: {0}")]
    AddressData(#[from] serde_json::Error),
}
