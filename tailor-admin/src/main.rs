mod address;
mod app;
mod config;
mod cutting;
mod error;
mod pages;
mod paths;
mod settings;
mod terminal;

use std::fs::{self, File};

use simplelog::{Config, LevelFilter, WriteLogger};

use crate::app::App;
use crate::config::AppConfig;
use crate::error::AppError;
use crate::settings::{SettingsProvider, SqliteBackend};
use crate::terminal::Terminal;

fn init_logging() {
    paths::rotate_logs();
    let Some(path) = paths::log_file() else { return };
    if let Some(dir) = path.parent() {
        let _ = fs::create_dir_all(dir);
    }
    if let Ok(file) = File::create(&path) {
        let _ = WriteLogger::init(LevelFilter::Debug, Config::default(), file);
    }
}

/// The on-disk settings store, or an in-memory one if it cannot be opened.
async fn open_settings() -> SettingsProvider {
    let Some(path) = paths::settings_db() else {
        log::warn!("no data directory; settings will not persist");
        return SettingsProvider::in_memory();
    };
    if let Some(dir) = path.parent() {
        let _ = fs::create_dir_all(dir);
    }
    match SqliteBackend::new(&path).await {
        Ok(backend) => SettingsProvider::new(backend),
        Err(e) => {
            log::warn!("opening {}: {}; settings will not persist", path.display(), e);
            SettingsProvider::in_memory()
        }
    }
}

async fn run() -> Result<(), AppError> {
    let settings = open_settings().await;
    let config = AppConfig::load(&settings).await?;
    let client = config.client()?;

    let mut app = App::new(&config, client, settings)?;
    let mut terminal = Terminal::new()?;
    app.run(&mut terminal).await
}

#[tokio::main]
async fn main() {
    init_logging();
    log::info!("tailor-admin {}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run().await {
        log::error!("{}", e);
        eprintln!("Error: {}", e);
    }
}
