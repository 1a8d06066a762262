//! Connection and table settings, saved to the settings store.

use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent};
use rust_decimal::Decimal;
use tailor_ui::prelude::*;

use super::Page;
use super::form::{FormDraft, FormSheet};
use crate::config::AppConfig;
use crate::settings::SettingsProvider;
use crate::terminal::{Style, StyledLine};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingsDraft {
    api_url: String,
    api_token: String,
    page_size: String,
    timeout_secs: String,
}

impl From<&AppConfig> for SettingsDraft {
    fn from(config: &AppConfig) -> Self {
        Self {
            api_url: config.api_url.clone().unwrap_or_default(),
            api_token: config.api_token.clone().unwrap_or_default(),
            page_size: config.page_size.to_string(),
            timeout_secs: config.request_timeout.as_secs().to_string(),
        }
    }
}

fn optional(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

impl Draft for SettingsDraft {
    type Output = AppConfig;

    fn schema() -> Schema<Self> {
        Schema::new()
            .field("api_url", |d: &Self| d.api_url.trim().to_string())
            .pattern(r"^https?://\S+$", "API URL must start with http:// or https://")
            .field("page_size", |d: &Self| d.page_size.trim().to_string())
            .required("Page size is required")
            .pattern(r"^\d+$", "Page size must be a whole number")
            .range(Decimal::ONE, Decimal::from(100), "Page size must be between 1 and 100")
            .field("timeout_secs", |d: &Self| d.timeout_secs.trim().to_string())
            .required("Timeout is required")
            .pattern(r"^\d+$", "Timeout must be a whole number of seconds")
            .range(Decimal::ONE, Decimal::from(300), "Timeout must be between 1 and 300 seconds")
    }

    fn build(&self) -> Result<AppConfig, FieldError> {
        let page_size = self
            .page_size
            .trim()
            .parse()
            .map_err(|_| FieldError::new("page_size", "Page size must be a whole number"))?;
        let timeout_secs = self
            .timeout_secs
            .trim()
            .parse()
            .map_err(|_| FieldError::new("timeout_secs", "Timeout must be a whole number of seconds"))?;
        Ok(AppConfig {
            api_url: optional(&self.api_url),
            api_token: optional(&self.api_token),
            page_size,
            request_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

impl FormDraft for SettingsDraft {
    const FIELDS: &'static [(&'static str, &'static str)] = &[
        ("api_url", "API URL"),
        ("api_token", "API token"),
        ("page_size", "Rows per page"),
        ("timeout_secs", "Timeout (s)"),
    ];

    fn value(&self, key: &str) -> &str {
        match key {
            "api_url" => &self.api_url,
            "api_token" => &self.api_token,
            "page_size" => &self.page_size,
            "timeout_secs" => &self.timeout_secs,
            _ => "",
        }
    }

    fn value_mut(&mut self, key: &str) -> Option<&mut String> {
        match key {
            "api_url" => Some(&mut self.api_url),
            "api_token" => Some(&mut self.api_token),
            "page_size" => Some(&mut self.page_size),
            "timeout_secs" => Some(&mut self.timeout_secs),
            _ => None,
        }
    }
}

pub struct SettingsPage {
    settings: SettingsProvider,
    saved: AppConfig,
    sheet: FormSheet<SettingsDraft>,
    /// Owned by the page, not the load token, so a save outlives page
    /// switches.
    saving: LoadTask<AppConfig>,
}

impl SettingsPage {
    pub fn new(settings: SettingsProvider, config: AppConfig) -> Self {
        Self {
            settings,
            sheet: FormSheet::edit(SettingsDraft::from(&config)),
            saved: config,
            saving: LoadTask::new(),
        }
    }

    fn save(&mut self, cx: &mut PageContext) {
        let config = match self.sheet.submit() {
            Ok(config) => config,
            Err(errors) => {
                cx.report_invalid(&errors);
                return;
            }
        };
        if self.saving.is_loading() {
            cx.toast(Toast::info("Still saving"));
            return;
        }
        let settings = self.settings.clone();
        self.saving
            .start(async move { config.save(&settings).await.map(|()| config) });
    }
}

impl Page for SettingsPage {
    fn title(&self) -> &'static str {
        "Settings"
    }

    fn activate(&mut self, _cx: &mut PageContext) {
        self.sheet = FormSheet::edit(SettingsDraft::from(&self.saved));
    }

    fn poll(&mut self, cx: &mut PageContext) {
        if !self.saving.resource().take_dirty() {
            return;
        }
        match self.saving.state() {
            ResourceState::Ready(config) => {
                log::info!("settings saved (page size {})", config.page_size);
                self.saved = config;
                cx.toast(Toast::success("Settings saved. Restart to apply."));
            }
            ResourceState::Error(e) => cx.report_error("saving settings", e),
            _ => {}
        }
    }

    fn handle_key(&mut self, key: KeyEvent, cx: &mut PageContext) {
        match key.code {
            KeyCode::Enter => self.save(cx),
            KeyCode::Esc => self.sheet = FormSheet::edit(SettingsDraft::from(&self.saved)),
            KeyCode::Tab | KeyCode::Down => self.sheet.focus_next(),
            KeyCode::BackTab | KeyCode::Up => self.sheet.focus_previous(),
            KeyCode::Backspace => self.sheet.backspace(),
            KeyCode::Char(c) => self.sheet.input(c),
            _ => {}
        }
    }

    fn render(&self, _cx: &PageContext) -> Vec<StyledLine> {
        let mut lines = self.sheet.render("Settings");
        if self.saving.is_loading() {
            lines.push(StyledLine::new(Style::Muted, "Saving…"));
        }
        lines.push(StyledLine::new(
            Style::Muted,
            "Leave the API URL empty to work offline. Esc discards changes.",
        ));
        lines
    }
}
