//! The admin shell: page switching, frame layout and the event loop.

use std::time::{Duration, Instant};

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tailor_client::TailorClient;
use tailor_ui::context::PageContext;
use tailor_ui::toast::ToastLevel;

use crate::address::AddressBook;
use crate::config::AppConfig;
use crate::error::AppError;
use crate::pages::{
    AddressPage, Attendance, CuttingPage, Employees, Expenses, Leave, Overtime, Page, Payroll,
    SettingsPage, TablePage,
};
use crate::settings::SettingsProvider;
use crate::terminal::{Style, StyledLine, Terminal};

/// Input wait per frame. Loads finishing in the background show up within
/// one frame.
const FRAME: Duration = Duration::from_millis(100);

const HELP: &str = "Ctrl+N/Ctrl+P or F1-F9 switch page · Ctrl+Q quit";

pub struct App {
    pages: Vec<Box<dyn Page>>,
    current: usize,
    cx: PageContext,
    api_label: String,
}

impl App {
    pub fn new(
        config: &AppConfig,
        client: Option<TailorClient>,
        settings: SettingsProvider,
    ) -> Result<Self, AppError> {
        let size = config.page_size;
        let pages: Vec<Box<dyn Page>> = vec![
            Box::new(TablePage::<Attendance>::new(client.clone(), size)?),
            Box::new(TablePage::<Employees>::new(client.clone(), size)?),
            Box::new(TablePage::<Expenses>::new(client.clone(), size)?),
            Box::new(TablePage::<Leave>::new(client.clone(), size)?),
            Box::new(TablePage::<Payroll>::new(client.clone(), size)?),
            Box::new(TablePage::<Overtime>::new(client.clone(), size)?),
            Box::new(CuttingPage::new()),
            Box::new(AddressPage::new(AddressBook::embedded()?)),
            Box::new(SettingsPage::new(settings, config.clone())),
        ];

        let api_label = match &client {
            Some(client) => format!("API {}", client.base_url()),
            None => "Offline · sample data".to_string(),
        };

        let mut app = Self {
            pages,
            current: 0,
            cx: PageContext::new(),
            api_label,
        };
        app.pages[0].activate(&mut app.cx);
        Ok(app)
    }

    pub fn current_title(&self) -> &'static str {
        self.pages[self.current].title()
    }

    /// Leave the current page and activate `index`.
    pub fn switch_to(&mut self, index: usize) {
        if index >= self.pages.len() || index == self.current {
            return;
        }
        log::info!(
            "page {} -> {}",
            self.current_title(),
            self.pages[index].title()
        );
        self.cx.reset();
        self.current = index;
        self.pages[index].activate(&mut self.cx);
    }

    /// Route one key press. Returns false when the user quits.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        let count = self.pages.len();
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('c') | KeyCode::Char('q') => return false,
                KeyCode::Char('n') => {
                    self.switch_to((self.current + 1) % count);
                    return true;
                }
                KeyCode::Char('p') => {
                    self.switch_to((self.current + count - 1) % count);
                    return true;
                }
                _ => {}
            }
        }
        if let KeyCode::F(n) = key.code
            && (1..=count).contains(&(n as usize))
        {
            self.switch_to(n as usize - 1);
            return true;
        }

        self.pages[self.current].handle_key(key, &mut self.cx);
        true
    }

    /// Pick up finished loads and drop expired toasts.
    pub fn tick(&mut self, now: Instant) {
        self.pages[self.current].poll(&mut self.cx);
        self.cx.toasts.expire(now);
    }

    /// Lay out one frame of at most `height` lines.
    pub fn render(&self, height: u16) -> Vec<StyledLine> {
        let tabs: Vec<String> = self
            .pages
            .iter()
            .enumerate()
            .map(|(i, page)| {
                if i == self.current {
                    format!("[{}]", page.title())
                } else {
                    format!(" {} ", page.title())
                }
            })
            .collect();

        let mut lines = vec![
            StyledLine::new(Style::Title, format!("Tailor Admin  {}", tabs.join(""))),
            StyledLine::new(Style::Muted, self.api_label.clone()),
            StyledLine::blank(),
        ];
        let toasts: Vec<StyledLine> = self
            .cx
            .toasts
            .iter()
            .map(|toast| {
                let style = match toast.level {
                    ToastLevel::Info => Style::Info,
                    ToastLevel::Success => Style::Success,
                    ToastLevel::Warning => Style::Warning,
                    ToastLevel::Error => Style::Error,
                };
                StyledLine::new(style, format!("[{}] {}", toast.level.tag(), toast.message))
            })
            .collect();

        let height = height as usize;
        let reserved = lines.len() + toasts.len() + 1;
        let body = self.pages[self.current].render(&self.cx);
        lines.extend(body.into_iter().take(height.saturating_sub(reserved)));
        while lines.len() + toasts.len() + 1 < height {
            lines.push(StyledLine::blank());
        }
        lines.extend(toasts);
        lines.push(StyledLine::new(Style::Muted, HELP));
        lines.truncate(height);
        lines
    }

    pub async fn run(&mut self, terminal: &mut Terminal) -> Result<(), AppError> {
        loop {
            self.tick(Instant::now());
            let (_, height) = terminal.size();
            terminal.draw(&self.render(height))?;

            let events = tokio::task::block_in_place(|| terminal.poll(FRAME))?;
            for event in events {
                if let Event::Key(key) = event
                    && key.kind == KeyEventKind::Press
                    && !self.handle_key(key)
                {
                    log::info!("quit");
                    return Ok(());
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> App {
        App::new(&AppConfig::default(), None, SettingsProvider::in_memory()).unwrap()
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    #[tokio::test]
    async fn test_switch_pages() {
        let mut app = app();
        assert_eq!(app.current_title(), "Attendance");

        assert!(app.handle_key(ctrl('n')));
        assert_eq!(app.current_title(), "Employees");
        assert!(app.handle_key(ctrl('p')));
        assert!(app.handle_key(ctrl('p')));
        assert_eq!(app.current_title(), "Settings");
        assert!(app.handle_key(key(KeyCode::F(8))));
        assert_eq!(app.current_title(), "Address");

        assert!(app.handle_key(key(KeyCode::F(7))));
        assert_eq!(app.current_title(), "Cutting");
        assert!(app.handle_key(key(KeyCode::F(12))));
        assert_eq!(app.current_title(), "Cutting");
    }

    #[tokio::test]
    async fn test_switch_closes_search() {
        let mut app = app();
        app.handle_key(key(KeyCode::Char('/')));
        assert!(app.cx.is_search_open());
        app.handle_key(ctrl('n'));
        assert!(!app.cx.is_search_open());
    }

    #[tokio::test]
    async fn test_quit_keys() {
        let mut app = app();
        assert!(!app.handle_key(ctrl('q')));
        assert!(!app.handle_key(ctrl('c')));
        assert!(app.handle_key(key(KeyCode::Char('q'))));
    }

    #[tokio::test]
    async fn test_render_fits_height() {
        let mut app = app();
        app.tick(Instant::now());
        let lines = app.render(20);
        assert_eq!(lines.len(), 20);
        assert!(lines[0].text.contains("[Attendance]"));
        assert_eq!(lines[1].text, "Offline · sample data");
        assert_eq!(lines[19].text, HELP);
    }

    #[tokio::test]
    async fn test_toasts_above_help_line() {
        let mut app = app();
        app.switch_to(6);
        app.handle_key(key(KeyCode::Enter));
        let lines = app.render(30);
        assert_eq!(lines[28].style, Style::Warning);
        assert_eq!(lines[28].text, "[warn] Style no. is required");
    }
}
