//! Address cascade page.

use crossterm::event::{KeyCode, KeyEvent};
use tailor_ui::context::PageContext;
use tailor_ui::toast::Toast;

use super::Page;
use crate::address::{AddressBook, AddressSelection, Level};
use crate::terminal::{Style, StyledLine};

/// Options listed at once; the list scrolls with the cursor.
const LIST_HEIGHT: usize = 12;

pub struct AddressPage {
    book: AddressBook,
    selection: AddressSelection,
    level: Level,
    cursor: usize,
}

impl AddressPage {
    pub fn new(book: AddressBook) -> Self {
        Self {
            book,
            selection: AddressSelection::new(),
            level: Level::Division,
            cursor: 0,
        }
    }

    fn options(&self) -> Vec<&str> {
        self.selection.options(&self.book, self.level)
    }

    fn focus(&mut self, level: Level) {
        self.level = level;
        self.cursor = self
            .selection
            .value(level)
            .and_then(|v| self.options().iter().position(|o| *o == v))
            .unwrap_or(0);
    }

    fn choose(&mut self, cx: &mut PageContext) {
        let Some(value) = self.options().get(self.cursor).map(|v| v.to_string()) else {
            return;
        };
        if !self.selection.select(&self.book, self.level, &value) {
            return;
        }
        match self.level.next() {
            Some(child) => self.focus(child),
            None if self.selection.is_complete() => {
                cx.toast(Toast::info(format!("Address: {}", self.selection.label())));
            }
            None => {}
        }
    }
}

impl Page for AddressPage {
    fn title(&self) -> &'static str {
        "Address"
    }

    fn activate(&mut self, _cx: &mut PageContext) {}

    fn handle_key(&mut self, key: KeyEvent, cx: &mut PageContext) {
        let count = self.options().len();
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') if count > 0 => {
                self.cursor = (self.cursor + 1).min(count - 1);
            }
            KeyCode::Enter => self.choose(cx),
            KeyCode::Right | KeyCode::Tab => {
                if let Some(child) = self.level.next() {
                    self.focus(child);
                }
            }
            KeyCode::Left | KeyCode::BackTab | KeyCode::Esc => {
                if let Some(parent) = self.level.previous() {
                    self.focus(parent);
                }
            }
            KeyCode::Backspace | KeyCode::Delete => {
                self.selection.clear(self.level);
                self.cursor = 0;
            }
            _ => {}
        }
    }

    fn render(&self, _cx: &PageContext) -> Vec<StyledLine> {
        let mut lines = vec![StyledLine::new(Style::Title, "Address lookup"), StyledLine::blank()];

        for level in Level::ALL {
            let value = self.selection.value(level).unwrap_or("—");
            let marker = if level == self.level { "▸" } else { " " };
            let style = if level == self.level {
                Style::Header
            } else {
                Style::Normal
            };
            lines.push(StyledLine::new(
                style,
                format!("{} {:<9} {}", marker, level.label(), value),
            ));
        }
        lines.push(StyledLine::blank());

        let options = self.options();
        if options.is_empty() {
            let parent = self.level.previous().map(Level::label).unwrap_or("parent");
            lines.push(StyledLine::new(
                Style::Muted,
                format!("Choose a {} first.", parent.to_lowercase()),
            ));
        } else {
            let start = self.cursor.saturating_sub(LIST_HEIGHT - 1);
            for (i, option) in options.iter().enumerate().skip(start).take(LIST_HEIGHT) {
                let chosen = self.selection.value(self.level) == Some(*option);
                let style = if i == self.cursor {
                    Style::Cursor
                } else if chosen {
                    Style::Selected
                } else {
                    Style::Normal
                };
                lines.push(StyledLine::new(style, format!("  {}", option)));
            }
        }

        lines.push(StyledLine::blank());
        lines.push(StyledLine::new(
            Style::Muted,
            "↑/↓ move · Enter choose · ←/→ level · Backspace clear",
        ));
        lines
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyModifiers;

    use super::*;

    fn press(page: &mut AddressPage, cx: &mut PageContext, code: KeyCode) {
        page.handle_key(KeyEvent::new(code, KeyModifiers::NONE), cx);
    }

    #[test]
    fn test_choose_down_the_cascade() {
        let mut cx = PageContext::new();
        let mut page = AddressPage::new(AddressBook::embedded().unwrap());

        press(&mut page, &mut cx, KeyCode::Enter);
        assert_eq!(page.selection.value(Level::Division), Some("Dhaka"));
        assert_eq!(page.level, Level::District);

        press(&mut page, &mut cx, KeyCode::Down);
        press(&mut page, &mut cx, KeyCode::Enter);
        assert_eq!(page.selection.value(Level::District), Some("Gazipur"));

        press(&mut page, &mut cx, KeyCode::Enter);
        assert!(page.selection.is_complete());
        assert_eq!(
            cx.toasts.latest().unwrap().message,
            "Address: Gazipur Sadar, Gazipur, Dhaka"
        );
    }

    #[test]
    fn test_new_division_clears_children() {
        let mut cx = PageContext::new();
        let mut page = AddressPage::new(AddressBook::embedded().unwrap());
        press(&mut page, &mut cx, KeyCode::Enter);
        press(&mut page, &mut cx, KeyCode::Enter);
        assert!(page.selection.value(Level::District).is_some());

        assert_eq!(page.level, Level::Upazila);
        press(&mut page, &mut cx, KeyCode::Left);
        press(&mut page, &mut cx, KeyCode::Left);
        assert_eq!(page.level, Level::Division);
        press(&mut page, &mut cx, KeyCode::Down);
        press(&mut page, &mut cx, KeyCode::Enter);
        assert_eq!(page.selection.value(Level::Division), Some("Chattogram"));
        assert_eq!(page.selection.value(Level::District), None);
        assert_eq!(page.level, Level::District);

        let text: Vec<String> = page.render(&cx).into_iter().map(|l| l.text).collect();
        assert!(text.iter().any(|l| l.contains("Cox's Bazar")));
    }

    #[test]
    fn test_upazila_needs_district() {
        let cx = PageContext::new();
        let mut page = AddressPage::new(AddressBook::embedded().unwrap());
        page.focus(Level::Upazila);
        let text: Vec<String> = page.render(&cx).into_iter().map(|l| l.text).collect();
        assert!(text.iter().any(|l| l == "Choose a district first."));
    }
}
