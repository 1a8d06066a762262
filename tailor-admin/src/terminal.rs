//! Line-oriented terminal output.
//!
//! The shell draws a frame as a list of styled lines. Only lines that
//! changed since the previous frame are rewritten.

use std::io::{self, Write};
use std::time::Duration;

use crossterm::{
    cursor,
    event::{self, Event},
    queue,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor},
    terminal::{self, ClearType},
};
use tailor_ui::table::{Line, LineKind, truncate};
use unicode_width::UnicodeWidthStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    Normal,
    Title,
    Muted,
    Header,
    Cursor,
    Selected,
    Input,
    Info,
    Success,
    Warning,
    Error,
}

impl Style {
    fn colors(self) -> (Option<Color>, Option<Color>, bool) {
        match self {
            Style::Normal => (None, None, false),
            Style::Title => (Some(Color::Cyan), None, true),
            Style::Muted => (Some(Color::DarkGrey), None, false),
            Style::Header => (Some(Color::White), None, true),
            Style::Cursor => (Some(Color::Black), Some(Color::Cyan), false),
            Style::Selected => (Some(Color::Yellow), None, false),
            Style::Input => (Some(Color::Black), Some(Color::White), false),
            Style::Info => (Some(Color::Blue), None, false),
            Style::Success => (Some(Color::Green), None, false),
            Style::Warning => (Some(Color::Yellow), None, true),
            Style::Error => (Some(Color::Red), None, true),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyledLine {
    pub text: String,
    pub style: Style,
}

impl StyledLine {
    pub fn new(style: Style, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(Style::Normal, text)
    }

    pub fn blank() -> Self {
        Self::plain("")
    }

    /// Clip or pad to exactly `width` columns.
    pub fn fitted(&self, width: u16) -> String {
        let width = width as usize;
        let mut text = truncate(&self.text, width);
        let used = text.width();
        if used < width {
            text.push_str(&" ".repeat(width - used));
        }
        text
    }
}

impl From<Line> for StyledLine {
    fn from(line: Line) -> Self {
        let style = match line.kind {
            LineKind::Tabs => Style::Title,
            LineKind::Header => Style::Header,
            LineKind::Row { cursor: true, .. } => Style::Cursor,
            LineKind::Row { selected: true, .. } => Style::Selected,
            LineKind::Row { .. } => Style::Normal,
            LineKind::Placeholder | LineKind::Footer => Style::Muted,
        };
        Self::new(style, line.text)
    }
}

/// Raw-mode, alternate-screen terminal. Restored on drop.
pub struct Terminal {
    stdout: io::Stdout,
    previous: Vec<String>,
    size: (u16, u16),
}

impl Terminal {
    pub fn new() -> io::Result<Self> {
        let mut stdout = io::stdout();

        terminal::enable_raw_mode()?;
        queue!(stdout, terminal::EnterAlternateScreen, cursor::Hide)?;
        stdout.flush()?;

        Ok(Self {
            stdout,
            previous: Vec::new(),
            size: terminal::size()?,
        })
    }

    pub fn size(&self) -> (u16, u16) {
        self.size
    }

    /// Wait up to `timeout` for input, then drain whatever else is pending.
    pub fn poll(&mut self, timeout: Duration) -> io::Result<Vec<Event>> {
        let mut events = Vec::new();
        if event::poll(timeout)? {
            events.push(event::read()?);
            while event::poll(Duration::ZERO)? {
                events.push(event::read()?);
            }
        }
        for e in &events {
            if let Event::Resize(width, height) = e {
                self.size = (*width, *height);
                self.previous.clear();
                queue!(self.stdout, terminal::Clear(ClearType::All))?;
            }
        }
        Ok(events)
    }

    /// Draw one frame. Lines past the bottom of the screen are dropped.
    pub fn draw(&mut self, lines: &[StyledLine]) -> io::Result<()> {
        let (width, height) = self.size;
        let mut frame = Vec::with_capacity(height as usize);

        for row in 0..height {
            let line = lines
                .get(row as usize)
                .cloned()
                .unwrap_or_else(StyledLine::blank);
            let text = line.fitted(width);
            let key = format!("{:?}\u{0}{}", line.style, text);
            if self.previous.get(row as usize) != Some(&key) {
                self.write_line(row, &line, &text)?;
            }
            frame.push(key);
        }

        self.previous = frame;
        self.stdout.flush()
    }

    fn write_line(&mut self, row: u16, line: &StyledLine, text: &str) -> io::Result<()> {
        let (fg, bg, bold) = line.style.colors();
        queue!(self.stdout, cursor::MoveTo(0, row))?;
        if let Some(fg) = fg {
            queue!(self.stdout, SetForegroundColor(fg))?;
        }
        if let Some(bg) = bg {
            queue!(self.stdout, SetBackgroundColor(bg))?;
        }
        if bold {
            queue!(self.stdout, SetAttribute(Attribute::Bold))?;
        }
        queue!(
            self.stdout,
            Print(text),
            SetAttribute(Attribute::Reset),
            ResetColor
        )
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        let _ = queue!(self.stdout, cursor::Show, terminal::LeaveAlternateScreen);
        let _ = self.stdout.flush();
        let _ = terminal::disable_raw_mode();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fitted_pads_and_clips() {
        let line = StyledLine::plain("Payroll");
        assert_eq!(line.fitted(10), "Payroll   ");
        assert_eq!(line.fitted(7), "Payroll");
        assert_eq!(line.fitted(4).width(), 4);
    }

    #[test]
    fn test_table_line_styles() {
        let cursor = Line {
            kind: LineKind::Row {
                cursor: true,
                selected: true,
            },
            text: "x".into(),
        };
        assert_eq!(StyledLine::from(cursor).style, Style::Cursor);

        let selected = Line {
            kind: LineKind::Row {
                cursor: false,
                selected: true,
            },
            text: "x".into(),
        };
        assert_eq!(StyledLine::from(selected).style, Style::Selected);

        let footer = Line {
            kind: LineKind::Footer,
            text: "Page 1 of 1".into(),
        };
        assert_eq!(StyledLine::from(footer).style, Style::Muted);
    }
}
