//! Rendering a table to text lines.
//!
//! The renderer produces styled lines rather than writing to a terminal so
//! the same output can be drawn by the admin shell or asserted in tests.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::column::{Alignment, ColumnDef};
use super::row::TableRow;
use super::state::DataTable;
use crate::selection::SelectionMode;

/// Placeholder shown when the table has no data at all.
pub const EMPTY_DATA: &str = "No records yet.";
/// Placeholder shown when filters hide every row.
pub const NO_RESULTS: &str = "No results.";

const COLUMN_GAP: &str = "  ";

/// What a rendered line represents, for styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Tabs,
    Header,
    Row { cursor: bool, selected: bool },
    Placeholder,
    Footer,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub kind: LineKind,
    pub text: String,
}

impl Line {
    fn new(kind: LineKind, text: String) -> Self {
        Self { kind, text }
    }
}

/// Checkbox indicator for a row or the header.
pub fn selection_indicator(selected: bool) -> &'static str {
    if selected { "■ " } else { "□ " }
}

/// Render the current page of `table`.
pub fn render<R: TableRow>(table: &DataTable<R>) -> Vec<Line> {
    let mut lines = Vec::new();
    let checkbox = table.selection_mode() == SelectionMode::Multi;
    let columns = table.visible_columns();

    if !table.tabs().is_empty() {
        let active = table.active_tab();
        let tabs: Vec<String> = table
            .tabs()
            .iter()
            .map(|t| {
                if t.value == active {
                    format!("[{}]", t.label)
                } else {
                    format!(" {} ", t.label)
                }
            })
            .collect();
        lines.push(Line::new(LineKind::Tabs, tabs.join(" ")));
    }

    let mut header = String::new();
    if checkbox {
        header.push_str(selection_indicator(table.all_visible_selected()));
    }
    let header_cells: Vec<String> = columns
        .iter()
        .map(|c| {
            let sort = table
                .sort()
                .filter(|s| s.key == c.key)
                .map(|s| s.direction);
            let mut text = c.header.text(sort);
            if let Some(direction) = sort {
                text.push(' ');
                text.push_str(direction.indicator());
            }
            fit(&text, c.width, c.align)
        })
        .collect();
    header.push_str(&header_cells.join(COLUMN_GAP));
    lines.push(Line::new(LineKind::Header, header.trim_end().to_string()));

    let rows = table.page_rows();
    if table.data().is_empty() {
        lines.push(Line::new(LineKind::Placeholder, EMPTY_DATA.to_string()));
    } else if rows.is_empty() {
        lines.push(Line::new(LineKind::Placeholder, NO_RESULTS.to_string()));
    }

    for (i, row) in rows.iter().enumerate() {
        let selected = table.is_selected(&row.key());
        let mut text = String::new();
        if checkbox {
            text.push_str(selection_indicator(selected));
        }
        text.push_str(&render_cells(*row, columns.as_slice()));
        lines.push(Line::new(
            LineKind::Row {
                cursor: i == table.cursor(),
                selected,
            },
            text.trim_end().to_string(),
        ));
    }

    lines.push(Line::new(LineKind::Footer, footer(table)));
    lines
}

fn render_cells<R: TableRow>(row: &R, columns: &[&ColumnDef<R>]) -> String {
    columns
        .iter()
        .map(|c| fit(&c.render_cell(row), c.width, c.align))
        .collect::<Vec<_>>()
        .join(COLUMN_GAP)
}

fn footer<R: TableRow>(table: &DataTable<R>) -> String {
    let visible = table.visible_count();
    let mut text = format!(
        "Page {} of {} · {} of {} rows",
        table.pagination().page() + 1,
        table.page_count(),
        visible,
        table.data().len()
    );
    if table.selection_mode() != SelectionMode::None {
        text.push_str(&format!(" · {} selected", table.selection().len()));
    }
    text
}

/// Pad or truncate `text` to exactly `width` display columns.
pub fn fit(text: &str, width: u16, align: Alignment) -> String {
    let width = width as usize;
    let text = truncate(text, width);
    let pad = width.saturating_sub(text.width());
    match align {
        Alignment::Left => format!("{}{}", text, " ".repeat(pad)),
        Alignment::Right => format!("{}{}", " ".repeat(pad), text),
        Alignment::Center => {
            let left = pad / 2;
            format!("{}{}{}", " ".repeat(left), text, " ".repeat(pad - left))
        }
    }
}

/// Truncate to `width` display columns, ending with `…` when cut.
pub fn truncate(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > width - 1 {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    out
}
