//! Column definitions.

use std::fmt;
use std::sync::Arc;

use super::row::TableRow;
use super::sort::SortDirection;

/// Horizontal alignment for column content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

type HeaderFn = Arc<dyn Fn(Option<SortDirection>) -> String + Send + Sync>;
type CellFn<R> = Arc<dyn Fn(&R) -> String + Send + Sync>;

/// Column header: fixed label or a function of the column's sort state.
#[derive(Clone)]
pub enum Header {
    Label(String),
    Render(HeaderFn),
}

impl Header {
    /// Produce the header text for the given sort state.
    pub fn text(&self, sort: Option<SortDirection>) -> String {
        match self {
            Self::Label(label) => label.clone(),
            Self::Render(render) => render(sort),
        }
    }
}

impl fmt::Debug for Header {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Label(label) => f.debug_tuple("Label").field(label).finish(),
            Self::Render(_) => f.write_str("Render(..)"),
        }
    }
}

/// Declarative description of one table column.
///
/// `key` names a field of the row type (see [`TableRow::FIELDS`]); the table
/// rejects columns whose key is not a field. Without a `cell` function the
/// cell shows the field value's string form.
///
/// # Example
///
/// ```ignore
/// let columns = vec![
///     ColumnDef::new("employee_id", "Employee").width(10).sortable(),
///     ColumnDef::new("amount", "Amount")
///         .align(Alignment::Right)
///         .cell(|row: &Expense| format!("{:.2}", row.amount)),
/// ];
/// ```
pub struct ColumnDef<R> {
    pub key: String,
    pub header: Header,
    cell: Option<CellFn<R>>,
    /// Display width in terminal columns.
    pub width: u16,
    pub align: Alignment,
    pub sortable: bool,
    /// Whether the user may hide this column.
    pub hideable: bool,
}

impl<R: TableRow> ColumnDef<R> {
    /// Create a column with a label header.
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        let label = label.into();
        let width = (label.chars().count() as u16).max(8);
        Self {
            key: key.into(),
            header: Header::Label(label),
            cell: None,
            width,
            align: Alignment::Left,
            sortable: false,
            hideable: true,
        }
    }

    /// Replace the header with a render function.
    pub fn header_with<F>(mut self, render: F) -> Self
    where
        F: Fn(Option<SortDirection>) -> String + Send + Sync + 'static,
    {
        self.header = Header::Render(Arc::new(render));
        self
    }

    /// Set a cell render function.
    pub fn cell<F>(mut self, render: F) -> Self
    where
        F: Fn(&R) -> String + Send + Sync + 'static,
    {
        self.cell = Some(Arc::new(render));
        self
    }

    pub fn width(mut self, width: u16) -> Self {
        self.width = width;
        self
    }

    pub fn align(mut self, align: Alignment) -> Self {
        self.align = align;
        self
    }

    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    /// Keep the column visible at all times.
    pub fn pinned(mut self) -> Self {
        self.hideable = false;
        self
    }

    /// Display text for this column's cell in `row`.
    pub fn render_cell(&self, row: &R) -> String {
        match &self.cell {
            Some(render) => render(row),
            None => row.field(&self.key).to_string(),
        }
    }
}

impl<R> Clone for ColumnDef<R> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            header: self.header.clone(),
            cell: self.cell.clone(),
            width: self.width,
            align: self.align,
            sortable: self.sortable,
            hideable: self.hideable,
        }
    }
}

impl<R> fmt::Debug for ColumnDef<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnDef")
            .field("key", &self.key)
            .field("header", &self.header)
            .field("width", &self.width)
            .field("align", &self.align)
            .field("sortable", &self.sortable)
            .field("hideable", &self.hideable)
            .finish_non_exhaustive()
    }
}
