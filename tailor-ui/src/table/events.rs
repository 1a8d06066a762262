//! Table events and caller callbacks.
//!
//! Row actions are pass-through: the table reports them and the owner
//! decides what happens. Every event is both queued (see
//! [`DataTable::drain_events`](super::DataTable::drain_events)) and handed to
//! the matching callback, if one is installed.

use std::fmt;

use super::row::TableRow;

/// Something the owner of a table should react to.
#[derive(Debug, Clone, PartialEq)]
pub enum TableEvent<R: TableRow> {
    /// The selection changed; carries the full selection, sorted.
    SelectionChanged(Vec<R::Key>),
    /// Edit requested for a row.
    Edit(R),
    /// Delete requested for a row.
    Delete(R),
    /// Add requested.
    Add,
}

type SelectionFn<K> = Box<dyn FnMut(&[K]) + Send>;
type RowFn<R> = Box<dyn FnMut(&R) + Send>;
type AddFn = Box<dyn FnMut() + Send>;

/// Optional caller callbacks.
pub struct TableHandlers<R: TableRow> {
    pub(super) on_selection_change: Option<SelectionFn<R::Key>>,
    pub(super) on_edit: Option<RowFn<R>>,
    pub(super) on_delete: Option<RowFn<R>>,
    pub(super) on_add: Option<AddFn>,
}

impl<R: TableRow> Default for TableHandlers<R> {
    fn default() -> Self {
        Self {
            on_selection_change: None,
            on_edit: None,
            on_delete: None,
            on_add: None,
        }
    }
}

impl<R: TableRow> TableHandlers<R> {
    pub(super) fn dispatch(&mut self, event: &TableEvent<R>) {
        match event {
            TableEvent::SelectionChanged(keys) => {
                if let Some(f) = self.on_selection_change.as_mut() {
                    f(keys);
                }
            }
            TableEvent::Edit(row) => {
                if let Some(f) = self.on_edit.as_mut() {
                    f(row);
                }
            }
            TableEvent::Delete(row) => {
                if let Some(f) = self.on_delete.as_mut() {
                    f(row);
                }
            }
            TableEvent::Add => {
                if let Some(f) = self.on_add.as_mut() {
                    f();
                }
            }
        }
    }

    pub(super) fn has_add(&self) -> bool {
        self.on_add.is_some()
    }
}

impl<R: TableRow> fmt::Debug for TableHandlers<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableHandlers")
            .field("on_selection_change", &self.on_selection_change.is_some())
            .field("on_edit", &self.on_edit.is_some())
            .field("on_delete", &self.on_delete.is_some())
            .field("on_add", &self.on_add.is_some())
            .finish()
    }
}
