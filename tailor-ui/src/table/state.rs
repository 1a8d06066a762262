//! Data table state.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::selection::{Selection, SelectionChange, SelectionMode};

use super::column::ColumnDef;
use super::error::TableError;
use super::events::{TableEvent, TableHandlers};
use super::filter::{ALL_TAB, FilterKeys, FilterState, SearchMode, Tab, filter_indices};
use super::pagination::Pagination;
use super::row::TableRow;
use super::sort::{SortState, cycle_sort, sort_indices};

/// Unique identifier for a table instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TableId(usize);

impl TableId {
    fn new() -> Self {
        static COUNTER: AtomicUsize = AtomicUsize::new(0);
        Self(COUNTER.fetch_add(1, Ordering::SeqCst))
    }
}

impl std::fmt::Display for TableId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "__table_{}", self.0)
    }
}

/// The add/edit panel currently open over the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sheet<K> {
    Add,
    Edit(K),
}

/// Tabular view over a caller-owned row vector.
///
/// `DataTable<R>` derives the visible rows from the data and the filter
/// state on every read: search, tab and facet filters first, then sorting,
/// then the page window. Selection is kept by row key and bulk selection
/// only ever touches visible rows.
///
/// The table never edits rows. Edit, delete and add requests are reported
/// as [`TableEvent`]s; the owner performs the change and calls
/// [`set_data`](DataTable::set_data).
///
/// # Example
///
/// ```ignore
/// let mut table = DataTable::builder(columns, expenses)
///     .search_key("title")
///     .filter_key("category", vec![Tab::all(), Tab::new("Operational", "Operational")])
///     .selection(SelectionMode::Multi)
///     .build()?;
///
/// table.set_tab(Some("Operational"));
/// table.toggle_all_visible();
/// ```
#[derive(Debug)]
pub struct DataTable<R: TableRow> {
    id: TableId,
    data: Vec<R>,
    columns: Vec<ColumnDef<R>>,
    hidden: HashSet<String>,
    keys: FilterKeys,
    tabs: Vec<Tab>,
    filter: FilterState,
    search_mode: SearchMode,
    sort: Option<SortState>,
    pagination: Pagination,
    selection: Selection<R::Key>,
    /// Cursor position within the current page.
    cursor: usize,
    sheet: Option<Sheet<R::Key>>,
    handlers: TableHandlers<R>,
    events: Vec<TableEvent<R>>,
}

impl<R: TableRow> DataTable<R> {
    /// Start building a table over `data`.
    pub fn builder(columns: Vec<ColumnDef<R>>, data: Vec<R>) -> DataTableBuilder<R> {
        DataTableBuilder {
            columns,
            data,
            keys: FilterKeys::default(),
            tabs: Vec::new(),
            search_mode: SearchMode::default(),
            selection: SelectionMode::None,
            page_size: None,
            handlers: TableHandlers::default(),
        }
    }

    /// Plain table with no search, tabs or selection.
    pub fn new(columns: Vec<ColumnDef<R>>, data: Vec<R>) -> Result<Self, TableError> {
        Self::builder(columns, data).build()
    }

    pub fn id(&self) -> TableId {
        self.id
    }

    // -------------------------------------------------------------------------
    // Data
    // -------------------------------------------------------------------------

    /// The full, unfiltered rows.
    pub fn data(&self) -> &[R] {
        &self.data
    }

    /// Replace the rows.
    ///
    /// The selection and any open sheet belong to the old data and are
    /// discarded; filters, sort and page survive (the page is clamped).
    pub fn set_data(&mut self, data: Vec<R>) {
        log::debug!("{}: replacing {} rows with {}", self.id, self.data.len(), data.len());
        self.data = data;
        self.sheet = None;
        let change = self.selection.clear();
        if !change.is_empty() {
            self.emit_selection();
        }
        self.clamp_view();
    }

    pub fn row(&self, key: &R::Key) -> Option<&R> {
        self.data.iter().find(|r| &r.key() == key)
    }

    // -------------------------------------------------------------------------
    // Filtering
    // -------------------------------------------------------------------------

    pub fn filter_state(&self) -> &FilterState {
        &self.filter
    }

    pub fn filter_keys(&self) -> &FilterKeys {
        &self.keys
    }

    pub fn tabs(&self) -> &[Tab] {
        &self.tabs
    }

    pub fn search_mode(&self) -> SearchMode {
        self.search_mode
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.filter.search_term = term.into();
        self.after_filter_change();
    }

    /// Select a tab by value. `None` or `"all"` shows every row.
    pub fn set_tab(&mut self, tab: Option<&str>) {
        self.filter.active_tab = tab.filter(|t| *t != ALL_TAB).map(str::to_string);
        self.after_filter_change();
    }

    /// The active tab value, `"all"` when unset.
    pub fn active_tab(&self) -> &str {
        self.filter.active_tab.as_deref().unwrap_or(ALL_TAB)
    }

    /// Move to the next tab, wrapping around.
    pub fn next_tab(&mut self) {
        if self.tabs.is_empty() {
            return;
        }
        let current = self.active_tab().to_string();
        let pos = self.tabs.iter().position(|t| t.value == current).unwrap_or(0);
        let next = self.tabs[(pos + 1) % self.tabs.len()].value.clone();
        self.set_tab(Some(next.as_str()));
    }

    pub fn set_facet(&mut self, value: Option<String>) {
        self.filter.facet_value = value;
        self.after_filter_change();
    }

    /// Distinct values of the facet field, sorted, for a facet dropdown.
    pub fn facet_options(&self) -> Vec<String> {
        let Some(key) = self.keys.facet_key.as_deref() else {
            return Vec::new();
        };
        let mut values: Vec<String> = self
            .data
            .iter()
            .map(|r| r.field(key).to_string())
            .filter(|v| !v.is_empty())
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        values.sort();
        values
    }

    /// Back to the default filter state.
    pub fn reset_filters(&mut self) {
        self.filter = FilterState::default();
        self.after_filter_change();
    }

    fn after_filter_change(&mut self) {
        self.pagination.first();
        self.cursor = 0;
    }

    // -------------------------------------------------------------------------
    // Derived view
    // -------------------------------------------------------------------------

    /// Indices into [`data`](DataTable::data) of the visible rows, in
    /// display order. Recomputed on every call.
    pub fn visible_indices(&self) -> Vec<usize> {
        log::trace!("{}: filtering {} rows", self.id, self.data.len());
        let mut indices = filter_indices(&self.data, &self.keys, &self.filter, self.search_mode);
        if let Some(sort) = &self.sort {
            sort_indices(&self.data, &mut indices, sort);
        }
        indices
    }

    /// Visible rows in display order, across all pages.
    pub fn visible_rows(&self) -> Vec<&R> {
        self.visible_indices()
            .into_iter()
            .map(|i| &self.data[i])
            .collect()
    }

    /// Keys of the visible rows, across all pages.
    pub fn visible_keys(&self) -> Vec<R::Key> {
        self.visible_indices()
            .into_iter()
            .map(|i| self.data[i].key())
            .collect()
    }

    pub fn visible_count(&self) -> usize {
        self.visible_indices().len()
    }

    /// Rows on the current page.
    pub fn page_rows(&self) -> Vec<&R> {
        let visible = self.visible_indices();
        let window = self.pagination.window(visible.len());
        visible[window].iter().map(|&i| &self.data[i]).collect()
    }

    // -------------------------------------------------------------------------
    // Sorting
    // -------------------------------------------------------------------------

    pub fn sort(&self) -> Option<&SortState> {
        self.sort.as_ref()
    }

    /// Header click on `key`: cycles the sort. Ignored for columns that are
    /// unknown or not sortable.
    pub fn sort_by(&mut self, key: &str) -> bool {
        let sortable = self.columns.iter().any(|c| c.key == key && c.sortable);
        if !sortable {
            return false;
        }
        self.sort = cycle_sort(self.sort.as_ref(), key);
        self.cursor = 0;
        true
    }

    // -------------------------------------------------------------------------
    // Pagination
    // -------------------------------------------------------------------------

    pub fn pagination(&self) -> &Pagination {
        &self.pagination
    }

    pub fn page_count(&self) -> usize {
        self.pagination.page_count(self.visible_count())
    }

    pub fn next_page(&mut self) -> bool {
        let total = self.visible_count();
        let moved = self.pagination.next(total);
        if moved {
            self.cursor = 0;
        }
        moved
    }

    pub fn previous_page(&mut self) -> bool {
        let moved = self.pagination.previous();
        if moved {
            self.cursor = 0;
        }
        moved
    }

    pub fn go_to_page(&mut self, page: usize) {
        let total = self.visible_count();
        self.pagination.go_to(page, total);
        self.cursor = 0;
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        self.pagination.set_page_size(page_size);
        self.cursor = 0;
    }

    fn clamp_view(&mut self) {
        let total = self.visible_count();
        self.pagination.clamp(total);
        let on_page = self.pagination.window(total).len();
        self.cursor = self.cursor.min(on_page.saturating_sub(1));
    }

    // -------------------------------------------------------------------------
    // Columns
    // -------------------------------------------------------------------------

    pub fn columns(&self) -> &[ColumnDef<R>] {
        &self.columns
    }

    /// Columns currently shown, in definition order.
    pub fn visible_columns(&self) -> Vec<&ColumnDef<R>> {
        self.columns
            .iter()
            .filter(|c| !self.hidden.contains(&c.key))
            .collect()
    }

    pub fn is_column_visible(&self, key: &str) -> bool {
        self.columns.iter().any(|c| c.key == key) && !self.hidden.contains(key)
    }

    /// Show or hide a column. Pinned columns and the last visible column
    /// cannot be hidden. Returns whether anything changed.
    pub fn toggle_column(&mut self, key: &str) -> bool {
        let Some(column) = self.columns.iter().find(|c| c.key == key) else {
            return false;
        };
        if self.hidden.remove(key) {
            return true;
        }
        if !column.hideable || self.visible_columns().len() <= 1 {
            return false;
        }
        self.hidden.insert(key.to_string());
        true
    }

    // -------------------------------------------------------------------------
    // Selection
    // -------------------------------------------------------------------------

    pub fn selection_mode(&self) -> SelectionMode {
        self.selection.mode()
    }

    pub fn selection(&self) -> &Selection<R::Key> {
        &self.selection
    }

    /// Selected keys, sorted.
    pub fn selected(&self) -> Vec<R::Key> {
        self.selection.sorted()
    }

    /// Selected rows in data order.
    pub fn selected_rows(&self) -> Vec<&R> {
        self.data
            .iter()
            .filter(|r| self.selection.is_selected(&r.key()))
            .collect()
    }

    pub fn is_selected(&self, key: &R::Key) -> bool {
        self.selection.is_selected(key)
    }

    /// Toggle one row. Keys not present in the data are ignored.
    pub fn toggle_row(&mut self, key: &R::Key) -> bool {
        if self.row(key).is_none() {
            return false;
        }
        let change = self.selection.toggle(key);
        self.apply_selection(change)
    }

    /// Header checkbox: select every visible row, or deselect them all if
    /// they are already selected. Rows hidden by filters are never touched.
    pub fn toggle_all_visible(&mut self) -> bool {
        let visible = self.visible_keys();
        let change = self.selection.toggle_all(&visible);
        self.apply_selection(change)
    }

    /// Select every visible row.
    pub fn select_all_visible(&mut self) -> bool {
        let visible = self.visible_keys();
        let change = self.selection.select_all(&visible);
        self.apply_selection(change)
    }

    /// Whether every visible row is selected (header checkbox state).
    pub fn all_visible_selected(&self) -> bool {
        self.selection.all_selected(&self.visible_keys())
    }

    /// Shift-click: extend from the last toggled row to `key` in display order.
    pub fn range_select(&mut self, key: &R::Key) -> bool {
        let visible = self.visible_keys();
        let change = self.selection.range_select(key, &visible);
        self.apply_selection(change)
    }

    pub fn clear_selection(&mut self) -> bool {
        let change = self.selection.clear();
        self.apply_selection(change)
    }

    fn apply_selection(&mut self, change: SelectionChange<R::Key>) -> bool {
        if change.is_empty() {
            return false;
        }
        log::debug!(
            "{}: selection +{} -{} (now {})",
            self.id,
            change.added.len(),
            change.removed.len(),
            self.selection.len()
        );
        self.emit_selection();
        true
    }

    fn emit_selection(&mut self) {
        let keys = self.selection.sorted();
        self.emit(TableEvent::SelectionChanged(keys));
    }

    // -------------------------------------------------------------------------
    // Cursor
    // -------------------------------------------------------------------------

    /// Cursor position within the current page.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn cursor_row(&self) -> Option<&R> {
        self.page_rows().get(self.cursor).copied()
    }

    pub fn cursor_down(&mut self) {
        let on_page = self.page_rows().len();
        if self.cursor + 1 < on_page {
            self.cursor += 1;
        } else if self.next_page() {
            self.cursor = 0;
        }
    }

    pub fn cursor_up(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
        } else if self.previous_page() {
            self.cursor = self.page_rows().len().saturating_sub(1);
        }
    }

    // -------------------------------------------------------------------------
    // Row actions
    // -------------------------------------------------------------------------

    /// The open add/edit sheet, if any.
    pub fn sheet(&self) -> Option<&Sheet<R::Key>> {
        self.sheet.as_ref()
    }

    /// Open the edit sheet for `key` and report the edit request.
    pub fn request_edit(&mut self, key: &R::Key) -> bool {
        let Some(row) = self.row(key).cloned() else {
            return false;
        };
        self.sheet = Some(Sheet::Edit(key.clone()));
        self.emit(TableEvent::Edit(row));
        true
    }

    /// Report a delete request. The row stays until the owner replaces the data.
    pub fn request_delete(&mut self, key: &R::Key) -> bool {
        let Some(row) = self.row(key).cloned() else {
            return false;
        };
        self.emit(TableEvent::Delete(row));
        true
    }

    /// Open the add sheet and report the add request.
    pub fn request_add(&mut self) {
        self.sheet = Some(Sheet::Add);
        self.emit(TableEvent::Add);
    }

    /// Whether an add callback was supplied (controls the add affordance).
    pub fn can_add(&self) -> bool {
        self.handlers.has_add()
    }

    pub fn close_sheet(&mut self) {
        self.sheet = None;
    }

    // -------------------------------------------------------------------------
    // Events
    // -------------------------------------------------------------------------

    fn emit(&mut self, event: TableEvent<R>) {
        self.handlers.dispatch(&event);
        self.events.push(event);
    }

    /// Take the events queued since the last drain.
    pub fn drain_events(&mut self) -> Vec<TableEvent<R>> {
        std::mem::take(&mut self.events)
    }
}

/// Builder for [`DataTable`]. Field keys are validated in
/// [`build`](DataTableBuilder::build).
pub struct DataTableBuilder<R: TableRow> {
    columns: Vec<ColumnDef<R>>,
    data: Vec<R>,
    keys: FilterKeys,
    tabs: Vec<Tab>,
    search_mode: SearchMode,
    selection: SelectionMode,
    page_size: Option<usize>,
    handlers: TableHandlers<R>,
}

impl<R: TableRow> DataTableBuilder<R> {
    /// Field the search box matches against.
    pub fn search_key(mut self, key: impl Into<String>) -> Self {
        self.keys.search_key = Some(key.into());
        self
    }

    pub fn search_mode(mut self, mode: SearchMode) -> Self {
        self.search_mode = mode;
        self
    }

    /// Field the tabs filter on, and the tabs to offer.
    pub fn filter_key(mut self, key: impl Into<String>, tabs: Vec<Tab>) -> Self {
        self.keys.filter_key = Some(key.into());
        self.tabs = tabs;
        self
    }

    /// Field for the column facet dropdown.
    pub fn facet_key(mut self, key: impl Into<String>) -> Self {
        self.keys.facet_key = Some(key.into());
        self
    }

    pub fn selection(mut self, mode: SelectionMode) -> Self {
        self.selection = mode;
        self
    }

    pub fn page_size(mut self, page_size: usize) -> Self {
        self.page_size = Some(page_size);
        self
    }

    pub fn on_selection_change<F>(mut self, f: F) -> Self
    where
        F: FnMut(&[R::Key]) + Send + 'static,
    {
        self.handlers.on_selection_change = Some(Box::new(f));
        self
    }

    pub fn on_edit<F>(mut self, f: F) -> Self
    where
        F: FnMut(&R) + Send + 'static,
    {
        self.handlers.on_edit = Some(Box::new(f));
        self
    }

    pub fn on_delete<F>(mut self, f: F) -> Self
    where
        F: FnMut(&R) + Send + 'static,
    {
        self.handlers.on_delete = Some(Box::new(f));
        self
    }

    pub fn on_add<F>(mut self, f: F) -> Self
    where
        F: FnMut() + Send + 'static,
    {
        self.handlers.on_add = Some(Box::new(f));
        self
    }

    /// Validate keys and build the table.
    pub fn build(self) -> Result<DataTable<R>, TableError> {
        if self.columns.is_empty() {
            return Err(TableError::NoColumns);
        }
        let mut seen = HashSet::new();
        for column in &self.columns {
            if !R::has_field(&column.key) {
                return Err(TableError::unknown_field::<R>(&column.key));
            }
            if !seen.insert(column.key.as_str()) {
                return Err(TableError::DuplicateColumn(column.key.clone()));
            }
        }
        for key in [
            &self.keys.search_key,
            &self.keys.filter_key,
            &self.keys.facet_key,
        ]
        .into_iter()
        .flatten()
        {
            if !R::has_field(key) {
                return Err(TableError::unknown_field::<R>(key));
            }
        }

        let table = DataTable {
            id: TableId::new(),
            data: self.data,
            columns: self.columns,
            hidden: HashSet::new(),
            keys: self.keys,
            tabs: self.tabs,
            filter: FilterState::default(),
            search_mode: self.search_mode,
            sort: None,
            pagination: self.page_size.map(Pagination::new).unwrap_or_default(),
            selection: Selection::new(self.selection),
            cursor: 0,
            sheet: None,
            handlers: self.handlers,
            events: Vec::new(),
        };
        log::debug!(
            "{}: built with {} columns, {} rows",
            table.id,
            table.columns.len(),
            table.data.len()
        );
        Ok(table)
    }
}
