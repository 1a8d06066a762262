//! Table pages: a [`DataTable`] over rows loaded from the API or seeded
//! locally, with search, tabs, a facet dropdown and an add/edit sheet.

use std::future::Future;
use std::pin::Pin;

use crossterm::event::{KeyCode, KeyEvent};
use tailor_client::TailorClient;
use tailor_client::api::Service;
use tailor_client::error::Error;
use tailor_client::model::Entity;
use tailor_ui::prelude::*;
use tailor_ui::table::DataTableBuilder;

use super::Page;
use super::form::{FormDraft, FormSheet};
use crate::terminal::{Style, StyledLine};

/// A spawned API call.
pub type PageFuture<T> = Pin<Box<dyn Future<Output = Result<T, Error>> + Send>>;

/// What a table page shows and how it talks to the API.
pub trait TableSpec: 'static {
    type Row: TableRow<Key = String>;
    type Form: FormDraft<Output = Self::Row>;

    const TITLE: &'static str;
    /// Singular, for messages: "Employee saved".
    const NOUN: &'static str;
    /// Whether rows can be added and edited through the sheet.
    const EDITABLE: bool = false;

    fn columns() -> Vec<ColumnDef<Self::Row>>;

    /// Search key, tabs and facet.
    fn configure(builder: DataTableBuilder<Self::Row>) -> DataTableBuilder<Self::Row> {
        builder
    }

    /// Rows shown when the page has no API to load from.
    fn seed() -> Vec<Self::Row>;

    /// `None` keeps the page on its seed rows.
    fn fetch(_client: &TailorClient) -> Option<PageFuture<Vec<Self::Row>>> {
        None
    }

    /// `None` deletes locally only.
    fn delete(_client: &TailorClient, _row: &Self::Row) -> Option<PageFuture<()>> {
        None
    }

    /// Create or update. `None` saves locally only.
    fn save(_client: &TailorClient, _row: Self::Row) -> Option<PageFuture<Self::Row>> {
        None
    }

    /// The sheet's draft: prefilled for edit, blank for add.
    fn draft(_row: Option<&Self::Row>) -> Self::Form {
        Self::Form::default()
    }

    /// Give a locally added row its key.
    fn assign_key(_row: &mut Self::Row, _key: String) {}
}

/// `GET` a resource and wrap each record as a row.
pub fn list_rows<E, R>(service: Service<E>, wrap: fn(E) -> R) -> PageFuture<Vec<R>>
where
    E: Entity,
    R: Send + 'static,
{
    Box::pin(async move { Ok(service.list().await?.into_iter().map(wrap).collect()) })
}

/// `DELETE` one record by id.
pub fn delete_by_id<E: Entity>(service: Service<E>, id: &str) -> PageFuture<()> {
    let id = id.to_string();
    Box::pin(async move { service.delete(&id).await })
}

/// `POST` a record without an id, `PUT` one with.
pub fn save_entity<E, R>(service: Service<E>, entity: E, wrap: fn(E) -> R) -> PageFuture<R>
where
    E: Entity,
    R: Send + 'static,
{
    Box::pin(async move {
        let stored = if entity.id().is_empty() {
            service.create(&entity).await?
        } else {
            service.update(entity.id(), &entity).await?
        };
        Ok(wrap(stored))
    })
}

/// Dropdown key in [`PageContext`] for the facet filter.
const FACET_DROPDOWN: &str = "facet";

pub struct TablePage<S: TableSpec> {
    table: DataTable<S::Row>,
    client: Option<TailorClient>,
    rows: LoadTask<Vec<S::Row>>,
    deleting: LoadTask<String>,
    saving: LoadTask<S::Row>,
    sheet: Option<FormSheet<S::Form>>,
    search: String,
    facet_cursor: usize,
    picking_column: bool,
    seeded: bool,
}

impl<S: TableSpec> TablePage<S> {
    pub fn new(client: Option<TailorClient>, page_size: usize) -> Result<Self, TableError> {
        let mut builder = DataTable::builder(S::columns(), Vec::new())
            .selection(SelectionMode::Multi)
            .page_size(page_size);
        if S::EDITABLE {
            builder = builder.on_add(|| log::debug!("{}: add requested", S::TITLE));
        }
        let table = S::configure(builder).build()?;

        Ok(Self {
            table,
            client,
            rows: LoadTask::new(),
            deleting: LoadTask::new(),
            saving: LoadTask::new(),
            sheet: None,
            search: String::new(),
            facet_cursor: 0,
            picking_column: false,
            seeded: false,
        })
    }

    #[cfg(test)]
    pub fn table(&self) -> &DataTable<S::Row> {
        &self.table
    }

    #[cfg(test)]
    pub fn sheet(&self) -> Option<&FormSheet<S::Form>> {
        self.sheet.as_ref()
    }

    fn reload(&mut self, cx: &mut PageContext) {
        match self.client.as_ref().and_then(|c| S::fetch(c)) {
            Some(fut) => {
                self.rows.start(fut);
            }
            None if !self.seeded => {
                self.table.set_data(S::seed());
                self.seeded = true;
            }
            None => cx.toast(Toast::info("Showing local data")),
        }
    }

    fn remove_local(&mut self, key: &str) {
        let data: Vec<S::Row> = self
            .table
            .data()
            .iter()
            .filter(|row| row.key() != key)
            .cloned()
            .collect();
        self.table.set_data(data);
    }

    fn apply_saved(&mut self, mut row: S::Row) {
        if row.key().is_empty() {
            S::assign_key(&mut row, uuid::Uuid::new_v4().to_string());
        }
        let key = row.key();
        let mut data = self.table.data().to_vec();
        match data.iter().position(|r| r.key() == key) {
            Some(pos) => data[pos] = row,
            None => data.push(row),
        }
        self.table.set_data(data);
    }

    fn delete_row(&mut self, row: S::Row, cx: &mut PageContext) {
        if self.deleting.is_loading() {
            cx.toast(Toast::info("A delete is still in progress"));
            return;
        }
        let key = row.key();
        match self.client.as_ref().and_then(|c| S::delete(c, &row)) {
            Some(fut) => {
                self.deleting.start(async move { fut.await.map(|()| key) });
            }
            None => {
                self.remove_local(&key);
                cx.toast(Toast::success(format!("{} deleted", S::NOUN)));
            }
        }
    }

    fn save_sheet(&mut self, cx: &mut PageContext) {
        let Some(sheet) = self.sheet.as_mut() else {
            return;
        };
        let row = match sheet.submit() {
            Ok(row) => row,
            Err(errors) => {
                cx.report_invalid(&errors);
                return;
            }
        };
        if self.saving.is_loading() {
            cx.toast(Toast::info("Still saving"));
            return;
        }
        match self.client.as_ref().and_then(|c| S::save(c, row.clone())) {
            Some(fut) => {
                self.saving.start(fut);
            }
            None => self.finish_save(row, cx),
        }
    }

    fn finish_save(&mut self, row: S::Row, cx: &mut PageContext) {
        self.apply_saved(row);
        self.close_sheet();
        cx.toast(Toast::success(format!("{} saved", S::NOUN)));
    }

    fn close_sheet(&mut self) {
        self.sheet = None;
        self.table.close_sheet();
    }

    fn handle_events(&mut self, cx: &mut PageContext) {
        for event in self.table.drain_events() {
            match event {
                TableEvent::Edit(row) => self.sheet = Some(FormSheet::edit(S::draft(Some(&row)))),
                TableEvent::Add => self.sheet = Some(FormSheet::new(S::draft(None))),
                TableEvent::Delete(row) => self.delete_row(row, cx),
                TableEvent::SelectionChanged(keys) => {
                    log::debug!("{}: {} selected", S::TITLE, keys.len());
                }
            }
        }
    }

    fn handle_sheet_key(&mut self, key: KeyEvent, cx: &mut PageContext) {
        let Some(sheet) = self.sheet.as_mut() else {
            return;
        };
        match key.code {
            KeyCode::Esc => self.close_sheet(),
            KeyCode::Enter => self.save_sheet(cx),
            KeyCode::Tab | KeyCode::Down => sheet.focus_next(),
            KeyCode::BackTab | KeyCode::Up => sheet.focus_previous(),
            KeyCode::Backspace => sheet.backspace(),
            KeyCode::Char(c) => sheet.input(c),
            _ => {}
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent, cx: &mut PageContext) {
        match key.code {
            KeyCode::Esc | KeyCode::Enter => cx.close_search(),
            KeyCode::Backspace => {
                self.search.pop();
                self.table.set_search(self.search.clone());
            }
            KeyCode::Char(c) => {
                self.search.push(c);
                self.table.set_search(self.search.clone());
            }
            _ => {}
        }
    }

    fn handle_dropdown_key(&mut self, key: KeyEvent, cx: &mut PageContext) {
        let options = self.table.facet_options();
        match key.code {
            KeyCode::Up => self.facet_cursor = self.facet_cursor.saturating_sub(1),
            KeyCode::Down => self.facet_cursor = (self.facet_cursor + 1).min(options.len()),
            KeyCode::Enter => {
                let value = self
                    .facet_cursor
                    .checked_sub(1)
                    .and_then(|i| options.get(i).cloned());
                self.table.set_facet(value);
                cx.close_dropdown();
            }
            KeyCode::Esc | KeyCode::Char('f') => cx.close_dropdown(),
            _ => {}
        }
    }

    fn toggle_column(&mut self, key: KeyEvent) {
        self.picking_column = false;
        let Some(n) = digit(key) else { return };
        let Some(column_key) = self.table.columns().get(n - 1).map(|c| c.key.clone()) else {
            return;
        };
        if !self.table.toggle_column(&column_key) {
            log::debug!("{}: column {} cannot be hidden", S::TITLE, column_key);
        }
    }

    fn sort_by_position(&mut self, n: usize) {
        let key = self
            .table
            .visible_columns()
            .get(n - 1)
            .map(|c| c.key.clone());
        if let Some(key) = key {
            self.table.sort_by(&key);
        }
    }

    fn cursor_key(&self) -> Option<String> {
        self.table.cursor_row().map(|row| row.key())
    }

    fn facet_line(&self, cx: &PageContext) -> Vec<StyledLine> {
        let Some(facet) = self.table.filter_keys().facet_key.as_deref() else {
            return Vec::new();
        };
        let current = self
            .table
            .filter_state()
            .facet_value
            .as_deref()
            .unwrap_or("All");
        let mut lines = vec![StyledLine::new(
            Style::Muted,
            format!("{} ▾ {}", facet, current),
        )];
        if cx.open_dropdown() == Some(FACET_DROPDOWN) {
            let options = std::iter::once("All".to_string()).chain(self.table.facet_options());
            for (i, option) in options.enumerate() {
                let style = if i == self.facet_cursor {
                    Style::Cursor
                } else {
                    Style::Normal
                };
                lines.push(StyledLine::new(style, format!("  {}", option)));
            }
        }
        lines
    }
}

fn digit(key: KeyEvent) -> Option<usize> {
    match key.code {
        KeyCode::Char(c @ '1'..='9') => c.to_digit(10).map(|d| d as usize),
        _ => None,
    }
}

impl<S: TableSpec> Page for TablePage<S> {
    fn title(&self) -> &'static str {
        S::TITLE
    }

    fn activate(&mut self, cx: &mut PageContext) {
        let owner = cx.load_token();
        self.rows = LoadTask::with_owner(owner.clone());
        self.deleting = LoadTask::with_owner(owner.clone());
        self.saving = LoadTask::with_owner(owner);
        self.reload(cx);
    }

    fn poll(&mut self, cx: &mut PageContext) {
        if self.rows.resource().take_dirty() {
            match self.rows.state() {
                ResourceState::Ready(rows) => {
                    log::info!("{}: loaded {} rows", S::TITLE, rows.len());
                    self.table.set_data(rows);
                }
                ResourceState::Error(e) => cx.report_error(&format!("loading {}", S::TITLE), e),
                _ => {}
            }
        }
        if self.deleting.resource().take_dirty() {
            match self.deleting.state() {
                ResourceState::Ready(key) => {
                    self.remove_local(&key);
                    cx.toast(Toast::success(format!("{} deleted", S::NOUN)));
                }
                ResourceState::Error(e) => cx.report_error(&format!("deleting {}", S::NOUN), e),
                _ => {}
            }
        }
        if self.saving.resource().take_dirty() {
            match self.saving.state() {
                ResourceState::Ready(row) => self.finish_save(row, cx),
                ResourceState::Error(e) => cx.report_error(&format!("saving {}", S::NOUN), e),
                _ => {}
            }
        }
    }

    fn handle_key(&mut self, key: KeyEvent, cx: &mut PageContext) {
        if self.sheet.is_some() {
            self.handle_sheet_key(key, cx);
            return;
        }
        if cx.is_search_open() {
            self.handle_search_key(key, cx);
            return;
        }
        if cx.open_dropdown() == Some(FACET_DROPDOWN) {
            self.handle_dropdown_key(key, cx);
            return;
        }
        if self.picking_column {
            self.toggle_column(key);
            return;
        }

        match key.code {
            KeyCode::Char('/') => cx.open_search(),
            KeyCode::Char('f') if self.table.filter_keys().facet_key.is_some() => {
                self.facet_cursor = 0;
                cx.toggle_dropdown(FACET_DROPDOWN);
            }
            KeyCode::Tab => self.table.next_tab(),
            KeyCode::Up | KeyCode::Char('k') => self.table.cursor_up(),
            KeyCode::Down | KeyCode::Char('j') => self.table.cursor_down(),
            KeyCode::Right | KeyCode::PageDown => {
                self.table.next_page();
            }
            KeyCode::Left | KeyCode::PageUp => {
                self.table.previous_page();
            }
            KeyCode::Char(' ') => {
                if let Some(key) = self.cursor_key() {
                    self.table.toggle_row(&key);
                }
            }
            KeyCode::Char('a') => {
                self.table.toggle_all_visible();
            }
            KeyCode::Char('c') => {
                self.table.clear_selection();
            }
            KeyCode::Char('v') => self.picking_column = true,
            KeyCode::Char('e') if S::EDITABLE => {
                if let Some(key) = self.cursor_key() {
                    self.table.request_edit(&key);
                }
            }
            KeyCode::Char('n') if self.table.can_add() => self.table.request_add(),
            KeyCode::Char('d') | KeyCode::Delete => {
                if let Some(key) = self.cursor_key() {
                    self.table.request_delete(&key);
                }
            }
            KeyCode::Char('r') => self.reload(cx),
            KeyCode::Esc => {
                self.search.clear();
                self.table.reset_filters();
            }
            _ => {
                if let Some(n) = digit(key) {
                    self.sort_by_position(n);
                }
            }
        }
        self.handle_events(cx);
    }

    fn render(&self, cx: &PageContext) -> Vec<StyledLine> {
        if let Some(sheet) = &self.sheet {
            let title = if sheet.is_editing() {
                format!("Edit {}", S::NOUN)
            } else {
                format!("Add {}", S::NOUN)
            };
            let mut lines = sheet.render(&title);
            if self.saving.is_loading() {
                lines.push(StyledLine::new(Style::Muted, "Saving…"));
            }
            return lines;
        }

        let mut lines = Vec::new();
        if self.rows.is_loading() {
            lines.push(StyledLine::new(Style::Muted, format!("Loading {}…", S::TITLE)));
        }
        if cx.is_search_open() {
            lines.push(StyledLine::new(Style::Input, format!("Search: {}▏", self.search)));
        } else if !self.search.is_empty() {
            lines.push(StyledLine::new(Style::Muted, format!("Search: {}", self.search)));
        }
        lines.extend(self.facet_line(cx));
        lines.extend(render(&self.table).into_iter().map(StyledLine::from));

        if self.picking_column {
            let columns: Vec<String> = self
                .table
                .columns()
                .iter()
                .enumerate()
                .map(|(i, c)| {
                    let mark = if self.table.is_column_visible(&c.key) { "x" } else { " " };
                    format!("{} [{}] {}", i + 1, mark, c.header.text(None))
                })
                .collect();
            lines.push(StyledLine::new(
                Style::Info,
                format!("Toggle column: {}", columns.join("  ")),
            ));
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyModifiers;

    use super::*;
    use crate::pages::Expenses;

    #[test]
    fn test_edit_title_survives_data_replacement() {
        let mut cx = PageContext::new();
        let mut page = TablePage::<Expenses>::new(None, 10).unwrap();
        page.activate(&mut cx);
        page.handle_key(KeyEvent::new(KeyCode::Char('e'), KeyModifiers::NONE), &mut cx);
        assert_eq!(page.render(&cx)[0].text, "Edit Expense");

        // a delete finishing while the sheet is open replaces the data
        page.remove_local("exp-3");
        assert!(page.table().sheet().is_none());
        assert!(page.sheet().is_some_and(|s| s.is_editing()));
        assert_eq!(page.render(&cx)[0].text, "Edit Expense");
    }
}
