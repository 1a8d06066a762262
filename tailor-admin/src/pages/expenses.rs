//! Factory expenses. Kept locally; the API has no expense resource.

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tailor_ui::prelude::*;
use tailor_ui::table::DataTableBuilder;

use super::form::FormDraft;
use super::seed_date;
use super::table::TableSpec;

pub const CATEGORIES: &[&str] = &["Operational", "Utilities", "Maintenance", "Transport"];

#[derive(Debug, Clone, PartialEq)]
pub struct Expense {
    pub id: String,
    pub title: String,
    pub category: String,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub paid_by: String,
}

impl TableRow for Expense {
    type Key = String;
    const FIELDS: &'static [&'static str] =
        &["id", "title", "category", "amount", "date", "paid_by"];

    fn key(&self) -> String {
        self.id.clone()
    }

    fn field(&self, name: &str) -> CellValue {
        match name {
            "id" => CellValue::from(&self.id),
            "title" => CellValue::from(&self.title),
            "category" => CellValue::from(&self.category),
            "amount" => CellValue::from(self.amount),
            "date" => CellValue::from(self.date),
            "paid_by" => CellValue::from(&self.paid_by),
            _ => CellValue::Empty,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpenseDraft {
    id: String,
    pub title: String,
    pub category: String,
    pub amount: String,
    pub date: String,
    pub paid_by: String,
}

impl Draft for ExpenseDraft {
    type Output = Expense;

    fn schema() -> Schema<Self> {
        Schema::new()
            .field("title", |d: &Self| d.title.trim().to_string())
            .required("Title is required")
            .max_length(60, "Title is too long")
            .field("category", |d: &Self| d.category.trim().to_string())
            .required("Category is required")
            .one_of(CATEGORIES, "Unknown category")
            .field("amount", |d: &Self| d.amount.trim().to_string())
            .required("Amount is required")
            .numeric("Amount must be a number")
            .rule(
                |v| Decimal::from_str(v).is_ok_and(|n| n > Decimal::ZERO),
                "Amount must be positive",
            )
            .field("date", |d: &Self| d.date.trim().to_string())
            .required("Date is required")
            .date("Use YYYY-MM-DD")
            .field("paid_by", |d: &Self| d.paid_by.trim().to_string())
            .required("Paid by is required")
    }

    fn build(&self) -> Result<Expense, FieldError> {
        let amount = Decimal::from_str(self.amount.trim())
            .map_err(|_| FieldError::new("amount", "Amount must be a number"))?;
        let date = NaiveDate::parse_from_str(self.date.trim(), "%Y-%m-%d")
            .map_err(|_| FieldError::new("date", "Use YYYY-MM-DD"))?;
        Ok(Expense {
            id: self.id.clone(),
            title: self.title.trim().to_string(),
            category: self.category.trim().to_string(),
            amount,
            date,
            paid_by: self.paid_by.trim().to_string(),
        })
    }
}

impl FormDraft for ExpenseDraft {
    const FIELDS: &'static [(&'static str, &'static str)] = &[
        ("title", "Title"),
        ("category", "Category"),
        ("amount", "Amount"),
        ("date", "Date"),
        ("paid_by", "Paid by"),
    ];

    fn value(&self, key: &str) -> &str {
        match key {
            "title" => &self.title,
            "category" => &self.category,
            "amount" => &self.amount,
            "date" => &self.date,
            "paid_by" => &self.paid_by,
            _ => "",
        }
    }

    fn value_mut(&mut self, key: &str) -> Option<&mut String> {
        match key {
            "title" => Some(&mut self.title),
            "category" => Some(&mut self.category),
            "amount" => Some(&mut self.amount),
            "date" => Some(&mut self.date),
            "paid_by" => Some(&mut self.paid_by),
            _ => None,
        }
    }
}

pub struct Expenses;

impl TableSpec for Expenses {
    type Row = Expense;
    type Form = ExpenseDraft;

    const TITLE: &'static str = "Expenses";
    const NOUN: &'static str = "Expense";
    const EDITABLE: bool = true;

    fn columns() -> Vec<ColumnDef<Expense>> {
        vec![
            ColumnDef::new("title", "Title").width(24).sortable().pinned(),
            ColumnDef::new("category", "Category").width(12).sortable(),
            ColumnDef::new("amount", "Amount")
                .width(10)
                .align(Alignment::Right)
                .sortable()
                .cell(|e: &Expense| format!("{:.2}", e.amount)),
            ColumnDef::new("date", "Date").width(10).sortable(),
            ColumnDef::new("paid_by", "Paid by").width(14),
        ]
    }

    fn configure(builder: DataTableBuilder<Expense>) -> DataTableBuilder<Expense> {
        let tabs = std::iter::once(Tab::all())
            .chain(CATEGORIES.iter().map(|c| Tab::new(*c, *c)))
            .collect();
        builder.search_key("title").filter_key("category", tabs)
    }

    fn seed() -> Vec<Expense> {
        [
            ("Generator diesel", "Operational", 12500, (2024, 5, 1), "Admin"),
            ("Electricity bill", "Utilities", 86000, (2024, 5, 3), "Accounts"),
            ("Needle replacement", "Maintenance", 4200, (2024, 5, 4), "Sewing"),
            ("Thread restock", "Operational", 18750, (2024, 5, 6), "Store"),
            ("Covered van hire", "Transport", 9000, (2024, 5, 7), "Commercial"),
            ("Water supply", "Utilities", 6300, (2024, 5, 9), "Accounts"),
        ]
        .into_iter()
        .enumerate()
        .map(|(i, (title, category, amount, (y, m, d), paid_by))| Expense {
            id: format!("exp-{}", i + 1),
            title: title.to_string(),
            category: category.to_string(),
            amount: Decimal::from(amount),
            date: seed_date(y, m, d),
            paid_by: paid_by.to_string(),
        })
        .collect()
    }

    fn draft(row: Option<&Expense>) -> ExpenseDraft {
        match row {
            Some(e) => ExpenseDraft {
                id: e.id.clone(),
                title: e.title.clone(),
                category: e.category.clone(),
                amount: e.amount.to_string(),
                date: e.date.format("%Y-%m-%d").to_string(),
                paid_by: e.paid_by.clone(),
            },
            None => ExpenseDraft::default(),
        }
    }

    fn assign_key(row: &mut Expense, key: String) {
        row.id = key;
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    use super::*;
    use crate::pages::{Page, TablePage};

    fn press(page: &mut TablePage<Expenses>, cx: &mut PageContext, code: KeyCode) {
        page.handle_key(KeyEvent::new(code, KeyModifiers::NONE), cx);
    }

    fn type_text(page: &mut TablePage<Expenses>, cx: &mut PageContext, text: &str) {
        for ch in text.chars() {
            press(page, cx, KeyCode::Char(ch));
        }
    }

    fn page() -> (TablePage<Expenses>, PageContext) {
        let mut cx = PageContext::new();
        let mut page = TablePage::<Expenses>::new(None, 10).unwrap();
        page.activate(&mut cx);
        (page, cx)
    }

    #[test]
    fn test_seeded_without_client() {
        let (page, _) = page();
        assert_eq!(page.table().data().len(), 6);
    }

    #[test]
    fn test_category_tab_and_search() {
        let (mut page, mut cx) = page();
        press(&mut page, &mut cx, KeyCode::Tab);
        assert_eq!(page.table().active_tab(), "Operational");
        assert_eq!(page.table().visible_keys(), vec!["exp-1", "exp-4"]);

        press(&mut page, &mut cx, KeyCode::Char('/'));
        type_text(&mut page, &mut cx, "THREAD");
        assert_eq!(page.table().visible_keys(), vec!["exp-4"]);
        press(&mut page, &mut cx, KeyCode::Enter);
        assert!(!cx.is_search_open());

        press(&mut page, &mut cx, KeyCode::Esc);
        assert_eq!(page.table().visible_count(), 6);
    }

    #[test]
    fn test_delete_keeps_sibling_order() {
        let (mut page, mut cx) = page();
        press(&mut page, &mut cx, KeyCode::Down);
        press(&mut page, &mut cx, KeyCode::Char('d'));

        let keys: Vec<String> = page.table().data().iter().map(|e| e.id.clone()).collect();
        assert_eq!(keys, vec!["exp-1", "exp-3", "exp-4", "exp-5", "exp-6"]);
        assert_eq!(cx.toasts.latest().unwrap().message, "Expense deleted");
    }

    #[test]
    fn test_add_through_sheet() {
        let (mut page, mut cx) = page();
        press(&mut page, &mut cx, KeyCode::Char('n'));
        assert!(page.sheet().is_some());

        type_text(&mut page, &mut cx, "Boiler service");
        press(&mut page, &mut cx, KeyCode::Enter);
        assert!(page.sheet().is_some());
        assert_eq!(cx.toasts.latest().unwrap().message, "Category is required");

        type_text(&mut page, &mut cx, "Maintenance");
        press(&mut page, &mut cx, KeyCode::Tab);
        type_text(&mut page, &mut cx, "3500");
        press(&mut page, &mut cx, KeyCode::Tab);
        type_text(&mut page, &mut cx, "2024-05-10");
        press(&mut page, &mut cx, KeyCode::Tab);
        type_text(&mut page, &mut cx, "Admin");
        press(&mut page, &mut cx, KeyCode::Enter);

        assert!(page.sheet().is_none());
        assert_eq!(page.table().data().len(), 7);
        let added = page.table().data().last().unwrap();
        assert_eq!(added.title, "Boiler service");
        assert!(!added.id.is_empty());
    }

    #[test]
    fn test_edit_replaces_in_place() {
        let (mut page, mut cx) = page();
        press(&mut page, &mut cx, KeyCode::Char('e'));
        press(&mut page, &mut cx, KeyCode::Tab);
        press(&mut page, &mut cx, KeyCode::Tab);
        for _ in 0..5 {
            press(&mut page, &mut cx, KeyCode::Backspace);
        }
        type_text(&mut page, &mut cx, "99");
        press(&mut page, &mut cx, KeyCode::Enter);

        let first = &page.table().data()[0];
        assert_eq!(first.id, "exp-1");
        assert_eq!(first.amount, Decimal::from(99));
        assert_eq!(page.table().data().len(), 6);
    }

    #[test]
    fn test_select_all_visible_only() {
        let (mut page, mut cx) = page();
        press(&mut page, &mut cx, KeyCode::Tab);
        press(&mut page, &mut cx, KeyCode::Char('a'));
        assert_eq!(page.table().selected(), vec!["exp-1", "exp-4"]);
    }
}
