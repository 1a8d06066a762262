//! Overtime entries.

use rust_decimal::Decimal;
use tailor_client::TailorClient;
use tailor_client::model::OvertimeRecord;
use tailor_ui::prelude::*;
use tailor_ui::table::DataTableBuilder;

use super::form::ReadOnly;
use super::seed_date;
use super::table::{PageFuture, TableSpec, delete_by_id, list_rows};

#[derive(Debug, Clone, PartialEq)]
pub struct OvertimeRow(pub OvertimeRecord);

impl TableRow for OvertimeRow {
    type Key = String;
    const FIELDS: &'static [&'static str] = &[
        "id",
        "employee_id",
        "employee_name",
        "date",
        "hours",
        "rate",
        "amount",
    ];

    fn key(&self) -> String {
        self.0.id.clone()
    }

    fn field(&self, name: &str) -> CellValue {
        let r = &self.0;
        match name {
            "id" => CellValue::from(&r.id),
            "employee_id" => CellValue::from(&r.employee_id),
            "employee_name" => CellValue::from(&r.employee_name),
            "date" => CellValue::from(r.date),
            "hours" => CellValue::from(r.hours),
            "rate" => CellValue::from(r.rate),
            "amount" => CellValue::from(r.amount),
            _ => CellValue::Empty,
        }
    }
}

pub struct Overtime;

impl TableSpec for Overtime {
    type Row = OvertimeRow;
    type Form = ReadOnly<OvertimeRow>;

    const TITLE: &'static str = "Overtime";
    const NOUN: &'static str = "Overtime entry";

    fn columns() -> Vec<ColumnDef<OvertimeRow>> {
        vec![
            ColumnDef::new("employee_id", "Employee ID").width(11).sortable().pinned(),
            ColumnDef::new("employee_name", "Name").width(18).sortable(),
            ColumnDef::new("date", "Date").width(10).sortable(),
            ColumnDef::new("hours", "Hours")
                .width(5)
                .align(Alignment::Right)
                .sortable(),
            ColumnDef::new("rate", "Rate").width(7).align(Alignment::Right),
            ColumnDef::new("amount", "Amount")
                .width(9)
                .align(Alignment::Right)
                .sortable(),
        ]
    }

    fn configure(builder: DataTableBuilder<OvertimeRow>) -> DataTableBuilder<OvertimeRow> {
        builder
            .search_key("employee_name")
            .search_mode(SearchMode::Fuzzy)
    }

    fn seed() -> Vec<OvertimeRow> {
        [
            ("EMP002", "Karim Hossain", (5, 4), "2.5", 90, "225"),
            ("EMP004", "Shirin Begum", (5, 4), "3", 120, "360"),
            ("EMP001", "Rahim Uddin", (5, 11), "1.5", 100, "150"),
        ]
        .into_iter()
        .enumerate()
        .map(|(i, (employee_id, name, (m, d), hours, rate, amount))| {
            OvertimeRow(OvertimeRecord {
                id: format!("ot-{}", i + 1),
                employee_id: employee_id.to_string(),
                employee_name: name.to_string(),
                date: seed_date(2024, m, d),
                hours: hours.parse().unwrap_or_default(),
                rate: Decimal::from(rate),
                amount: amount.parse().unwrap_or_default(),
            })
        })
        .collect()
    }

    fn fetch(client: &TailorClient) -> Option<PageFuture<Vec<OvertimeRow>>> {
        Some(list_rows(client.overtime(), OvertimeRow))
    }

    fn delete(client: &TailorClient, row: &OvertimeRow) -> Option<PageFuture<()>> {
        Some(delete_by_id(client.overtime(), &row.0.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fuzzy_name_search() {
        let mut table = Overtime::configure(DataTable::builder(Overtime::columns(), Overtime::seed()))
            .build()
            .unwrap();
        table.set_search("shrn");
        assert_eq!(table.visible_keys(), vec!["ot-2"]);
    }
}
